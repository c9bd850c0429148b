//! Operation script parsing
//!
//! One operation per line: `METHOD /path data`. Everything after the second
//! space is the body, so JSON bodies may contain spaces. A missing, empty
//! or blank body means the request carries no body and no content type.

use std::fs;
use std::path::Path;

use reqwest::Method;

use super::errors::{LoadError, LoadResult};

/// One scripted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub method: Method,
    /// Always starts with `/`
    pub path: String,
    pub body: Option<String>,
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> LoadResult<Vec<ScriptLine>> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&content)
}

/// Parse script text, skipping blank lines
pub fn parse_script(content: &str) -> LoadResult<Vec<ScriptLine>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_line(index + 1, line))
        .collect()
}

fn parse_line(number: usize, line: &str) -> LoadResult<ScriptLine> {
    let parse_error = |reason: &str| LoadError::Parse {
        line: number,
        reason: reason.to_string(),
    };

    let mut parts = line.trim_end_matches('\r').splitn(3, ' ');
    let method = parts.next().unwrap_or_default();
    let path = parts.next().unwrap_or_default();
    let data = parts.next().unwrap_or_default();

    if method.is_empty() {
        return Err(parse_error("missing method"));
    }
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| parse_error(&format!("invalid method {:?}", method)))?;

    if !path.starts_with('/') {
        return Err(parse_error(&format!("path {:?} must start with '/'", path)));
    }

    let body = if data.trim().is_empty() {
        None
    } else {
        Some(data.to_string())
    };

    Ok(ScriptLine {
        method,
        path: path.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put_with_body() {
        let lines = parse_script(r#"PUT / {"id":1,"status":0,"name":"sensor"}"#).unwrap();
        assert_eq!(
            lines,
            vec![ScriptLine {
                method: Method::PUT,
                path: "/".to_string(),
                body: Some(r#"{"id":1,"status":0,"name":"sensor"}"#.to_string()),
            }]
        );
    }

    #[test]
    fn test_blank_data_means_no_body() {
        let lines = parse_script("GET /1  \nDELETE /1 \nGET /\n").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.body.is_none()));
        assert_eq!(lines[1].method, Method::DELETE);
        assert_eq!(lines[2].path, "/");
    }

    #[test]
    fn test_body_keeps_inner_spaces() {
        let lines = parse_script(r#"PUT /4 {"id": 4, "status": 1, "name": "desk lamp"}"#).unwrap();
        assert_eq!(
            lines[0].body.as_deref(),
            Some(r#"{"id": 4, "status": 1, "name": "desk lamp"}"#)
        );
    }

    #[test]
    fn test_blank_lines_skipped_and_crlf_tolerated() {
        let lines = parse_script("\r\nGET /1 \r\n\nGET /2 \r\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].path, "/2");
        assert!(lines[1].body.is_none());
    }

    #[test]
    fn test_bad_path_reports_line_number() {
        let err = parse_script("GET /1 \nGET 1 \n").unwrap_err();
        match err {
            LoadError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_path_rejected() {
        assert!(matches!(
            parse_script("GET"),
            Err(LoadError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_load_script_missing_file() {
        let err = load_script(Path::new("/nonexistent/operations")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
