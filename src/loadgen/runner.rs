//! Concurrent script replay
//!
//! Every script line becomes its own task. The runner returns only after
//! every task has finished.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use tokio::task::JoinSet;

use crate::observability::{Event, Logger};

use super::errors::LoadResult;
use super::script::ScriptLine;

/// Load runner settings
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Base URL of the service (default: "http://localhost:8080")
    pub target: String,
    /// Pause before each GET so it tends to land after concurrent writes (default: 10ms)
    pub get_delay: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            target: "http://localhost:8080".to_string(),
            get_delay: Duration::from_millis(10),
        }
    }
}

/// Result of one scripted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOutcome {
    pub id: usize,
    pub method: Method,
    pub path: String,
    /// `None` when the request never got a response
    pub status: Option<StatusCode>,
    /// Response body, kept only for 200 responses
    pub body: Option<String>,
}

/// Outcomes of a whole run, ordered by request id
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub outcomes: Vec<RequestOutcome>,
}

impl LoadSummary {
    /// Requests answered with 200
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == Some(StatusCode::OK))
            .count()
    }

    /// Requests that never got a response
    pub fn transport_failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_none()).count()
    }

    /// Outcome for a request id
    pub fn outcome(&self, id: usize) -> Option<&RequestOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}

/// Replays script lines against a running service
pub struct LoadRunner {
    client: Client,
    config: LoadConfig,
}

impl LoadRunner {
    pub fn new(config: LoadConfig) -> LoadResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    /// Issue every line concurrently and wait for all of them
    pub async fn run(&self, lines: Vec<ScriptLine>) -> LoadSummary {
        let mut tasks = JoinSet::new();
        let base = self.config.target.trim_end_matches('/').to_string();

        for (id, line) in lines.into_iter().enumerate() {
            let client = self.client.clone();
            let url = format!("{}{}", base, line.path);
            let get_delay = self.config.get_delay;
            tasks.spawn(send(client, id, line, url, get_delay));
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => Logger::error(Event::RequestFailed, &[("error", &e.to_string())]),
            }
        }
        outcomes.sort_by_key(|o| o.id);

        let summary = LoadSummary { outcomes };
        Logger::info(
            Event::LoadComplete,
            &[
                ("requests", &summary.outcomes.len().to_string()),
                ("succeeded", &summary.succeeded().to_string()),
                ("transport_failures", &summary.transport_failures().to_string()),
            ],
        );
        summary
    }
}

async fn send(
    client: Client,
    id: usize,
    line: ScriptLine,
    url: String,
    get_delay: Duration,
) -> RequestOutcome {
    let id_field = id.to_string();
    Logger::info(
        Event::Request,
        &[
            ("body", line.body.as_deref().unwrap_or("")),
            ("id", &id_field),
            ("method", line.method.as_str()),
            ("target", &url),
        ],
    );

    let mut request = client.request(line.method.clone(), &url);
    if let Some(body) = line.body.clone() {
        request = request.header(CONTENT_TYPE, "application/json").body(body);
    }
    if line.method == Method::GET {
        tokio::time::sleep(get_delay).await;
    }

    let mut outcome = RequestOutcome {
        id,
        method: line.method,
        path: line.path,
        status: None,
        body: None,
    };

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            Logger::error(
                Event::RequestFailed,
                &[("error", &e.to_string()), ("id", &id_field)],
            );
            return outcome;
        }
    };

    let status = response.status();
    outcome.status = Some(status);
    if status == StatusCode::OK {
        match response.text().await {
            Ok(text) => outcome.body = Some(text),
            Err(e) => Logger::error(
                Event::RequestFailed,
                &[("error", &e.to_string()), ("id", &id_field)],
            ),
        }
    }

    Logger::info(
        Event::Response,
        &[
            ("body", outcome.body.as_deref().unwrap_or("")),
            ("id", &id_field),
            ("method", outcome.method.as_str()),
            ("status", status.as_str()),
        ],
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(id: usize, status: Option<StatusCode>) -> RequestOutcome {
        RequestOutcome {
            id,
            method: Method::GET,
            path: "/".to_string(),
            status,
            body: None,
        }
    }

    #[test]
    fn test_default_config_matches_fixed_service_address() {
        let config = LoadConfig::default();
        assert_eq!(config.target, "http://localhost:8080");
        assert_eq!(config.get_delay, Duration::from_millis(10));
    }

    #[test]
    fn test_summary_counts() {
        let summary = LoadSummary {
            outcomes: vec![
                outcome(0, Some(StatusCode::OK)),
                outcome(1, Some(StatusCode::CONFLICT)),
                outcome(2, None),
                outcome(3, Some(StatusCode::OK)),
            ],
        };
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.transport_failures(), 1);
        assert_eq!(summary.outcome(1).unwrap().status, Some(StatusCode::CONFLICT));
        assert!(summary.outcome(9).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_target_is_transport_failure() {
        let runner = LoadRunner::new(LoadConfig {
            target: "http://127.0.0.1:1".to_string(),
            get_delay: Duration::ZERO,
        })
        .unwrap();
        let lines = vec![ScriptLine {
            method: Method::DELETE,
            path: "/1".to_string(),
            body: None,
        }];

        let summary = runner.run(lines).await;
        assert_eq!(summary.transport_failures(), 1);
    }
}
