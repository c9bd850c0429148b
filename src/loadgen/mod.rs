//! Load Script Runner
//!
//! A plain HTTP client that replays an operations script against a running
//! device service, one concurrent request per line.
//!
//! ```text
//! PUT / {"id":1,"status":0,"name":"sensor"}
//! GET /1
//! DELETE /1
//! ```

mod errors;
mod runner;
mod script;

pub use errors::{LoadError, LoadResult};
pub use runner::{LoadConfig, LoadRunner, LoadSummary, RequestOutcome};
pub use script::{load_script, parse_script, ScriptLine};
