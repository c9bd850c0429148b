//! Observability for devicestore
//!
//! Structured, synchronous JSON logging. Logging is read-only: it never
//! changes the outcome of the operation being logged.
//!
//! ```ignore
//! use devicestore::observability::{Event, Logger};
//!
//! Logger::info(Event::DeviceCreate, &[("id", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
