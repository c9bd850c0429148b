//! Observable events for devicestore
//!
//! Every log line names exactly one of these events.

use std::fmt;

/// Observable events emitted by the service and the load runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Previous store discarded and a fresh table created
    StoreBootstrap,
    /// HTTP listener bound, ready for requests
    ServerStart,
    /// Startup failed; the process exits
    BootFailed,

    // Device operations
    /// All devices listed
    DeviceList,
    /// Single device fetched
    DeviceGet,
    /// Device inserted
    DeviceCreate,
    /// Device updated in place
    DeviceUpdate,
    /// Device removed
    DeviceDelete,
    /// A device request ended in an error status
    DeviceRequestFailed,

    // Transport
    /// One HTTP request served
    HttpRequest,

    // Load runner
    /// Scripted request issued
    Request,
    /// Scripted request answered
    Response,
    /// Scripted request failed at the transport level
    RequestFailed,
    /// Every scripted request finished
    LoadComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreBootstrap => "STORE_BOOTSTRAP",
            Event::ServerStart => "SERVER_START",
            Event::BootFailed => "BOOT_FAILED",

            Event::DeviceList => "DEVICE_LIST",
            Event::DeviceGet => "DEVICE_GET",
            Event::DeviceCreate => "DEVICE_CREATE",
            Event::DeviceUpdate => "DEVICE_UPDATE",
            Event::DeviceDelete => "DEVICE_DELETE",
            Event::DeviceRequestFailed => "DEVICE_REQUEST_FAILED",

            Event::HttpRequest => "HTTP_REQUEST",

            Event::Request => "REQUEST",
            Event::Response => "RESPONSE",
            Event::RequestFailed => "REQUEST_FAILED",
            Event::LoadComplete => "LOAD_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::StoreBootstrap,
            Event::ServerStart,
            Event::DeviceCreate,
            Event::DeviceRequestFailed,
            Event::HttpRequest,
            Event::LoadComplete,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }
}
