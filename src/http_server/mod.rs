//! # Device HTTP Server
//!
//! Five endpoints over the device store.
//!
//! # Endpoints
//!
//! - `GET /` - all devices as `{"devices": [...]}`
//! - `PUT /` - create a device (400 bad body, 409 conflict)
//! - `GET /{id}` - one device (404 if absent)
//! - `PUT /{id}` - overwrite a device, id included (400 bad body, 404 if absent)
//! - `DELETE /{id}` - remove a device (404 if absent)

pub mod config;
pub mod device_routes;
pub mod errors;
pub mod observe;
pub mod server;

pub use config::HttpServerConfig;
pub use device_routes::device_routes;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
