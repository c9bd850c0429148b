//! Request logging middleware

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::observability::{Event, Logger};

/// Log method, path, status and latency of every request
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    Logger::info(
        Event::HttpRequest,
        &[
            ("elapsed_us", &started.elapsed().as_micros().to_string()),
            ("method", method.as_str()),
            ("path", &path),
            ("status", response.status().as_str()),
        ],
    );
    response
}
