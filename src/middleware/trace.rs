use std::time::Instant;

use tracing::info;

use super::Next;
use crate::request::Request;
use crate::response::Response;

/// Logs one line per request: method, path, status, latency.
///
/// Register it first so the latency covers every other layer:
///
/// ```rust
/// use burrow::{Router, middleware};
///
/// let app = Router::new().middleware(middleware::trace);
/// ```
pub async fn trace(req: Request, next: Next) -> Response {
    let method = req.method_str().to_owned();
    let path = req.path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    info!(
        %method,
        %path,
        status = response.status_code().as_u16(),
        latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        "request"
    );
    response
}
