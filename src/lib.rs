//! # burrow
//!
//! An in-process HTTP router: a segment trie picks the endpoint, an onion of
//! middlewares runs around it.
//!
//! ## What happens to a request
//!
//! ```text
//! raw path ──normalize──▶ trie ──▶ (node, params) ──method slot──▶ (endpoint, local middlewares)
//!                                                                        │
//!          response ◀── run ◀── compose(global ∘ local ∘ endpoint) ◀─────┘
//! ```
//!
//! - **Trie routing**: O(segments) lookup, static segments beat `:param`
//!   segments at the same depth, conflicting registrations fail at startup.
//! - **Onion middleware**: global middlewares in registration order, then the
//!   route's own, then the endpoint. Any layer may short-circuit.
//! - **Never null-dispatch**: unmatched paths and unregistered methods go to
//!   a not-found endpoint (a bare `404` unless you set one).
//! - **Async I/O**: tokio + hyper 1, HTTP/1.1 and HTTP/2, graceful shutdown
//!   on SIGTERM / Ctrl-C.
//!
//! TLS, rate limiting and body-size limits belong to the proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use burrow::middleware::{self, Next};
//! use burrow::{Method, Request, Response, Route, Router, Server};
//! use http::StatusCode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), burrow::Error> {
//!     let app = Router::new()
//!         .middleware(middleware::trace)
//!         .get("/users/:id", get_user)
//!         .route(Method::Delete, "/users/:id", Route::new(delete_user).middleware(require_token));
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(StatusCode::OK, &serde_json::json!({ "id": id }))
//! }
//!
//! async fn delete_user(_req: Request) -> StatusCode {
//!     StatusCode::NO_CONTENT
//! }
//!
//! async fn require_token(req: Request, next: Next) -> Response {
//!     match req.headers().get("authorization") {
//!         Some(_) => next.run(req).await,
//!         None => Response::error(StatusCode::UNAUTHORIZED, "missing token"),
//!     }
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod params;
mod path;
mod request;
mod response;
mod route;
mod router;
mod server;
mod trie;

pub mod middleware;

pub use config::Config;
pub use error::{Conflict, Error};
pub use handler::{BoxFuture, Endpoint};
pub use method::Method;
pub use params::{Params, Values};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseWriter};
pub use route::Route;
pub use router::{Lookup, Router};
pub use server::Server;
