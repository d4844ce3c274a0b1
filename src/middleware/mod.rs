//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured tracing, request-id injection,
//! authentication, default headers.
//!
//! A middleware is any async function taking the request and the rest of the
//! chain:
//!
//! ```rust
//! use burrow::middleware::Next;
//! use burrow::{Request, Response};
//! use http::StatusCode;
//!
//! async fn require_token(req: Request, next: Next) -> Response {
//!     if !req.headers().has("authorization") {
//!         // short-circuit: the endpoint never runs
//!         return Response::status(StatusCode::UNAUTHORIZED);
//!     }
//!     next.run(req).await
//! }
//! ```
//!
//! # Ordering
//!
//! For global middlewares `[G1, G2]` and route-local middlewares `[L1, L2]`
//! the chain is an onion:
//!
//! ```text
//! G1 → G2 → L1 → L2 → endpoint → L2 → L1 → G2 → G1
//! ```
//!
//! Pre-logic runs outermost first, post-logic runs innermost first.

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedEndpoint};
use crate::request::Request;
use crate::response::IntoResponse;

mod trace;

pub use trace::trace;

// ── Middleware trait ──────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, next: Next) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware.
///
/// Satisfied by any `async fn` (or closure returning a future) shaped like:
///
/// ```text
/// async fn name(req: Request, next: Next) -> impl IntoResponse
/// ```
///
/// Sealed, like [`Endpoint`](crate::Endpoint).
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut, R> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The rest of the chain, downstream of the current middleware.
///
/// Calling [`run`](Next::run) hands the request to the next layer (or to the
/// endpoint, for the innermost middleware). Not calling it short-circuits the
/// request: whatever the middleware returns is the response.
///
/// `Next` is cheap to clone. A middleware may run it more than once (a retry
/// layer, say), though each run needs its own [`Request`].
#[derive(Clone)]
pub struct Next {
    inner: Arc<dyn Chain + Send + Sync>,
}

impl Next {
    /// Runs the downstream chain with `req`.
    pub fn run(&self, req: Request) -> BoxFuture {
        self.inner.call(req)
    }
}

trait Chain {
    fn call(&self, req: Request) -> BoxFuture;
}

/// Innermost link: runs the matched endpoint.
struct Terminal(BoxedEndpoint);

impl Chain for Terminal {
    fn call(&self, req: Request) -> BoxFuture {
        self.0.call(req)
    }
}

/// One middleware wrapped around everything inside it.
struct Layer {
    middleware: BoxedMiddleware,
    next: Next,
}

impl Chain for Layer {
    fn call(&self, req: Request) -> BoxFuture {
        self.middleware.call(req, self.next.clone())
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// Folds `endpoint`, `local` and `global` into one executable chain.
///
/// Both middleware groups fold from last to first, so the first middleware
/// of a group ends up outermost within it, and the whole global group wraps
/// the local group. Inputs are read-only registered data, so concurrent
/// requests compose independently.
pub(crate) fn compose(
    endpoint: &BoxedEndpoint,
    local: &[BoxedMiddleware],
    global: &[BoxedMiddleware],
) -> Next {
    let terminal = Next { inner: Arc::new(Terminal(Arc::clone(endpoint))) };

    local
        .iter()
        .rev()
        .chain(global.iter().rev())
        .fold(terminal, |next, middleware| Next {
            inner: Arc::new(Layer { middleware: Arc::clone(middleware), next }),
        })
}
