//! Per-node, per-method route storage.

use crate::handler::{BoxedEndpoint, Endpoint};
use crate::method::Method;
use crate::middleware::{BoxedMiddleware, Middleware};

/// An endpoint plus the middlewares local to it.
///
/// ```rust
/// use burrow::middleware::{self, Next};
/// use burrow::{Method, Request, Response, Route, Router};
/// # async fn delete_user(_: Request) -> Response { Response::status(http::StatusCode::NO_CONTENT) }
/// # async fn require_admin(req: Request, next: Next) -> Response { next.run(req).await }
///
/// Router::new().route(
///     Method::Delete,
///     "/users/:id",
///     Route::new(delete_user)
///         .middleware(middleware::trace)
///         .middleware(require_admin),
/// );
/// ```
///
/// Local middlewares run in the order they are added, after every global
/// middleware and before the endpoint.
pub struct Route {
    pub(crate) endpoint: BoxedEndpoint,
    pub(crate) middlewares: Vec<BoxedMiddleware>,
}

impl Route {
    pub fn new(endpoint: impl Endpoint) -> Self {
        Self { endpoint: endpoint.into_boxed_endpoint(), middlewares: Vec::new() }
    }

    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(middleware.into_boxed_middleware());
        self
    }
}

/// One optional [`Route`] per [`Method`], indexed by [`Method::index`].
pub(crate) struct RouteTable([Option<Route>; Method::COUNT]);

impl RouteTable {
    pub(crate) fn get(&self, method: Method) -> Option<&Route> {
        self.0[method.index()].as_ref()
    }

    pub(crate) fn set(&mut self, method: Method, route: Route) {
        self.0[method.index()] = Some(route);
    }

    /// True when no method is registered at all.
    pub(crate) fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self(std::array::from_fn(|_| None))
    }
}
