//! Trie-backed request router and dispatcher.
//!
//! Build the router once at startup: register routes, global middlewares, a
//! not-found endpoint and a [`Config`]. Then hand it to
//! [`Server::serve`](crate::Server::serve). Registration needs `self` or
//! `&mut self`, so a router shared across request tasks is read-only.

use std::borrow::Cow;

use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::handler::{self, BoxedEndpoint, Endpoint};
use crate::method::Method;
use crate::middleware::{self, BoxedMiddleware, Middleware};
use crate::params::Params;
use crate::request::Request;
use crate::response::Response;
use crate::route::Route;
use crate::trie::Trie;

/// The outcome of resolving a method + path, for diagnostics.
///
/// [`Router::handle`] sends both misses to the not-found endpoint.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    /// A route is registered for this method and path.
    Matched(Params),
    /// The path resolves, but not for this method (or the method is unknown).
    MethodMiss(Params),
    /// No registered path matches.
    PathMiss,
}

/// The application router.
///
/// ```rust,no_run
/// use burrow::{middleware, Request, Response, Router, Server};
/// use http::StatusCode;
///
/// # async fn run() -> Result<(), burrow::Error> {
/// let app = Router::new()
///     .middleware(middleware::trace)
///     .get("/users/:id", get_user)
///     .post("/users", create_user);
///
/// Server::bind("0.0.0.0:3000").serve(app).await
/// # }
///
/// async fn get_user(req: Request) -> Response {
///     let id = req.param("id").unwrap_or("unknown");
///     Response::json(StatusCode::OK, &serde_json::json!({ "id": id }))
/// }
///
/// async fn create_user(_req: Request) -> Response {
///     Response::status(StatusCode::CREATED)
/// }
/// ```
pub struct Router {
    trie: Trie,
    middlewares: Vec<BoxedMiddleware>,
    not_found: BoxedEndpoint,
    config: Config,
}

impl Router {
    pub fn new() -> Self {
        Self {
            trie: Trie::default(),
            middlewares: Vec::new(),
            not_found: handler::not_found.into_boxed_endpoint(),
            config: Config::default(),
        }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Adds a global middleware. Global middlewares wrap every request,
    /// matched or not, in registration order.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(middleware.into_boxed_middleware());
        self
    }

    /// Replaces the endpoint that answers unmatched requests (default: `404`).
    pub fn not_found(mut self, endpoint: impl Endpoint) -> Self {
        self.not_found = endpoint.into_boxed_endpoint();
        self
    }

    /// Registers an endpoint for a method + path pair. Returns `self` for
    /// chaining.
    ///
    /// Path parameters use `:name` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the registration is rejected (see [`Router::try_route`]), so
    /// a misconfigured router aborts startup instead of silently overwriting.
    pub fn on(self, method: Method, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.route(method, pattern, Route::new(endpoint))
    }

    /// Registers a [`Route`] with its local middlewares.
    ///
    /// # Panics
    ///
    /// As [`Router::on`].
    pub fn route(mut self, method: Method, pattern: &str, route: Route) -> Self {
        if let Err(e) = self.try_route(method, pattern, route) {
            panic!("invalid route `{method} {pattern}`: {e}");
        }
        self
    }

    pub fn try_on(&mut self, method: Method, pattern: &str, endpoint: impl Endpoint) -> Result<(), Error> {
        self.try_route(method, pattern, Route::new(endpoint))
    }

    /// Registers a [`Route`], failing with [`Error::RouteConflict`] when the
    /// method is already registered on the path or a different parameter
    /// name already owns a segment position, and with
    /// [`Error::InvalidPattern`] for malformed patterns. A rejected route
    /// leaves the router unchanged.
    pub fn try_route(&mut self, method: Method, pattern: &str, route: Route) -> Result<(), Error> {
        self.trie.insert(method, pattern, route)?;
        debug!(%method, pattern, "route registered");
        Ok(())
    }

    pub fn get(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Get, pattern, endpoint)
    }

    pub fn post(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Post, pattern, endpoint)
    }

    pub fn put(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Put, pattern, endpoint)
    }

    pub fn patch(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Patch, pattern, endpoint)
    }

    pub fn delete(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Delete, pattern, endpoint)
    }

    pub fn head(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Head, pattern, endpoint)
    }

    pub fn options(self, pattern: &str, endpoint: impl Endpoint) -> Self {
        self.on(Method::Options, pattern, endpoint)
    }

    /// Resolves `method` + `path` the way [`Router::handle`] would, without
    /// running anything.
    pub fn lookup(&self, method: &str, path: &str) -> Lookup {
        match self.find(Method::parse(method), path) {
            Ok((_, params)) => Lookup::Matched(params),
            Err(Miss::Method(params)) => Lookup::MethodMiss(params),
            Err(Miss::Path) => Lookup::PathMiss,
        }
    }

    fn find(&self, method: Option<Method>, path: &str) -> Result<(&Route, Params), Miss> {
        // Decode before cleaning so `%2e%2e` and `%2F` are normalized too.
        // Invalid UTF-8 is matched raw.
        let decoded = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
        let (node, params) = if self.config.sanitize_paths {
            self.trie.resolve(&crate::path::clean(&decoded))
        } else {
            self.trie.resolve(&decoded)
        };
        let node = match node {
            Some(node) if !node.routes.is_empty() => node,
            _ => return Err(Miss::Path),
        };
        match method.and_then(|m| node.routes.get(m)) {
            Some(route) => Ok((route, params)),
            None => Err(Miss::Method(params)),
        }
    }

    /// Dispatches one request and produces its response.
    ///
    /// Route parameters are written into the request before any middleware
    /// runs. Misses run the not-found endpoint with no local middlewares;
    /// global middlewares wrap every request.
    pub async fn handle(&self, mut req: Request) -> Response {
        let (endpoint, local) = match self.find(req.method(), req.path()) {
            Ok((route, params)) => {
                req.params = params;
                (&route.endpoint, route.middlewares.as_slice())
            }
            Err(miss) => {
                match miss {
                    Miss::Method(params) => {
                        debug!(method = req.method_str(), path = req.path(), "method not registered for path");
                        req.params = params;
                    }
                    Miss::Path => debug!(method = req.method_str(), path = req.path(), "no route for path"),
                }
                (&self.not_found, &[][..])
            }
        };

        middleware::compose(endpoint, local, &self.middlewares).run(req).await
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

enum Miss {
    Method(Params),
    Path,
}
