//! Incoming HTTP request type.

use bytes::Bytes;
use http::request::Parts;
use http::{Extensions, HeaderMap, Uri, Version};
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::method::Method;
use crate::params::{Params, Values};

/// An incoming HTTP request with its body already read.
///
/// Owned by exactly one request task: middlewares receive it by value and
/// hand it down the chain, so no two tasks ever share one.
pub struct Request {
    head: Parts,
    method: Option<Method>,
    body: Bytes,
    query: Values,
    headers: Values,
    pub(crate) params: Params,
}

impl Request {
    /// The method, or `None` for methods outside [`Method`]'s domain.
    pub fn method(&self) -> Option<Method> {
        self.method
    }

    /// The method as sent on the wire, known or not.
    pub fn method_str(&self) -> &str {
        self.head.method.as_str()
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    /// The raw (not normalized, not decoded) request path.
    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    pub fn version(&self) -> Version {
        self.head.version
    }

    /// Query-string parameters, multi-valued.
    pub fn query(&self) -> &Values {
        &self.query
    }

    /// Headers, multi-valued with case-insensitive names.
    pub fn headers(&self) -> &Values {
        &self.headers
    }

    /// The untouched header map, including non-ASCII values.
    pub fn header_map(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Route parameters bound while resolving the path.
    ///
    /// For a route `/users/:id`, `req.params().get("id")` on `/users/42`
    /// returns `Some("42")`.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `req.params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Request-scoped values. Middlewares insert here; inner layers read.
    pub fn extensions(&self) -> &Extensions {
        &self.head.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.head.extensions
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str, Error> {
        Ok(std::str::from_utf8(&self.body)?)
    }

    /// Deserializes a JSON body.
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Deserializes an XML body.
    pub fn bind_xml<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(quick_xml::de::from_str(self.text()?)?)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(req: http::Request<Bytes>) -> Self {
        let (head, body) = req.into_parts();
        Self {
            method: Method::from_http(&head.method),
            query: Values::from_query(head.uri.query()),
            headers: Values::from_headers(&head.headers),
            params: Params::new(),
            head,
            body,
        }
    }
}
