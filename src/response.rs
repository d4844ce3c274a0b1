//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! A [`Response`] is a value that knows how to render itself into a
//! [`ResponseWriter`]. Variants nest: a status can wrap a body, a header set
//! can wrap anything. Build one in your endpoint and return it.

use std::fmt;
use std::path::Path;

use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use tracing::warn;

use crate::error::Error;

// ── ContentType ───────────────────────────────────────────────────────────────

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";
const XML: &str = "application/xml";

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// The transport a [`Response`] renders into.
///
/// Mirrors the semantics of a streaming writer: the first status written
/// wins, and writing body bytes before any status commits `200 OK`.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status unless one was already written.
    pub fn write_status(&mut self, status: StatusCode) {
        self.status.get_or_insert(status);
    }

    /// Sets `name`, replacing any previous value.
    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn write(&mut self, data: &[u8]) {
        self.write_status(StatusCode::OK);
        self.body.extend_from_slice(data);
    }

    /// The committed status, `200 OK` if nothing was written.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let status = self.status();
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() = status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use burrow::Response;
/// use http::StatusCode;
///
/// Response::text(StatusCode::OK, "hello");
/// Response::status(StatusCode::NO_CONTENT);
/// Response::json(StatusCode::CREATED, &serde_json::json!({ "id": 42 }));
/// Response::error(StatusCode::BAD_REQUEST, "missing field `name`");
/// Response::redirect(StatusCode::SEE_OTHER, "/users/42");
///
/// // Headers wrap any response and never clobber what it sets itself.
/// Response::with_headers(
///     [("cache-control", "no-store")],
///     Response::text(StatusCode::OK, "fresh"),
/// );
/// ```
///
/// Serialization failures do not escape: they turn into a `500` structured
/// error response at construction time.
#[derive(Debug)]
pub struct Response(Kind);

#[derive(Debug)]
enum Kind {
    Status(StatusCode, Option<Box<Response>>),
    Body(Option<HeaderValue>, Bytes),
    Headers(Vec<(HeaderName, HeaderValue)>, Box<Response>),
    Redirect(StatusCode, HeaderValue),
}

impl Response {
    /// Raw bytes, no content type.
    pub fn bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::with_status(status, Self(Kind::Body(None, body.into())))
    }

    /// Status line only, no body.
    pub fn status(status: StatusCode) -> Self {
        Self(Kind::Status(status, None))
    }

    /// Writes `status`, then renders `inner`. Any status `inner` writes is
    /// ignored.
    pub fn with_status(status: StatusCode, inner: Response) -> Self {
        Self(Kind::Status(status, Some(Box::new(inner))))
    }

    /// Renders `inner`, then sets each header `inner` left unset.
    ///
    /// Nested wrappers resolve innermost-first. When two wrappers name the
    /// same header, the one closer to the body wins, and an outer wrapper
    /// only supplies defaults. This is the reverse of applying wrappers
    /// outside-in with first-write-wins.
    ///
    /// Invalid header names or values are dropped with a warning.
    pub fn with_headers<I, K, V>(headers: I, inner: Response) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let headers = headers
            .into_iter()
            .filter_map(|(k, v)| {
                let (k, v) = (k.as_ref(), v.as_ref());
                match (HeaderName::try_from(k), HeaderValue::try_from(v)) {
                    (Ok(name), Ok(value)) => Some((name, value)),
                    _ => {
                        warn!(header = k, "dropping invalid response header");
                        None
                    }
                }
            })
            .collect();
        Self(Kind::Headers(headers, Box::new(inner)))
    }

    /// `text/plain` body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::typed(status, TEXT, body.into())
    }

    /// Serializes `value` as a JSON body.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::typed(status, JSON, body),
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, format!("json marshal: {e}")),
        }
    }

    /// Serializes `value` as an XML body.
    pub fn xml<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match quick_xml::se::to_string(value) {
            Ok(body) => Self::typed(status, XML, body),
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, format!("xml marshal: {e}")),
        }
    }

    /// An already-encoded JSON document.
    pub fn message(status: StatusCode, json: impl Into<String>) -> Self {
        Self::typed(status, JSON, json.into())
    }

    /// A structured error: `{"error":"<message>"}` with quotes escaped.
    pub fn error(status: StatusCode, err: impl fmt::Display) -> Self {
        let body = serde_json::json!({ "error": err.to_string() }).to_string();
        Self::typed(status, JSON, body)
    }

    /// Renders the template at `file` with `context` as an HTML body.
    pub fn html(status: StatusCode, file: impl AsRef<Path>, context: impl Serialize) -> Self {
        match render_template(file.as_ref(), context) {
            Ok(page) => Self::typed(status, HTML, page),
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, format!("template parse: {e}")),
        }
    }

    /// Redirect to `location` with a `3xx` status.
    pub fn redirect(status: StatusCode, location: impl AsRef<str>) -> Self {
        match HeaderValue::try_from(location.as_ref()) {
            Ok(location) => Self(Kind::Redirect(status, location)),
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, format!("redirect: {e}")),
        }
    }

    fn typed(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        let content_type = HeaderValue::from_static(content_type);
        Self::with_status(status, Self(Kind::Body(Some(content_type), body.into())))
    }

    /// The status this response renders with.
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            Kind::Status(status, _) | Kind::Redirect(status, _) => *status,
            Kind::Body(..) => StatusCode::OK,
            Kind::Headers(_, inner) => inner.status_code(),
        }
    }

    /// Renders into `w`.
    pub fn render(self, w: &mut ResponseWriter) {
        match self.0 {
            Kind::Status(status, inner) => {
                w.write_status(status);
                if let Some(inner) = inner {
                    inner.render(w);
                }
            }
            Kind::Body(content_type, body) => {
                if let Some(content_type) = content_type {
                    w.set_header(CONTENT_TYPE, content_type);
                }
                w.write(&body);
            }
            Kind::Headers(headers, inner) => {
                inner.render(w);
                for (name, value) in headers {
                    if !w.headers().contains_key(&name) {
                        w.set_header(name, value);
                    }
                }
            }
            Kind::Redirect(status, location) => {
                w.write_status(status);
                w.set_header(LOCATION, location);
            }
        }
    }

    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut w = ResponseWriter::new();
        self.render(&mut w);
        w.into_http()
    }
}

fn render_template(file: &Path, context: impl Serialize) -> Result<String, Error> {
    let source = std::fs::read_to_string(file)?;
    Ok(minijinja::Environment::new().render_str(&source, context)?)
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into a [`Response`].
///
/// Implement on your own types to return them directly from endpoints.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(StatusCode::OK, self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(StatusCode::OK, self) }
}

/// Return a status directly from an endpoint: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

/// `Err` renders as a `500` structured error, so endpoints can use `?`.
impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: fmt::Display,
{
    fn into_response(self) -> Response {
        match self {
            Ok(res) => res.into_response(),
            Err(e) => Response::error(StatusCode::INTERNAL_SERVER_ERROR, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde::Serialize;

    use super::*;

    fn rendered(res: Response) -> ResponseWriter {
        let mut w = ResponseWriter::new();
        res.render(&mut w);
        w
    }

    fn header<'a>(w: &'a ResponseWriter, name: &str) -> Option<&'a str> {
        w.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn bytes_carry_status_and_body_without_content_type() {
        let w = rendered(Response::bytes(StatusCode::ACCEPTED, &b"raw"[..]));
        assert_eq!(w.status(), StatusCode::ACCEPTED);
        assert_eq!(w.body(), b"raw");
        assert!(w.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn status_only_has_no_body() {
        let w = rendered(Response::status(StatusCode::NO_CONTENT));
        assert_eq!(w.status(), StatusCode::NO_CONTENT);
        assert!(w.body().is_empty());
    }

    #[test]
    fn outer_status_wins_over_nested_status() {
        let res = Response::with_status(StatusCode::CREATED, Response::text(StatusCode::OK, "x"));
        assert_eq!(res.status_code(), StatusCode::CREATED);
        assert_eq!(rendered(res).status(), StatusCode::CREATED);
    }

    #[test]
    fn text_sets_content_type() {
        let w = rendered(Response::text(StatusCode::OK, "hi"));
        assert_eq!(header(&w, "content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(w.body(), b"hi");
    }

    #[test]
    fn with_headers_does_not_overwrite_inner_headers() {
        let inner = Response::with_headers([("x", "inner")], Response::text(StatusCode::OK, "ok"));
        let res = Response::with_headers([("x", "1"), ("y", "2")], inner);

        let w = rendered(res);
        assert_eq!(header(&w, "x"), Some("inner"));
        assert_eq!(header(&w, "y"), Some("2"));
    }

    #[test]
    fn nested_wrappers_resolve_innermost_first() {
        let res = Response::with_headers(
            [("x", "outer")],
            Response::with_headers(
                [("x", "middle"), ("y", "middle")],
                Response::with_headers([("x", "inner")], Response::status(StatusCode::OK)),
            ),
        );

        let w = rendered(res);
        assert_eq!(header(&w, "x"), Some("inner"));
        assert_eq!(header(&w, "y"), Some("middle"));
    }

    #[test]
    fn with_headers_does_not_overwrite_content_type() {
        let res = Response::with_headers(
            [("content-type", "text/csv")],
            Response::json(StatusCode::OK, &[1, 2]),
        );
        assert_eq!(header(&rendered(res), "content-type"), Some("application/json"));
    }

    #[test]
    fn with_headers_drops_invalid_entries() {
        let res = Response::with_headers([("bad header", "v"), ("ok", "v")], Response::status(StatusCode::OK));
        let w = rendered(res);
        assert_eq!(w.headers().len(), 1);
        assert_eq!(header(&w, "ok"), Some("v"));
    }

    #[test]
    fn json_serializes_payload() {
        let w = rendered(Response::json(StatusCode::OK, &serde_json::json!({ "id": 1 })));
        assert_eq!(header(&w, "content-type"), Some("application/json"));
        assert_eq!(w.body(), br#"{"id":1}"#);
    }

    #[test]
    fn json_failure_becomes_500() {
        // Non-string map keys cannot be JSON object keys.
        let mut bad = HashMap::new();
        bad.insert(vec![1_u8], "v");

        let w = rendered(Response::json(StatusCode::OK, &bad));
        assert_eq!(w.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(std::str::from_utf8(w.body()).unwrap().starts_with(r#"{"error":"json marshal: "#));
    }

    #[test]
    fn xml_serializes_named_struct() {
        #[derive(Serialize)]
        struct Pet {
            name: String,
        }

        let w = rendered(Response::xml(StatusCode::OK, &Pet { name: "rex".into() }));
        assert_eq!(header(&w, "content-type"), Some("application/xml"));
        assert_eq!(w.body(), b"<Pet><name>rex</name></Pet>");
    }

    #[test]
    fn error_escapes_quotes() {
        let w = rendered(Response::error(StatusCode::BAD_REQUEST, r#"field "name" missing"#));
        assert_eq!(w.status(), StatusCode::BAD_REQUEST);
        assert_eq!(w.body(), br#"{"error":"field \"name\" missing"}"#);
    }

    #[test]
    fn message_is_sent_verbatim() {
        let w = rendered(Response::message(StatusCode::OK, r#"{"ok":true}"#));
        assert_eq!(w.body(), br#"{"ok":true}"#);
    }

    #[test]
    fn redirect_sets_location() {
        let w = rendered(Response::redirect(StatusCode::FOUND, "/login"));
        assert_eq!(w.status(), StatusCode::FOUND);
        assert_eq!(header(&w, "location"), Some("/login"));
    }

    #[test]
    fn redirect_to_invalid_location_is_500() {
        let res = Response::redirect(StatusCode::FOUND, "/bad\nlocation");
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn html_renders_template_file() {
        let file = std::env::temp_dir().join(format!("burrow-html-{}.html", std::process::id()));
        std::fs::write(&file, "<h1>Hello {{ name }}</h1>").unwrap();

        let w = rendered(Response::html(StatusCode::OK, &file, serde_json::json!({ "name": "ada" })));
        std::fs::remove_file(&file).unwrap();

        assert_eq!(header(&w, "content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(w.body(), b"<h1>Hello ada</h1>");
    }

    #[test]
    fn html_with_missing_template_is_500() {
        let res = Response::html(StatusCode::OK, "/nonexistent/burrow.html", ());
        assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn result_errors_render_as_500() {
        let res: Result<Response, String> = Err("boom".into());
        let w = rendered(res.into_response());
        assert_eq!(w.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(w.body(), br#"{"error":"boom"}"#);
    }

    #[test]
    fn into_http_carries_everything() {
        let res = Response::with_headers([("x-id", "7")], Response::text(StatusCode::IM_A_TEAPOT, "tea"));
        let http = res.into_http();
        assert_eq!(http.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(http.headers()["x-id"], "7");
    }
}
