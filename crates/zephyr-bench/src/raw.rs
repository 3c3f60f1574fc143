//! Low-level server
//!
//! Works on hyper requests directly: no framework types, no parameter
//! decoding. Dispatch is a small ordered table of
//! `(method, path pattern, handler)` rows; the first row whose method and
//! pattern both match answers. Anything else is a bare 404.

use crate::payload::{User, GREETING};
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, StatusCode};
use http_body_util::Full;
use zephyr_core::{HyperResponse, Result};

/// How a row matches the request path (query string excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPattern {
    /// Whole path equals the string
    Exact(&'static str),
    /// Path starts with the string; the rest goes to the handler
    Prefix(&'static str),
}

impl PathPattern {
    /// What is left of `path` after the pattern, if it matches
    pub fn strip<'p>(&self, path: &'p str) -> Option<&'p str> {
        match *self {
            PathPattern::Exact(p) => (path == p).then_some(""),
            PathPattern::Prefix(p) => path.strip_prefix(p),
        }
    }
}

type RawHandler = Box<dyn Fn(&str) -> HyperResponse + Send + Sync>;

struct Route {
    method: Method,
    pattern: PathPattern,
    handler: RawHandler,
}

/// Ordered dispatch table
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. `handler` receives the path remainder from [`PathPattern::strip`].
    pub fn route<F>(mut self, method: Method, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(&str) -> HyperResponse + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            pattern,
            handler: Box::new(handler),
        });
        self
    }

    /// `GET /hello` and `GET /user/<id>`
    ///
    /// The greeting is encoded once here and shared by every response.
    pub fn standard() -> Result<Self> {
        let greeting = Bytes::from(serde_json::to_vec(&GREETING)?);

        Ok(Self::new()
            .route(Method::GET, PathPattern::Exact("/hello"), move |_| {
                json(greeting.clone())
            })
            .route(Method::GET, PathPattern::Prefix("/user/"), |rest| {
                // Only the first segment after the prefix is the id.
                user(rest.split('/').next().unwrap_or_default())
            }))
    }

    /// Answer one request
    pub fn handle<B>(&self, req: &hyper::Request<B>) -> HyperResponse {
        let path = req.uri().path();

        for route in &self.routes {
            if route.method != *req.method() {
                continue;
            }
            if let Some(rest) = route.pattern.strip(path) {
                return (route.handler)(rest);
            }
        }

        tracing::trace!(method = %req.method(), path, "no route");
        not_found()
    }

    /// Turn the table into a handler for `zephyr_core::Listener::serve`
    pub fn into_service(
        self,
    ) -> impl Fn(hyper::Request<hyper::body::Incoming>) -> HyperResponse + Send + Sync + 'static {
        move |req| self.handle(&req)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// 200 `{"id":<id>,"name":"User <id>"}`
pub fn user(id: &str) -> HyperResponse {
    match serde_json::to_vec(&User::from_id(id)) {
        Ok(body) => json(body.into()),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode user");
            status_only(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// 404 with a plain `Not Found` body and no content-type
pub fn not_found() -> HyperResponse {
    let mut res = hyper::Response::new(Full::new(Bytes::from_static(b"Not Found")));
    *res.status_mut() = StatusCode::NOT_FOUND;
    res
}

fn json(body: Bytes) -> HyperResponse {
    let mut res = hyper::Response::new(Full::new(body));
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    res
}

fn status_only(status: StatusCode) -> HyperResponse {
    let mut res = hyper::Response::new(Full::new(Bytes::new()));
    *res.status_mut() = status;
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body(res: HyperResponse) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(method: &str, uri: &str) -> hyper::Request<()> {
        hyper::Request::builder().method(method).uri(uri).body(()).unwrap()
    }

    #[test]
    fn test_path_pattern() {
        assert_eq!(PathPattern::Exact("/hello").strip("/hello"), Some(""));
        assert_eq!(PathPattern::Exact("/hello").strip("/hello/"), None);
        assert_eq!(PathPattern::Prefix("/user/").strip("/user/42"), Some("42"));
        assert_eq!(PathPattern::Prefix("/user/").strip("/user/"), Some(""));
        assert_eq!(PathPattern::Prefix("/user/").strip("/user"), None);
    }

    #[tokio::test]
    async fn test_hello() {
        let table = RouteTable::standard().unwrap();
        assert_eq!(table.len(), 2);

        let res = table.handle(&request("GET", "/hello"));
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body(res).await, r#"{"message":"Hello, World!"}"#);

        let res = table.handle(&request("GET", "/hello?verbose=true"));
        assert_eq!(res.status(), 200);
        assert_eq!(body(res).await, r#"{"message":"Hello, World!"}"#);
    }

    #[tokio::test]
    async fn test_user() {
        let table = RouteTable::standard().unwrap();

        let res = table.handle(&request("GET", "/user/42"));
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body(res).await, r#"{"id":"42","name":"User 42"}"#);

        let res = table.handle(&request("GET", "/user/"));
        assert_eq!(res.status(), 200);
        assert_eq!(body(res).await, r#"{"id":"","name":"User "}"#);
    }

    #[tokio::test]
    async fn test_id_is_first_raw_segment() {
        let table = RouteTable::standard().unwrap();

        let res = table.handle(&request("GET", "/user/a/b"));
        assert_eq!(body(res).await, r#"{"id":"a","name":"User a"}"#);

        let res = table.handle(&request("GET", "/user/a%20b?x=1"));
        assert_eq!(body(res).await, r#"{"id":"a%20b","name":"User a%20b"}"#);
    }

    #[tokio::test]
    async fn test_not_found() {
        let table = RouteTable::standard().unwrap();

        let res = table.handle(&request("GET", "/nonexistent"));
        assert_eq!(res.status(), 404);
        assert!(res.headers().get(CONTENT_TYPE).is_none());
        assert_eq!(body(res).await, "Not Found");

        assert_eq!(table.handle(&request("POST", "/hello")).status(), 404);
        assert_eq!(table.handle(&request("HEAD", "/hello")).status(), 404);
        assert_eq!(table.handle(&request("GET", "/user")).status(), 404);
    }

    #[tokio::test]
    async fn test_user_escapes_id() {
        for id in ["say \"hi\"", "c:\\dir", "line\nbreak", "\u{7}", ""] {
            let text = body(user(id)).await;
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert_eq!(value["id"], id);
            assert_eq!(value["name"], format!("User {id}"));
        }
    }

    #[test]
    fn test_custom_table() {
        let table = RouteTable::new().route(Method::PUT, PathPattern::Exact("/x"), |_| {
            status_only(StatusCode::NO_CONTENT)
        });

        assert_eq!(table.handle(&request("PUT", "/x")).status(), 204);
        assert_eq!(table.handle(&request("GET", "/x")).status(), 404);
        assert!(!table.is_empty());
    }
}
