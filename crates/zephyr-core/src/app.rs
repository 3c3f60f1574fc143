//! Route framework
//!
//! An [`App`] owns a [`zephyr_router::Router`] that maps routes to handler
//! IDs, plus the handler table those IDs index into. Handlers are plain
//! synchronous closures over [`Request`]; the app takes care of parameter
//! extraction and of the answer for unmatched requests.

use crate::request::percent_decode;
use crate::{Error, Method, Request, Response, Result};
use std::sync::Arc;
use zephyr_router::Router;

/// Route handler
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// What the app answers when no route matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fallback {
    /// 404 (`Response::not_found`). `HEAD` falls back to `GET` routes and
    /// `OPTIONS` on a known path lists its methods.
    #[default]
    NotFound,
    /// 405 with an `allow` header when the path exists under other
    /// methods, 404 otherwise. No implicit `HEAD` or `OPTIONS`, and paths
    /// with empty segments (`/user/42/`) never match.
    MethodAware,
}

/// Router plus handler table
pub struct App {
    router: Router,
    handlers: Vec<Handler>,
    fallback: Fallback,
}

impl App {
    /// Create an app with no routes and the default fallback
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            handlers: Vec::new(),
            fallback: Fallback::default(),
        }
    }

    /// Set the fallback policy
    pub fn fallback(mut self, fallback: Fallback) -> Self {
        self.router.strict_slashes(fallback == Fallback::MethodAware);
        self.fallback = fallback;
        self
    }

    /// Register a route
    ///
    /// Patterns must start with `/`; `:name` segments become parameters.
    pub fn route<F>(mut self, method: Method, path: &str, handler: F) -> Result<Self>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        if !path.starts_with('/') {
            return Err(Error::InvalidPath(path.to_string()));
        }
        let handler_id = u32::try_from(self.handlers.len())
            .map_err(|_| Error::InvalidPath(format!("too many routes at {path}")))?;

        self.router.insert(method.as_str(), path, handler_id);
        self.handlers.push(Arc::new(handler));
        Ok(self)
    }

    /// Register a GET route
    pub fn get<F>(self, path: &str, handler: F) -> Result<Self>
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.route(Method::Get, path, handler)
    }

    /// Dispatch a request to its handler, or to the fallback
    pub fn handle(&self, mut req: Request) -> Response {
        let matched = self.router.find(req.method.as_str(), &req.path).or_else(|| {
            match (req.method, self.fallback) {
                (Method::Head, Fallback::NotFound) => self.router.find("GET", &req.path),
                _ => None,
            }
        });

        let Some(matched) = matched else {
            return self.unmatched(&req);
        };
        let Some(handler) = self.handlers.get(matched.handler_id as usize) else {
            return Response::internal_error("route points at a missing handler");
        };

        req.params = matched
            .params
            .into_iter()
            .map(|(name, raw)| {
                let value = percent_decode(&raw).unwrap_or(raw);
                (name, value)
            })
            .collect();

        let res = handler(&req);
        tracing::trace!(method = %req.method, path = %req.path, status = %res.status, "dispatched");
        res
    }

    fn unmatched(&self, req: &Request) -> Response {
        tracing::trace!(method = %req.method, path = %req.path, "no route");
        match self.fallback {
            Fallback::NotFound if req.method == Method::Options => {
                let mut allowed = self.router.allowed_methods(&req.path);
                if allowed.is_empty() {
                    return Response::not_found();
                }
                if allowed.iter().any(|m| m == "GET") && !allowed.iter().any(|m| m == "HEAD") {
                    allowed.push("HEAD".to_string());
                    allowed.sort();
                }
                Response::options(&allowed.join(", "))
            }
            Fallback::NotFound => Response::not_found(),
            Fallback::MethodAware => {
                let allowed = self.router.allowed_methods(&req.path);
                if allowed.is_empty() {
                    Response::not_found()
                } else {
                    Response::method_not_allowed(&allowed.join(", "))
                }
            }
        }
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if no routes are registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
