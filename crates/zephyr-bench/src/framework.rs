//! Framework-based server
//!
//! Routes live on a [`zephyr_core::App`]; method/path matching, parameter
//! extraction and the unmatched-route answer all come from the framework.

use crate::payload::{User, GREETING};
use serde::Serialize;
use zephyr_core::{App, Fallback, Response, Result};

/// One flavour of the framework server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Startup banner prefix
    pub label: &'static str,
    pub port: u16,
    pub fallback: Fallback,
    /// Terminate JSON bodies with `\n`
    pub line_terminated: bool,
}

/// Plain framework server: implicit 404, `HEAD` served by `GET` routes,
/// automatic `OPTIONS`
pub const FRAMEWORK: Profile = Profile {
    label: "Framework server",
    port: 3002,
    fallback: Fallback::NotFound,
    line_terminated: false,
};

/// GET-only routes, 405 on method mismatch, exact slashes,
/// newline-terminated JSON
pub const STRICT: Profile = Profile {
    label: "Strict server",
    port: 3004,
    fallback: Fallback::MethodAware,
    line_terminated: true,
};

/// Build the `/hello` + `/user/:id` app for `profile`
pub fn app(profile: &Profile) -> Result<App> {
    let line_terminated = profile.line_terminated;

    App::new()
        .fallback(profile.fallback)
        .get("/hello", move |_| json(&GREETING, line_terminated))?
        .get("/user/:id", move |req| {
            let id = req.param("id").unwrap_or_default();
            json(&User::from_id(id), line_terminated)
        })
}

fn json<T: Serialize>(value: &T, line_terminated: bool) -> Response {
    let mut res = match Response::json_value(value) {
        Ok(res) => res,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response body");
            return Response::internal_error("failed to encode response body");
        }
    };

    if line_terminated {
        let mut body = Vec::with_capacity(res.body.len() + 1);
        body.extend_from_slice(&res.body);
        body.push(b'\n');
        res.body = body.into();
    }
    res
}
