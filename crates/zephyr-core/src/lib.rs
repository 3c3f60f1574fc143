//! zephyr-core: HTTP building blocks for the zephyr benchmark servers
//!
//! - `request` / `response` / `method` - plain HTTP types
//! - `app` - route framework on top of `zephyr-router`
//! - `server` - socket setup, tokio runtime and the hyper accept loop
//! - `logging` - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod app;
pub mod error;
pub mod logging;
pub mod method;
pub mod request;
pub mod response;
pub mod server;

// Re-exports
pub use app::{App, Fallback, Handler};
pub use error::{Error, Result};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use server::{
    banner, create_socket, from_hyper_request, run, to_hyper_response, HyperResponse, Listener,
    ServerConfig,
};
