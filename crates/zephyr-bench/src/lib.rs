//! zephyr-bench: the benchmark servers
//!
//! Two routes, `/hello` and `/user/:id`, served three ways:
//! - [`raw`] - hand-dispatched hyper handler (port 3001)
//! - [`framework`] - the same routes on a `zephyr_core::App` (port 3002)
//! - [`framework::STRICT`] - the app with a method-aware fallback (port 3004)

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod framework;
pub mod payload;
pub mod raw;

pub use framework::{Profile, FRAMEWORK, STRICT};
pub use payload::{Greeting, User, GREETING};
pub use raw::{PathPattern, RouteTable};

/// Port of the low-level server
pub const RAW_PORT: u16 = 3001;
