//! # berth
//!
//! Short-lived embedded HTTP servers for integration tests.
//!
//! This crate spins up a real listening server around a single request
//! handler so tests can drive it through a browser or HTTP client without
//! any manual environment setup. Each server picks a collision-free port
//! from a dedicated range, deploys exactly one handler, and exposes the
//! base URL at which other machines (or a browser under automation) can
//! reach it.
//!
//! ## Architecture
//!
//! - **TestServer**: owns one embedded server; deploy once, start/stop freely
//! - **HandlerSpec**: what to deploy - a catch-all UI handler or a raw
//!   handler with its own path mappings
//! - **PortAllocator**: random free ports in `[50000, 60000)`
//! - **host**: deployment-reachable address discovery for multi-homed hosts
//! - **Launcher**: standalone (non-test) runs on a fixed port
//!
//! ## Example Usage
//!
//! ```ignore
//! use axum::routing::get;
//! use berth::{HandlerSpec, TestServer};
//!
//! #[tokio::test]
//! async fn test_against_live_server() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = TestServer::with_handler(
//!         HandlerSpec::ui(get(|| async { "hello" })),
//!     )?;
//!     server.start().await?;
//!
//!     let url = server.base_url()?;
//!     // drive the server through any HTTP client...
//!
//!     server.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Lifecycle
//!
//! A server moves `Unconfigured -> Deployed -> Running`, and between
//! `Running` and `Deployed` via `start`/`stop`. Both are idempotent: calling
//! `start` while running, or `stop` while stopped, is a no-op. A handler can
//! be deployed exactly once per server; the port is fixed from that moment.
//!
//! ## Concurrency
//!
//! A `TestServer` is mutated by one test thread at a time (`&mut self`
//! enforces this). Independent instances are safe to run in parallel; the
//! port allocator draws from a 10,000-port range, so collisions between
//! parallel test runs are rare, though the probe-then-bind race is not
//! eliminated. Bind failures are reported, never swallowed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handler;
pub mod host;
pub mod launcher;
pub mod port;
pub mod server;

// Re-export main types for convenience
pub use error::{Result, ServerError};
pub use handler::{HandlerSpec, RouteSpec};
pub use host::deployment_host;
pub use launcher::{Launcher, DEFAULT_LAUNCH_PORT};
pub use port::{PortAllocator, PORT_RANGE};
pub use server::TestServer;
