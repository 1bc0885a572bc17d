//! # berth-harness
//!
//! Test-framework hooks for [`berth`] embedded test servers.
//!
//! The harness wires a [`berth::TestServer`] into a test scope's setup and
//! teardown without requiring inheritance from any base class or fixture
//! type: it is a plain object with explicit [`before`](TestHarness::before)
//! and [`after`](TestHarness::after) operations that any test framework's
//! extension mechanism can call.
//!
//! Which handler to deploy is declared explicitly through [`TestMetadata`]
//! rather than discovered by reflection: the caller states either a
//! UI-style handler or a raw handler with its own path mappings. Declaring
//! both is a configuration error; declaring neither is an error unless a
//! deployment already exists.
//!
//! ## Scope granularity
//!
//! Deployment happens at most once per harness. A harness held for a whole
//! test class keeps one port across all its methods (each method calling
//! `before`/`after` around its body); a fresh harness per method gets a
//! fresh port per method.
//!
//! ## Example Usage
//!
//! ```ignore
//! use axum::routing::get;
//! use berth_harness::{TestHarness, TestMetadata};
//!
//! #[tokio::test]
//! async fn test_with_harness() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut harness = TestHarness::new();
//!     harness.before(TestMetadata::ui(get(|| async { "app" }))).await?;
//!
//!     let url = harness.server().base_url()?;
//!     // drive the server...
//!
//!     harness.after().await; // unconditional, never fails
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod harness;
pub mod metadata;

// Re-export main types for convenience
pub use error::{HarnessError, Result};
pub use harness::TestHarness;
pub use metadata::TestMetadata;
