//! The before/after hook object wiring servers into test scopes.

use crate::error::{HarnessError, Result};
use crate::metadata::TestMetadata;
use berth::{PortAllocator, TestServer};
use tracing::debug;

/// Composable test hooks around a [`TestServer`].
///
/// Call [`before`](Self::before) ahead of the scope body and
/// [`after`](Self::after) once it completes - unconditionally, whether the
/// body passed or failed. No inheritance is involved; any test framework's
/// extension point can drive these two calls.
///
/// # Example
///
/// ```ignore
/// let mut harness = TestHarness::new();
/// harness.before(TestMetadata::ui(get(app_handler))).await?;
/// // ... scope body runs against harness.server().base_url()? ...
/// harness.after().await;
/// ```
#[derive(Debug)]
pub struct TestHarness {
    server: TestServer,
    allocator: PortAllocator,
}

impl TestHarness {
    /// Creates a harness with an unconfigured server.
    ///
    /// The first `before` call must declare a handler through its
    /// metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::for_server(TestServer::new())
    }

    /// Creates a harness around an existing server.
    ///
    /// Useful when the server was pre-deployed via
    /// [`TestServer::with_handler`]; metadata in `before` is then ignored.
    #[must_use]
    pub fn for_server(server: TestServer) -> Self {
        Self {
            server,
            allocator: PortAllocator::new(),
        }
    }

    /// Replaces the port allocator, e.g. with a seeded one.
    #[must_use]
    pub fn with_allocator(mut self, allocator: PortAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Runs the scope's setup: deploy once, then start.
    ///
    /// If the server is still unconfigured, exactly one handler is
    /// resolved from `metadata` and deployed on a freshly allocated port.
    /// Once a deployment exists, later `before` calls (the next test
    /// method in a class scope) reuse it and merely restart the server.
    ///
    /// # Errors
    ///
    /// Returns `ConflictingHandlerDeclarations` or
    /// `MissingHandlerDeclaration` before any server action or socket is
    /// touched, and propagates deployment/start errors from the server.
    pub async fn before(&mut self, metadata: TestMetadata) -> Result<()> {
        // Conflicting declarations are rejected even when a deployment
        // already exists and the resolved handler goes unused.
        let handler = metadata.into_handler()?;

        if !self.server.is_deployed() {
            let Some(spec) = handler else {
                return Err(HarnessError::MissingHandlerDeclaration);
            };
            let port = self.allocator.allocate();
            debug!(port, "deploying handler for test scope");
            self.server.deploy(spec, port)?;
        }

        self.server.start().await?;
        Ok(())
    }

    /// Runs the scope's teardown: an unconditional stop.
    ///
    /// Never fails; cleanup problems must not mask the scope body's own
    /// failure.
    pub async fn after(&mut self) {
        self.server.stop().await;
    }

    /// The managed server.
    #[must_use]
    pub fn server(&self) -> &TestServer {
        &self.server
    }

    /// The managed server, mutably.
    pub fn server_mut(&mut self) -> &mut TestServer {
        &mut self.server
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_declaration_leaves_server_untouched() {
        let mut harness = TestHarness::new();

        let err = harness.before(TestMetadata::none()).await.unwrap_err();
        assert!(matches!(err, HarnessError::MissingHandlerDeclaration));
        assert!(!harness.server().is_deployed());
        assert!(!harness.server().is_running());
    }

    #[tokio::test]
    async fn conflicting_declarations_are_rejected_even_when_already_deployed() {
        use axum::routing::get;
        use berth::{HandlerSpec, RouteSpec, TestServer};

        async fn noop() {}

        let server = TestServer::with_handler_on(HandlerSpec::ui(get(noop)), 51_234).unwrap();
        let mut harness = TestHarness::for_server(server);

        let metadata = TestMetadata {
            ui: Some(get(noop)),
            raw: Some(vec![RouteSpec::new("/raw", get(noop))]),
        };
        let err = harness.before(metadata).await.unwrap_err();

        assert!(matches!(err, HarnessError::ConflictingHandlerDeclarations));
        // The configuration error is reported before any server action.
        assert!(!harness.server().is_running());
    }

    #[tokio::test]
    async fn after_on_a_never_started_harness_is_a_no_op() {
        let mut harness = TestHarness::new();
        harness.after().await;
        assert!(!harness.server().is_running());
    }
}
