//! Standalone launcher for simple application deployment.
//!
//! Tests normally go through a harness, but the same embedded server is
//! handy for running a handler interactively (manual testing, demos). The
//! launcher deploys on a fixed, well-known port instead of a random one
//! and logs the base URL once the server accepts connections.

use crate::error::Result;
use crate::handler::HandlerSpec;
use crate::server::TestServer;
use tracing::info;

/// Default port for standalone runs.
pub const DEFAULT_LAUNCH_PORT: u16 = 8080;

/// Runs a handler on a fixed port outside any test harness.
///
/// # Example
///
/// ```ignore
/// let mut launcher = Launcher::with_handler(HandlerSpec::ui(get(app)))?;
/// launcher.launch().await?; // logs "server started at http://<ip>:8080/"
/// ```
#[derive(Debug)]
pub struct Launcher {
    server: TestServer,
}

impl Launcher {
    /// Creates a launcher for `spec` on [`DEFAULT_LAUNCH_PORT`].
    ///
    /// # Errors
    ///
    /// Returns `HandlerConfiguration` if the handler's routing metadata is
    /// invalid.
    pub fn with_handler(spec: HandlerSpec) -> Result<Self> {
        Self::with_handler_on(spec, DEFAULT_LAUNCH_PORT)
    }

    /// Creates a launcher for `spec` on the given port.
    ///
    /// # Errors
    ///
    /// Returns `HandlerConfiguration` if the handler's routing metadata is
    /// invalid.
    pub fn with_handler_on(spec: HandlerSpec, port: u16) -> Result<Self> {
        Ok(Self {
            server: TestServer::with_handler_on(spec, port)?,
        })
    }

    /// Starts the server and logs where it can be reached.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TestServer::start`].
    pub async fn launch(&mut self) -> Result<()> {
        self.server.start().await?;
        info!("server started at {}", self.server.base_url()?);
        Ok(())
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

    /// Consumes the launcher, handing the server back to the caller.
    #[must_use]
    pub fn into_server(self) -> TestServer {
        self.server
    }
}
