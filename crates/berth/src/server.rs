//! Server lifecycle management.
//!
//! `TestServer` owns a single embedded server instance. A handler is
//! deployed exactly once, after which the server can be started and
//! stopped any number of times on the same port. Splitting `deploy`
//! (wiring) from `start` (binding and accepting) lets a test harness
//! resolve the handler once per test scope while reusing the port across
//! that scope's start/stop cycles.
//!
//! # Resource Safety
//!
//! `stop` signals graceful shutdown and joins the serve task, so the port
//! is released before `stop` returns. Dropping a running server drops the
//! shutdown sender, which completes the serve task's shutdown future and
//! winds it down without blocking; the detached task finishes on its own.

use crate::error::{Result, ServerError};
use crate::handler::HandlerSpec;
use crate::host;
use crate::port::PortAllocator;
use axum::Router;
use std::fmt;
use std::net::Ipv4Addr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A single-deployment embedded HTTP server for tests.
///
/// State machine: `Unconfigured -> Deployed -> Running`, with
/// `Running <-> Deployed` via [`start`](Self::start)/[`stop`](Self::stop).
/// Both transitions are idempotent no-ops when the server is already in
/// the matching state.
///
/// # Example
///
/// ```ignore
/// let mut server = TestServer::new();
/// server.deploy(HandlerSpec::ui(get(my_handler)), 51_234)?;
/// server.start().await?;
/// let url = server.base_url()?; // "http://<site-local-ip>:51234/"
/// server.stop().await;
/// ```
pub struct TestServer {
    deployment: Option<Deployment>,
    running: Option<RunningServer>,
    /// Reachable address, computed once on the first `start` and reused
    /// for every later `start` on this instance.
    host: Option<String>,
}

struct Deployment {
    router: Router,
    port: u16,
}

struct RunningServer {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Creates an unconfigured server. Deploy a handler before starting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deployment: None,
            running: None,
            host: None,
        }
    }

    /// Creates a server with `spec` deployed on a random free port.
    ///
    /// # Errors
    ///
    /// Returns `HandlerConfiguration` if the handler's routing metadata is
    /// invalid.
    pub fn with_handler(spec: HandlerSpec) -> Result<Self> {
        let port = PortAllocator::new().allocate();
        Self::with_handler_on(spec, port)
    }

    /// Creates a server with `spec` deployed on the given port.
    ///
    /// # Errors
    ///
    /// Returns `HandlerConfiguration` if the handler's routing metadata is
    /// invalid.
    pub fn with_handler_on(spec: HandlerSpec, port: u16) -> Result<Self> {
        let mut server = Self::new();
        server.deploy(spec, port)?;
        Ok(server)
    }

    /// Wires a handler into the server and fixes its port.
    ///
    /// Builds the deployment (context path `/`, UTF-8 responses, catch-all
    /// mapping for UI handlers, declared mappings plus a root-redirect
    /// fallback for raw handlers) but does not bind any socket; the port is
    /// bound by [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns `AlreadyDeployed` if a handler was deployed before - a
    /// server accepts exactly one deployment, regardless of intervening
    /// `start`/`stop` calls. Returns `HandlerConfiguration` if the
    /// handler's routing metadata is invalid.
    pub fn deploy(&mut self, spec: HandlerSpec, port: u16) -> Result<()> {
        if self.deployment.is_some() {
            return Err(ServerError::AlreadyDeployed);
        }

        let router = spec.into_router()?;
        debug!(port, "handler deployed");
        self.deployment = Some(Deployment { router, port });
        Ok(())
    }

    /// Binds the listener and begins accepting connections.
    ///
    /// On the first invocation for this instance the deployment-reachable
    /// host is resolved and cached; it is never recomputed. A no-op if the
    /// server is already running or nothing has been deployed yet.
    ///
    /// # Errors
    ///
    /// Returns `NoSuitableAddress`/`InterfaceEnumeration` if the reachable
    /// host cannot be determined, and `Bind` if the listener fails to bind
    /// (port race with a parallel test, permissions, address in use).
    pub async fn start(&mut self) -> Result<()> {
        if self.host.is_none() {
            // Find out the address where a browser can reach this server.
            self.host = Some(host::deployment_host()?);
        }

        let Some(deployment) = &self.deployment else {
            return Ok(());
        };
        if self.running.is_some() {
            return Ok(());
        }

        let port = deployment.port;
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|source| ServerError::Bind { port, source })?;
        if let Ok(addr) = listener.local_addr() {
            debug!(%addr, "listening");
        }

        let (shutdown, rx) = oneshot::channel::<()>();
        let app = deployment.router.clone();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = rx.await;
            });
            if let Err(error) = serve.await {
                warn!(%error, "server task exited with error");
            }
        });

        self.running = Some(RunningServer { shutdown, task });
        Ok(())
    }

    /// Gracefully closes the listener and releases the port.
    ///
    /// A no-op if the server is not running. Never fails observably:
    /// teardown must not throw over the original test failure, so cleanup
    /// problems are logged instead.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown.send(());
        if let Err(error) = running.task.await {
            warn!(%error, "failed to join server task during shutdown");
        }
        debug!("server stopped");
    }

    /// Returns whether a handler has been deployed.
    #[must_use]
    pub fn is_deployed(&self) -> bool {
        self.deployment.is_some()
    }

    /// Returns whether the server is currently accepting connections.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The port fixed at deployment, or `None` while unconfigured.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.deployment.as_ref().map(|deployment| deployment.port)
    }

    /// The base URL for the deployment, with a trailing slash:
    /// `http://{host}:{port}/`.
    ///
    /// # Errors
    ///
    /// Returns `NotStarted` until the first successful
    /// [`start`](Self::start) has resolved the reachable host.
    pub fn base_url(&self) -> Result<String> {
        let (Some(host), Some(deployment)) = (&self.host, &self.deployment) else {
            return Err(ServerError::NotStarted);
        };
        Ok(format!("http://{host}:{}/", deployment.port))
    }

    /// Joins `path` onto the base URL.
    ///
    /// # Errors
    ///
    /// Same conditions as [`base_url`](Self::base_url).
    pub fn url(&self, path: &str) -> Result<String> {
        let base = self.base_url()?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TestServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestServer")
            .field("deployed", &self.is_deployed())
            .field("running", &self.is_running())
            .field("port", &self.port())
            .finish()
    }
}
