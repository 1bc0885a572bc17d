//! Error types for server lifecycle operations.
//!
//! This module distinguishes the failure modes a test fixture can hit:
//! invalid handler configuration, double deployment, bind failures, and
//! host-resolution problems. Configuration errors are fatal and abort the
//! test scope immediately; `stop` never fails observably (cleanup problems
//! are logged, so teardown cannot mask the original test failure).

use thiserror::Error;

/// The main error type for server lifecycle operations.
///
/// This enum uses thiserror to provide both Display implementations and
/// error source chaining. Each variant includes relevant context about
/// what operation failed and why.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A handler's routing metadata is missing or invalid.
    ///
    /// Raw handlers must declare at least one path mapping, every path
    /// must start with `/`, and paths must not repeat.
    #[error("invalid handler configuration: {reason}")]
    HandlerConfiguration {
        /// Human-readable reason the configuration was rejected
        reason: String,
    },

    /// `deploy` was called on a server that already has a deployment.
    ///
    /// A server hosts exactly one handler for its whole lifetime; create a
    /// second `TestServer` to deploy a second handler.
    #[error("a handler is already deployed on this server")]
    AlreadyDeployed,

    /// The listener failed to bind during `start`.
    ///
    /// Usually a port race with a parallel test run, a permission issue,
    /// or an address already in use.
    #[error("failed to bind 0.0.0.0:{port}: {source}")]
    Bind {
        /// The port that could not be bound
        port: u16,
        /// The underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The network-interface list could not be obtained.
    #[error("failed to enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),

    /// No interface carries a site-local address.
    ///
    /// There is deliberately no fallback to a public or loopback address;
    /// a browser on another machine could not reach those reliably.
    #[error("no site-local address found on any network interface")]
    NoSuitableAddress,

    /// The base URL was requested before a successful `start`.
    #[error("server has not been started; the base URL is not available yet")]
    NotStarted,
}

/// A specialized Result type for server lifecycle operations.
pub type Result<T> = std::result::Result<T, ServerError>;
