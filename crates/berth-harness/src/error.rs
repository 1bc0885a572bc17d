//! Error types for harness operations.

use thiserror::Error;

/// Errors raised while wiring a server into a test scope.
///
/// Declaration errors are raised before any server action, so a
/// misconfigured test fails fast with a clear message instead of leaking a
/// half-started server.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The test metadata declares no handler and nothing is deployed yet.
    #[error(
        "cannot start server: no handler declared - supply a UI or raw handler in the test metadata"
    )]
    MissingHandlerDeclaration,

    /// The test metadata declares both a UI and a raw handler.
    #[error("test metadata declares both a UI and a raw handler; exactly one is allowed")]
    ConflictingHandlerDeclarations,

    /// An error from the underlying server lifecycle.
    #[error(transparent)]
    Server(#[from] berth::ServerError),
}

/// A specialized Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
