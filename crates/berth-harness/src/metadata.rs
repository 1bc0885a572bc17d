//! Explicit handler declarations for a test scope.
//!
//! Replaces annotation/reflection discovery with plain values: the test
//! states which handler it wants deployed. The two declaration kinds are
//! mutually exclusive; the harness rejects metadata carrying both before
//! touching the server.

use crate::error::{HarnessError, Result};
use axum::routing::MethodRouter;
use berth::{HandlerSpec, RouteSpec};
use std::fmt;

/// What a test scope declares for deployment.
///
/// The fields are public so callers composing metadata programmatically
/// (or test-framework glue reading its own attribute format) can fill
/// them directly; the constructors cover the common cases.
#[derive(Default)]
pub struct TestMetadata {
    /// Optional UI-style handler, deployed under a catch-all mapping.
    pub ui: Option<MethodRouter>,

    /// Optional raw handler with its declared path mappings.
    pub raw: Option<Vec<RouteSpec>>,
}

impl TestMetadata {
    /// Metadata declaring no handler.
    ///
    /// Valid only when the harness's server already has a deployment
    /// (e.g. the second test method in a class scope).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Metadata declaring a UI-style handler.
    #[must_use]
    pub fn ui(handler: MethodRouter) -> Self {
        Self {
            ui: Some(handler),
            raw: None,
        }
    }

    /// Metadata declaring a raw handler with its path mappings.
    #[must_use]
    pub fn raw(routes: impl IntoIterator<Item = RouteSpec>) -> Self {
        Self {
            ui: None,
            raw: Some(routes.into_iter().collect()),
        }
    }

    /// Resolves the declared handler, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConflictingHandlerDeclarations` when both kinds are
    /// declared. A result of `Ok(None)` means nothing was declared; the
    /// harness decides whether that is acceptable.
    pub(crate) fn into_handler(self) -> Result<Option<HandlerSpec>> {
        match (self.ui, self.raw) {
            (Some(_), Some(_)) => Err(HarnessError::ConflictingHandlerDeclarations),
            (Some(handler), None) => Ok(Some(HandlerSpec::ui(handler))),
            (None, Some(routes)) => Ok(Some(HandlerSpec::raw(routes))),
            (None, None) => Ok(None),
        }
    }
}

impl fmt::Debug for TestMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMetadata")
            .field("ui", &self.ui.is_some())
            .field("raw", &self.raw.as_ref().map(Vec::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    async fn noop() {}

    #[test]
    fn empty_metadata_resolves_to_no_handler() {
        assert!(TestMetadata::none().into_handler().unwrap().is_none());
    }

    #[test]
    fn ui_metadata_resolves_to_a_catch_all_handler() {
        let handler = TestMetadata::ui(get(noop)).into_handler().unwrap();
        assert!(matches!(handler, Some(HandlerSpec::Ui(_))));
    }

    #[test]
    fn raw_metadata_keeps_its_mappings() {
        let handler = TestMetadata::raw([RouteSpec::new("/ping", get(noop))])
            .into_handler()
            .unwrap();
        match handler {
            Some(HandlerSpec::Raw(routes)) => {
                assert_eq!(routes.len(), 1);
                assert_eq!(routes[0].path(), "/ping");
            }
            other => panic!("expected raw handler, got {other:?}"),
        }
    }

    #[test]
    fn declaring_both_kinds_is_a_conflict() {
        let metadata = TestMetadata {
            ui: Some(get(noop)),
            raw: Some(vec![RouteSpec::new("/ping", get(noop))]),
        };

        let err = metadata.into_handler().unwrap_err();
        assert!(matches!(err, HarnessError::ConflictingHandlerDeclarations));
    }
}
