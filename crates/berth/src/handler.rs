//! Handler descriptors - what a server deploys.
//!
//! A server hosts exactly one deployable unit. That unit is either a
//! "UI-style" handler, which is wrapped into a catch-all dispatch so every
//! request path reaches it, or a "raw" handler that declares its own path
//! mappings. The two are mutually exclusive by construction: a
//! [`HandlerSpec`] is one or the other.
//!
//! Routing metadata is validated eagerly at deploy time so a handler with
//! no mappings (or malformed ones) fails with a clear configuration error
//! instead of a router panic deep inside the server.

use crate::error::{Result, ServerError};
use axum::response::Redirect;
use axum::routing::MethodRouter;
use axum::Router;
use std::collections::HashSet;
use std::fmt;

/// One declared path mapping of a raw handler.
pub struct RouteSpec {
    path: String,
    handler: MethodRouter,
}

impl RouteSpec {
    /// Creates a mapping from `path` to `handler`.
    ///
    /// Paths use axum's route syntax and must start with `/`. Validation
    /// happens when the containing [`HandlerSpec`] is deployed.
    pub fn new(path: impl Into<String>, handler: MethodRouter) -> Self {
        Self {
            path: path.into(),
            handler,
        }
    }

    /// The declared request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteSpec").field("path", &self.path).finish()
    }
}

/// The deployable unit wired into a server.
pub enum HandlerSpec {
    /// A UI-style handler served under a catch-all mapping: every request
    /// path is dispatched to it (the `/*` mapping of a servlet container).
    Ui(MethodRouter),

    /// A raw handler with explicitly declared path mappings. Requests that
    /// match none of the declared paths are redirected to `/`.
    Raw(Vec<RouteSpec>),
}

impl HandlerSpec {
    /// Creates a UI-style handler deployed under a catch-all mapping.
    #[must_use]
    pub fn ui(handler: MethodRouter) -> Self {
        Self::Ui(handler)
    }

    /// Creates a raw handler from its declared path mappings.
    ///
    /// At least one mapping is required; the requirement is checked at
    /// deploy time.
    #[must_use]
    pub fn raw(routes: impl IntoIterator<Item = RouteSpec>) -> Self {
        Self::Raw(routes.into_iter().collect())
    }

    /// Builds the router for this deployment: context path `/`, with a
    /// root-redirect fallback alongside any declared paths.
    ///
    /// # Errors
    ///
    /// Returns `HandlerConfiguration` if a raw handler declares no
    /// mappings, a path that does not start with `/`, or the same path
    /// twice.
    pub(crate) fn into_router(self) -> Result<Router> {
        match self {
            Self::Ui(handler) => Ok(Router::new().fallback_service(handler)),
            Self::Raw(routes) => {
                if routes.is_empty() {
                    return Err(ServerError::HandlerConfiguration {
                        reason: "raw handler declares no path mappings".to_string(),
                    });
                }

                let mut seen = HashSet::new();
                for route in &routes {
                    if !route.path.starts_with('/') {
                        return Err(ServerError::HandlerConfiguration {
                            reason: format!("path {:?} does not start with '/'", route.path),
                        });
                    }
                    if !seen.insert(route.path.as_str()) {
                        return Err(ServerError::HandlerConfiguration {
                            reason: format!("path {:?} is mapped twice", route.path),
                        });
                    }
                }

                let mut router = Router::new();
                for route in routes {
                    router = router.route(&route.path, route.handler);
                }
                Ok(router.fallback(|| async { Redirect::temporary("/") }))
            }
        }
    }
}

impl fmt::Debug for HandlerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ui(_) => f.debug_tuple("Ui").finish(),
            Self::Raw(routes) => {
                let paths: Vec<&str> = routes.iter().map(RouteSpec::path).collect();
                f.debug_tuple("Raw").field(&paths).finish()
            }
        }
    }
}
