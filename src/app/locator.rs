//! Application locator parsing and resolution.
//!
//! # Responsibilities
//! - Split `module[:export]` strings at CLI time
//! - Resolve the export path against an imported module
//!
//! # Design Decisions
//! - Split on the FIRST `:` only; later colons belong to the export path
//! - The export path is walked segment by segment through a restricted
//!   resolver; a factory call happens only for an explicit trailing `()`

use std::convert::Infallible;
use std::fmt;

use axum::Router;

use crate::app::{AppRegistry, Export, ImportContext, ImportError, Module};

/// Export name assumed when the locator has no `:` separator.
const DEFAULT_EXPORT: &str = "application";

/// A parsed `APP_MODULE` argument: which module to import and which of its
/// exports to serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLocator {
    /// Dotted module path, e.g. `myapp.web`.
    pub module: String,

    /// Export path inside the module, e.g. `application` or `make_app()`.
    /// Kept verbatim from the input; colons and dots past the first
    /// separator are preserved.
    pub export: String,
}

/// Error type for export resolution. Import failures carry through
/// unchanged; the other two mirror the "missing" and "wrong shape" halves
/// of looking up a servable application.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("export `{export}` not found in module `{module}`: {reason}")]
    NotFound {
        module: String,
        export: String,
        reason: String,
    },

    #[error("export `{export}` in module `{module}` is not servable: {reason}")]
    NotCallable {
        module: String,
        export: String,
        reason: String,
    },
}

impl AppLocator {
    /// Parse an `APP_MODULE` argument. Never fails; any string designates
    /// *some* module, and resolution reports the ones that do not exist.
    pub fn parse(input: &str) -> Result<Self, Infallible> {
        let (module, export) = match input.split_once(':') {
            Some((module, export)) => (module.to_string(), export.to_string()),
            None => (input.to_string(), DEFAULT_EXPORT.to_string()),
        };
        Ok(Self { module, export })
    }

    /// Import the module and walk the export path down to a servable
    /// application.
    pub fn resolve(
        &self,
        registry: &AppRegistry,
        ctx: &ImportContext,
    ) -> Result<Router, ResolveError> {
        let module = registry.import(&self.module, ctx)?;
        let app = self.walk(&module)?;
        tracing::info!(module = %self.module, export = %self.export, "application resolved");
        Ok(app)
    }

    /// Restricted export-path walk: dotted segments through namespaces, an
    /// optional single trailing `()`. The export string is never handed to
    /// anything more general than this.
    fn walk(&self, module: &Module) -> Result<Router, ResolveError> {
        let (path, invoke) = match self.export.strip_suffix("()") {
            Some(stem) => (stem, true),
            None => (self.export.as_str(), false),
        };

        let segments: Vec<&str> = path.split('.').collect();
        let last = segments.len() - 1;
        let mut current = module;

        for (i, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(self.not_found("empty export segment".to_string()));
            }
            let export = current
                .get(segment)
                .ok_or_else(|| self.not_found(format!("no export named `{segment}`")))?;

            if i < last {
                current = match export {
                    Export::Namespace(inner) => inner,
                    Export::App(_) => {
                        return Err(self.not_found(format!(
                            "`{segment}` is an application and has no nested exports"
                        )))
                    }
                    Export::Factory(_) => {
                        return Err(self.not_found(format!(
                            "`{segment}` is a factory and has no nested exports"
                        )))
                    }
                };
                continue;
            }

            return match (export, invoke) {
                (Export::App(app), false) => Ok(app.clone()),
                (Export::Factory(factory), true) => Ok(factory()),
                (Export::App(_), true) => Err(self.not_callable(format!(
                    "`{segment}` is an application, not a factory; drop the `()`"
                ))),
                (Export::Factory(_), false) => Err(self.not_callable(format!(
                    "`{segment}` is a factory; invoke it as `{segment}()`"
                ))),
                (Export::Namespace(_), _) => Err(self.not_callable(format!(
                    "`{segment}` is a namespace, not a servable application"
                ))),
            };
        }

        // split() always yields at least one segment, so the loop returns
        Err(self.not_found("empty export path".to_string()))
    }

    fn not_found(&self, reason: String) -> ResolveError {
        ResolveError::NotFound {
            module: self.module.clone(),
            export: self.export.clone(),
            reason,
        }
    }

    fn not_callable(&self, reason: String) -> ResolveError {
        ResolveError::NotCallable {
            module: self.module.clone(),
            export: self.export.clone(),
            reason,
        }
    }
}

impl fmt::Display for AppLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.export)
    }
}
