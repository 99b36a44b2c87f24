//! Application resolution subsystem.
//!
//! # Data Flow
//! ```text
//! APP_MODULE argument ("pkg.mod:factory()")
//!     → locator.rs (split module path from export path)
//!     → registry import (statically registered modules first,
//!       then manifest.rs discovery over the context search path)
//!     → locator.rs export walk (restricted: dotted segments + optional
//!       trailing call, never a general evaluator)
//!     → axum Router handed to the config assembler
//! ```
//!
//! # Design Decisions
//! - Modules are export tables; nesting gives dotted export chains
//! - Factories are invoked only when the locator says `()` explicitly
//! - Import failure and export failure are distinct error types, since one
//!   means "no such module" and the other "module lacks what you asked for"

pub mod builtin;
pub mod context;
pub mod locator;
pub mod manifest;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;

pub use context::ImportContext;
pub use locator::AppLocator;

/// Zero-argument constructor for a fresh application.
pub type AppFactory = Arc<dyn Fn() -> Router + Send + Sync>;

/// A single exported name inside a module.
#[derive(Clone)]
pub enum Export {
    /// A servable application.
    App(Router),

    /// A constructor; the locator must name it with a trailing `()`.
    Factory(AppFactory),

    /// A nested export table, addressed with dotted locator segments.
    Namespace(Module),
}

impl Export {
    /// Human label used in resolution diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Export::App(_) => "application",
            Export::Factory(_) => "factory",
            Export::Namespace(_) => "namespace",
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A named collection of exports, the unit of registration and import.
#[derive(Clone, Debug, Default)]
pub struct Module {
    exports: BTreeMap<String, Export>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, name: impl Into<String>, app: Router) -> Self {
        self.exports.insert(name.into(), Export::App(app));
        self
    }

    pub fn with_factory<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Router + Send + Sync + 'static,
    {
        self.exports
            .insert(name.into(), Export::Factory(Arc::new(factory)));
        self
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace: Module) -> Self {
        self.exports
            .insert(name.into(), Export::Namespace(namespace));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Export> {
        self.exports.get(name)
    }
}

/// Error type for module import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(
        "application module `{module}` is not registered and no manifest for it \
         was found on the search path {search_path:?}"
    )]
    ModuleNotFound {
        module: String,
        search_path: Vec<PathBuf>,
    },

    #[error("failed to read application manifest {path}: {source}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid application manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Modules addressable by dotted path.
///
/// Statically registered modules shadow on-disk manifests; discovery over
/// the context search path only runs for paths the registry does not know.
#[derive(Clone, Debug, Default)]
pub struct AppRegistry {
    modules: BTreeMap<String, Module>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<String>, module: Module) {
        self.modules.insert(path.into(), module);
    }

    /// Import `module`: from static registrations first, then from a TOML
    /// manifest discovered via the context search path.
    pub fn import(&self, module: &str, ctx: &ImportContext) -> Result<Module, ImportError> {
        if let Some(found) = self.modules.get(module) {
            tracing::debug!(module, "imported registered module");
            return Ok(found.clone());
        }
        manifest::discover(module, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_modules_are_imported_without_touching_the_search_path() {
        let mut registry = AppRegistry::new();
        registry.register("demo", Module::new().with_app("application", Router::new()));

        // a context rooted at a directory that does not exist
        let ctx = ImportContext::new("/nonexistent");
        let module = registry.import("demo", &ctx).unwrap();
        assert!(module.get("application").is_some());
    }

    #[test]
    fn unknown_modules_report_the_search_path() {
        let registry = AppRegistry::new();
        let ctx = ImportContext::new("/srv/app");
        let err = registry.import("missing.mod", &ctx).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing.mod"));
        assert!(message.contains("/srv/app"));
    }
}
