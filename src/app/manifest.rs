//! Manifest-defined application modules.
//!
//! A module path that is not statically registered is looked up on the
//! import-context search path as a TOML manifest: `pkg.mod` maps to
//! `pkg/mod.toml` relative to each search directory, first hit wins. The
//! manifest declares an export tree whose leaves name built-in application
//! kinds; the importer materializes the tree into a [`Module`].
//!
//! ```toml
//! [exports.application]
//! kind = "hello"
//! message = "served from disk"
//!
//! [exports.api.health]
//! kind = "health"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use axum::Router;
use serde::Deserialize;

use crate::app::{builtin, ImportContext, ImportError, Module};

/// Find and load the manifest for `module`, searching the context search
/// path in order. A found-but-broken manifest fails the import; later
/// search directories are not consulted for it.
pub fn discover(module: &str, ctx: &ImportContext) -> Result<Module, ImportError> {
    let relative = module_file(module);
    for dir in ctx.search_path() {
        let path = dir.join(&relative);
        if path.is_file() {
            return load(&path);
        }
    }

    Err(ImportError::ModuleNotFound {
        module: module.to_string(),
        search_path: ctx.search_path().to_vec(),
    })
}

/// `pkg.mod` → `pkg/mod.toml`.
fn module_file(module: &str) -> PathBuf {
    let mut path: PathBuf = module.split('.').collect();
    path.set_extension("toml");
    path
}

fn load(path: &Path) -> Result<Module, ImportError> {
    let text = fs::read_to_string(path).map_err(|source| ImportError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: Manifest = toml::from_str(&text).map_err(|source| ImportError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "imported manifest module");
    Ok(manifest.into_module())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    exports: BTreeMap<String, ManifestEntry>,
}

/// A table with a `kind` key is an application; any other table is a
/// nested namespace.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    App(AppSpec),
    Namespace(BTreeMap<String, ManifestEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AppSpec {
    Hello {
        #[serde(default = "default_greeting")]
        message: String,
    },
    Echo,
    Health,
}

impl Manifest {
    fn into_module(self) -> Module {
        table_to_module(self.exports)
    }
}

fn table_to_module(entries: BTreeMap<String, ManifestEntry>) -> Module {
    let mut module = Module::new();
    for (name, entry) in entries {
        module = match entry {
            ManifestEntry::App(spec) => module.with_app(name, spec.build()),
            ManifestEntry::Namespace(nested) => module.with_namespace(name, table_to_module(nested)),
        };
    }
    module
}

impl AppSpec {
    fn build(&self) -> Router {
        match self {
            AppSpec::Hello { message } => builtin::hello(message.clone()),
            AppSpec::Echo => builtin::echo(),
            AppSpec::Health => builtin::health(),
        }
    }
}

fn default_greeting() -> String {
    builtin::DEFAULT_GREETING.to_string()
}
