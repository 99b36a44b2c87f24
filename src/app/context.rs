//! Import context: working directory and module search path.

use std::io;
use std::path::{Path, PathBuf};

/// Filesystem context consulted when importing application modules.
///
/// The search path is ordinary value state threaded through resolution, so
/// tests can build one without touching the process. The one process-global
/// side effect, changing the working directory (which the served
/// application relies on for relative file access), is confined to
/// [`ImportContext::prepare`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    working_dir: PathBuf,
    search_path: Vec<PathBuf>,
}

impl ImportContext {
    /// Build a context rooted at `working_dir` without any process side
    /// effects. The directory is seeded onto the search path.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let mut ctx = Self {
            working_dir: working_dir.clone(),
            search_path: Vec::new(),
        };
        ctx.add_search_dir(working_dir);
        ctx
    }

    /// Canonicalize `dir`, change the process working directory to it, and
    /// return a context rooted there.
    pub fn prepare(dir: &Path) -> io::Result<Self> {
        let dir = dir.canonicalize()?;
        std::env::set_current_dir(&dir)?;
        tracing::debug!(dir = %dir.display(), "working directory changed");
        Ok(Self::new(dir))
    }

    /// Put `dir` at the front of the search path unless it is already
    /// listed. Re-adding a known directory is a no-op, so preparing the same
    /// directory twice never produces duplicate entries.
    pub fn add_search_dir(&mut self, dir: PathBuf) {
        if !self.search_path.contains(&dir) {
            self.search_path.insert(0, dir);
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}
