//! Startup orchestration.
//!
//! # Responsibilities
//! - Prepare the import environment (working directory, search path)
//! - Resolve the application locator against the registry
//! - Assemble the sparse server configuration
//! - Construct the server and hand it to the lifecycle controller
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried
//! - Steps run in dependency order, never concurrently

use std::path::PathBuf;

use crate::app::locator::ResolveError;
use crate::app::{AppRegistry, ImportContext};
use crate::cli::Cli;
use crate::config::ServerConfig;
use crate::lifecycle::{controller, signals};
use crate::server::{HttpServer, ServerError};

/// Error type for the whole bootstrap path. Parse errors never reach this:
/// clap reports those itself and exits before any side effect.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to prepare working directory {dir:?}: {source}")]
    Workdir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run one server invocation to completion: environment, resolution,
/// assembly, then the controller until shutdown.
pub async fn run(cli: Cli, registry: AppRegistry) -> Result<(), BootstrapError> {
    let ctx = ImportContext::prepare(&cli.chdir).map_err(|source| BootstrapError::Workdir {
        dir: cli.chdir.clone(),
        source,
    })?;

    let app = cli.app.resolve(&registry, &ctx)?;

    let config = ServerConfig::assemble(&cli, app);
    tracing::info!(
        app = %cli.app,
        bind = %config.bind,
        options = %config.sparse_options(),
        "configuration assembled"
    );

    let server = HttpServer::new(config)?;
    controller::run_until_shutdown(server, signals::shutdown_signal()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
