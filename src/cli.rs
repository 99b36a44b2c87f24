//! Command-line interface.
//!
//! Flag parsing and validation happen entirely inside clap: bind targets
//! and application locators are parsed by their own value parsers, so a
//! malformed invocation exits with a usage message before any side effect.
//! Optional flags stay `None` when not supplied; the config assembler keeps
//! them absent rather than defaulted, and the server applies its own
//! defaults downstream.

use std::path::PathBuf;

use clap::Parser;

use crate::app::AppLocator;
use crate::net::BindTarget;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "app-server",
    version,
    about = "Start an instance of the application server"
)]
pub struct Cli {
    /// Application to serve, as MODULE[:EXPORT]
    #[arg(value_name = "APP_MODULE", value_parser = AppLocator::parse)]
    pub app: AppLocator,

    /// Network interface or socket path to listen on
    #[arg(
        long,
        value_name = "ADDRESS",
        default_value = "127.0.0.1:8000",
        value_parser = BindTarget::parse
    )]
    pub bind: BindTarget,

    /// Working directory to switch to before importing the application
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub chdir: PathBuf,

    /// Server name advertised via the Server response header
    #[arg(long, value_name = "NAME")]
    pub server_name: Option<String>,

    /// Number of request worker slots
    #[arg(long, value_name = "INT")]
    pub threads: Option<usize>,

    /// Ceiling on request worker slots
    #[arg(long, value_name = "INT")]
    pub max_threads: Option<usize>,

    /// Timeout in seconds for in-flight requests
    #[arg(long, value_name = "INT")]
    pub timeout: Option<u64>,

    /// Time in seconds to wait for connections to drain on shutdown
    #[arg(long, value_name = "INT")]
    pub shutdown_timeout: Option<u64>,

    /// Maximum number of queued (unaccepted) connections
    #[arg(long, value_name = "INT")]
    pub request_queue_size: Option<u32>,

    /// Maximum number of accepted requests waiting for a worker slot
    #[arg(long, value_name = "INT")]
    pub accepted_queue_size: Option<usize>,

    /// Timeout in seconds for a request waiting in the accepted queue
    #[arg(long, value_name = "INT")]
    pub accepted_queue_timeout: Option<u64>,
}
