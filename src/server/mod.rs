//! Server component subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig
//!     → constructor (precondition checks; may fail)
//!     → start(): bind listener, serve until asked to stop or fatal error
//!     → stop(): request graceful shutdown, wait for drain
//! ```
//!
//! # Design Decisions
//! - The lifecycle controller only knows the Server trait; the HTTP
//!   implementation is swappable (and stubbed in controller tests)
//! - start() resolving means "no longer serving": fatal error, or drain
//!   completed after a stop() request

use async_trait::async_trait;

pub mod http;

pub use http::HttpServer;

/// Error type for server construction and lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration violated a server precondition; raised by the
    /// constructor before anything is bound.
    #[error("invalid server configuration: {0}")]
    Config(String),

    #[error("failed to bind {target}: {source}")]
    Bind {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server failed while serving: {0}")]
    Serve(#[source] std::io::Error),

    #[error("serve task died: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Lifecycle contract consumed by the controller.
///
/// `start` blocks the calling task until the server stops serving; `stop`
/// requests and awaits a graceful shutdown. The controller guarantees
/// `stop` is called exactly once however `start` ends.
#[async_trait]
pub trait Server {
    async fn start(&mut self) -> Result<(), ServerError>;

    async fn stop(&mut self) -> Result<(), ServerError>;
}
