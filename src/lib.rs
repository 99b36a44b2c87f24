//! Command-line bootstrap for an application server.
//!
//! Turns a process invocation into a configured, running server instance:
//! parse flags, resolve the application locator against the module
//! registry, assemble a sparse configuration, then drive the server's
//! start/stop lifecycle with graceful shutdown on interrupt.
//!
//! Basic usage:
//!
//! ```text
//! # Serve the built-in demo application on 127.0.0.1:8000
//! app-server demo
//!
//! # Serve the make_app() export of myapp/web.toml on 0.0.0.0:9000
//! # with 8 worker slots
//! app-server 'myapp.web:make_app()' --bind 0.0.0.0:9000 --threads 8
//! ```

// Core subsystems
pub mod app;
pub mod cli;
pub mod config;
pub mod net;
pub mod server;

// Cross-cutting concerns
pub mod lifecycle;

pub use app::{AppLocator, AppRegistry, ImportContext, Module};
pub use config::ServerConfig;
pub use lifecycle::Shutdown;
pub use net::BindTarget;
pub use server::HttpServer;
