//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Prepare environment → Resolve application → Assemble config
//!         → Construct server → run under the controller
//!
//! Control (controller.rs):
//!     start() runs until interrupt or fatal error → stop() exactly once
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → shutdown request for the controller
//!
//! Shutdown (shutdown.rs):
//!     stop() triggers the coordinator → serve task drains and exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup: environment first, then resolution, server last
//! - An interrupt during start() is a clean exit, never an error
//! - stop() is a guaranteed-release step on every path out of start()

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::BootstrapError;
