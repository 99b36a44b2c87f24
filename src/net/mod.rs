//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! --bind ADDRESS
//!     → bind.rs (two-way dispatch: host:port or socket path)
//!     → BindTarget (typed, validated)
//!     → consumed by the server component when it binds its listener
//! ```
//!
//! # Design Decisions
//! - Parsing happens at CLI time, so a bad port fails before any side effect
//! - Unrecognized shapes are socket paths, never errors (permissive fallback)

pub mod bind;

pub use bind::BindTarget;
