//! Configuration assembly subsystem.
//!
//! # Data Flow
//! ```text
//! parsed CLI flags
//!     → schema.rs (sparse ServerConfig: supplied options only)
//!     + resolved application (from app::locator)
//!     + parsed bind target (from net::bind)
//!     → handed to the server constructor
//! ```
//!
//! # Design Decisions
//! - "Not supplied" is `None`, never a reused default value
//! - CLI-only fields are kept out by the type, not filtered at runtime

pub mod schema;

pub use schema::ServerConfig;
