//! Server configuration schema.
//!
//! This module defines the configuration value handed to the server
//! constructor. It is sparse by construction: an option the user did not
//! supply stays `None` and is omitted from the serialized form, so the
//! server can tell "user picked the default value" apart from "user said
//! nothing" and apply its own defaults to the latter. CLI-only fields
//! (`--chdir`, the raw locator) have no counterpart here at all; the
//! struct definition is the boundary that keeps them away from the server.

use axum::Router;
use serde::Serialize;

use crate::cli::Cli;
use crate::net::BindTarget;

/// Options accepted by the server constructor.
#[derive(Clone, Serialize)]
pub struct ServerConfig {
    /// The resolved application. Injected by the assembler from locator
    /// resolution, never from a raw flag value.
    #[serde(skip)]
    pub app: Router,

    /// Where to listen.
    pub bind: BindTarget,

    /// Advertised identity for the `Server` response header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    /// Request worker slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,

    /// Ceiling on request worker slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,

    /// In-flight request timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Drain budget for graceful shutdown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_timeout_secs: Option<u64>,

    /// Listen backlog for unaccepted connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_queue_size: Option<u32>,

    /// Capacity of the accepted-request queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_queue_size: Option<usize>,

    /// How long a request may wait in the accepted queue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_queue_timeout_secs: Option<u64>,
}

impl ServerConfig {
    /// Merge the parsed flags with the resolved application and bind
    /// target. Supplied options are copied through; everything else stays
    /// absent.
    pub fn assemble(cli: &Cli, app: Router) -> Self {
        Self {
            app,
            bind: cli.bind.clone(),
            server_name: cli.server_name.clone(),
            threads: cli.threads,
            max_threads: cli.max_threads,
            timeout_secs: cli.timeout,
            shutdown_timeout_secs: cli.shutdown_timeout,
            request_queue_size: cli.request_queue_size,
            accepted_queue_size: cli.accepted_queue_size,
            accepted_queue_timeout_secs: cli.accepted_queue_timeout,
        }
    }

    /// The sparse option map, for startup logging and inspection. Exactly
    /// the options that were explicitly supplied, plus the bind target.
    pub fn sparse_options(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn assemble(args: &[&str]) -> ServerConfig {
        let cli = Cli::try_parse_from(args).unwrap();
        ServerConfig::assemble(&cli, Router::new())
    }

    fn option_keys(config: &ServerConfig) -> Vec<String> {
        let serde_json::Value::Object(map) = config.sparse_options() else {
            panic!("sparse options should serialize to a map");
        };
        map.keys().cloned().collect()
    }

    #[test]
    fn unset_flags_never_appear_in_the_option_map() {
        let config = assemble(&["app-server", "demo"]);
        assert_eq!(option_keys(&config), ["bind"]);
    }

    #[test]
    fn supplied_flags_are_copied_through() {
        let config = assemble(&[
            "app-server",
            "demo",
            "--threads",
            "4",
            "--timeout",
            "30",
            "--server-name",
            "edge-1",
        ]);
        assert_eq!(config.threads, Some(4));
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.server_name.as_deref(), Some("edge-1"));
        assert_eq!(config.max_threads, None);
        assert_eq!(
            option_keys(&config),
            ["bind", "server_name", "threads", "timeout_secs"]
        );
    }

    #[test]
    fn internal_flags_are_excluded_by_construction() {
        // --chdir is CLI-only; even fully flagged invocations never leak it
        let config = assemble(&["app-server", "demo", "--chdir", "/srv/app"]);
        let keys = option_keys(&config);
        assert!(!keys.contains(&"chdir".to_string()));
        assert!(!keys.contains(&"app".to_string()));
    }

    #[test]
    fn the_resolved_bind_target_is_always_present() {
        let config = assemble(&["app-server", "demo", "--bind", "/run/app.sock"]);
        assert_eq!(
            config.sparse_options()["bind"],
            serde_json::json!({ "unix": { "path": "/run/app.sock" } })
        );
    }
}
