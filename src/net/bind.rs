//! Bind-target parsing.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Where the server should listen.
///
/// A bind string of the form `<host>:<port>` (port: decimal digits anchored
/// to the end, host: any non-empty run without whitespace) becomes a TCP
/// target; the port is taken after the last colon, so bracketed IPv6 forms
/// like `[::1]:8080` keep their colons in the host. Anything else is taken
/// verbatim as a Unix socket path. The fallback is deliberately permissive:
/// strings that merely look like a malformed `host:port` are dispatched to
/// the socket-path arm, not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindTarget {
    /// Network endpoint, e.g. `0.0.0.0:9000`.
    Tcp { host: String, port: u16 },

    /// Filesystem socket path, e.g. `/run/app.sock`.
    Unix { path: PathBuf },
}

/// Error type for bind-target parsing.
///
/// The only rejected input is a string that matches the `host:port` shape
/// with a port number too large for a 16-bit port. Deferring that to bind
/// time would report it as a confusing socket-path failure.
#[derive(Debug, Clone, thiserror::Error)]
#[error("port `{digits}` in bind address `{input}` is out of range (0-65535)")]
pub struct PortOutOfRange {
    input: String,
    digits: String,
}

impl BindTarget {
    /// Parse a `--bind` argument.
    pub fn parse(input: &str) -> Result<Self, PortOutOfRange> {
        if let Some((host, digits)) = input.rsplit_once(':') {
            let tcp_shaped = !host.is_empty()
                && !digits.is_empty()
                && digits.bytes().all(|b| b.is_ascii_digit())
                && !input.chars().any(char::is_whitespace);
            if tcp_shaped {
                let port = digits.parse::<u16>().map_err(|_| PortOutOfRange {
                    input: input.to_string(),
                    digits: digits.to_string(),
                })?;
                return Ok(Self::Tcp {
                    host: host.to_string(),
                    port,
                });
            }
        }

        Ok(Self::Unix {
            path: PathBuf::from(input),
        })
    }
}

impl fmt::Display for BindTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindTarget::Tcp { host, port } => write!(f, "{}:{}", host, port),
            BindTarget::Unix { path } => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp(host: &str, port: u16) -> BindTarget {
        BindTarget::Tcp {
            host: host.to_string(),
            port,
        }
    }

    fn unix(path: &str) -> BindTarget {
        BindTarget::Unix {
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn host_port_forms_become_tcp() {
        assert_eq!(BindTarget::parse("127.0.0.1:8000").unwrap(), tcp("127.0.0.1", 8000));
        assert_eq!(BindTarget::parse("0.0.0.0:9000").unwrap(), tcp("0.0.0.0", 9000));
        assert_eq!(BindTarget::parse("localhost:0").unwrap(), tcp("localhost", 0));
    }

    #[test]
    fn port_is_taken_after_the_last_colon() {
        assert_eq!(BindTarget::parse("[::1]:8080").unwrap(), tcp("[::1]", 8080));
        assert_eq!(BindTarget::parse("a:b:123").unwrap(), tcp("a:b", 123));
    }

    #[test]
    fn everything_else_falls_back_to_a_socket_path() {
        assert_eq!(BindTarget::parse("/run/app.sock").unwrap(), unix("/run/app.sock"));
        assert_eq!(BindTarget::parse("localhost").unwrap(), unix("localhost"));
        // non-numeric port, empty host, empty port: all socket paths, unchanged
        assert_eq!(BindTarget::parse("host:port").unwrap(), unix("host:port"));
        assert_eq!(BindTarget::parse(":8000").unwrap(), unix(":8000"));
        assert_eq!(BindTarget::parse("host:").unwrap(), unix("host:"));
        assert_eq!(BindTarget::parse("").unwrap(), unix(""));
    }

    #[test]
    fn whitespace_disqualifies_the_tcp_shape() {
        assert_eq!(BindTarget::parse("some host:8000").unwrap(), unix("some host:8000"));
    }

    #[test]
    fn oversized_port_is_rejected_rather_than_misread_as_a_path() {
        let err = BindTarget::parse("web:99999").unwrap_err();
        assert!(err.to_string().contains("99999"));
    }

    #[test]
    fn display_round_trips_the_user_facing_form() {
        assert_eq!(tcp("127.0.0.1", 8000).to_string(), "127.0.0.1:8000");
        assert_eq!(unix("/run/app.sock").to_string(), "/run/app.sock");
    }
}
