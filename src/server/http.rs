//! HTTP server bound to the resolved application.
//!
//! # Responsibilities
//! - Turn a sparse `ServerConfig` into effective options (server defaults
//!   fill the gaps the user left)
//! - Bind the TCP or Unix listener and serve the application via Axum
//! - Wire up middleware: tracing, Server header, request timeout, and the
//!   accepted-request queue in front of the worker-concurrency limit
//! - Drain connections on stop, bounded by the shutdown timeout
//!
//! # Design Decisions
//! - Serving runs on a spawned task; `start()` awaits it, so a caller that
//!   gives up on `start()` early does not kill the listener, and `stop()`
//!   can still drain it
//! - Worker slots are a concurrency limit; requests beyond it wait in a
//!   bounded buffer and 503 when the queue wait exceeds its budget

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use axum::error_handling::HandleErrorLayer;
use axum::http::{header, HeaderValue, StatusCode};
use axum::Router;
use tokio::net::{lookup_host, TcpSocket};
use tokio::task::JoinHandle;
use tower::buffer::BufferLayer;
use tower::limit::ConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer as QueueTimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::lifecycle::Shutdown;
use crate::net::BindTarget;
use crate::server::{Server, ServerError};

const DEFAULT_THREADS: usize = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;
const DEFAULT_BACKLOG: u32 = 1024;
const DEFAULT_ACCEPTED_QUEUE_SIZE: usize = 1024;
const DEFAULT_ACCEPTED_QUEUE_TIMEOUT_SECS: u64 = 10;

fn default_server_name() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Production server component: Axum over TCP or a Unix socket.
pub struct HttpServer {
    app: Router,
    bind: BindTarget,
    server_header: HeaderValue,
    concurrency_limit: usize,
    request_timeout: Duration,
    queue_size: usize,
    queue_timeout: Duration,
    backlog: u32,
    shutdown_timeout: Duration,
    shutdown: Shutdown,
    serving: Option<JoinHandle<io::Result<()>>>,
}

impl HttpServer {
    /// Check preconditions and resolve effective options. Fails without
    /// binding anything when the configuration is unusable.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let threads = config.threads.unwrap_or(DEFAULT_THREADS);
        if threads == 0 {
            return Err(ServerError::Config(
                "threads must be at least 1".to_string(),
            ));
        }
        if let Some(max) = config.max_threads {
            if max < threads {
                return Err(ServerError::Config(format!(
                    "max-threads ({max}) must not be lower than threads ({threads})"
                )));
            }
        }
        let queue_size = config
            .accepted_queue_size
            .unwrap_or(DEFAULT_ACCEPTED_QUEUE_SIZE);
        if queue_size == 0 {
            return Err(ServerError::Config(
                "accepted-queue-size must be at least 1".to_string(),
            ));
        }

        let name = config.server_name.unwrap_or_else(default_server_name);
        let server_header = HeaderValue::from_str(&name).map_err(|_| {
            ServerError::Config(format!("server name {name:?} is not a valid header value"))
        })?;

        Ok(Self {
            app: config.app,
            bind: config.bind,
            server_header,
            concurrency_limit: config.max_threads.unwrap_or(threads),
            request_timeout: Duration::from_secs(
                config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            queue_size,
            queue_timeout: Duration::from_secs(
                config
                    .accepted_queue_timeout_secs
                    .unwrap_or(DEFAULT_ACCEPTED_QUEUE_TIMEOUT_SECS),
            ),
            backlog: config.request_queue_size.unwrap_or(DEFAULT_BACKLOG),
            shutdown_timeout: Duration::from_secs(
                config
                    .shutdown_timeout_secs
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            ),
            shutdown: Shutdown::new(),
            serving: None,
        })
    }

    /// The application wrapped in the middleware stack. Inner stack runs
    /// per request; the outer stack is the accepted-request queue feeding
    /// the worker-concurrency limit.
    fn service(&self) -> Router {
        let request_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::if_not_present(
                header::SERVER,
                self.server_header.clone(),
            ))
            .layer(TimeoutLayer::new(self.request_timeout));

        let queue_stack = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(queue_error))
            .layer(QueueTimeoutLayer::new(self.queue_timeout))
            .layer(BufferLayer::new(self.queue_size))
            .layer(ConcurrencyLimitLayer::new(self.concurrency_limit));

        self.app.clone().layer(request_stack).layer(queue_stack)
    }

    fn bind_error(target: &str, source: io::Error) -> ServerError {
        ServerError::Bind {
            target: target.to_string(),
            source,
        }
    }
}

#[async_trait]
impl Server for HttpServer {
    async fn start(&mut self) -> Result<(), ServerError> {
        let service = self.service().into_make_service();
        let graceful = self.shutdown.wait();

        let handle = match &self.bind {
            BindTarget::Tcp { host, port } => {
                let target = format!("{host}:{port}");
                let addr = lookup_host((host.as_str(), *port))
                    .await
                    .map_err(|e| Self::bind_error(&target, e))?
                    .next()
                    .ok_or_else(|| {
                        Self::bind_error(
                            &target,
                            io::Error::new(
                                io::ErrorKind::NotFound,
                                "host resolved to no addresses",
                            ),
                        )
                    })?;

                let socket = if addr.is_ipv4() {
                    TcpSocket::new_v4()
                } else {
                    TcpSocket::new_v6()
                }
                .map_err(|e| Self::bind_error(&target, e))?;
                socket
                    .set_reuseaddr(true)
                    .map_err(|e| Self::bind_error(&target, e))?;
                socket.bind(addr).map_err(|e| Self::bind_error(&target, e))?;
                let listener = socket
                    .listen(self.backlog)
                    .map_err(|e| Self::bind_error(&target, e))?;
                let local = listener
                    .local_addr()
                    .map_err(|e| Self::bind_error(&target, e))?;

                tracing::info!(address = %local, backlog = self.backlog, "listening");
                tokio::spawn(async move {
                    axum::serve(listener, service)
                        .with_graceful_shutdown(graceful)
                        .await
                })
            }
            #[cfg(unix)]
            BindTarget::Unix { path } => {
                // replace a stale socket file left by a previous run
                if path.exists() {
                    let _ = std::fs::remove_file(path);
                }
                let listener = tokio::net::UnixListener::bind(path)
                    .map_err(|e| Self::bind_error(&path.display().to_string(), e))?;

                tracing::info!(path = %path.display(), "listening on unix socket");
                tokio::spawn(async move {
                    axum::serve(listener, service)
                        .with_graceful_shutdown(graceful)
                        .await
                })
            }
            #[cfg(not(unix))]
            BindTarget::Unix { path } => {
                return Err(ServerError::Config(format!(
                    "unix socket binds are not supported on this platform: {}",
                    path.display()
                )));
            }
        };

        self.serving = Some(handle);
        let outcome = match self.serving.as_mut() {
            Some(serving) => serving.await,
            None => return Ok(()),
        };
        self.serving = None;

        match outcome {
            Ok(Ok(())) => {
                tracing::info!("server stopped serving");
                Ok(())
            }
            Ok(Err(source)) => Err(ServerError::Serve(source)),
            Err(join) => Err(ServerError::Join(join)),
        }
    }

    async fn stop(&mut self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        let Some(mut handle) = self.serving.take() else {
            return Ok(());
        };

        tracing::info!(drain_timeout = ?self.shutdown_timeout, "stopping server");
        tokio::select! {
            outcome = &mut handle => match outcome {
                Ok(Ok(())) => {
                    tracing::info!("connections drained");
                    Ok(())
                }
                Ok(Err(source)) => Err(ServerError::Serve(source)),
                Err(join) => Err(ServerError::Join(join)),
            },
            _ = tokio::time::sleep(self.shutdown_timeout) => {
                tracing::warn!("drain budget exceeded, aborting serve task");
                handle.abort();
                Ok(())
            }
        }
    }
}

/// Errors surfacing from the queue stack: a queue-wait timeout or a closed
/// buffer. Both shed the request rather than hanging the client.
async fn queue_error(err: BoxError) -> (StatusCode, &'static str) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "request timed out waiting for a worker slot",
        )
    } else {
        tracing::error!(error = %err, "request dropped by the accepted-request queue");
        (StatusCode::SERVICE_UNAVAILABLE, "server overloaded")
    }
}
