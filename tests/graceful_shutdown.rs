//! End-to-end lifecycle tests: a real HttpServer under the lifecycle
//! controller, driven over real sockets, shut down by a simulated
//! interrupt.

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use app_server::app::builtin;
use app_server::cli::Cli;
use app_server::lifecycle::controller;
use app_server::{HttpServer, ServerConfig};

async fn connect_with_retry(addr: &str) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect(addr).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server never started listening on {addr}");
}

async fn http_get<S>(stream: &mut S) -> String
where
    S: AsyncReadExt + AsyncWriteExt + Unpin,
{
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_until_interrupted_then_exits_cleanly() {
    let cli = Cli::try_parse_from([
        "app-server",
        "demo",
        "--bind",
        "127.0.0.1:28391",
        "--server-name",
        "lifecycle-test",
        "--shutdown-timeout",
        "2",
    ])
    .unwrap();
    let config = ServerConfig::assemble(&cli, builtin::hello("still serving"));
    let server = HttpServer::new(config).unwrap();

    let (interrupt_tx, interrupt_rx) = tokio::sync::oneshot::channel::<()>();
    let running = tokio::spawn(controller::run_until_shutdown(server, async move {
        let _ = interrupt_rx.await;
    }));

    let mut stream = connect_with_retry("127.0.0.1:28391").await;
    let response = http_get(&mut stream).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("still serving"), "{response}");
    assert!(
        response.to_ascii_lowercase().contains("server: lifecycle-test"),
        "{response}"
    );

    // deliver the interrupt; the controller must stop and report success
    interrupt_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("controller did not shut down in time")
        .unwrap();
    assert!(result.is_ok(), "{result:?}");

    // and the listener is actually gone
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(TcpStream::connect("127.0.0.1:28391").await.is_err());
}

#[cfg(unix)]
#[tokio::test]
async fn serves_over_a_unix_socket() {
    use tokio::net::UnixStream;

    let dir = tempfile::TempDir::new().unwrap();
    let socket = dir.path().join("app.sock");

    let cli = Cli::try_parse_from([
        "app-server",
        "demo",
        "--bind",
        socket.to_str().unwrap(),
        "--shutdown-timeout",
        "2",
    ])
    .unwrap();
    let config = ServerConfig::assemble(&cli, builtin::hello("over the socket"));
    let server = HttpServer::new(config).unwrap();

    let (interrupt_tx, interrupt_rx) = tokio::sync::oneshot::channel::<()>();
    let running = tokio::spawn(controller::run_until_shutdown(server, async move {
        let _ = interrupt_rx.await;
    }));

    let mut stream = {
        let mut attempts = 0;
        loop {
            match UnixStream::connect(&socket).await {
                Ok(stream) => break stream,
                Err(_) if attempts < 100 => {
                    attempts += 1;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                Err(err) => panic!("server never started listening on {socket:?}: {err}"),
            }
        }
    };
    let response = http_get(&mut stream).await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("over the socket"), "{response}");

    interrupt_tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("controller did not shut down in time")
        .unwrap();
    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn a_failed_bind_surfaces_after_cleanup() {
    // occupy a port, then ask the server to bind it without SO_REUSEPORT
    let taken = tokio::net::TcpListener::bind("127.0.0.1:28392").await.unwrap();

    let cli = Cli::try_parse_from(["app-server", "demo", "--bind", "127.0.0.1:28392"]).unwrap();
    let config = ServerConfig::assemble(&cli, builtin::hello("never served"));
    let server = HttpServer::new(config).unwrap();

    let result = controller::run_until_shutdown(server, std::future::pending()).await;
    assert!(result.is_err());
    drop(taken);
}
