//! Shared utilities for relay integration tests.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Start a mock backend that returns a fixed response and records the raw
/// request (head plus any body bytes) of everything it serves.
///
/// Binds an ephemeral port; returns the bound address and the recording
/// channel.
pub async fn start_recording_backend(
    status: u16,
    body: &'static str,
) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                let recorded = read_request(&mut socket).await;
                let _ = tx.send(recorded);

                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    502 => "502 Bad Gateway",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

/// Start a mock backend that accepts connections and never responds,
/// holding every socket open. Used to force relay timeouts.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            match listener.accept().await {
                Ok((socket, _)) => held.push(socket),
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read the request head, then drain whatever body bytes follow within a
/// short window. Chunked framing is recorded as-is.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    while !buf.ends_with(b"\r\n\r\n") {
        match socket.read(&mut byte).await {
            Ok(0) | Err(_) => break,
            Ok(_) => buf.push(byte[0]),
        }
    }

    let mut chunk = [0u8; 1024];
    loop {
        match tokio::time::timeout(Duration::from_millis(100), socket.read(&mut chunk)).await {
            Ok(Ok(n)) if n > 0 => buf.extend_from_slice(&chunk[..n]),
            _ => break,
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}
