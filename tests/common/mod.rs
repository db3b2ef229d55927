//! Shared upstream test doubles and server bootstrap.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use cors_relay::{RelayConfig, RelayServer, Shutdown};

/// Headers received by an upstream double, lower-cased names.
pub type SeenHeaders = Vec<(String, String)>;

/// Bind an ephemeral loopback port.
#[allow(dead_code)]
pub async fn bind_local() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").await.unwrap()
}

/// Start the relay on an ephemeral port with short test timeouts. Keep the
/// returned `Shutdown` alive for as long as the relay should run.
#[allow(dead_code)]
pub async fn start_relay() -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.timeouts.upstream_secs = 5;
    config.timeouts.connect_secs = 2;
    start_relay_with(config).await
}

/// Start the relay on an ephemeral port with the given configuration.
#[allow(dead_code)]
pub async fn start_relay_with(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = bind_local().await;
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = RelayServer::new(config).unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// A client that never pools or goes through a system proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Percent-encode a target for the `url` query parameter.
#[allow(dead_code)]
pub fn relay_url(relay: SocketAddr, target: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("http://{}/?url={}", relay, encoded)
}

/// Read one request head from the socket and return its header lines.
async fn read_head(socket: &mut TcpStream) -> SeenHeaders {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .skip(1)
        .take_while(|line| !line.is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect()
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        302 => "302 Found",
        401 => "401 Unauthorized",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Accept loop shared by the doubles. `serve` gets the socket after the
/// request head has been read; every accepted request bumps the counter.
async fn spawn_upstream<F, Fut>(serve: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn(TcpStream, SeenHeaders) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = bind_local().await;
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(AtomicU32::new(0));
    let serve = Arc::new(serve);

    let counter = calls.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let serve = serve.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let headers = read_head(&mut socket).await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        serve(socket, headers).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, calls)
}

async fn write_response(mut socket: TcpStream, status: u16, extra_headers: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nX-Upstream: yes\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text(status),
        extra_headers,
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
    tokio::time::sleep(Duration::from_millis(10)).await;
}

/// Start an upstream double on an ephemeral port.
///
/// `respond` builds `(status, body)` from the received headers.
#[allow(dead_code)]
pub async fn start_upstream<F>(respond: F) -> (SocketAddr, Arc<AtomicU32>)
where
    F: Fn(&SeenHeaders) -> (u16, String) + Send + Sync + 'static,
{
    let respond = Arc::new(respond);
    spawn_upstream(move |socket, headers| {
        let (status, body) = respond(&headers);
        async move { write_response(socket, status, "", &body).await }
    })
    .await
}

/// Upstream double that always answers with a fixed status and body.
#[allow(dead_code)]
pub async fn start_fixed_upstream(status: u16, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
    start_upstream(move |_| (status, body.to_string())).await
}

/// Upstream double that answers 200 with the received headers as a JSON object.
#[allow(dead_code)]
pub async fn start_echo_upstream() -> (SocketAddr, Arc<AtomicU32>) {
    start_upstream(|headers| {
        let map: serde_json::Map<String, serde_json::Value> = headers
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        (200, serde_json::Value::Object(map).to_string())
    })
    .await
}

/// Upstream double that answers 302 pointing at `location`.
#[allow(dead_code)]
pub async fn start_redirect_upstream(location: String) -> (SocketAddr, Arc<AtomicU32>) {
    let location_header = Arc::new(format!("Location: {}\r\n", location));
    spawn_upstream(move |socket, _| {
        let location_header = location_header.clone();
        async move { write_response(socket, 302, &location_header, "").await }
    })
    .await
}

/// Upstream double that reads the request and then never replies.
#[allow(dead_code)]
pub async fn start_hanging_upstream() -> (SocketAddr, Arc<AtomicU32>) {
    spawn_upstream(|socket, _| async move {
        tokio::time::sleep(Duration::from_secs(60)).await;
        drop(socket);
    })
    .await
}
