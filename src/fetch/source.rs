//! Where tile bytes come from.

use std::future::Future;
use tracing::{debug, trace};

/// Result of probing one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// HTTP 200 with this body.
    Found(Vec<u8>),
    /// Anything else. The reason is only logged: every miss is read as a
    /// grid boundary, transient or not.
    Missing(String),
}

/// A remote (or fake) tile store addressed by URL.
pub trait TileSource {
    fn probe(&self, url: &str) -> impl Future<Output = Probe>;
}

/// Tile source backed by a reqwest client.
#[derive(Clone)]
pub struct HttpTileSource {
    client: reqwest::Client,
}

impl HttpTileSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl TileSource for HttpTileSource {
    async fn probe(&self, url: &str) -> Probe {
        trace!(url, "GET");
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Probe::Missing(format!("request failed: {}", e)),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Probe::Missing(format!("status code {}", status));
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!(url, bytes = bytes.len(), "Fetched tile");
                Probe::Found(bytes.to_vec())
            }
            Err(e) => Probe::Missing(format!("failed to read body: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::http::get_user_agent;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TILE_BODY: &[u8] = b"\xff\xd8tile-bytes\xff\xd9";

    /// Canned HTTP/1.1 reply for each request path.
    fn canned_response(path: &str) -> Vec<u8> {
        let head = |status: &str, extra: &str, len: usize| {
            format!("HTTP/1.1 {status}\r\n{extra}Content-Length: {len}\r\nConnection: close\r\n\r\n")
        };
        match path {
            "/0_0.jpg" => {
                let mut reply = head("200 OK", "", TILE_BODY.len()).into_bytes();
                reply.extend_from_slice(TILE_BODY);
                reply
            }
            "/0_1.jpg" => b"HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_vec(),
            "/1_0.jpg" => head("301 Moved Permanently", "Location: /gone.jpg\r\n", 0).into_bytes(),
            "/2_0.jpg" => head("500 Internal Server Error", "", 0).into_bytes(),
            _ => head("404 Not Found", "", 0).into_bytes(),
        }
    }

    /// Serve [`canned_response`] on an ephemeral loopback port.
    async fn serve_canned() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let _ = socket.write_all(&canned_response(path)).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        addr
    }

    fn source() -> HttpTileSource {
        // Loopback traffic must not be routed through an ambient HTTP_PROXY.
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .unwrap();
        HttpTileSource::new(client)
    }

    #[tokio::test]
    async fn test_ok_status_yields_body() {
        let addr = serve_canned().await;
        let outcome = source().probe(&format!("http://{addr}/0_0.jpg")).await;
        assert_eq!(outcome, Probe::Found(TILE_BODY.to_vec()));
    }

    #[tokio::test]
    async fn test_not_found_is_missing() {
        let addr = serve_canned().await;
        let outcome = source().probe(&format!("http://{addr}/7_7.jpg")).await;
        assert!(matches!(outcome, Probe::Missing(ref reason) if reason.contains("404")), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_other_success_status_is_missing() {
        let addr = serve_canned().await;
        let outcome = source().probe(&format!("http://{addr}/0_1.jpg")).await;
        assert!(matches!(outcome, Probe::Missing(ref reason) if reason.contains("204")), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_redirect_is_judged_by_final_status() {
        let addr = serve_canned().await;
        let outcome = source().probe(&format!("http://{addr}/1_0.jpg")).await;
        assert!(matches!(outcome, Probe::Missing(ref reason) if reason.contains("404")), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_server_error_is_missing() {
        let addr = serve_canned().await;
        let outcome = source().probe(&format!("http://{addr}/2_0.jpg")).await;
        assert!(matches!(outcome, Probe::Missing(ref reason) if reason.contains("500")), "{outcome:?}");
    }

    #[tokio::test]
    async fn test_refused_connection_is_missing() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = source().probe(&format!("http://{addr}/0_0.jpg")).await;
        assert!(
            matches!(outcome, Probe::Missing(ref reason) if reason.starts_with("request failed")),
            "{outcome:?}"
        );
    }
}
