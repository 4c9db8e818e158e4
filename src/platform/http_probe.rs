// ABOUTME: HTTP liveness probe over hyper.
// ABOUTME: A 2xx answer within the request timeout counts as healthy.

use super::traits::HealthProbe;
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Empty;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

/// Issues `GET` requests against a plain-HTTP liveness endpoint.
pub struct HttpProbe {
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            timeout,
        }
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn check(&self, url: &str) -> bool {
        let uri: hyper::Uri = match url.parse() {
            Ok(uri) => uri,
            Err(e) => {
                tracing::debug!(url, error = %e, "unparseable health URL");
                return false;
            }
        };

        match tokio::time::timeout(self.timeout, self.client.get(uri)).await {
            Ok(Ok(response)) => {
                let status = response.status();
                tracing::debug!(url, status = status.as_u16(), "probe answered");
                status.is_success()
            }
            Ok(Err(e)) => {
                tracing::debug!(url, error = %e, "probe request failed");
                false
            }
            Err(_elapsed) => {
                tracing::debug!(url, timeout = ?self.timeout, "probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on an ephemeral port.
    async fn serve_once(status_line: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn ok_response_is_healthy() {
        let url = serve_once("HTTP/1.1 200 OK").await;
        let probe = HttpProbe::new(Duration::from_secs(5));
        assert!(probe.check(&url).await);
    }

    #[tokio::test]
    async fn server_error_is_not_healthy() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable").await;
        let probe = HttpProbe::new(Duration::from_secs(5));
        assert!(!probe.check(&url).await);
    }

    #[tokio::test]
    async fn refused_connection_is_not_healthy() {
        // Bind then drop to get a port nothing listens on.
        let addr = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap()
            .local_addr()
            .unwrap();
        let probe = HttpProbe::new(Duration::from_secs(5));
        assert!(!probe.check(&format!("http://{addr}/")).await);
    }

    #[tokio::test]
    async fn malformed_url_is_not_healthy() {
        let probe = HttpProbe::new(Duration::from_secs(1));
        assert!(!probe.check("not a url").await);
    }
}
