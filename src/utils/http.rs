// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::error::{AppError, Result};
use crate::models::{NotifyConfig, SearchConfig};

/// Create the client used to query the course search.
pub fn create_search_client(config: &SearchConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let accept = HeaderValue::from_str(&config.accept)
        .map_err(|e| AppError::config(format!("search.accept is not a valid header: {e}")))?;
    headers.insert(ACCEPT, accept);

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Create the client used by notification backends.
pub fn create_notify_client(config: &NotifyConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Create a plain client with the given timeout.
pub fn create_client(timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// One-shot HTTP responder on loopback for exercising outbound requests.
#[cfg(test)]
pub(crate) mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Request as received on the wire.
    #[derive(Debug)]
    pub struct CapturedRequest {
        pub head: String,
        pub body: String,
    }

    impl CapturedRequest {
        /// `METHOD /path HTTP/1.1`
        pub fn request_line(&self) -> &str {
            self.head.lines().next().unwrap_or_default()
        }

        /// Header value by case-insensitive name.
        pub fn header(&self, name: &str) -> Option<&str> {
            self.head.lines().skip(1).find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
            })
        }
    }

    /// Bind an ephemeral port and answer one request with `status`.
    /// Returns the base URL and a handle resolving to the request.
    pub async fn serve_once(status: u16) -> (String, JoinHandle<CapturedRequest>) {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        (url, respond_once(listener, status))
    }

    /// Accept one connection on `listener` and answer it with `status`.
    pub fn respond_once(listener: TcpListener, status: u16) -> JoinHandle<CapturedRequest> {
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let reason = if status < 300 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            request
        })
    }

    async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (key, value) = line.split_once(':')?;
                        key.trim()
                            .eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);

                let body_start = end + 4;
                while buf.len() < body_start + length {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let body_end = buf.len().min(body_start + length);
                let body = String::from_utf8_lossy(&buf[body_start..body_end]).to_string();
                return CapturedRequest { head, body };
            }

            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                return CapturedRequest {
                    head: String::from_utf8_lossy(&buf).to_string(),
                    body: String::new(),
                };
            }
            buf.extend_from_slice(&chunk[..n]);
        }
    }
}
