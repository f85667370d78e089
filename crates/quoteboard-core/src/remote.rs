//! Remote quote source
//!
//! Fetches quote-like records from an HTTP endpoint. The endpoint returns a
//! JSON array of records with at least a `title` string; each title becomes a
//! quote in the `Server` category.
//!
//! Fetching never fails from the caller's point of view: network errors,
//! non-success statuses and undecodable bodies all yield an empty list. There
//! is a single attempt per call with no retry.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{Quote, SERVER_CATEGORY};

/// Source of remotely held quotes
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the remote quote list, empty on any failure
    async fn fetch_quotes(&self) -> Vec<Quote>;

    /// Send a quote to the remote endpoint, returning its decoded response
    async fn post_quote(&self, quote: &Quote) -> Option<Value>;
}

/// `RemoteSource` over HTTP (GET to fetch, POST to publish)
#[derive(Debug, Clone)]
pub struct HttpRemoteSource {
    client: reqwest::Client,
    url: String,
}

impl HttpRemoteSource {
    /// Create a source for `url` with a request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quoteboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Create a source from the configured endpoint and timeout
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(config.remote_url.clone(), config.request_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Inner fetch that can fail
    async fn try_fetch(&self) -> reqwest::Result<Option<Vec<Value>>> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!(
                "Remote source {} returned status {}",
                self.url,
                response.status()
            );
            return Ok(None);
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(records) => Ok(Some(records)),
            _ => {
                warn!("Remote source {} did not return an array", self.url);
                Ok(None)
            }
        }
    }

    async fn try_post(&self, quote: &Quote) -> reqwest::Result<Value> {
        let response = self
            .client
            .post(&self.url)
            .json(&post_body(quote))
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    async fn fetch_quotes(&self) -> Vec<Quote> {
        debug!("Fetching remote quotes from {}", self.url);
        match self.try_fetch().await {
            Ok(Some(records)) => {
                let quotes = quotes_from_records(&records);
                debug!("Fetched {} remote quote(s)", quotes.len());
                quotes
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to fetch remote quotes from {}: {}", self.url, e);
                Vec::new()
            }
        }
    }

    async fn post_quote(&self, quote: &Quote) -> Option<Value> {
        match self.try_post(quote).await {
            Ok(response) => {
                info!("Remote accepted quote: {}", response);
                Some(response)
            }
            Err(e) => {
                warn!("Failed to post quote to {}: {}", self.url, e);
                None
            }
        }
    }
}

/// Map remote records to quotes
///
/// Records without a string `title`, or whose title is blank, are skipped.
pub fn quotes_from_records(records: &[Value]) -> Vec<Quote> {
    records
        .iter()
        .filter_map(|record| record.get("title").and_then(Value::as_str))
        .map(normalize_whitespace)
        .filter(|title| !title.is_empty())
        .map(|title| Quote::new(title, SERVER_CATEGORY))
        .collect()
}

/// Record shape accepted by the endpoint: the text goes in `title`, which is
/// the field fetched records are read from
fn post_body(quote: &Quote) -> Value {
    serde_json::json!({
        "title": quote.text,
        "body": quote.category,
        "userId": 1,
    })
}

/// Collapse whitespace runs to a single space and trim the ends
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port
    async fn serve_once(status: &'static str, body: String) -> String {
        serve_recording(status, body).await.0
    }

    /// Like `serve_once`, also handing back the raw request
    async fn serve_recording(
        status: &'static str,
        body: String,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (request_tx, request_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = request_tx.send(read_request(&mut socket).await);

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        (format!("http://{}/posts", addr), request_rx)
    }

    /// Read headers and any declared body
    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&data).into_owned()
    }

    fn source(url: &str) -> HttpRemoteSource {
        HttpRemoteSource::new(url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello   world \n"), "hello world");
        assert_eq!(normalize_whitespace("line\none\ttwo"), "line one two");
        assert_eq!(normalize_whitespace("   "), "");
    }

    #[test]
    fn test_quotes_from_records() {
        let records = vec![
            json!({"id": 1, "title": "sunt aut\nfacere  repellat", "body": "..."}),
            json!({"id": 2, "body": "no title"}),
            json!({"id": 3, "title": 42}),
            json!({"id": 4, "title": "   "}),
            json!("not an object"),
        ];

        let quotes = quotes_from_records(&records);
        assert_eq!(quotes, vec![Quote::new("sunt aut facere repellat", "Server")]);
    }

    #[tokio::test]
    async fn test_fetch_maps_titles() {
        let body = json!([
            {"userId": 1, "id": 1, "title": "first  title"},
            {"userId": 1, "id": 2, "title": "second title"}
        ])
        .to_string();
        let url = serve_once("200 OK", body).await;

        let quotes = source(&url).fetch_quotes().await;
        assert_eq!(
            quotes,
            vec![
                Quote::new("first title", "Server"),
                Quote::new("second title", "Server"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_empty() {
        let url = serve_once("500 Internal Server Error", "[]".to_string()).await;
        assert!(source(&url).fetch_quotes().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_array_body_is_empty() {
        let url = serve_once("200 OK", r#"{"title": "single"}"#.to_string()).await;
        assert!(source(&url).fetch_quotes().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_connection_failure_is_empty() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let quotes = source(&format!("http://{}/posts", addr)).fetch_quotes().await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_post_returns_response() {
        let url = serve_once("201 Created", json!({"id": 101}).to_string()).await;

        let response = source(&url)
            .post_quote(&Quote::new("Posted", "Mine"))
            .await
            .unwrap();
        assert_eq!(response["id"], 101);
    }

    #[tokio::test]
    async fn test_post_sends_title_record() {
        let (url, request) = serve_recording("201 Created", "{}".to_string()).await;

        source(&url)
            .post_quote(&Quote::new("Posted text", "Mine"))
            .await
            .unwrap();

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /posts "));
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            body,
            json!({"title": "Posted text", "body": "Mine", "userId": 1})
        );
    }

    #[tokio::test]
    async fn test_post_failure_is_none() {
        let url = serve_once("404 Not Found", "{}".to_string()).await;
        assert!(source(&url)
            .post_quote(&Quote::new("Posted", "Mine"))
            .await
            .is_none());
    }
}
