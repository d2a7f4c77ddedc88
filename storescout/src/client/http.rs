//! reqwest-backed client for the external services.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use tracing::{debug, instrument};

use super::protocols::ServiceClient;
use super::wire::{
    decode_search_page, decode_verify_outcome, service_error_message, SearchRequest,
    VerifyRequest,
};
use crate::config::ScoutConfig;
use crate::errors::{Result, ScoutError};
use crate::models::{SearchPage, SearchQuery, VerifyOutcome};
use crate::utils::SearchId;

/// HTTP client for the search and verification services.
///
/// Both services take a JSON `POST` with a static bearer token. The client
/// makes exactly one attempt per call.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    http: reqwest::Client,
    config: ScoutConfig,
}

impl HttpServiceClient {
    /// Creates a client after validating `config`.
    pub fn new(config: ScoutConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ScoutError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    async fn post_json<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<String> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "Service responded");

        if !status.is_success() {
            let fallback = status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string();
            return Err(ScoutError::service(
                status.as_u16(),
                service_error_message(&text, &fallback),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl ServiceClient for HttpServiceClient {
    #[instrument(skip(self, query, search_id), fields(search_id = %search_id))]
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
        search_id: SearchId,
    ) -> Result<SearchPage> {
        let request = SearchRequest::new(query, page, search_id);
        let body = self.post_json(&self.config.search_endpoint, &request).await?;
        decode_search_page(&body, &self.config.logo_placeholder)
    }

    #[instrument(skip(self))]
    async fn verify(&self, url: &str) -> Result<VerifyOutcome> {
        let body = self
            .post_json(&self.config.verify_endpoint, &VerifyRequest::new(url))
            .await?;
        decode_verify_outcome(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsletterFlag;
    use crate::utils::generate_search_id;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serves one canned response and yields the raw request it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).into_owned();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client_for(base: &str) -> HttpServiceClient {
        let config = ScoutConfig::default()
            .with_api_token("test-token")
            .with_search_endpoint(format!("{base}/search"))
            .with_verify_endpoint(format!("{base}/analyze"))
            .with_timeout(5.0);
        HttpServiceClient::new(config).unwrap()
    }

    #[test]
    fn test_new_requires_token() {
        let err = HttpServiceClient::new(ScoutConfig::default()).unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[test]
    fn test_new_with_timeout() {
        let config = ScoutConfig::default().with_api_token("token").with_timeout(5.0);
        let client = HttpServiceClient::new(config).unwrap();
        assert_eq!(client.config().timeout_seconds, Some(5.0));
    }

    #[test]
    fn test_new_rejects_out_of_range_timeout() {
        let config = ScoutConfig::default().with_api_token("token").with_timeout(1e20);
        let err = HttpServiceClient::new(config).unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = ScoutConfig::default()
            .with_api_token("token")
            .with_verify_endpoint("http://127.0.0.1:9/analyze")
            .with_timeout(2.0);
        let client = HttpServiceClient::new(config).unwrap();

        let err = client.verify("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScoutError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_search_page_sends_bearer_and_decodes() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"results": [{"url": "https://a.shop", "title": "A", "hasNewsletter": true}], "total_results": 12, "has_more": true}"#,
        )
        .await;
        let client = client_for(&base);
        let query = SearchQuery::new("Germany", "Berlin", "coffee");
        let id = generate_search_id();

        let page = client.search(&query, 2, id).await.unwrap();

        assert!(page.has_more);
        assert_eq!(page.total_results, 12);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].url(), "https://a.shop");
        assert_eq!(page.results[0].has_newsletter(), NewsletterFlag::Yes);

        let request = server.await.unwrap();
        let lowered = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /search HTTP/1.1"), "{request}");
        assert!(lowered.contains("authorization: bearer test-token"), "{request}");
        assert!(request.contains(r#""page":2"#), "{request}");
        assert!(request.contains(&id.to_string()), "{request}");
    }

    #[tokio::test]
    async fn test_non_success_uses_service_error_text() {
        let (base, server) =
            serve_once("400 Bad Request", r#"{"error": "Missing required fields"}"#).await;
        let client = client_for(&base);

        let err = client
            .search(&SearchQuery::new("a", "b", "c"), 1, generate_search_id())
            .await
            .unwrap_err();

        match err {
            ScoutError::Service { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing required fields");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_without_error_body_uses_reason() {
        let (base, server) = serve_once("502 Bad Gateway", "upstream down").await;
        let client = client_for(&base);

        let err = client.verify("https://a.shop").await.unwrap_err();

        match err {
            ScoutError::Service { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_request_body() {
        let (base, server) =
            serve_once("200 OK", r#"{"isActive": true, "hasNewsletter": false, "hasRSS": true}"#)
                .await;
        let client = client_for(&base);

        let outcome = client.verify("https://a.shop").await.unwrap();
        assert!(outcome.is_active);
        assert!(!outcome.has_newsletter);
        assert!(outcome.has_rss);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /analyze HTTP/1.1"), "{request}");
        assert!(
            request.contains(r#""checkFeatures":["newsletter","rss"]"#),
            "{request}"
        );
    }
}
