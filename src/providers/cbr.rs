use crate::core::config::CbrProviderConfig;
use crate::core::feed::{FeedError, parse_feed};
use crate::core::rates::{RateTable, RateTableProvider};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Path of the daily rates document relative to the provider base url.
pub const DAILY_FEED_PATH: &str = "/scripts/XML_daily.asp";

/// Fetches the Central Bank of Russia daily feed and rebuilds the rate table
/// on every call.
pub struct CbrProvider {
    base_url: String,
    base_currency: String,
    client: reqwest::Client,
}

impl CbrProvider {
    pub fn new(config: &CbrProviderConfig, base_currency: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("kurs/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(CbrProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_currency: base_currency.to_string(),
            client,
        })
    }
}

#[async_trait]
impl RateTableProvider for CbrProvider {
    #[instrument(name = "CbrFeedFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_table(&self) -> Result<Arc<RateTable>, FeedError> {
        let url = format!("{}{}", self.base_url, DAILY_FEED_PATH);
        debug!("Requesting rate feed from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::Transport(format!("Request error: {e} URL: {url}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Transport(format!(
                "HTTP error: {status} URL: {url}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Transport(format!("Failed to read body: {e} URL: {url}")))?;
        debug!(bytes = body.len(), "Received rate feed");

        // Currency names are windows-1251 and get stripped, so a lossy
        // decode keeps everything the parser needs.
        let raw = String::from_utf8_lossy(&body);
        parse_feed(&raw, &self.base_currency).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(DAILY_FEED_PATH))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn provider_with_timeout(base_url: &str, timeout_secs: u64) -> CbrProvider {
        let config = CbrProviderConfig {
            base_url: base_url.to_string(),
            timeout_secs,
        };
        CbrProvider::new(&config, "RUB").unwrap()
    }

    fn provider_for(base_url: &str) -> CbrProvider {
        provider_with_timeout(base_url, 5)
    }

    #[tokio::test]
    async fn test_successful_feed_fetch() {
        let mock_response = r#"<?xml version="1.0" encoding="windows-1251"?><ValCurs Date="19.10.2026" name="Foreign Currency Market"><Valute ID="R01235"><NumCode>840</NumCode><CharCode>USD</CharCode><Nominal>1</Nominal><Name>US Dollar</Name><Value>90,3510</Value></Valute><Valute ID="R01239"><NumCode>978</NumCode><CharCode>EUR</CharCode><Nominal>1</Nominal><Name>Euro</Name><Value>100,1000</Value></Valute></ValCurs>"#;

        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;
        let provider = provider_for(&mock_server.uri());

        let table = provider.fetch_table().await.unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("USD"), Some(90.351));
        assert_eq!(table.lookup("EUR"), Some(100.1));
        assert_eq!(table.lookup("RUB"), Some(1.0));
    }

    #[tokio::test]
    async fn test_windows_1251_names_are_stripped() {
        let mut body = br#"<?xml version="1.0" encoding="windows-1251"?><ValCurs Date="19.10.2026"><Valute ID="R01235"><CharCode>USD</CharCode><Name>"#.to_vec();
        // "Доллар США" in windows-1251
        body.extend_from_slice(&[0xC4, 0xEE, 0xEB, 0xEB, 0xE0, 0xF0, 0x20, 0xD1, 0xD8, 0xC0]);
        body.extend_from_slice(b"</Name><Value>90,3510</Value></Valute></ValCurs>");

        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_bytes(body)).await;
        let provider = provider_for(&mock_server.uri());

        let table = provider.fetch_table().await.unwrap();
        assert_eq!(table.lookup("USD"), Some(90.351));
    }

    #[tokio::test]
    async fn test_feed_server_error_is_transport_error() {
        let mock_server = create_mock_server(ResponseTemplate::new(500)).await;
        let provider = provider_for(&mock_server.uri());

        let result = provider.fetch_table().await;
        match result {
            Err(FeedError::Transport(message)) => {
                assert!(message.contains("HTTP error: 500 Internal Server Error"))
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_transport_error() {
        let provider = provider_for("http://127.0.0.1:1");
        let result = provider.fetch_table().await;
        assert!(matches!(result, Err(FeedError::Transport(_))));
    }

    #[tokio::test]
    async fn test_malformed_rate_fails_fetch() {
        let mock_response = r#"<ValCurs><Valute><CharCode>USD</CharCode><Value>90,35</Value></Valute><Valute><CharCode>EUR</CharCode><Value>--</Value></Valute></ValCurs>"#;
        let mock_server =
            create_mock_server(ResponseTemplate::new(200).set_body_string(mock_response)).await;
        let provider = provider_for(&format!("{}/", mock_server.uri()));

        let result = provider.fetch_table().await;
        assert!(matches!(result, Err(FeedError::MalformedRate { code, .. }) if code == "EUR"));
    }

    #[tokio::test]
    async fn test_slow_feed_times_out() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200)
                .set_body_string("<ValCurs></ValCurs>")
                .set_delay(Duration::from_secs(3)),
        )
        .await;
        let provider = provider_with_timeout(&mock_server.uri(), 1);

        let result = provider.fetch_table().await;
        match result {
            Err(FeedError::Transport(message)) => assert!(message.contains("Request error")),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
