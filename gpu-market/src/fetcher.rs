use crate::types::{FetchConfig, FetchResult, MarketError, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::{Client, Response};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetches a feed document. Never returns `Err` for network or HTTP
    /// failures; those are reported through `FetchResult::success`.
    pub async fn fetch_feed(&self, url: &str) -> Result<FetchResult> {
        let start_time = Instant::now();

        debug!("Fetching feed: {}", url);

        Url::parse(url)?;

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;
        let mut last_status = None;

        for attempt in 0..=self.config.max_retries {
            match self.send(url).await {
                Ok(response) => {
                    let response_time = start_time.elapsed().as_millis() as u64;
                    let status = response.status();
                    last_status = Some(status.as_u16());

                    if !status.is_success() {
                        last_error = Some(MarketError::General(format!(
                            "HTTP {}: {}",
                            status,
                            status.canonical_reason().unwrap_or("Unknown")
                        )));

                        // Client errors will not fix themselves
                        if status.is_server_error() && attempt < self.config.max_retries {
                            if let Some(delay) = backoff.next_backoff() {
                                warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                                tokio::time::sleep(delay).await;
                                continue;
                            }
                        }
                        break;
                    }

                    let max_bytes = self.config.max_feed_size_mb * 1024 * 1024;
                    if let Some(content_length) = response.content_length() {
                        if content_length as usize > max_bytes {
                            warn!("Feed too large: {} ({} bytes)", url, content_length);
                            return Ok(FetchResult::failed(
                                url,
                                format!("Feed too large: {} bytes", content_length),
                                response_time,
                                Some(status.as_u16()),
                            ));
                        }
                    }

                    // Chunked bodies carry no length, so the cap is enforced while reading
                    match Self::read_capped(response, max_bytes).await {
                        Ok(Some(content)) => {
                            info!("Fetched feed: {} ({} bytes)", url, content.len());
                            return Ok(FetchResult {
                                url: url.to_string(),
                                success: true,
                                error: None,
                                response_time_ms: response_time,
                                http_status: Some(status.as_u16()),
                                content: Some(content),
                            });
                        }
                        Ok(None) => {
                            warn!("Feed too large: {} (over {}MB)", url, self.config.max_feed_size_mb);
                            return Ok(FetchResult::failed(
                                url,
                                format!("Feed too large: over {}MB", self.config.max_feed_size_mb),
                                start_time.elapsed().as_millis() as u64,
                                Some(status.as_u16()),
                            ));
                        }
                        Err(e) => {
                            last_error = Some(e);

                            if attempt < self.config.max_retries {
                                if let Some(delay) = backoff.next_backoff() {
                                    warn!("Reading {} failed, retrying in {:?}", url, delay);
                                    tokio::time::sleep(delay).await;
                                    continue;
                                }
                            }
                            break;
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(e);

                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                }
            }
        }

        let error_msg = last_error.map(|e| e.to_string()).unwrap_or_else(|| "Unknown error".to_string());
        error!("Failed to fetch feed {}: {}", url, error_msg);

        Ok(FetchResult::failed(
            url,
            error_msg,
            start_time.elapsed().as_millis() as u64,
            last_status,
        ))
    }

    /// Reads the body, giving up with `None` once it grows past `max_bytes`.
    async fn read_capped(mut response: Response, max_bytes: usize) -> Result<Option<String>> {
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > max_bytes {
                return Ok(None);
            }
            body.extend_from_slice(&chunk);
        }

        Ok(Some(String::from_utf8_lossy(&body).into_owned()))
    }

    async fn send(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        Ok(response)
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
