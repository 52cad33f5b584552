use gpu_market::{FeedSource, FetchConfig, Fetcher, Result, RssFeedSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::info;

const TINY_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Lambda Blog</title><link>https://lambdalabs.com/blog</link><description>d</description>
<item><title>Cheaper H100 hours</title><link>https://lambdalabs.com/blog/h100</link></item>
</channel></rss>"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
}

fn test_config() -> FetchConfig {
    FetchConfig {
        user_agent: "GPU-Market-Test/1.0".to_string(),
        timeout_seconds: 5,
        max_retries: 0,
        retry_delay_seconds: 0,
        max_feed_size_mb: 1,
        max_redirects: 5,
    }
}

/// Answers a single request with `status` and a chunked body made of
/// `chunks`, then closes. Returns the URL to request.
async fn serve_chunked(status: &'static str, chunks: Vec<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
    let addr = listener.local_addr().expect("local address");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/rss+xml\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
            status
        );
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        for chunk in chunks {
            let frame = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
            // The client hangs up early on oversized bodies
            if socket.write_all(frame.as_bytes()).await.is_err() {
                return;
            }
        }
        let _ = socket.write_all(b"0\r\n\r\n").await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/feed", addr)
}

#[tokio::test]
async fn test_chunked_feed_is_read() -> Result<()> {
    init_tracing();

    let (head, tail) = TINY_RSS.split_at(TINY_RSS.len() / 2);
    let url = serve_chunked("200 OK", vec![head.to_string(), tail.to_string()]).await;

    let result = Fetcher::new(test_config())?.fetch_feed(&url).await?;
    info!("Fetched {} in {}ms", url, result.response_time_ms);

    assert!(result.success);
    assert_eq!(result.http_status, Some(200));
    assert_eq!(result.content.as_deref(), Some(TINY_RSS));
    Ok(())
}

#[tokio::test]
async fn test_chunked_body_over_cap_is_rejected() -> Result<()> {
    init_tracing();

    // 2 x 700KB without a Content-Length, against a 1MB cap
    let chunks = vec!["x".repeat(700 * 1024), "x".repeat(700 * 1024)];
    let url = serve_chunked("200 OK", chunks).await;

    let result = Fetcher::new(test_config())?.fetch_feed(&url).await?;

    assert!(!result.success);
    assert!(result.content.is_none());
    assert!(result.error.unwrap_or_default().contains("too large"));
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_reported_not_raised() -> Result<()> {
    init_tracing();

    let url = serve_chunked("500 Internal Server Error", Vec::new()).await;
    let result = Fetcher::new(test_config())?.fetch_feed(&url).await?;

    assert!(!result.success);
    assert_eq!(result.http_status, Some(500));
    assert!(result.error.unwrap_or_default().contains("500"));
    Ok(())
}

#[tokio::test]
async fn test_rss_source_reads_served_feed() -> Result<()> {
    init_tracing();

    let url = serve_chunked("200 OK", vec![TINY_RSS.to_string()]).await;
    let entries = RssFeedSource::new(test_config())?.fetch_feed(&url).await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Cheaper H100 hours");
    assert_eq!(entries[0].link, "https://lambdalabs.com/blog/h100");
    Ok(())
}
