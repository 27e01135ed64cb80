use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::config::SlideshowConfig;

const BLOCK_TAGS: &str = "h1, h2, h3, p, li";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

pub async fn fetch_page_blocks(url: &str, config: &SlideshowConfig) -> anyhow::Result<Vec<String>> {
    let client = reqwest::Client::builder()
        .timeout(config.fetch_timeout)
        .user_agent(config.user_agent)
        .build()?;
    fetch_blocks(&client, url, config.min_block_chars).await
}

async fn fetch_blocks(client: &reqwest::Client, url: &str, min_chars: usize) -> anyhow::Result<Vec<String>> {
    info!("Fetching {}", url);
    let html = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?
        .error_for_status()?
        .text()
        .await?;
    debug!("Fetched {} bytes of HTML", html.len());

    let blocks = extract_blocks(&html, min_chars)?;
    info!("Extracted {} text blocks", blocks.len());
    Ok(blocks)
}

/// Pulls heading, paragraph and list item text out of `html` in document order.
///
/// Nested matches (a `p` inside an `li`) are each reported, the outer one
/// carrying the inner text as well.
pub fn extract_blocks(html: &str, min_chars: usize) -> anyhow::Result<Vec<String>> {
    let selector = Selector::parse(BLOCK_TAGS)
        .map_err(|e| anyhow::anyhow!("invalid block selector: {}", e))?;
    let document = Html::parse_document(html);

    let mut blocks = Vec::new();
    for element in document.select(&selector) {
        let joined = element
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let text = WHITESPACE.replace_all(&joined, " ").into_owned();
        if text.chars().count() > min_chars {
            blocks.push(text);
        } else if !text.is_empty() {
            debug!("Skipping short block: {}", text);
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const LONG: &str = "This paragraph is comfortably longer than forty characters.";

    #[test]
    fn keeps_only_block_tags_in_order() {
        let html = format!(
            "<html><body><h1>{LONG} one</h1><div>{LONG} div</div><p>{LONG} two</p>\
             <ul><li>{LONG} three</li></ul><h4>{LONG} h4</h4><h3>{LONG} four</h3></body></html>"
        );
        let blocks = extract_blocks(&html, 40).unwrap();
        assert_eq!(
            blocks,
            vec![
                format!("{LONG} one"),
                format!("{LONG} two"),
                format!("{LONG} three"),
                format!("{LONG} four"),
            ]
        );
    }

    #[test]
    fn drops_blocks_at_or_below_threshold() {
        let exactly_forty = "a".repeat(40);
        let forty_one = "b".repeat(41);
        let html = format!("<p>{exactly_forty}</p><p>short</p><p>{forty_one}</p><p></p>");
        let blocks = extract_blocks(&html, 40).unwrap();
        assert_eq!(blocks, vec![forty_one]);
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // 21 two-byte characters: 42 bytes but only 21 chars.
        let html = format!("<p>{}</p>", "é".repeat(21));
        assert!(extract_blocks(&html, 40).unwrap().is_empty());
    }

    #[test]
    fn joins_inline_children_and_collapses_whitespace() {
        let html = "<p>  Privacy   <b>preserving</b>\n\n computation\tlets <a href='#'>you</a> compute on encrypted data </p>";
        let blocks = extract_blocks(html, 40).unwrap();
        assert_eq!(
            blocks,
            vec!["Privacy preserving computation lets you compute on encrypted data"]
        );
    }

    #[test]
    fn nested_matches_are_both_reported() {
        let html = format!("<ul><li><p>{LONG}</p></li></ul>");
        let blocks = extract_blocks(&html, 40).unwrap();
        assert_eq!(blocks, vec![LONG.to_string(), LONG.to_string()]);
    }

    #[test]
    fn page_without_text_yields_nothing() {
        assert!(extract_blocks("<html><body></body></html>", 40).unwrap().is_empty());
    }

    /// Answers a single HTTP request with `response` and returns the page URL.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/blog", addr)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn local_client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn fetch_returns_blocks_from_page() {
        let body = format!("<html><body><h2>{LONG}</h2><p>short</p></body></html>");
        let url = serve_once(http_response("200 OK", &body)).await;

        let blocks = fetch_blocks(&local_client(), &url, 40).await.unwrap();
        assert_eq!(blocks, vec![LONG.to_string()]);
    }

    #[tokio::test]
    async fn server_error_status_is_fatal() {
        let url = serve_once(http_response("500 Internal Server Error", "oops")).await;

        let err = fetch_blocks(&local_client(), &url, 40).await.unwrap_err();
        assert!(format!("{:#}", err).contains("500"));
    }

    #[tokio::test]
    async fn unreachable_host_is_fatal() {
        // Bind then drop, so nothing is listening on the port.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let url = format!("http://{}/blog", addr);

        let result = fetch_page_blocks(&url, &SlideshowConfig::default()).await;
        assert!(result.is_err());
    }
}
