use std::time::Duration;

use quick_xml::de::DeError;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::FetchError;

/// One `<item>` as it appears in the feed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub guid: String,
    /// Publication date exactly as written in `<pubDate>`
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    guid: Guid,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
}

// `<guid isPermaLink="false">` carries attributes, so read the text node only
#[derive(Debug, Default, Deserialize)]
struct Guid {
    #[serde(rename = "$text", default)]
    value: String,
}

impl From<Item> for RawEntry {
    fn from(item: Item) -> Self {
        Self {
            title: item.title,
            guid: item.guid.value,
            pub_date: item.pub_date,
        }
    }
}

/// Parse an RSS document into its channel items, in document order.
pub fn parse_channel(bytes: &[u8]) -> Result<Vec<RawEntry>, DeError> {
    let rss: Rss = quick_xml::de::from_reader(bytes)?;
    Ok(rss.channel.items.into_iter().map(RawEntry::from).collect())
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("BountyTrends/0.1 (RSS Trend Tracker)")
            .build()?;

        Ok(Self { client })
    }

    /// Retrieve and parse one feed. A single attempt is made; there are no retries.
    pub async fn fetch(&self, feed: &FeedConfig) -> Result<Vec<RawEntry>, FetchError> {
        info!("Fetching feed: {} ({})", feed.display_name(), feed.url);

        let response = self
            .client
            .get(&feed.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: feed.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: feed.url.clone(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(|source| FetchError::Body {
            url: feed.url.clone(),
            source,
        })?;
        debug!(url = %feed.url, bytes = bytes.len(), "Received feed body");

        parse_channel(&bytes).map_err(|source| FetchError::Parse {
            url: feed.url.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_channel_tests {
        use super::*;

        #[test]
        fn test_parse_items_in_order() {
            let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
                <rss version="2.0">
                    <channel>
                        <title>Tech News</title>
                        <link>https://technews.example.com</link>
                        <item>
                            <title>Breaking: New Technology Announced</title>
                            <link>https://technews.example.com/article/1</link>
                            <guid>https://technews.example.com/article/1</guid>
                            <pubDate>Mon, 09 Dec 2024 12:00:00 GMT</pubDate>
                        </item>
                        <item>
                            <title>Review: Latest Gadget</title>
                            <guid>https://technews.example.com/article/2</guid>
                            <pubDate>Mon, 09 Dec 2024 10:00:00 GMT</pubDate>
                        </item>
                    </channel>
                </rss>
            "#;

            let entries = parse_channel(xml.as_bytes()).unwrap();

            assert_eq!(entries.len(), 2);
            assert_eq!(
                entries[0],
                RawEntry {
                    title: "Breaking: New Technology Announced".to_string(),
                    guid: "https://technews.example.com/article/1".to_string(),
                    pub_date: "Mon, 09 Dec 2024 12:00:00 GMT".to_string(),
                }
            );
            assert_eq!(entries[1].title, "Review: Latest Gadget");
        }

        #[test]
        fn test_guid_with_attributes() {
            let xml = r#"
                <rss>
                    <channel>
                        <item>
                            <title>Medium post</title>
                            <guid isPermaLink="false">https://medium.com/p/abc123</guid>
                            <pubDate>Tue, 10 Dec 2024 08:30:00 GMT</pubDate>
                        </item>
                    </channel>
                </rss>
            "#;

            let entries = parse_channel(xml.as_bytes()).unwrap();
            assert_eq!(entries[0].guid, "https://medium.com/p/abc123");
        }

        #[test]
        fn test_cdata_title() {
            let xml = r#"
                <rss>
                    <channel>
                        <item>
                            <title><![CDATA[XSS | the <easy> way]]></title>
                            <guid>g1</guid>
                        </item>
                    </channel>
                </rss>
            "#;

            let entries = parse_channel(xml.as_bytes()).unwrap();
            assert_eq!(entries[0].title, "XSS | the <easy> way");
        }

        #[test]
        fn test_missing_fields_are_empty() {
            let xml = r#"
                <rss>
                    <channel>
                        <item>
                            <guid>only-a-guid</guid>
                        </item>
                    </channel>
                </rss>
            "#;

            let entries = parse_channel(xml.as_bytes()).unwrap();
            assert_eq!(entries[0].guid, "only-a-guid");
            assert_eq!(entries[0].title, "");
            assert_eq!(entries[0].pub_date, "");
        }

        #[test]
        fn test_empty_channel() {
            let xml = r#"
                <rss>
                    <channel>
                        <title>Empty Feed</title>
                    </channel>
                </rss>
            "#;

            let entries = parse_channel(xml.as_bytes()).unwrap();
            assert!(entries.is_empty());
        }

        #[test]
        fn test_missing_channel_is_error() {
            let html = "<html><body>Not a feed</body></html>";
            assert!(parse_channel(html.as_bytes()).is_err());
        }

        #[test]
        fn test_empty_body_is_error() {
            assert!(parse_channel(b"").is_err());
        }
    }
}
