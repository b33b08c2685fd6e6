//! Video-resource lookup for internships.
//!
//! Never fails: a missing key, timeout, non-200 response or empty result all
//! degrade to a single search-results link built from the term.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Url};
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::internship::ResourceLink;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const YOUTUBE_RESULTS_URL: &str = "https://www.youtube.com/results";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);
const MAX_RESULTS: &str = "3";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, term: &str) -> Vec<ResourceLink>;
}

/// The link returned whenever a real lookup is not possible.
pub fn fallback_links(term: &str) -> Vec<ResourceLink> {
    let url = Url::parse_with_params(YOUTUBE_RESULTS_URL, &[("search_query", term)])
        .map(String::from)
        .unwrap_or_else(|_| YOUTUBE_RESULTS_URL.to_string());
    vec![ResourceLink {
        title: format!("Watch Tutorial: {term}"),
        url,
    }]
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

impl SearchResponse {
    fn into_links(self) -> Vec<ResourceLink> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let title = item
                    .snippet
                    .map(|s| s.title)
                    .unwrap_or_else(|| "Tutorial".to_string());
                let url = Url::parse_with_params(YOUTUBE_WATCH_URL, &[("v", video_id.as_str())])
                    .ok()?
                    .to_string();
                Some(ResourceLink { title, url })
            })
            .collect()
    }
}

/// YouTube Data API search client.
#[derive(Clone)]
pub struct YoutubeClient {
    client: Client,
    api_key: Option<String>,
}

impl YoutubeClient {
    pub fn new(api_key: Option<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(LOOKUP_TIMEOUT).build()?,
            api_key,
        })
    }

    /// The key travels in a header so request URLs stay safe to log.
    fn search_request(&self, api_key: &str, term: &str) -> Result<Request, reqwest::Error> {
        self.client
            .get(YOUTUBE_SEARCH_URL)
            .header(API_KEY_HEADER, api_key)
            .query(&[
                ("part", "snippet"),
                ("maxResults", MAX_RESULTS),
                ("type", "video"),
                ("q", term),
            ])
            .build()
    }

    async fn lookup(&self, api_key: &str, term: &str) -> Result<Vec<ResourceLink>, reqwest::Error> {
        let request = self.search_request(api_key, term)?;
        let response = self.client.execute(request).await?.error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(body.into_links())
    }
}

#[async_trait]
impl VideoSearch for YoutubeClient {
    async fn search(&self, term: &str) -> Vec<ResourceLink> {
        let Some(api_key) = self.api_key.as_deref() else {
            return fallback_links(term);
        };

        match self.lookup(api_key, term).await {
            Ok(links) if !links.is_empty() => {
                info!("Found {} videos for '{term}'", links.len());
                links
            }
            Ok(_) => fallback_links(term),
            Err(e) => {
                warn!(
                    "Video lookup for '{term}' failed, using fallback link: {}",
                    e.without_url()
                );
                fallback_links(term)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_link_encodes_term() {
        let links = fallback_links("rust async tutorial");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "Watch Tutorial: rust async tutorial");
        assert_eq!(
            links[0].url,
            "https://www.youtube.com/results?search_query=rust+async+tutorial"
        );
    }

    #[test]
    fn test_search_response_keeps_only_videos() {
        let json = r#"{
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "abc123"}, "snippet": {"title": "Intro"}},
                {"id": {"kind": "youtube#channel", "channelId": "xyz"}, "snippet": {"title": "Channel"}}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let links = parsed.into_links();
        assert_eq!(
            links,
            vec![ResourceLink {
                title: "Intro".into(),
                url: "https://www.youtube.com/watch?v=abc123".into()
            }]
        );
    }

    #[test]
    fn test_api_key_stays_out_of_url() {
        let client = YoutubeClient::new(Some("SECRETKEY123".into())).unwrap();
        let request = client.search_request("SECRETKEY123", "rust tutorial").unwrap();
        assert!(!request.url().as_str().contains("SECRETKEY123"));
        assert!(request.url().as_str().contains("q=rust+tutorial"));
        assert_eq!(request.headers()[API_KEY_HEADER], "SECRETKEY123");
    }

    #[tokio::test]
    async fn test_missing_key_returns_fallback() {
        let client = YoutubeClient::new(None).unwrap();
        let links = client.search("sql tutorial").await;
        assert_eq!(links, fallback_links("sql tutorial"));
    }
}
