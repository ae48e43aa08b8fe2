// src/integrations/volume_search/client.rs
//
// Client for the external book-search provider.
//
// GET {search_url}?q=<query>
// -> { items: [{ id, volumeInfo: { title, authors, infoLink } }] }
//
// A response without `items` is an empty result, not an error.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::config::parse_url;
use crate::domain::VolumeSummary;
use crate::error::AppResult;
use crate::integrations::http::{build_http_client, send_checked};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<VolumeItem>>,
}

#[derive(Debug, Deserialize)]
struct VolumeItem {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(rename = "infoLink", default)]
    info_link: Option<String>,
}

impl From<VolumeItem> for VolumeSummary {
    fn from(item: VolumeItem) -> Self {
        VolumeSummary {
            id: item.id,
            title: item.volume_info.title,
            authors: item.volume_info.authors,
            info_link: item.volume_info.info_link,
        }
    }
}

pub fn parse_search_response(body: &str) -> AppResult<Vec<VolumeSummary>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(VolumeSummary::from)
        .collect())
}

/// Volume search client
pub struct VolumeSearchClient {
    search_url: Url,
    http_client: Client,
}

impl VolumeSearchClient {
    pub fn new(search_url: &str, timeout: Duration) -> AppResult<Self> {
        Ok(Self::with_client(
            parse_url(search_url)?,
            build_http_client(timeout)?,
        ))
    }

    pub fn with_client(search_url: Url, http_client: Client) -> Self {
        Self {
            search_url,
            http_client,
        }
    }

    pub fn query_url(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);
        url
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<VolumeSummary>> {
        let response = send_checked(self.http_client.get(self.query_url(query))).await?;
        parse_search_response(&response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_encodes_query() {
        let client = VolumeSearchClient::new(
            "http://localhost:8080/books/search",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.query_url("dune messiah").as_str(),
            "http://localhost:8080/books/search?q=dune+messiah"
        );
    }

    #[test]
    fn test_parse_items() {
        let body = r#"{
            "kind": "books#volumes",
            "items": [
                {"id": "B1", "volumeInfo": {
                    "title": "Good Omens",
                    "authors": ["Terry Pratchett", "Neil Gaiman"],
                    "infoLink": "https://books.example/B1"}},
                {"id": "B2", "volumeInfo": {"title": "Anonymous Pamphlet"}}
            ]
        }"#;

        let results = parse_search_response(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].byline(), "Terry Pratchett, Neil Gaiman");
        assert_eq!(results[0].info_link.as_deref(), Some("https://books.example/B1"));
        assert!(results[1].authors.is_empty());
        assert!(results[1].info_link.is_none());
    }

    #[test]
    fn test_missing_items_is_empty() {
        assert!(parse_search_response(r#"{"totalItems": 0}"#).unwrap().is_empty());
        assert!(parse_search_response(r#"{"items": null}"#).unwrap().is_empty());
        assert!(parse_search_response(r#"{"items": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(parse_search_response("<html>").is_err());
    }
}
