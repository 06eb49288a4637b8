use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{BaseWebSearcher, SearchResult};

const SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// SerpAPI client for Google web search
pub struct SerpApiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

/// SerpAPI response (only the parts we read)
#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

/// Individual organic result from SerpAPI
#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl SerpApiClient {
    /// Create a new SerpAPI client
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            base_url: SERPAPI_BASE_URL.to_string(),
            client,
        })
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl BaseWebSearcher for SerpApiClient {
    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchResult>> {
        let num = num.to_string();
        let response = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .context("Failed to send SerpAPI search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("SerpAPI error {}: {}", status, body);
        }

        let serp_response: SerpApiResponse = response
            .json()
            .await
            .context("Failed to parse SerpAPI response")?;

        if let Some(error) = serp_response.error {
            // SerpAPI reports "no results" through the error field as well
            if serp_response.organic_results.is_empty() && !error.contains("hasn't returned any results") {
                anyhow::bail!("SerpAPI error: {}", error);
            }
        }

        let results = serp_response
            .organic_results
            .into_iter()
            .filter_map(|r| {
                let url = r.link.filter(|l| !l.trim().is_empty())?;
                Some(SearchResult {
                    title: r.title,
                    url,
                    snippet: r.snippet,
                })
            })
            .collect();

        Ok(results)
    }
}
