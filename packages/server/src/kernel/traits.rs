// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The generation pipeline (what to search for, what to prompt) lives in
// domains/generation and talks to the outside world only through these.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseWebSearcher)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// Web Search Trait
// =============================================================================

/// One ranked hit from a web search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
        }
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

#[async_trait]
pub trait BaseWebSearcher: Send + Sync {
    /// Search the web; `num` is a hint, providers may return fewer or more.
    /// Results are in provider rank order.
    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchResult>>;
}

// =============================================================================
// Page Fetch Trait
// =============================================================================

#[async_trait]
pub trait BasePageFetcher: Send + Sync {
    /// Fetch a page body. Non-2xx statuses are errors.
    async fn fetch(&self, url: &str) -> Result<String>;
}

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

/// A single system + user completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text response)
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
