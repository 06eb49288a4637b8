// Mock implementations of the kernel traits for testing
//
// Each mock records how it was called so tests can assert on interactions
// (e.g. that the model was never called for empty content).

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseAI, BasePageFetcher, BaseWebSearcher, CompletionRequest, SearchResult};

// =============================================================================
// Mock Web Searcher
// =============================================================================

#[derive(Clone, Default)]
pub struct MockWebSearcher {
    results: Arc<Mutex<Vec<SearchResult>>>,
    error: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockWebSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these results for every query
    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        *self.results.lock().unwrap() = results;
        self
    }

    /// Convenience: one result per URL, titled by position
    pub fn with_urls(self, urls: &[&str]) -> Self {
        let results = urls
            .iter()
            .enumerate()
            .map(|(i, url)| SearchResult::new(format!("Result {}", i + 1), *url))
            .collect();
        self.with_results(results)
    }

    /// Fail every search with this message
    pub fn failing(self, message: &str) -> Self {
        *self.error.lock().unwrap() = Some(message.to_string());
        self
    }

    /// Get all (query, num) pairs searched
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseWebSearcher for MockWebSearcher {
    async fn search(&self, query: &str, num: usize) -> Result<Vec<SearchResult>> {
        self.calls.lock().unwrap().push((query.to_string(), num));

        if let Some(message) = self.error.lock().unwrap().clone() {
            anyhow::bail!(message);
        }
        Ok(self.results.lock().unwrap().clone())
    }
}

// =============================================================================
// Mock Page Fetcher
// =============================================================================

#[derive(Clone, Default)]
pub struct MockPageFetcher {
    pages: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`; unknown URLs fail like a 404
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), html.to_string());
        self
    }

    /// Get all URLs fetched, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BasePageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        match self.pages.lock().unwrap().get(url) {
            Some(html) => Ok(html.clone()),
            None => anyhow::bail!("HTTP 404 Not Found for {}", url),
        }
    }
}

// =============================================================================
// Mock AI
// =============================================================================

#[derive(Clone)]
enum MockAIBehavior {
    Respond(String),
    Fail(String),
    Panic,
}

#[derive(Clone)]
pub struct MockAI {
    behavior: MockAIBehavior,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockAI {
    /// Answer every completion with `text`
    pub fn responding(text: &str) -> Self {
        Self::with_behavior(MockAIBehavior::Respond(text.to_string()))
    }

    /// Fail every completion with `message`
    pub fn failing(message: &str) -> Self {
        Self::with_behavior(MockAIBehavior::Fail(message.to_string()))
    }

    /// Panic inside `complete`, for exercising the pipeline's catch-all
    pub fn panicking() -> Self {
        Self::with_behavior(MockAIBehavior::Panic)
    }

    fn with_behavior(behavior: MockAIBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);

        match &self.behavior {
            MockAIBehavior::Respond(text) => Ok(text.clone()),
            MockAIBehavior::Fail(message) => anyhow::bail!("{}", message),
            MockAIBehavior::Panic => panic!("mock model exploded"),
        }
    }
}
