//! Orchestrates search → extract → synthesize for one query.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

use openai_client::OpenAIClient;

use super::extraction::extract;
use super::retrieval::retrieve;
use super::stage::{DegradeReason, GenerationError, StageResult};
use super::synthesis::synthesize;
use super::types::{FlashcardCandidate, PipelinePolicy};
use crate::config::Config;
use crate::kernel::{
    BaseAI, BasePageFetcher, BaseWebSearcher, HttpPageFetcher, OpenAIAdapter, SerpApiClient,
};

pub struct FlashcardPipeline {
    searcher: Arc<dyn BaseWebSearcher>,
    fetcher: Arc<dyn BasePageFetcher>,
    ai: Arc<dyn BaseAI>,
    policy: PipelinePolicy,
}

impl FlashcardPipeline {
    pub fn new(
        searcher: Arc<dyn BaseWebSearcher>,
        fetcher: Arc<dyn BasePageFetcher>,
        ai: Arc<dyn BaseAI>,
        policy: PipelinePolicy,
    ) -> Self {
        Self {
            searcher,
            fetcher,
            ai,
            policy,
        }
    }

    /// Wire the production providers. Fails without touching the network when
    /// either API key is absent.
    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        let openai_key = config
            .openai_api_key
            .clone()
            .ok_or(GenerationError::NotConfigured("OPENAI_API_KEY"))?;
        let serpapi_key = config
            .serpapi_key
            .clone()
            .ok_or(GenerationError::NotConfigured("SERPAPI_KEY"))?;

        let policy = PipelinePolicy {
            model: config.openai_model.clone(),
            ..PipelinePolicy::default()
        };

        let searcher = SerpApiClient::new(serpapi_key)
            .map_err(|e| GenerationError::ClientSetup(format!("{:#}", e)))?;
        let fetcher = HttpPageFetcher::new(policy.fetch_timeout)
            .map_err(|e| GenerationError::ClientSetup(format!("{:#}", e)))?;
        let ai = OpenAIAdapter::new(OpenAIClient::new(openai_key));

        Ok(Self::new(
            Arc::new(searcher),
            Arc::new(fetcher),
            Arc::new(ai),
            policy,
        ))
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    /// Generate up to `count` flashcards for `query`.
    ///
    /// Operational failures of any stage, panics included, end in an empty or
    /// partial list rather than an error.
    pub async fn run(&self, query: &str, count: usize) -> Vec<FlashcardCandidate> {
        let count = count.min(self.policy.max_flashcards);
        if count == 0 {
            return Vec::new();
        }

        match AssertUnwindSafe(self.run_stages(query, count))
            .catch_unwind()
            .await
        {
            Ok(cards) => cards,
            Err(payload) => {
                let reason = DegradeReason::Panicked(panic_message(payload.as_ref()));
                error!(query = %query, reason = %reason, "Flashcard generation aborted");
                Vec::new()
            }
        }
    }

    async fn run_stages(&self, query: &str, count: usize) -> Vec<FlashcardCandidate> {
        info!(query = %query, count, "Generating flashcards");

        let results = log_stage(
            query,
            retrieve(self.searcher.as_ref(), query, self.policy.result_limit).await,
        );
        let content = log_stage(
            query,
            extract(
                self.fetcher.as_ref(),
                &results,
                self.policy.page_char_budget,
            )
            .await,
        );
        let cards = log_stage(
            query,
            synthesize(self.ai.as_ref(), &content, query, count, &self.policy).await,
        );

        info!(query = %query, flashcards = cards.len(), "Flashcard generation finished");
        cards
    }
}

fn log_stage<T: Default>(query: &str, outcome: StageResult<T>) -> T {
    if let StageResult::Degraded { stage, reason } = &outcome {
        warn!(query = %query, stage = %stage, reason = %reason, "Stage degraded");
    }
    outcome.into_payload()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockAI, MockPageFetcher, MockWebSearcher};

    const CARDS: &str = r#"[
        {"question": "Q1", "answer": "A1"},
        {"question": "Q2", "answer": "A2"},
        {"question": "Q3", "answer": "A3"}
    ]"#;

    fn pipeline(
        searcher: MockWebSearcher,
        fetcher: MockPageFetcher,
        ai: MockAI,
    ) -> FlashcardPipeline {
        FlashcardPipeline::new(
            Arc::new(searcher),
            Arc::new(fetcher),
            Arc::new(ai),
            PipelinePolicy::default(),
        )
    }

    fn test_config(openai: Option<&str>, serpapi: Option<&str>) -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            port: 8000,
            jwt_secret: "secret".to_string(),
            jwt_issuer: "flashcards-api".to_string(),
            access_token_expire_minutes: 30,
            openai_api_key: openai.map(String::from),
            serpapi_key: serpapi.map(String::from),
            openai_model: "gpt-3.5-turbo".to_string(),
            allowed_origins: vec![],
        }
    }

    #[tokio::test]
    async fn test_happy_path_bounded_by_count() {
        let searcher = MockWebSearcher::new().with_urls(&["https://a.example", "https://b.example"]);
        let fetcher = MockPageFetcher::new()
            .with_page("https://a.example", "<p>Tides rise.</p>")
            .with_page("https://b.example", "<p>Tides fall.</p>");
        let ai = MockAI::responding(CARDS);

        let cards = pipeline(searcher.clone(), fetcher, ai.clone())
            .run("tides", 2)
            .await;

        assert_eq!(cards.len(), 2);
        assert_eq!(searcher.calls(), vec![("tides".to_string(), 5)]);
        assert!(ai.calls()[0].user.contains("Tides rise. Tides fall."));
    }

    #[tokio::test]
    async fn test_all_stages_failing_yields_empty() {
        let ai = MockAI::responding(CARDS);

        let cards = pipeline(
            MockWebSearcher::new().failing("invalid api key"),
            MockPageFetcher::new(),
            ai.clone(),
        )
        .run("tides", 5)
        .await;

        assert!(cards.is_empty());
        // No content means the model is never asked
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_pages_skip_the_model() {
        let ai = MockAI::responding(CARDS);

        let cards = pipeline(
            MockWebSearcher::new().with_urls(&["https://down.example"]),
            MockPageFetcher::new(),
            ai.clone(),
        )
        .run("tides", 5)
        .await;

        assert!(cards.is_empty());
        assert_eq!(ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let cards = pipeline(
            MockWebSearcher::new().with_urls(&["https://a.example"]),
            MockPageFetcher::new().with_page("https://a.example", "<p>content</p>"),
            MockAI::panicking(),
        )
        .run("tides", 5)
        .await;

        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_count_is_capped_by_policy() {
        let many: String = format!(
            "[{}]",
            (0..30)
                .map(|i| format!(r#"{{"question":"Q{i}","answer":"A{i}"}}"#))
                .collect::<Vec<_>>()
                .join(",")
        );
        let cards = pipeline(
            MockWebSearcher::new().with_urls(&["https://a.example"]),
            MockPageFetcher::new().with_page("https://a.example", "<p>content</p>"),
            MockAI::responding(&many),
        )
        .run("tides", 50)
        .await;

        assert_eq!(cards.len(), 20);
    }

    #[test]
    fn test_from_config_names_missing_key() {
        let missing_openai = FlashcardPipeline::from_config(&test_config(None, Some("serp")));
        assert_eq!(
            missing_openai.err(),
            Some(GenerationError::NotConfigured("OPENAI_API_KEY"))
        );

        let missing_serpapi = FlashcardPipeline::from_config(&test_config(Some("sk"), None));
        assert_eq!(
            missing_serpapi.err(),
            Some(GenerationError::NotConfigured("SERPAPI_KEY"))
        );
    }

    #[test]
    fn test_from_config_uses_configured_model() {
        let mut config = test_config(Some("sk"), Some("serp"));
        config.openai_model = "gpt-4o-mini".to_string();

        let pipeline = FlashcardPipeline::from_config(&config).unwrap();

        assert_eq!(pipeline.policy().model, "gpt-4o-mini");
    }
}
