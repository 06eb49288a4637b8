use tracing::{info, warn};

use super::stage::{DegradeReason, Stage, StageResult};
use crate::kernel::{BaseWebSearcher, SearchResult};

/// Ask the search provider for `limit` results and keep at most that many,
/// in provider rank order. Provider failures degrade to an empty list.
pub async fn retrieve(
    searcher: &dyn BaseWebSearcher,
    query: &str,
    limit: usize,
) -> StageResult<Vec<SearchResult>> {
    match searcher.search(query, limit).await {
        Ok(mut results) => {
            results.truncate(limit);
            info!(query = %query, results = results.len(), "Search results retrieved");
            StageResult::Completed(results)
        }
        Err(e) => {
            warn!(query = %query, error = %e, "Web search failed");
            StageResult::degraded(Stage::Retrieval, DegradeReason::Provider(e.to_string()))
        }
    }
}
