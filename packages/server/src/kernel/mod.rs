//! Kernel module - server infrastructure and dependencies.

pub mod ai;
pub mod deps;
pub mod page_fetcher;
pub mod serpapi_client;
pub mod test_dependencies;
pub mod traits;

pub use ai::OpenAIAdapter;
pub use deps::ServerDeps;
pub use page_fetcher::{HttpPageFetcher, BROWSER_USER_AGENT};
pub use serpapi_client::SerpApiClient;
pub use test_dependencies::{MockAI, MockPageFetcher, MockWebSearcher};
pub use traits::*;
