use std::sync::Arc;

use crate::cache::SharedCache;
use crate::llm_client::TextGenerator;
use crate::resources::VideoSearch;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external collaborator sits behind a trait object so tests can swap it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Shared ephemeral cache: Redis when configured, in-process otherwise.
    pub cache: Arc<dyn SharedCache>,
    /// Generation capability. Fails every call when no API key was configured.
    pub llm: Arc<dyn TextGenerator>,
    pub videos: Arc<dyn VideoSearch>,
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(
        store: Arc<dyn Store>,
        llm: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            store,
            cache: Arc::new(crate::cache::MemoryCache::new()),
            llm,
            videos: Arc::new(crate::testing::FixedVideoSearch::default()),
        }
    }
}
