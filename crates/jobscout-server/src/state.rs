use jobscout_client::{ReqwestFetcher, SelectorParser};
use jobscout_core::Aggregator;

pub type SiteAggregator = Aggregator<ReqwestFetcher, SelectorParser>;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// Aggregator over every configured site; requests narrow it per search.
    pub aggregator: SiteAggregator,
    /// Bearer token for `/v1/*` (None = those endpoints answer 403).
    pub admin_token: Option<String>,
}
