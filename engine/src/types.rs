//! Events and small abstraction traits used by the synchronizer.

use async_trait::async_trait;

use router::RouterClient;
use router::error::RouterError;
use router::types::{RouteQuote, RouteRequest};
use units::token::{Side, Token};

/// Seam over the routing service so the synchronizer can be driven with a
/// test double.
#[async_trait]
pub trait RouteFetcher: Send + Sync + 'static {
    async fn fetch_route(&self, request: &RouteRequest)
    -> Result<Option<RouteQuote>, RouterError>;
}

#[async_trait]
impl RouteFetcher for RouterClient {
    async fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> Result<Option<RouteQuote>, RouterError> {
        RouterClient::fetch_route(self, request).await
    }
}

/// Where the synchronizer sits between user edits and fetch completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request outstanding.
    Idle,
    /// A fetch for the current generation is in flight.
    Fetching,
    /// A single debounced follow-up fetch is queued.
    RetryScheduled,
}

/// Result of one route fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Quote(Box<RouteQuote>),
    /// The service answered, but with no candidates.
    NoRoute,
    /// Transport or HTTP failure.
    Failed(RouterError),
}

/// Everything that can happen to the swap panel state. User-driven events
/// come from the owner; `FetchSettled` and `RetryElapsed` are reported by
/// spawned tasks through the owner's event channel.
#[derive(Debug)]
pub enum SwapEvent {
    AmountEdited { side: Side, value: String },
    TokenChanged { side: Side, token: Token },
    SwitchTokens,
    SlippageCommitted(f64),
    RefreshRequested,
    FetchSettled { generation: u64, outcome: FetchOutcome },
    RetryElapsed { generation: u64 },
}
