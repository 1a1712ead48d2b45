use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::types::{RouteQuote, RouteRequest};

#[derive(Clone)]
pub struct RouterClient {
    http: Client,
    config: RouterConfig,
}

impl RouterClient {
    pub fn new(config: RouterConfig) -> Result<Self, RouterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, config })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Ask the routing service for the best route.
    ///
    /// `Ok(None)` means the service answered with an empty candidate list,
    /// which is a valid outcome, not an error.
    #[instrument(
        skip(self, request),
        fields(token_in = %request.token_in, token_out = %request.token_out),
        level = "debug"
    )]
    pub async fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> Result<Option<RouteQuote>, RouterError> {
        let resp = self
            .http
            .get(&self.config.route_url)
            .query(&request.query())
            .send()
            .await?
            .error_for_status()?;

        let mut routes: Vec<RouteQuote> = resp.json().await?;

        if routes.is_empty() {
            debug!("routing service returned no routes");
            return Ok(None);
        }

        // Index 0 is the service's best candidate; no client-side ranking.
        let best = routes.swap_remove(0);

        debug!(
            dex_id = %best.dex_id,
            needs_unwrap = best.needs_unwrap,
            instructions = best.execution_instructions.len(),
            "route fetched"
        );

        Ok(Some(best))
    }
}
