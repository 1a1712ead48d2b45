/// Endpoints and timing knobs for the routing layer.
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Routing service endpoint (GET, query-string parameters).
    pub route_url: String,

    /// Price feed endpoint answering with a single JSON number: the USD
    /// price of the wrapped native asset.
    pub price_url: String,

    /// Upper bound on how long the routing service may spend assembling a
    /// route before answering with whatever it has.
    pub max_wait_ms: u64,
}

impl RouterConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            route_url: std::env::var("ROUTER_URL").unwrap_or(defaults.route_url),
            price_url: std::env::var("PRICE_URL").unwrap_or(defaults.price_url),
            max_wait_ms: defaults.max_wait_ms,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            route_url: "https://router.intear.tech/route".to_string(),
            price_url: "https://prices.intear.tech/price?token_id=wrap.near".to_string(),
            max_wait_ms: crate::types::MAX_WAIT_MS,
        }
    }
}
