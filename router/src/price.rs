use tracing::debug;

use crate::client::RouterClient;
use crate::error::RouterError;

impl RouterClient {
    /// USD price of the wrapped native asset. The feed answers with a bare
    /// JSON number.
    pub async fn fetch_native_price(&self) -> Result<f64, RouterError> {
        let resp = self
            .http()
            .get(&self.config().price_url)
            .send()
            .await?
            .error_for_status()?;

        let price: f64 = resp.json().await?;

        if !price.is_finite() {
            return Err(RouterError::InvalidResponse);
        }

        debug!(price_usd = price, "native price fetched");
        Ok(price)
    }
}
