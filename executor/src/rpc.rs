//! Read-only NEAR JSON-RPC client for balance queries.
//!
//! Queries fail over across an ordered endpoint list; the last endpoint's
//! error is returned only after every endpoint has been tried.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::types::{BalanceError, BalanceReader};

/// Ordered JSON-RPC endpoints, primary first.
pub const RPC_ENDPOINTS: &[&str] = &[
    "https://rpc.intea.rs/",
    "https://rpc.mainnet.fastnear.com/",
    "https://rpc.web4.near.page/",
];

#[derive(Clone)]
pub struct NearRpcClient {
    http: Client,
    endpoints: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RpcEnvelope<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// `call_function` answers with the raw bytes the contract returned.
#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    result: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ViewAccountResult {
    amount: String,
}

impl NearRpcClient {
    pub fn new() -> Result<Self, BalanceError> {
        Self::with_endpoints(RPC_ENDPOINTS.iter().map(|s| s.to_string()).collect())
    }

    pub fn with_endpoints(endpoints: Vec<String>) -> Result<Self, BalanceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { http, endpoints })
    }

    async fn query<T: DeserializeOwned>(
        &self,
        params: serde_json::Value,
    ) -> Result<T, BalanceError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": "query",
            "params": params,
        });

        let mut last_err = None;
        for endpoint in &self.endpoints {
            match self.try_query(endpoint, &body).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!(endpoint = %endpoint, error = %err, "rpc endpoint failed, trying next");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or(BalanceError::NoEndpoints))
    }

    async fn try_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, BalanceError> {
        let resp = self
            .http
            .post(endpoint)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        let envelope: RpcEnvelope<T> = resp.json().await?;

        if let Some(error) = envelope.error {
            return Err(BalanceError::Rpc {
                endpoint: endpoint.to_owned(),
                message: error.to_string(),
            });
        }

        envelope
            .result
            .ok_or_else(|| BalanceError::Malformed("response carried no result".into()))
    }
}

#[async_trait]
impl BalanceReader for NearRpcClient {
    async fn ft_balance(
        &self,
        contract_id: &str,
        account_id: &str,
    ) -> Result<u128, BalanceError> {
        let args = serde_json::json!({ "account_id": account_id });
        let args_base64 = BASE64.encode(args.to_string());

        let result: CallFunctionResult = self
            .query(serde_json::json!({
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract_id,
                "method_name": "ft_balance_of",
                "args_base64": args_base64,
            }))
            .await?;

        // The byte payload is the JSON string `"123"`; decode as UTF-8 and
        // strip the quotes before parsing.
        let text = String::from_utf8(result.result)
            .map_err(|e| BalanceError::Malformed(e.to_string()))?;
        let balance = text
            .trim()
            .trim_matches('"')
            .parse::<u128>()
            .map_err(|e| BalanceError::Malformed(e.to_string()))?;

        debug!(contract = %contract_id, account = %account_id, balance, "ft balance fetched");
        Ok(balance)
    }

    async fn native_balance(&self, account_id: &str) -> Result<u128, BalanceError> {
        let result: ViewAccountResult = self
            .query(serde_json::json!({
                "request_type": "view_account",
                "finality": "final",
                "account_id": account_id,
            }))
            .await?;

        result
            .amount
            .parse::<u128>()
            .map_err(|e| BalanceError::Malformed(e.to_string()))
    }
}
