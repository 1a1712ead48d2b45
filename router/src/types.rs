use serde::{Deserialize, Deserializer};
use tracing::warn;

use units::amount::to_base_unit;
use units::token::{Side, Token};

/// Hard cap on how long the routing service may search before answering.
pub const MAX_WAIT_MS: u64 = 1500;

/// Venues whose routes execute by signing plain transactions. Venues that
/// answer with off-chain intents quotes are excluded until intents signing
/// is supported.
pub const DIRECT_SIGNING_DEXES: &[&str] = &[
    "Rhea",
    "RheaDcl",
    "Veax",
    "Aidols",
    "GraFun",
    "Jumpdefi",
    "Wrap",
];

/// One request to the routing service. Exactly one of `amount_in` /
/// `amount_out` is set, chosen by which field the user edited; the service
/// solves for the other side.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: Option<String>,
    pub amount_out: Option<String>,
    pub max_wait_ms: u64,
    /// Fraction, not percent. The committed percent is divided by 100 here
    /// and nowhere else.
    pub slippage: f64,
    pub trader_account_id: Option<String>,
}

impl RouteRequest {
    /// Build a request from the edited side of the panel. The edited amount
    /// is converted with the edited side's token decimals.
    pub fn from_edit(
        token_in: &Token,
        token_out: &Token,
        edited_amount: &str,
        edited: Side,
        slippage_pct: f64,
        trader_account_id: Option<&str>,
    ) -> Self {
        let (amount_in, amount_out) = match edited {
            Side::In => (Some(to_base_unit(edited_amount, token_in.decimals)), None),
            Side::Out => (None, Some(to_base_unit(edited_amount, token_out.decimals))),
        };

        Self {
            token_in: token_in.id.as_str().to_owned(),
            token_out: token_out.id.as_str().to_owned(),
            amount_in,
            amount_out,
            max_wait_ms: MAX_WAIT_MS,
            slippage: slippage_pct / 100.0,
            trader_account_id: trader_account_id.map(str::to_owned),
        }
    }

    /// Query-string pairs in the routing service's GET format.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("token_in", self.token_in.clone()),
            ("token_out", self.token_out.clone()),
        ];

        if let Some(amount) = &self.amount_in {
            query.push(("amount_in", amount.clone()));
        }
        if let Some(amount) = &self.amount_out {
            query.push(("amount_out", amount.clone()));
        }

        query.push(("max_wait_ms", self.max_wait_ms.to_string()));
        query.push(("slippage_type", "Fixed".to_string()));
        query.push(("slippage", self.slippage.to_string()));

        if let Some(trader) = &self.trader_account_id {
            query.push(("trader_account_id", trader.clone()));
        }

        query.push(("dexes", DIRECT_SIGNING_DEXES.join(",")));
        query
    }
}

/// One candidate route. The service orders candidates best-first and the
/// engine consumes index 0 without re-ranking.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuote {
    pub dex_id: String,

    #[serde(default)]
    pub needs_unwrap: bool,

    pub estimated_amount: RouteAmount,
    pub worst_case_amount: RouteAmount,

    #[serde(default, deserialize_with = "instructions_dropping_malformed")]
    pub execution_instructions: Vec<ExecutionInstruction>,

    #[serde(default)]
    pub deadline: Option<String>,
}

/// Amount object with exactly one populated field, matching whichever side
/// the request asked the service to solve for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteAmount {
    #[serde(default)]
    pub amount_in: Option<String>,
    #[serde(default)]
    pub amount_out: Option<String>,
}

impl RouteAmount {
    pub fn for_side(&self, side: Side) -> Option<&str> {
        match side {
            Side::In => self.amount_in.as_deref(),
            Side::Out => self.amount_out.as_deref(),
        }
    }
}

/// A signable step of a route. The wire format is a one-key object; entries
/// with both or neither key populated are dropped during decode, never
/// fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionInstruction {
    NearTransaction(NearTransaction),
    IntentsQuote(IntentsQuote),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NearTransaction {
    pub receiver_id: String,
    pub actions: Vec<TxAction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum TxAction {
    FunctionCall(FunctionCallSpec),
}

/// Function-call action as the router emits it: args still base64-encoded
/// JSON, decoded only at execution time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FunctionCallSpec {
    pub method_name: String,
    pub args: String,
    pub gas: u64,
    pub deposit: String,
}

/// Off-chain quote format that cannot be signed as a plain transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntentsQuote {
    pub message_to_sign: String,
    pub quote_hash: String,
}

#[derive(Deserialize)]
struct RawInstruction {
    #[serde(rename = "NearTransaction", default)]
    near_transaction: Option<serde_json::Value>,
    #[serde(rename = "IntentsQuote", default)]
    intents_quote: Option<serde_json::Value>,
}

impl RawInstruction {
    fn into_instruction(self) -> Option<ExecutionInstruction> {
        match (self.near_transaction, self.intents_quote) {
            (Some(tx), None) => match serde_json::from_value::<NearTransaction>(tx) {
                Ok(tx) => Some(ExecutionInstruction::NearTransaction(tx)),
                Err(err) => {
                    warn!(%err, "dropping undecodable NearTransaction instruction");
                    None
                }
            },
            (None, Some(quote)) => match serde_json::from_value::<IntentsQuote>(quote) {
                Ok(quote) => Some(ExecutionInstruction::IntentsQuote(quote)),
                Err(err) => {
                    warn!(%err, "dropping undecodable IntentsQuote instruction");
                    None
                }
            },
            _ => {
                warn!("dropping execution instruction with both or neither variant");
                None
            }
        }
    }
}

fn instructions_dropping_malformed<'de, D>(
    deserializer: D,
) -> Result<Vec<ExecutionInstruction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<RawInstruction> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(RawInstruction::into_instruction)
        .collect())
}
