use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire sentinel for the chain's native asset.
pub const NATIVE_ID: &str = "near";

/// Wrapped form of the native asset. Routes whose final leg leaves funds
/// here need the unwrap follow-up step.
pub const WRAP_CONTRACT_ID: &str = "wrap.near";

/// Identifier of a swappable asset: the chain's native asset or a
/// fungible-token contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenId {
    Native,
    Contract(String),
}

impl TokenId {
    /// The form the routing service and RPC expect.
    pub fn as_str(&self) -> &str {
        match self {
            TokenId::Native => NATIVE_ID,
            TokenId::Contract(id) => id,
        }
    }
}

impl From<String> for TokenId {
    fn from(s: String) -> Self {
        if s == NATIVE_ID {
            TokenId::Native
        } else {
            TokenId::Contract(s)
        }
    }
}

impl From<TokenId> for String {
    fn from(id: TokenId) -> Self {
        id.as_str().to_owned()
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selected token. Immutable once chosen; `decimals` never changes for a
/// given id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub symbol: String,
    pub decimals: u8,
    pub price_usd: f64,
}

/// Which of the two linked amount fields an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    In,
    Out,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::In => Side::Out,
            Side::Out => Side::In,
        }
    }
}

/// USD price ratio between two tokens. Zero when the quote token has no
/// price, which avoids a division by zero at the caller.
pub fn exchange_rate(a: &Token, b: &Token) -> f64 {
    if b.price_usd == 0.0 {
        return 0.0;
    }
    a.price_usd / b.price_usd
}
