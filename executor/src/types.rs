//! Common types and small abstraction traits used by the executor.

use async_trait::async_trait;
use thiserror::Error;

use router::types::RouteQuote;
use units::token::Token;

/// An account exposed by the wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAccount {
    pub account_id: String,
}

/// One function call inside a wallet transaction. The args payload is
/// already decoded from base64 into structured JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub method_name: String,
    pub args: serde_json::Value,
    pub gas: u64,
    pub deposit: String,
}

/// A transaction handed to the wallet session for signing and submission.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletTransaction {
    pub signer_id: String,
    pub receiver_id: String,
    pub actions: Vec<FunctionCall>,
}

/// Contract consumed from the external wallet module.
///
/// This trait intentionally hides:
///   - key management and signing
///   - connector/session plumbing
///   - error formats
///
/// The batch call's all-or-nothing guarantee is the wallet's to provide;
/// the executor never implements its own atomicity.
#[async_trait]
pub trait WalletSession: Send + Sync {
    async fn connect(&self) -> anyhow::Result<()>;
    async fn disconnect(&self) -> anyhow::Result<()>;
    async fn accounts(&self) -> anyhow::Result<Vec<WalletAccount>>;
    async fn sign_and_send_transaction(&self, tx: WalletTransaction) -> anyhow::Result<()>;
    async fn sign_and_send_transactions(&self, txs: Vec<WalletTransaction>)
    -> anyhow::Result<()>;
}

/// Minimal read-only view of on-chain balances.
///
/// Deliberately small so the executor does not depend on the full RPC
/// client and tests can substitute a double.
#[async_trait]
pub trait BalanceReader: Send + Sync {
    /// Fungible-token balance of `account_id` on `contract_id`, base units.
    async fn ft_balance(&self, contract_id: &str, account_id: &str)
    -> Result<u128, BalanceError>;

    /// Native balance of `account_id`, base units.
    async fn native_balance(&self, account_id: &str) -> Result<u128, BalanceError>;
}

/// Everything the executor needs, frozen at the moment the user confirmed
/// the swap.
#[derive(Debug, Clone)]
pub struct SwapCall {
    pub quote: RouteQuote,
    pub from_token: Token,
    pub to_token: Token,
    pub from_amount: String,
    pub to_amount: String,
}

/// Immutable record of a completed swap. Never recomputed by later state
/// changes.
#[derive(Debug, Clone)]
pub struct SwapReceipt {
    pub from_token: Token,
    pub to_token: Token,
    pub from_amount: String,
    pub to_amount: String,
    pub dex_id: String,
    pub unwrap: UnwrapOutcome,
}

/// What happened to the optional unwrap follow-up step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnwrapOutcome {
    /// The route's final leg already paid out the native asset.
    NotNeeded,
    /// Wrapped leftovers withdrawn; `amount` is the exact balance delta.
    Completed { amount: u128 },
    /// Balance re-query or unwrap submission failed. The main batch result
    /// stands; funds remain wrapped.
    Failed { reason: String },
}

/// Errors that can occur while querying balances.
#[derive(Debug, Error)]
pub enum BalanceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rpc error from {endpoint}: {message}")]
    Rpc { endpoint: String, message: String },

    #[error("malformed balance payload: {0}")]
    Malformed(String),

    #[error("no rpc endpoints configured")]
    NoEndpoints,
}

/// Errors that can occur during execution.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("another execution is already in flight")]
    AlreadyInFlight,

    #[error("wallet session has no connected account")]
    NoAccount,

    #[error("quote contains no signable transactions")]
    NothingToSubmit,

    #[error("undecodable instruction payload: {0}")]
    MalformedInstruction(String),

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("balance query failed: {0}")]
    Balance(#[from] BalanceError),
}
