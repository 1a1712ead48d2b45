//! Drives a settled quote through the wallet session.
//!
//! Procedure:
//!   1. Snapshot the wrapped-native balance when the route needs an unwrap.
//!   2. Translate native instructions into wallet transactions (intents
//!      quotes are skipped; signing them is unsupported).
//!   3. Submit the batch in one signing request; atomicity is the wallet's
//!      contract.
//!   4. Withdraw exactly the wrapped balance delta in a second submission.
//!
//! Failures are terminal: nothing here retries, the user re-initiates.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::Mutex;
use tracing::{info, warn};

use router::types::{ExecutionInstruction, TxAction};
use units::token::WRAP_CONTRACT_ID;

use crate::types::{
    BalanceReader, ExecutionError, FunctionCall, SwapCall, SwapReceipt, UnwrapOutcome,
    WalletSession, WalletTransaction,
};

/// Gas attached to the unwrap call; plenty for the wrap contract's
/// withdraw-and-transfer.
const UNWRAP_GAS: u64 = 30_000_000_000_000;

/// The wrap contract demands exactly one yocto on `near_withdraw`.
const UNWRAP_DEPOSIT: &str = "1";

pub struct SwapExecutor<W, B> {
    wallet: Arc<W>,
    balances: Arc<B>,
    in_flight: Mutex<()>,
}

impl<W: WalletSession, B: BalanceReader> SwapExecutor<W, B> {
    pub fn new(wallet: Arc<W>, balances: Arc<B>) -> Self {
        Self {
            wallet,
            balances,
            in_flight: Mutex::new(()),
        }
    }

    /// Execute one settled quote. At most one execution runs per session;
    /// a second call while one is in flight fails fast instead of queueing.
    pub async fn execute(&self, call: SwapCall) -> Result<SwapReceipt, ExecutionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ExecutionError::AlreadyInFlight)?;

        let accounts = self
            .wallet
            .accounts()
            .await
            .map_err(|e| ExecutionError::Wallet(e.to_string()))?;
        let signer_id = accounts
            .first()
            .ok_or(ExecutionError::NoAccount)?
            .account_id
            .clone();

        // Pre-swap snapshot. Without it the unwrap delta cannot be
        // computed, so a failure here aborts before anything is submitted.
        let balance_before = if call.quote.needs_unwrap {
            Some(
                self.balances
                    .ft_balance(WRAP_CONTRACT_ID, &signer_id)
                    .await?,
            )
        } else {
            None
        };

        let transactions =
            translate_instructions(&call.quote.execution_instructions, &signer_id)?;
        if transactions.is_empty() {
            return Err(ExecutionError::NothingToSubmit);
        }

        self.wallet
            .sign_and_send_transactions(transactions)
            .await
            .map_err(|e| ExecutionError::Wallet(e.to_string()))?;

        let unwrap = match balance_before {
            None => UnwrapOutcome::NotNeeded,
            Some(before) => self.unwrap_leftover(&signer_id, before).await,
        };

        info!(
            dex_id = %call.quote.dex_id,
            from = %call.from_amount,
            to = %call.to_amount,
            "swap executed"
        );

        Ok(SwapReceipt {
            from_token: call.from_token,
            to_token: call.to_token,
            from_amount: call.from_amount,
            to_amount: call.to_amount,
            dex_id: call.quote.dex_id,
            unwrap,
        })
    }

    /// Withdraw exactly what the main batch left in wrapped form. Failures
    /// here never invalidate the already-submitted batch.
    async fn unwrap_leftover(&self, signer_id: &str, before: u128) -> UnwrapOutcome {
        let after = match self.balances.ft_balance(WRAP_CONTRACT_ID, signer_id).await {
            Ok(balance) => balance,
            Err(err) => {
                warn!(%err, "post-swap balance query failed; leaving funds wrapped");
                return UnwrapOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        let delta = after.saturating_sub(before);

        match self
            .wallet
            .sign_and_send_transaction(unwrap_transaction(signer_id, delta))
            .await
        {
            Ok(()) => UnwrapOutcome::Completed { amount: delta },
            Err(err) => {
                warn!(%err, "unwrap submission failed");
                UnwrapOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// One wallet transaction per native instruction, each targeting the
/// instruction's own receiver. Intents quotes cannot be signed as plain
/// transactions and are skipped.
pub fn translate_instructions(
    instructions: &[ExecutionInstruction],
    signer_id: &str,
) -> Result<Vec<WalletTransaction>, ExecutionError> {
    let mut transactions = Vec::new();

    for instruction in instructions {
        match instruction {
            ExecutionInstruction::NearTransaction(tx) => {
                let mut actions = Vec::with_capacity(tx.actions.len());
                for action in &tx.actions {
                    let TxAction::FunctionCall(spec) = action;
                    actions.push(FunctionCall {
                        method_name: spec.method_name.clone(),
                        args: decode_args(&spec.args)?,
                        gas: spec.gas,
                        deposit: spec.deposit.clone(),
                    });
                }

                transactions.push(WalletTransaction {
                    signer_id: signer_id.to_owned(),
                    receiver_id: tx.receiver_id.clone(),
                    actions,
                });
            }
            ExecutionInstruction::IntentsQuote(quote) => {
                // The route allow-list should keep these out; a stray one
                // is skipped rather than failing the whole swap.
                warn!(quote_hash = %quote.quote_hash, "skipping intents instruction");
            }
        }
    }

    Ok(transactions)
}

/// Base64-encoded JSON payload → structured args for the wallet.
fn decode_args(args: &str) -> Result<serde_json::Value, ExecutionError> {
    let bytes = BASE64
        .decode(args)
        .map_err(|e| ExecutionError::MalformedInstruction(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ExecutionError::MalformedInstruction(e.to_string()))
}

fn unwrap_transaction(signer_id: &str, amount: u128) -> WalletTransaction {
    WalletTransaction {
        signer_id: signer_id.to_owned(),
        receiver_id: WRAP_CONTRACT_ID.to_owned(),
        actions: vec![FunctionCall {
            method_name: "near_withdraw".to_owned(),
            args: serde_json::json!({ "amount": amount.to_string() }),
            gas: UNWRAP_GAS,
            deposit: UNWRAP_DEPOSIT.to_owned(),
        }],
    }
}
