use std::sync::Arc;

use tokio::sync::Notify;

use executor::SwapExecutor;
use executor::types::{BalanceError, ExecutionError, SwapCall, UnwrapOutcome};
use router::types::{
    ExecutionInstruction, FunctionCallSpec, IntentsQuote, NearTransaction, RouteAmount,
    RouteQuote, TxAction,
};
use units::token::{Token, TokenId, WRAP_CONTRACT_ID};

use mock_wallet::{MockWallet, ScriptedBalances};

// base64 of {"amount":"1"}
const ARGS_B64: &str = "eyJhbW91bnQiOiIxIn0=";

fn near_tx_instruction(receiver: &str) -> ExecutionInstruction {
    ExecutionInstruction::NearTransaction(NearTransaction {
        receiver_id: receiver.into(),
        actions: vec![TxAction::FunctionCall(FunctionCallSpec {
            method_name: "ft_transfer_call".into(),
            args: ARGS_B64.into(),
            gas: 300_000_000_000_000,
            deposit: "1".into(),
        })],
    })
}

fn intents_instruction() -> ExecutionInstruction {
    ExecutionInstruction::IntentsQuote(IntentsQuote {
        message_to_sign: "payload".into(),
        quote_hash: "abc123".into(),
    })
}

fn quote(needs_unwrap: bool, instructions: Vec<ExecutionInstruction>) -> RouteQuote {
    RouteQuote {
        dex_id: "Rhea".into(),
        needs_unwrap,
        estimated_amount: RouteAmount {
            amount_in: None,
            amount_out: Some("2500000".into()),
        },
        worst_case_amount: RouteAmount {
            amount_in: None,
            amount_out: Some("2400000".into()),
        },
        execution_instructions: instructions,
        deadline: None,
    }
}

fn swap_call(quote: RouteQuote) -> SwapCall {
    SwapCall {
        quote,
        from_token: Token {
            id: TokenId::Native,
            symbol: "NEAR".into(),
            decimals: 24,
            price_usd: 2.5,
        },
        to_token: Token {
            id: TokenId::Contract("usdc.near".into()),
            symbol: "USDC".into(),
            decimals: 6,
            price_usd: 1.0,
        },
        from_amount: "1.5".into(),
        to_amount: "2.500000".into(),
    }
}

#[tokio::test]
async fn batch_submitted_and_receipt_frozen() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let receipt = exec
        .execute(swap_call(quote(false, vec![near_tx_instruction("amm.near")])))
        .await?;

    let batches = wallet.batches.lock().await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].signer_id, "alice.near");
    assert_eq!(batches[0][0].receiver_id, "amm.near");
    // Base64 args arrive at the wallet as structured JSON.
    assert_eq!(
        batches[0][0].actions[0].args,
        serde_json::json!({ "amount": "1" })
    );

    assert_eq!(receipt.from_amount, "1.5");
    assert_eq!(receipt.to_amount, "2.500000");
    assert_eq!(receipt.dex_id, "Rhea");
    assert_eq!(receipt.unwrap, UnwrapOutcome::NotNeeded);
    assert!(wallet.singles.lock().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn unwrap_issues_second_submission_with_exact_delta() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![Ok(100), Ok(350)]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let receipt = exec
        .execute(swap_call(quote(true, vec![near_tx_instruction("amm.near")])))
        .await?;

    assert_eq!(wallet.batches.lock().await.len(), 1);

    let singles = wallet.singles.lock().await;
    assert_eq!(singles.len(), 1);
    assert_eq!(singles[0].receiver_id, WRAP_CONTRACT_ID);
    assert_eq!(singles[0].actions[0].method_name, "near_withdraw");
    assert_eq!(singles[0].actions[0].deposit, "1");
    assert_eq!(
        singles[0].actions[0].args,
        serde_json::json!({ "amount": "250" })
    );

    assert_eq!(receipt.unwrap, UnwrapOutcome::Completed { amount: 250 });
    Ok(())
}

#[tokio::test]
async fn intents_instructions_are_skipped() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    exec.execute(swap_call(quote(
        false,
        vec![intents_instruction(), near_tx_instruction("amm.near")],
    )))
    .await?;

    let batches = wallet.batches.lock().await;
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].receiver_id, "amm.near");
    Ok(())
}

#[tokio::test]
async fn all_intents_quote_has_nothing_to_submit() {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let err = exec
        .execute(swap_call(quote(false, vec![intents_instruction()])))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::NothingToSubmit));
    assert!(wallet.batches.lock().await.is_empty());
}

#[tokio::test]
async fn undecodable_args_fail_before_the_wallet_is_touched() {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let instruction = ExecutionInstruction::NearTransaction(NearTransaction {
        receiver_id: "amm.near".into(),
        actions: vec![TxAction::FunctionCall(FunctionCallSpec {
            method_name: "swap".into(),
            args: "not-base64!!".into(),
            gas: 1,
            deposit: "0".into(),
        })],
    });

    let err = exec
        .execute(swap_call(quote(false, vec![instruction])))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::MalformedInstruction(_)));
    assert!(wallet.batches.lock().await.is_empty());
}

#[tokio::test]
async fn disconnected_wallet_cannot_execute() {
    let wallet = Arc::new(MockWallet::default());
    let balances = ScriptedBalances::with(vec![]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let err = exec
        .execute(swap_call(quote(false, vec![near_tx_instruction("amm.near")])))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::NoAccount));
}

#[tokio::test]
async fn second_execution_rejected_while_first_in_flight() -> anyhow::Result<()> {
    let gate = Arc::new(Notify::new());
    let wallet = Arc::new(MockWallet {
        gate: Some(Arc::clone(&gate)),
        ..MockWallet::connected()
    });
    let balances = ScriptedBalances::with(vec![]);
    let exec = Arc::new(SwapExecutor::new(Arc::clone(&wallet), balances));

    let first = {
        let exec = Arc::clone(&exec);
        tokio::spawn(async move {
            exec.execute(swap_call(quote(false, vec![near_tx_instruction("amm.near")])))
                .await
        })
    };

    // Let the first execution reach the gated wallet call.
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let err = exec
        .execute(swap_call(quote(false, vec![near_tx_instruction("amm.near")])))
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutionError::AlreadyInFlight));

    gate.notify_one();
    first.await??;
    assert_eq!(wallet.batches.lock().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn pre_swap_balance_failure_aborts_before_submission() {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![Err(BalanceError::Malformed(
        "scripted failure".into(),
    ))]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let err = exec
        .execute(swap_call(quote(true, vec![near_tx_instruction("amm.near")])))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Balance(_)));
    assert!(wallet.batches.lock().await.is_empty());
    assert!(wallet.singles.lock().await.is_empty());
}

#[tokio::test]
async fn post_swap_balance_failure_keeps_main_batch_result() -> anyhow::Result<()> {
    let wallet = Arc::new(MockWallet::connected());
    let balances = ScriptedBalances::with(vec![
        Ok(100),
        Err(BalanceError::Malformed("scripted failure".into())),
    ]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let receipt = exec
        .execute(swap_call(quote(true, vec![near_tx_instruction("amm.near")])))
        .await?;

    // The batch went through; only the unwrap step is blocked.
    assert_eq!(wallet.batches.lock().await.len(), 1);
    assert!(wallet.singles.lock().await.is_empty());
    assert!(matches!(receipt.unwrap, UnwrapOutcome::Failed { .. }));
    Ok(())
}

#[tokio::test]
async fn rejected_batch_is_terminal_and_skips_unwrap() {
    let wallet = Arc::new(MockWallet {
        fail_batch: true,
        ..MockWallet::connected()
    });
    let balances = ScriptedBalances::with(vec![Ok(100), Ok(350)]);
    let exec = SwapExecutor::new(Arc::clone(&wallet), balances);

    let err = exec
        .execute(swap_call(quote(true, vec![near_tx_instruction("amm.near")])))
        .await
        .unwrap_err();

    assert!(matches!(err, ExecutionError::Wallet(_)));
    assert!(wallet.singles.lock().await.is_empty());
}
