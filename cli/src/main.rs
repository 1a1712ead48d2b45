pub mod cli;

use clap::Parser;

use common::logger::{TraceId, init_logger, root_span};
use router::types::RouteRequest;
use router::{RouterClient, RouterConfig};
use units::amount::{fixed_decimals, to_display_unit};
use units::slippage::SlippageController;
use units::token::{Side, TokenId};

use cli::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger("quote-cli");

    let cli = Cli::parse();
    let side = cli_to_side(&cli.side);

    let client = RouterClient::new(RouterConfig::from_env())?;

    // Populate the native token's price from the feed; cosmetic for a
    // one-shot quote, so a feed outage is not fatal.
    let native_price = client.fetch_native_price().await.unwrap_or(0.0);

    let price_in = if cli.token_in == TokenId::Native.as_str() {
        native_price
    } else {
        0.0
    };
    let token_in = token_from_cli(&cli.token_in, cli.decimals_in, price_in);
    let token_out = token_from_cli(&cli.token_out, cli.decimals_out, 0.0);

    let mut slippage = SlippageController::default();
    slippage.set_draft(cli.slippage.to_string());
    let slippage_pct = slippage.commit();

    let request = RouteRequest::from_edit(
        &token_in,
        &token_out,
        &cli.amount,
        side,
        slippage_pct,
        cli.trader.as_deref(),
    );

    let trace_id = TraceId::default();
    {
        let span = root_span("quote", &trace_id);
        let _enter = span.enter();
        tracing::info!(
            token_in = %request.token_in,
            token_out = %request.token_out,
            slippage = request.slippage,
            "requesting route"
        );
    }

    match client.fetch_route(&request).await? {
        Some(quote) => {
            let (label, derived_token) = match side {
                Side::In => ("estimated out", &token_out),
                Side::Out => ("estimated in", &token_in),
            };
            let raw = quote
                .estimated_amount
                .for_side(side.opposite())
                .unwrap_or("0");
            let display = fixed_decimals(&to_display_unit(raw, derived_token.decimals), 6);

            println!("route via {}", quote.dex_id);
            println!("{label}: {display} {}", derived_token.symbol);
            if quote.needs_unwrap {
                println!("note: output arrives wrapped and would be unwrapped after the swap");
            }
        }
        None => println!("no routes found"),
    }

    Ok(())
}
