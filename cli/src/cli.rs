use clap::{Parser, ValueEnum};

use units::token::{Side, Token, TokenId};

#[derive(Debug, Clone, ValueEnum)]
pub enum SideCli {
    In,
    Out,
}

#[derive(Debug, Parser)]
#[clap(name = "quote", version)]
pub struct Cli {
    /// Token to pay with ("near" or a token contract id)
    #[clap(long, default_value = "near")]
    pub token_in: String,

    /// Token to receive ("near" or a token contract id)
    #[clap(long)]
    pub token_out: String,

    /// Amount to swap, in display units
    #[clap(long)]
    pub amount: String,

    /// Which side --amount refers to
    #[clap(long, value_enum, default_value = "in")]
    pub side: SideCli,

    /// Decimals of the pay token
    #[clap(long, default_value_t = 24)]
    pub decimals_in: u8,

    /// Decimals of the receive token
    #[clap(long, default_value_t = 6)]
    pub decimals_out: u8,

    /// Slippage tolerance, percent
    #[clap(long, default_value_t = 1.0)]
    pub slippage: f64,

    /// Account to quote for, if known
    #[clap(long)]
    pub trader: Option<String>,
}

pub(crate) fn cli_to_side(side: &SideCli) -> Side {
    match side {
        SideCli::In => Side::In,
        SideCli::Out => Side::Out,
    }
}

/// Build a Token from CLI arguments. The symbol is cosmetic here; the
/// routing service only cares about the id.
pub(crate) fn token_from_cli(id: &str, decimals: u8, price_usd: f64) -> Token {
    let id = TokenId::from(id.to_string());
    let symbol = match &id {
        TokenId::Native => "NEAR".to_string(),
        TokenId::Contract(contract) => contract
            .split('.')
            .next()
            .unwrap_or(contract)
            .to_uppercase(),
    };

    Token {
        id,
        symbol,
        decimals,
        price_usd,
    }
}
