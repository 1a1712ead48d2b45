//! Pure domain layer for the swap engine: the token model, fixed-point
//! amount conversion, and slippage handling.
//!
//! Deliberately IO-free so every rule here is testable without a network
//! or a runtime.

pub mod amount;
pub mod slippage;
pub mod token;
