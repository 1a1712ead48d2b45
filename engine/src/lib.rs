//! Swap-quote synchronization engine.
//!
//! Responsibilities:
//!   • Own the two linked amount fields and which side the user last edited
//!   • Issue route fetches for the edited side and write the derived side
//!   • Suppress stale responses via generation tokens
//!   • Schedule the single-slot debounced retry that papers over upstream
//!     indexing lag
//!
//! The synchronizer is driven purely through [`types::SwapEvent`]s, so it is
//! testable without any rendering surface: spawned fetch/timer tasks report
//! back through the same event channel the owner drains.

pub mod debounce;
pub mod state;
pub mod synchronizer;
pub mod types;

pub use state::AmountState;
pub use synchronizer::QuoteSynchronizer;
pub use types::{FetchOutcome, Phase, RouteFetcher, SwapEvent};
