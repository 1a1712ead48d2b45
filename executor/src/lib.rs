//! Execution layer: turns a settled quote into an ordered sequence of
//! signed submissions through an externally supplied wallet session.
//!
//! The wallet and the balance view are abstraction seams; nothing here
//! signs, stores keys, or talks RPC beyond read-only balance queries.

pub mod rpc;
pub mod swap;
pub mod types;

pub use rpc::NearRpcClient;
pub use swap::SwapExecutor;
pub use types::{SwapCall, SwapReceipt, UnwrapOutcome};
