//! Client for the external swap-routing service.
//!
//! Responsibilities:
//!   • Build route requests from the edited side of the swap panel
//!   • Fetch and decode candidate routes (the service's ordering is trusted;
//!     index 0 is the best route)
//!   • Fetch the wrapped-native USD price
//!
//! No state lives here; the synchronizer in `engine` owns all sequencing.

pub mod client;
pub mod config;
pub mod error;
pub mod price;
pub mod types;

pub use client::RouterClient;
pub use config::RouterConfig;
pub use error::RouterError;
