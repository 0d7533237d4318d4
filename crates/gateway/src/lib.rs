//! Delphi Gateway
//!
//! Ports to the outside world for the Delphi analysis system:
//! - `MarketData`: quotes and historical bars for an instrument
//! - `OrderGateway`: order placement
//!
//! ```text
//! External World (broker API, sample generator)
//!         │
//!    ┌────▼─────────┐
//!    │  MarketData  │  quote / history
//!    │ OrderGateway │  place_order
//!    └────┬─────────┘
//!         │
//!    ┌────▼────┐
//!    │ Analysis│
//!    │  Tasks  │
//!    └─────────┘
//! ```
//!
//! Two adapters ship with the crate: `SampleFeed` generates seeded
//! pseudo-random market data for offline runs, and `PaperBroker`
//! records orders without routing them anywhere. Both sit behind the
//! port traits so a live broker adapter can be dropped in later.

pub mod error;
pub mod paper;
pub mod ports;
pub mod sample;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use paper::PaperBroker;
pub use ports::{MarketData, OrderGateway};
pub use sample::SampleFeed;
