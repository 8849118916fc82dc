//! Inside-the-Spread Quoting Strategy Module
//!
//! Keeps one resting limit order a tick inside each side of the touch and
//! chases the book as it moves: price calculation, per-side order
//! tracking, event routing and the engine runner.

mod engine;
mod price;
mod tracker;
pub mod quoter; // contains the SpreadQuoter runner


// Re-export core strategy components
pub use engine::QuotingEngine;
pub use price::quote_price;
pub use quoter::SpreadQuoter;
pub use tracker::{OrderSideTracker, TrackerState};
