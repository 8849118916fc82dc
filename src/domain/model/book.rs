// Domain model for top-of-book market data

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single price level with its available quantity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PricePoint {
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

/// One book update: both sides ordered best price first. Transient, not
/// retained beyond processing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<PricePoint>,
    pub asks: Vec<PricePoint>,
}

impl BookSnapshot {
    pub fn best_bid(&self) -> Option<&PricePoint> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&PricePoint> {
        self.asks.first()
    }
}
