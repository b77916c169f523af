use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latest quote for one coin from `GET /api/market/prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub price: f64,
    /// 24h change in percent
    #[serde(default)]
    pub change_24h: f64,
}

/// Coin symbol → quote, ordered by symbol for stable rendering.
pub type MarketPrices = BTreeMap<String, MarketPrice>;
