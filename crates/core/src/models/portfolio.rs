use serde::{Deserialize, Serialize};

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

/// An open position held by a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Coin symbol (e.g., "BTC")
    pub coin: String,

    pub side: Side,

    pub quantity: f64,

    /// Average entry price
    pub avg_price: f64,

    pub leverage: f64,

    /// Latest market price; absent when the backend had no quote for the coin
    #[serde(default)]
    pub current_price: Option<f64>,

    /// Unrealized PnL of this position; absent without a current price
    #[serde(default)]
    pub pnl: Option<f64>,
}

/// The account state of one model at fetch time.
///
/// Replaced wholesale on every successful fetch, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub total_value: f64,
    pub cash: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,

    /// Starting capital; older backends omit it from the portfolio payload
    #[serde(default)]
    pub initial_capital: Option<f64>,

    #[serde(default)]
    pub positions: Vec<Position>,

    #[serde(default)]
    pub positions_value: Option<f64>,

    #[serde(default)]
    pub margin_used: Option<f64>,
}
