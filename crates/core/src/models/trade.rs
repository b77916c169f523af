use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp::naive_utc;

/// Trading signal attached to an executed trade.
///
/// Unknown signals are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Signal {
    BuyToEnter,
    SellToEnter,
    ClosePosition,
    Other(String),
}

impl From<String> for Signal {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "buy_to_enter" => Signal::BuyToEnter,
            "sell_to_enter" => Signal::SellToEnter,
            "close_position" => Signal::ClosePosition,
            _ => Signal::Other(raw),
        }
    }
}

impl From<Signal> for String {
    fn from(signal: Signal) -> Self {
        signal.to_string()
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::BuyToEnter => write!(f, "buy_to_enter"),
            Signal::SellToEnter => write!(f, "sell_to_enter"),
            Signal::ClosePosition => write!(f, "close_position"),
            Signal::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl Signal {
    /// Human-readable label for the trades table.
    pub fn label(&self) -> &str {
        match self {
            Signal::BuyToEnter => "Open long",
            Signal::SellToEnter => "Open short",
            Signal::ClosePosition => "Close",
            Signal::Other(raw) => raw,
        }
    }
}

/// An executed trade. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(with = "naive_utc")]
    pub timestamp: DateTime<Utc>,
    pub coin: String,
    pub signal: Signal,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub pnl: f64,
}

/// One AI decision round: the prompt, the model's answer and its reasoning trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(with = "naive_utc")]
    pub timestamp: DateTime<Utc>,
    pub ai_response: String,
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub cot_trace: Option<String>,
}
