use chrono_tz::Tz;
use serde::Serialize;

use super::market::MarketPrices;
use super::model::Model;
use super::portfolio::{PortfolioSnapshot, Position, Side};
use super::timestamp::format_in_zone;
use super::trade::{Conversation, Trade};

/// Sign classification used to colour PnL figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

impl Trend {
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Trend::Positive
        } else if value < 0.0 {
            Trend::Negative
        } else {
            Trend::Neutral
        }
    }
}

/// A monetary figure with its trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignedValue {
    pub value: f64,
    pub trend: Trend,
}

impl SignedValue {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            trend: Trend::of(value),
        }
    }

    /// Signed display form, e.g. `+12.50` / `-3.10` / `0.00`.
    pub fn display(&self) -> String {
        format_signed(self.value)
    }
}

/// The four stat tiles at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_value: f64,
    pub cash: f64,
    pub realized_pnl: SignedValue,
    pub unrealized_pnl: SignedValue,
    /// Return versus initial capital, when the capital is known
    pub return_pct: Option<SignedValue>,
}

impl StatsView {
    pub fn from_snapshot(snapshot: &PortfolioSnapshot) -> Self {
        Self::with_capital(snapshot, snapshot.initial_capital)
    }

    /// Like [`from_snapshot`](Self::from_snapshot), with the initial capital
    /// supplied by the caller (the portfolio payload may not carry it).
    pub fn with_capital(snapshot: &PortfolioSnapshot, initial_capital: Option<f64>) -> Self {
        let return_pct = initial_capital
            .filter(|capital| *capital > 0.0)
            .map(|capital| SignedValue::new((snapshot.total_value - capital) / capital * 100.0));
        Self {
            total_value: snapshot.total_value,
            cash: snapshot.cash,
            realized_pnl: SignedValue::new(snapshot.realized_pnl),
            unrealized_pnl: SignedValue::new(snapshot.unrealized_pnl),
            return_pct,
        }
    }
}

/// A list-shaped render instruction: either an empty-state message or rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ListView<T> {
    Empty { message: String },
    Populated(Vec<T>),
}

impl<T> ListView<T> {
    pub fn from_items(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            ListView::Empty {
                message: empty_message.to_string(),
            }
        } else {
            ListView::Populated(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListView::Empty { .. } => &[],
            ListView::Populated(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ListView::Empty { .. })
    }
}

pub const EMPTY_MODELS: &str = "No models yet";
pub const EMPTY_POSITIONS: &str = "No open positions";
pub const EMPTY_TRADES: &str = "No trades yet";
pub const EMPTY_CONVERSATIONS: &str = "No conversations yet";
pub const EMPTY_MARKET: &str = "No market data";

/// A row in the model sidebar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRow {
    pub id: i64,
    pub name: String,
    pub model_name: String,
    pub active: bool,
    pub engine_active: bool,
}

pub fn model_rows(models: &[Model], selected: Option<i64>) -> ListView<ModelRow> {
    let rows = models
        .iter()
        .map(|m| ModelRow {
            id: m.id,
            name: m.name.clone(),
            model_name: m.model_name.clone(),
            active: Some(m.id) == selected,
            engine_active: m.engine_active,
        })
        .collect();
    ListView::from_items(rows, EMPTY_MODELS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRow {
    pub coin: String,
    pub side: Side,
    pub quantity: String,
    pub avg_price: String,
    pub current_price: String,
    pub leverage: String,
    pub pnl: Option<SignedValue>,
}

pub fn position_rows(positions: &[Position]) -> ListView<PositionRow> {
    let rows = positions
        .iter()
        .map(|p| PositionRow {
            coin: p.coin.clone(),
            side: p.side,
            quantity: format!("{:.4}", p.quantity),
            avg_price: format_money(p.avg_price),
            current_price: p.current_price.map(format_money).unwrap_or_else(|| "-".into()),
            leverage: format!("{}x", p.leverage),
            pnl: p.pnl.map(SignedValue::new),
        })
        .collect();
    ListView::from_items(rows, EMPTY_POSITIONS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRow {
    pub time: String,
    pub coin: String,
    pub signal: String,
    pub quantity: String,
    pub price: String,
    pub pnl: SignedValue,
}

pub fn trade_rows(trades: &[Trade], zone: Tz) -> ListView<TradeRow> {
    let rows = trades
        .iter()
        .map(|t| TradeRow {
            time: format_in_zone(&t.timestamp, zone),
            coin: t.coin.clone(),
            signal: t.signal.label().to_string(),
            quantity: format!("{:.4}", t.quantity),
            price: format_money(t.price),
            pnl: SignedValue::new(t.pnl),
        })
        .collect();
    ListView::from_items(rows, EMPTY_TRADES)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationRow {
    pub time: String,
    pub response: String,
}

pub fn conversation_rows(conversations: &[Conversation], zone: Tz) -> ListView<ConversationRow> {
    let rows = conversations
        .iter()
        .map(|c| ConversationRow {
            time: format_in_zone(&c.timestamp, zone),
            response: c.ai_response.clone(),
        })
        .collect();
    ListView::from_items(rows, EMPTY_CONVERSATIONS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTile {
    pub coin: String,
    pub price: String,
    pub change_24h: SignedValue,
}

pub fn price_tiles(prices: &MarketPrices) -> ListView<PriceTile> {
    let tiles = prices
        .iter()
        .map(|(coin, quote)| PriceTile {
            coin: coin.clone(),
            price: format_money(quote.price),
            change_24h: SignedValue::new(quote.change_24h),
        })
        .collect();
    ListView::from_items(tiles, EMPTY_MARKET)
}

// ── Display formatting ──────────────────────────────────────────────

/// Money is rounded to 2 decimals only here, never during computation.
pub fn format_money(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}
