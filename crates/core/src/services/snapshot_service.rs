use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::chart::ValueSample;
use crate::models::portfolio::PortfolioSnapshot;
use crate::models::trade::{Conversation, Trade};
use crate::models::view::StatsView;
use crate::services::backend_service::BackendClient;

/// A validated, combined view of one model's state.
///
/// Built all-or-nothing: if the portfolio is unusable no snapshot exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    pub model_id: i64,
    pub portfolio: PortfolioSnapshot,
    pub stats: StatsView,
    /// Account-value history, newest-first as the backend returns it
    pub history: Vec<ValueSample>,
    pub trades: Vec<Trade>,
    pub conversations: Vec<Conversation>,
}

/// Fetches and validates the model-scoped data in one go.
pub struct SnapshotService {
    trade_limit: u32,
    conversation_limit: u32,
    history_limit: u32,
}

impl SnapshotService {
    pub fn new(trade_limit: u32, conversation_limit: u32, history_limit: u32) -> Self {
        Self {
            trade_limit,
            conversation_limit,
            history_limit,
        }
    }

    /// Fetch portfolio, trades and conversations concurrently and combine them.
    ///
    /// Returns `Ok(None)` when no model is given. Any fetch failure aborts the
    /// whole load, as does a portfolio payload without a usable `portfolio`.
    pub async fn load(
        &self,
        client: &BackendClient,
        model_id: Option<i64>,
    ) -> Result<Option<ModelSnapshot>, CoreError> {
        let Some(model_id) = model_id else {
            return Ok(None);
        };

        let (portfolio, trades, conversations) = tokio::join!(
            client.portfolio(model_id, self.history_limit),
            client.trades(model_id, self.trade_limit),
            client.conversations(model_id, self.conversation_limit),
        );

        Self::assemble(model_id, portfolio?, trades?, conversations?).map(Some)
    }

    /// Validate raw responses into a snapshot.
    ///
    /// `portfolio` is mandatory; non-list trades or conversations degrade to
    /// empty lists.
    pub fn assemble(
        model_id: i64,
        portfolio: Option<Value>,
        trades: Option<Value>,
        conversations: Option<Value>,
    ) -> Result<ModelSnapshot, CoreError> {
        let mut body = match portfolio {
            Some(Value::Object(map)) => map,
            _ => {
                warn!(model_id, "portfolio response is not an object; skipping update");
                return Err(CoreError::Validation(
                    "portfolio response is not an object".into(),
                ));
            }
        };

        let snapshot: PortfolioSnapshot = match body.remove("portfolio") {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
                warn!(model_id, error = %e, "malformed portfolio; skipping update");
                CoreError::Validation(format!("malformed portfolio: {e}"))
            })?,
            _ => {
                warn!(model_id, "portfolio response has no 'portfolio' object; skipping update");
                return Err(CoreError::Validation("missing 'portfolio' object".into()));
            }
        };

        let history = list_or_empty(body.remove("account_value_history"), "account_value_history");
        let trades = list_or_empty(trades, "trades");
        let conversations = list_or_empty(conversations, "conversations");

        debug!(
            model_id,
            positions = snapshot.positions.len(),
            history = history.len(),
            trades = trades.len(),
            conversations = conversations.len(),
            "snapshot assembled"
        );

        Ok(ModelSnapshot {
            model_id,
            stats: StatsView::from_snapshot(&snapshot),
            portfolio: snapshot,
            history,
            trades,
            conversations,
        })
    }
}

/// Decode a JSON array element-wise; anything that is not an array yields
/// an empty list. Individual malformed entries are dropped.
fn list_or_empty<T: DeserializeOwned>(value: Option<Value>, label: &str) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(label, error = %e, "dropping malformed entry");
                    None
                }
            })
            .collect(),
        None => Vec::new(),
        Some(_) => {
            warn!(label, "expected a list; rendering as empty");
            Vec::new()
        }
    }
}
