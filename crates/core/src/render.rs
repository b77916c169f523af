use crate::models::chart::ChartRender;
use crate::models::model::LeaderboardEntry;
use crate::models::view::{
    ConversationRow, ListView, ModelRow, PositionRow, PriceTile, StatsView, TradeRow,
};

/// The presentation layer the core drives.
///
/// The core computes everything; a sink only turns render instructions into
/// markup, widgets or log lines. Sinks are invoked while the dashboard state
/// is locked, so they must not call back into the `Dashboard`.
pub trait RenderSink: Send + Sync {
    fn render_models(&self, models: &ListView<ModelRow>);

    fn render_stats(&self, stats: &StatsView);

    fn render_chart(&self, chart: &ChartRender);

    fn render_positions(&self, positions: &ListView<PositionRow>);

    fn render_trades(&self, trades: &ListView<TradeRow>);

    fn render_conversations(&self, conversations: &ListView<ConversationRow>);

    fn render_market_prices(&self, tiles: &ListView<PriceTile>);

    fn render_leaderboard(&self, _entries: &[LeaderboardEntry]) {}

    /// Blocking message for input the user has to fix.
    fn alert(&self, message: &str);

    /// Ask before a destructive action. Returning `false` cancels it.
    fn confirm(&self, message: &str) -> bool;
}
