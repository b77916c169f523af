// ═══════════════════════════════════════════════════════════════════
// Shared test doubles: scripted transport and recording render sink
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use trade_dashboard_core::config::DashboardConfig;
use trade_dashboard_core::errors::CoreError;
use trade_dashboard_core::models::chart::{ChartRender, Surface};
use trade_dashboard_core::models::model::LeaderboardEntry;
use trade_dashboard_core::models::view::{
    ConversationRow, ListView, ModelRow, PositionRow, PriceTile, StatsView, TradeRow,
};
use trade_dashboard_core::render::RenderSink;
use trade_dashboard_core::transport::{ApiRequest, Method, RawResponse, Transport};
use trade_dashboard_core::Dashboard;

pub const BASE_URL: &str = "http://backend.test";

// ── MockTransport ───────────────────────────────────────────────────

struct Route {
    method: Method,
    path: String,
    replies: Vec<Result<RawResponse, CoreError>>,
    served: usize,
    delay: Option<Duration>,
}

/// Answers requests from a per-route script, in order. Once a route runs
/// out of replies its last one repeats; unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<ApiRequest>>,
}

pub fn ok(body: &str) -> Result<RawResponse, CoreError> {
    status(200, "OK", body)
}

pub fn status(code: u16, text: &str, body: &str) -> Result<RawResponse, CoreError> {
    Ok(RawResponse {
        status: code,
        status_text: text.to_string(),
        body: body.to_string(),
    })
}

fn path_of(url: &str) -> &str {
    let path = url.strip_prefix(BASE_URL).unwrap_or(url);
    path.split('?').next().unwrap_or(path)
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Result<RawResponse, CoreError>) {
        self.script(method, path, reply, None);
    }

    pub fn on_delayed(
        &self,
        method: Method,
        path: &str,
        reply: Result<RawResponse, CoreError>,
        delay: Duration,
    ) {
        self.script(method, path, reply, Some(delay));
    }

    fn script(
        &self,
        method: Method,
        path: &str,
        reply: Result<RawResponse, CoreError>,
        delay: Option<Duration>,
    ) {
        let mut routes = self.routes.lock().unwrap();
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            route.replies.push(reply);
            route.delay = delay;
        } else {
            routes.push(Route {
                method,
                path: path.to_string(),
                replies: vec![reply],
                served: 0,
                delay,
            });
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && path_of(&r.url) == path)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, CoreError> {
        self.requests.lock().unwrap().push(request.clone());
        let (reply, delay) = {
            let mut routes = self.routes.lock().unwrap();
            match routes
                .iter_mut()
                .find(|r| r.method == request.method && r.path == path_of(&request.url))
            {
                Some(route) => {
                    let idx = route.served.min(route.replies.len() - 1);
                    route.served += 1;
                    let reply = route.replies[idx].clone();
                    (reply, route.delay)
                }
                None => (status(404, "Not Found", "{\"error\": \"no route\"}"), None),
            }
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        reply
    }
}

// ── RecordingSink ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Models(ListView<ModelRow>),
    Stats(StatsView),
    Chart(ChartRender),
    Positions(ListView<PositionRow>),
    Trades(ListView<TradeRow>),
    Conversations(ListView<ConversationRow>),
    Market(ListView<PriceTile>),
    Leaderboard(Vec<LeaderboardEntry>),
    Alert(String),
    Confirm(String),
}

pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    confirm_answer: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: AtomicBool::new(true),
        })
    }

    pub fn set_confirm(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: SinkEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn last_models(&self) -> Option<ListView<ModelRow>> {
        self.events().into_iter().rev().find_map(|e| match e {
            SinkEvent::Models(m) => Some(m),
            _ => None,
        })
    }

    pub fn last_stats(&self) -> Option<StatsView> {
        self.events().into_iter().rev().find_map(|e| match e {
            SinkEvent::Stats(s) => Some(s),
            _ => None,
        })
    }

    pub fn last_trades(&self) -> Option<ListView<TradeRow>> {
        self.events().into_iter().rev().find_map(|e| match e {
            SinkEvent::Trades(t) => Some(t),
            _ => None,
        })
    }

    pub fn market_renders(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Market(_)))
            .count()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Alert(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn render_models(&self, models: &ListView<ModelRow>) {
        self.push(SinkEvent::Models(models.clone()));
    }

    fn render_stats(&self, stats: &StatsView) {
        self.push(SinkEvent::Stats(stats.clone()));
    }

    fn render_chart(&self, chart: &ChartRender) {
        self.push(SinkEvent::Chart(chart.clone()));
    }

    fn render_positions(&self, positions: &ListView<PositionRow>) {
        self.push(SinkEvent::Positions(positions.clone()));
    }

    fn render_trades(&self, trades: &ListView<TradeRow>) {
        self.push(SinkEvent::Trades(trades.clone()));
    }

    fn render_conversations(&self, conversations: &ListView<ConversationRow>) {
        self.push(SinkEvent::Conversations(conversations.clone()));
    }

    fn render_market_prices(&self, tiles: &ListView<PriceTile>) {
        self.push(SinkEvent::Market(tiles.clone()));
    }

    fn render_leaderboard(&self, entries: &[LeaderboardEntry]) {
        self.push(SinkEvent::Leaderboard(entries.to_vec()));
    }

    fn alert(&self, message: &str) {
        self.push(SinkEvent::Alert(message.to_string()));
    }

    fn confirm(&self, message: &str) -> bool {
        self.push(SinkEvent::Confirm(message.to_string()));
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        base_url: BASE_URL.to_string(),
        display_timezone: "UTC".to_string(),
        ..DashboardConfig::default()
    }
}

pub fn dashboard(transport: &Arc<MockTransport>, sink: &Arc<RecordingSink>) -> Arc<Dashboard> {
    let dashboard = Dashboard::new(test_config(), transport.clone(), sink.clone())
        .expect("test config is valid");
    dashboard.resize(Surface::new(600.0, 300.0, 2.0));
    sink.clear();
    Arc::new(dashboard)
}

pub fn models_json(ids: &[i64]) -> String {
    let items: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id": {id}, "name": "Model {id}", "model_name": "gpt-4o",
                     "api_key": "sk-x", "initial_capital": 10000.0}}"#
            )
        })
        .collect();
    format!("[{}]", items.join(","))
}

pub fn portfolio_json(total_value: f64) -> String {
    format!(
        r#"{{
            "portfolio": {{
                "model_id": 1,
                "total_value": {total_value},
                "cash": 8000.0,
                "realized_pnl": 150.5,
                "unrealized_pnl": -20.25,
                "positions": [
                    {{"coin": "BTC", "side": "long", "quantity": 0.05, "avg_price": 60000.0,
                      "leverage": 2, "current_price": 61000.0, "pnl": 50.0}}
                ],
                "positions_value": 3000.0,
                "margin_used": 1500.0
            }},
            "account_value_history": [
                {{"timestamp": "2024-05-01 12:10:00", "total_value": 10100.0}},
                {{"timestamp": "2024-05-01 12:05:00", "total_value": 10050.0}},
                {{"timestamp": "2024-05-01 12:00:00", "total_value": 10000.0}}
            ]
        }}"#
    )
}

pub const TRADES_JSON: &str = r#"[
    {"timestamp": "2024-05-01 12:09:00", "coin": "BTC", "signal": "buy_to_enter",
     "quantity": 0.05, "price": 60000.0, "pnl": 0.0},
    {"timestamp": "2024-05-01 11:00:00", "coin": "ETH", "signal": "close_position",
     "quantity": 1.0, "price": 3000.0, "pnl": 150.5}
]"#;

pub const CONVERSATIONS_JSON: &str = r#"[
    {"timestamp": "2024-05-01 12:09:00", "ai_response": "Going long BTC", "user_prompt": "state"}
]"#;

/// Script a complete, healthy model payload for `model_id`.
pub fn script_model(transport: &MockTransport, model_id: i64, total_value: f64) {
    transport.on(
        Method::Get,
        &format!("/api/models/{model_id}/portfolio"),
        ok(&portfolio_json(total_value)),
    );
    transport.on(
        Method::Get,
        &format!("/api/models/{model_id}/trades"),
        ok(TRADES_JSON),
    );
    transport.on(
        Method::Get,
        &format!("/api/models/{model_id}/conversations"),
        ok(CONVERSATIONS_JSON),
    );
}
