pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod scheduler;
pub mod services;
pub mod transport;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono_tz::Tz;
use tracing::{debug, info, warn};

use config::DashboardConfig;
use errors::CoreError;
use models::chart::{ChartRender, Surface};
use models::market::MarketPrices;
use models::model::{LeaderboardEntry, Model, NewModelForm};
use models::view::{
    conversation_rows, model_rows, position_rows, price_tiles, trade_rows, StatsView,
};
use render::RenderSink;
use services::{
    backend_service::BackendClient,
    chart_service::ChartEngine,
    selection_service::{DispatchSeq, SelectionState},
    snapshot_service::{ModelSnapshot, SnapshotService},
};
use transport::{HttpTransport, Transport};

/// Main entry point for the dashboard core.
///
/// Owns the only mutable state (selection, last-known data, chart series)
/// behind one lock; every write and the render it triggers happen under it,
/// so the last applied result is also the last one rendered. Share it as
/// `Arc<Dashboard>` between the host and the [`scheduler::PollScheduler`].
#[must_use]
pub struct Dashboard {
    client: BackendClient,
    snapshots: SnapshotService,
    sink: Arc<dyn RenderSink>,
    zone: Tz,
    state: Mutex<DashboardState>,
    config: DashboardConfig,
}

struct DashboardState {
    selection: SelectionState,
    models: Vec<Model>,
    models_seq: DispatchSeq,
    market_seq: DispatchSeq,
    market: Option<MarketPrices>,
    snapshot: Option<ModelSnapshot>,
    chart: ChartEngine,
    surface: Surface,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Dashboard")
            .field("base_url", &self.client.base_url())
            .field("selected", &state.selection.current())
            .field("models", &state.models.len())
            .field("has_snapshot", &state.snapshot.is_some())
            .finish()
    }
}

impl Dashboard {
    /// Build a dashboard on top of any transport.
    pub fn new(
        config: DashboardConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn RenderSink>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let zone = config.timezone()?;
        let state = DashboardState {
            selection: SelectionState::new(),
            models: Vec::new(),
            models_seq: DispatchSeq::default(),
            market_seq: DispatchSeq::default(),
            market: None,
            snapshot: None,
            chart: ChartEngine::new(config.chart.clone(), zone),
            surface: Surface::new(0.0, 0.0, 1.0),
        };
        Ok(Self {
            client: BackendClient::new(transport, config.base_url.clone()),
            snapshots: SnapshotService::new(
                config.trade_limit,
                config.conversation_limit,
                config.history_limit,
            ),
            sink,
            zone,
            state: Mutex::new(state),
            config,
        })
    }

    /// Build a dashboard that talks to a live backend over HTTP.
    pub fn connect(config: DashboardConfig, sink: Arc<dyn RenderSink>) -> Result<Self, CoreError> {
        let transport = Arc::new(HttpTransport::new(config.request_timeout()));
        Self::new(config, transport, sink)
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    // ── Read access ─────────────────────────────────────────────────

    #[must_use]
    pub fn selected_model(&self) -> Option<i64> {
        self.lock().selection.current()
    }

    #[must_use]
    pub fn models(&self) -> Vec<Model> {
        self.lock().models.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<ModelSnapshot> {
        self.lock().snapshot.clone()
    }

    #[must_use]
    pub fn market_prices(&self) -> Option<MarketPrices> {
        self.lock().market.clone()
    }

    // ── Selection ───────────────────────────────────────────────────

    /// Select a model, re-render the list highlight and fetch its data now.
    pub async fn select_model(&self, model_id: i64) -> Result<bool, CoreError> {
        {
            let mut state = self.lock();
            state.selection.select(model_id);
            info!(model_id, "model selected");
            self.sink
                .render_models(&model_rows(&state.models, state.selection.current()));
        }
        self.load_model_data().await
    }

    /// Clear the selection. Displayed data is kept until something replaces it.
    pub fn deselect(&self) {
        let mut state = self.lock();
        state.selection.deselect();
        self.sink.render_models(&model_rows(&state.models, None));
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Reload the model list; auto-select the first model if none is selected.
    pub async fn load_models(&self) -> Result<(), CoreError> {
        let seq = self.lock().models_seq.next();
        let models = self.client.list_models().await?;

        let auto_selected = {
            let mut state = self.lock();
            if !state.models_seq.try_apply(seq) {
                debug!(seq, "dropping stale model list");
                return Ok(());
            }
            let candidate = state.selection.auto_select_candidate(&models);
            if let Some(model_id) = candidate {
                state.selection.select(model_id);
                info!(model_id, "auto-selected first model");
            }
            state.models = models;
            self.sink
                .render_models(&model_rows(&state.models, state.selection.current()));
            candidate
        };

        if auto_selected.is_some() {
            self.load_model_data().await?;
        }
        Ok(())
    }

    /// Fetch and apply the selected model's snapshot.
    ///
    /// Returns `Ok(false)` when nothing is selected or the result went stale
    /// (selection changed, or a newer dispatch was already applied).
    pub async fn load_model_data(&self) -> Result<bool, CoreError> {
        let ticket = self.lock().selection.ticket();
        let Some(ticket) = ticket else {
            return Ok(false);
        };

        let snapshot = match self.snapshots.load(&self.client, Some(ticket.model_id)).await? {
            Some(snapshot) => snapshot,
            None => return Ok(false),
        };

        let mut state = self.lock();
        if !state.selection.accept(&ticket) {
            debug!(
                model_id = ticket.model_id,
                generation = ticket.generation,
                "dropping stale snapshot"
            );
            return Ok(false);
        }
        self.apply_snapshot(&mut state, snapshot);
        Ok(true)
    }

    fn apply_snapshot(&self, state: &mut DashboardState, mut snapshot: ModelSnapshot) {
        if snapshot.portfolio.initial_capital.is_none() {
            let listed = state
                .models
                .iter()
                .find(|m| m.id == snapshot.model_id)
                .and_then(|m| m.initial_capital);
            if listed.is_some() {
                snapshot.stats = StatsView::with_capital(&snapshot.portfolio, listed);
            }
        }

        let surface = state.surface;
        let chart = state.chart.render(
            &snapshot.history,
            Some(snapshot.portfolio.total_value),
            surface,
        );

        self.sink.render_stats(&snapshot.stats);
        self.sink.render_chart(&chart);
        self.sink
            .render_positions(&position_rows(&snapshot.portfolio.positions));
        self.sink
            .render_trades(&trade_rows(&snapshot.trades, self.zone));
        self.sink
            .render_conversations(&conversation_rows(&snapshot.conversations, self.zone));

        state.snapshot = Some(snapshot);
    }

    /// Fetch market prices; on failure the previous tiles stay as they are.
    pub async fn load_market_prices(&self) -> Result<(), CoreError> {
        let seq = self.lock().market_seq.next();
        let prices = self.client.market_prices().await?;

        let mut state = self.lock();
        if !state.market_seq.try_apply(seq) {
            debug!(seq, "dropping stale market prices");
            return Ok(());
        }
        self.sink.render_market_prices(&price_tiles(&prices));
        state.market = Some(prices);
        Ok(())
    }

    pub async fn load_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, CoreError> {
        let entries = self.client.leaderboard().await?;
        self.sink.render_leaderboard(&entries);
        Ok(entries)
    }

    /// Reload models, market prices and the selected model's data together.
    ///
    /// Failures are already logged per fetch; the views that failed keep
    /// their last-known state.
    pub async fn refresh_all(&self) {
        let (models, market, data) = tokio::join!(
            self.load_models(),
            self.load_market_prices(),
            self.load_model_data(),
        );
        for result in [models, market, data.map(|_| ())] {
            if let Err(e) = result {
                debug!(error = %e, "refresh step failed");
            }
        }
    }

    // ── Chart surface ───────────────────────────────────────────────

    /// Record a new surface size and redraw the last series onto it.
    pub fn resize(&self, surface: Surface) -> ChartRender {
        let mut state = self.lock();
        state.surface = surface;
        let chart = state.chart.redraw(surface);
        self.sink.render_chart(&chart);
        chart
    }

    // ── Model management ────────────────────────────────────────────

    /// Validate the form, create the model and reload the list.
    ///
    /// Invalid input is shown to the user through the sink and returned.
    pub async fn add_model(&self, form: &NewModelForm) -> Result<(), CoreError> {
        let model = match form.validate() {
            Ok(model) => model,
            Err(e) => {
                self.sink.alert(&e.to_string());
                return Err(e);
            }
        };
        self.client.create_model(&model).await?;
        info!(name = %model.name, "model added");
        self.load_models().await
    }

    /// Delete a model after user confirmation.
    ///
    /// Returns `Ok(false)` if the user declined; no request is sent then.
    pub async fn delete_model(&self, model_id: i64) -> Result<bool, CoreError> {
        if !self.sink.confirm("Delete this model? This cannot be undone.") {
            return Ok(false);
        }
        self.client.delete_model(model_id).await?;
        info!(model_id, "model deleted");

        {
            let mut state = self.lock();
            if state.selection.deselect_if(model_id) {
                debug!(model_id, "deleted model was selected; selection cleared");
            }
            state.models.retain(|m| m.id != model_id);
            self.sink
                .render_models(&model_rows(&state.models, state.selection.current()));
        }
        if let Err(e) = self.load_models().await {
            warn!(error = %e, "model list reload after delete failed");
        }
        Ok(true)
    }

    /// Run one trading cycle for `model_id` now, then refresh its data.
    pub async fn execute_model(&self, model_id: i64) -> Result<(), CoreError> {
        self.client.execute_model(model_id).await?;
        if self.selected_model() == Some(model_id) {
            self.load_model_data().await?;
        }
        Ok(())
    }
}
