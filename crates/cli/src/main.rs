use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use trade_dashboard_core::config::DashboardConfig;
use trade_dashboard_core::models::chart::{ChartRender, Surface};
use trade_dashboard_core::models::model::LeaderboardEntry;
use trade_dashboard_core::models::view::{
    ConversationRow, ListView, ModelRow, PositionRow, PriceTile, StatsView, TradeRow,
};
use trade_dashboard_core::render::RenderSink;
use trade_dashboard_core::scheduler::PollScheduler;
use trade_dashboard_core::Dashboard;

#[derive(Parser, Debug)]
#[command(name = "trade-dashboard", about = "Headless trading-bot dashboard poller")]
struct Args {
    /// Backend origin
    #[arg(long, env = "DASHBOARD_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    /// Market price poll period in seconds
    #[arg(long, env = "DASHBOARD_MARKET_SECS", default_value_t = 5)]
    market_secs: u64,

    /// Model data poll period in seconds
    #[arg(long, env = "DASHBOARD_MODEL_SECS", default_value_t = 10)]
    model_secs: u64,

    /// IANA timezone for displayed timestamps
    #[arg(long, env = "DASHBOARD_TIMEZONE", default_value = "Asia/Shanghai")]
    timezone: String,

    /// Model to select on startup (defaults to the first listed)
    #[arg(long)]
    model: Option<i64>,

    /// Chart surface width
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Chart surface height
    #[arg(long, default_value_t = 300.0)]
    height: f64,

    /// Refresh everything once and exit instead of polling
    #[arg(long)]
    once: bool,

    /// Also print the leaderboard on startup
    #[arg(long)]
    leaderboard: bool,
}

/// Writes every render instruction to the log.
struct LogSink;

impl RenderSink for LogSink {
    fn render_models(&self, models: &ListView<ModelRow>) {
        match models {
            ListView::Empty { message } => info!("models: {message}"),
            ListView::Populated(rows) => {
                for row in rows {
                    let marker = if row.active { "*" } else { " " };
                    info!("{marker} [{}] {} ({})", row.id, row.name, row.model_name);
                }
            }
        }
    }

    fn render_stats(&self, stats: &StatsView) {
        info!(
            "total {:.2} | cash {:.2} | realized {} | unrealized {}",
            stats.total_value,
            stats.cash,
            stats.realized_pnl.display(),
            stats.unrealized_pnl.display()
        );
    }

    fn render_chart(&self, chart: &ChartRender) {
        match chart {
            ChartRender::Skipped => {}
            ChartRender::Placeholder { text, .. } => info!("chart: {text}"),
            ChartRender::Plot(geometry) => info!(
                "chart: {} points, range {:.2}..{:.2}",
                geometry.points.len(),
                geometry.min_value,
                geometry.max_value
            ),
        }
    }

    fn render_positions(&self, positions: &ListView<PositionRow>) {
        match positions {
            ListView::Empty { message } => info!("positions: {message}"),
            ListView::Populated(rows) => {
                for p in rows {
                    let pnl = p.pnl.map(|v| v.display()).unwrap_or_else(|| "-".into());
                    info!(
                        "{} {} qty {} @ {} now {} {} pnl {}",
                        p.coin, p.side, p.quantity, p.avg_price, p.current_price, p.leverage, pnl
                    );
                }
            }
        }
    }

    fn render_trades(&self, trades: &ListView<TradeRow>) {
        match trades {
            ListView::Empty { message } => info!("trades: {message}"),
            ListView::Populated(rows) => info!("trades: {} (latest {})", rows.len(), rows[0].time),
        }
    }

    fn render_conversations(&self, conversations: &ListView<ConversationRow>) {
        match conversations {
            ListView::Empty { message } => info!("conversations: {message}"),
            ListView::Populated(rows) => info!("conversations: {}", rows.len()),
        }
    }

    fn render_market_prices(&self, tiles: &ListView<PriceTile>) {
        if let ListView::Populated(tiles) = tiles {
            let line: Vec<String> = tiles
                .iter()
                .map(|t| format!("{} {} ({}%)", t.coin, t.price, t.change_24h.display()))
                .collect();
            info!("market: {}", line.join(" | "));
        }
    }

    fn render_leaderboard(&self, entries: &[LeaderboardEntry]) {
        for (rank, e) in entries.iter().enumerate() {
            info!("#{} {} {:.2} ({:+.2}%)", rank + 1, e.model_name, e.account_value, e.returns);
        }
    }

    fn alert(&self, message: &str) {
        warn!("{message}");
    }

    fn confirm(&self, _message: &str) -> bool {
        // No interactive prompt in headless mode.
        false
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args = Args::parse();
    let config = DashboardConfig {
        base_url: args.base_url,
        market_poll_secs: args.market_secs,
        model_poll_secs: args.model_secs,
        display_timezone: args.timezone,
        ..DashboardConfig::default()
    };

    let dashboard = match Dashboard::connect(config, Arc::new(LogSink)) {
        Ok(dashboard) => Arc::new(dashboard),
        Err(e) => {
            error!("{e}");
            std::process::exit(2);
        }
    };
    dashboard.resize(Surface::new(args.width, args.height, 1.0));

    if let Some(model_id) = args.model {
        if let Err(e) = dashboard.select_model(model_id).await {
            warn!("could not load model {model_id}: {e}");
        }
    }
    if args.leaderboard {
        if let Err(e) = dashboard.load_leaderboard().await {
            warn!("leaderboard unavailable: {e}");
        }
    }

    let scheduler = PollScheduler::new(dashboard.clone());
    scheduler.refresh_all().await;
    if args.once {
        return;
    }

    scheduler.start();
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {e}");
    }
    scheduler.stop();
}
