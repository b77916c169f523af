use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::chart::Padding;

/// Runtime configuration for the dashboard core.
///
/// All fields have defaults matching the stock backend, so
/// `DashboardConfig::default()` talks to a local instance out of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend origin, without trailing slash (e.g., "http://127.0.0.1:5000")
    pub base_url: String,

    /// Period of the fast cycle (market prices)
    pub market_poll_secs: u64,

    /// Period of the slow cycle (selected model's portfolio/trades/conversations)
    pub model_poll_secs: u64,

    /// Per-request timeout enforced by the HTTP client
    pub request_timeout_secs: u64,

    pub trade_limit: u32,
    pub conversation_limit: u32,
    pub history_limit: u32,

    /// IANA zone used for every displayed timestamp
    pub display_timezone: String,

    pub chart: ChartConfig,
}

/// Layout knobs for the value chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub padding: Padding,
    /// Number of equal value steps between gridlines
    pub grid_steps: usize,
    /// Maximum number of labels on the time axis
    pub time_labels: usize,
    pub marker_radius: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            grid_steps: 4,
            time_labels: 4,
            marker_radius: 4.0,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            market_poll_secs: 5,
            model_poll_secs: 10,
            request_timeout_secs: 30,
            trade_limit: 50,
            conversation_limit: 20,
            history_limit: 100,
            display_timezone: "Asia/Shanghai".to_string(),
            chart: ChartConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Reject configurations the scheduler or formatter could not work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if self.market_poll_secs == 0 || self.model_poll_secs == 0 {
            return Err(CoreError::Config(
                "poll intervals must be at least one second".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be at least one second".into(),
            ));
        }
        if self.chart.grid_steps == 0 {
            return Err(CoreError::Config("chart.grid_steps must be positive".into()));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz, CoreError> {
        self.display_timezone.parse::<Tz>().map_err(|_| {
            CoreError::Config(format!("unknown timezone '{}'", self.display_timezone))
        })
    }

    pub fn market_poll_interval(&self) -> Duration {
        Duration::from_secs(self.market_poll_secs)
    }

    pub fn model_poll_interval(&self) -> Duration {
        Duration::from_secs(self.model_poll_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
