use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A trading model (an AI agent with its own account) registered on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Unique, stable identifier assigned by the backend
    pub id: i64,

    /// Display name chosen by the user
    pub name: String,

    /// Upstream LLM identifier (e.g., "gpt-4o", "deepseek-chat")
    pub model_name: String,

    /// Starting capital, when the backend includes it
    #[serde(default)]
    pub initial_capital: Option<f64>,

    /// Whether the backend currently runs a trading engine for this model
    #[serde(default)]
    pub engine_active: bool,
}

/// Raw "add model" form input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewModelForm {
    pub name: String,
    pub api_key: String,
    pub api_url: String,
    pub model_name: String,
    pub initial_capital: String,
}

/// Validated payload for `POST /api/models`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewModel {
    pub name: String,
    pub api_key: String,
    pub api_url: String,
    pub model_name: String,
    pub initial_capital: f64,
}

impl NewModelForm {
    /// Check that every field is filled in and the capital is numeric.
    ///
    /// Fields are trimmed; the error names every missing field at once.
    pub fn validate(&self) -> Result<NewModel, CoreError> {
        let fields = [
            ("name", &self.name),
            ("api_key", &self.api_key),
            ("api_url", &self.api_url),
            ("model_name", &self.model_name),
            ("initial_capital", &self.initial_capital),
        ];
        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| *label)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::UserInput(format!(
                "Please fill in all fields: {}",
                missing.join(", ")
            )));
        }

        let initial_capital: f64 = self
            .initial_capital
            .trim()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite())
            .ok_or_else(|| {
                CoreError::UserInput(format!(
                    "Initial capital must be a number, got '{}'",
                    self.initial_capital.trim()
                ))
            })?;

        Ok(NewModel {
            name: self.name.trim().to_string(),
            api_key: self.api_key.trim().to_string(),
            api_url: self.api_url.trim().to_string(),
            model_name: self.model_name.trim().to_string(),
            initial_capital,
        })
    }
}

/// One row of `GET /api/leaderboard`, already sorted by returns on the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub model_id: i64,
    pub model_name: String,
    pub account_value: f64,
    /// Percentage return relative to initial capital
    pub returns: f64,
    pub initial_capital: f64,
}
