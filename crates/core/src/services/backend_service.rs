use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::market::MarketPrices;
use crate::models::model::{LeaderboardEntry, Model, NewModel};
use crate::transport::{fetch_json, ApiRequest, Transport};

/// Typed access to the dashboard backend's REST surface.
///
/// Endpoints for the shared views (models, market, leaderboard) decode
/// straight into model types. Model-scoped endpoints return the raw JSON:
/// the snapshot aggregator decides which shapes it can tolerate.
#[derive(Clone)]
pub struct BackendClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl BackendClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch(&self, request: ApiRequest, context: &str) -> Result<Option<Value>, CoreError> {
        fetch_json(self.transport.as_ref(), &request, context).await
    }

    async fn fetch_typed<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        context: &str,
    ) -> Result<T, CoreError> {
        let value = self
            .fetch(request, context)
            .await?
            .ok_or_else(|| CoreError::Validation(format!("{context}: empty response body")))?;
        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(context, error = %e, "unexpected response shape");
            CoreError::Validation(format!("{context}: {e}"))
        })
    }

    // ── Models ──────────────────────────────────────────────────────

    /// `GET /api/models`
    pub async fn list_models(&self) -> Result<Vec<Model>, CoreError> {
        self.fetch_typed(ApiRequest::get(self.url("/api/models")), "load models")
            .await
    }

    /// `POST /api/models`. Returns whatever the backend answered (id + message).
    pub async fn create_model(&self, model: &NewModel) -> Result<Option<Value>, CoreError> {
        let body = serde_json::to_value(model)?;
        self.fetch(ApiRequest::post(self.url("/api/models"), body), "add model")
            .await
    }

    /// `DELETE /api/models/{id}`. The response body is not required.
    pub async fn delete_model(&self, model_id: i64) -> Result<(), CoreError> {
        self.fetch(
            ApiRequest::delete(self.url(&format!("/api/models/{model_id}"))),
            "delete model",
        )
        .await
        .map(|_| ())
    }

    /// `POST /api/models/{id}/execute`: run one trading cycle now.
    pub async fn execute_model(&self, model_id: i64) -> Result<Option<Value>, CoreError> {
        self.fetch(
            ApiRequest::post(
                self.url(&format!("/api/models/{model_id}/execute")),
                Value::Object(Default::default()),
            ),
            "execute model",
        )
        .await
    }

    // ── Model-scoped data (raw) ─────────────────────────────────────

    /// `GET /api/models/{id}/portfolio?history_limit=N`
    pub async fn portfolio(
        &self,
        model_id: i64,
        history_limit: u32,
    ) -> Result<Option<Value>, CoreError> {
        self.fetch(
            ApiRequest::get(self.url(&format!(
                "/api/models/{model_id}/portfolio?history_limit={history_limit}"
            ))),
            "load portfolio",
        )
        .await
    }

    /// `GET /api/models/{id}/trades?limit=N`
    pub async fn trades(&self, model_id: i64, limit: u32) -> Result<Option<Value>, CoreError> {
        self.fetch(
            ApiRequest::get(self.url(&format!("/api/models/{model_id}/trades?limit={limit}"))),
            "load trades",
        )
        .await
    }

    /// `GET /api/models/{id}/conversations?limit=N`
    pub async fn conversations(
        &self,
        model_id: i64,
        limit: u32,
    ) -> Result<Option<Value>, CoreError> {
        self.fetch(
            ApiRequest::get(self.url(&format!(
                "/api/models/{model_id}/conversations?limit={limit}"
            ))),
            "load conversations",
        )
        .await
    }

    // ── Shared views ────────────────────────────────────────────────

    /// `GET /api/market/prices`
    pub async fn market_prices(&self) -> Result<MarketPrices, CoreError> {
        self.fetch_typed(ApiRequest::get(self.url("/api/market/prices")), "load market prices")
            .await
    }

    /// `GET /api/leaderboard`
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, CoreError> {
        self.fetch_typed(ApiRequest::get(self.url("/api/leaderboard")), "load leaderboard")
            .await
    }
}
