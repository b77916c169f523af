use serde_json::Value;
use tracing::{debug, error, warn};

use super::traits::{ApiRequest, Transport};
use crate::errors::CoreError;

/// Issue `request` and classify the outcome.
///
/// - no response at all → `Network`
/// - non-2xx → `Http` (body is *not* parsed)
/// - 2xx with an empty/whitespace body → `Ok(None)`
/// - 2xx with malformed JSON → `Parse`
/// - otherwise → `Ok(Some(value))`
///
/// Every failure is logged with `context` before it is returned. Request
/// bodies are never logged, only whether one is present.
pub async fn fetch_json(
    transport: &dyn Transport,
    request: &ApiRequest,
    context: &str,
) -> Result<Option<Value>, CoreError> {
    debug!(
        context,
        method = %request.method,
        url = %request.url,
        has_body = request.body.is_some(),
        "request start"
    );

    let response = match transport.send(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(context, url = %request.url, error = %e, "network failure");
            return Err(e);
        }
    };

    debug!(
        context,
        status = response.status,
        status_text = %response.status_text,
        "response received"
    );

    if !response.is_success() {
        let err = CoreError::http(response.status, response.status_text, &response.body);
        warn!(context, error = %err, "request failed");
        return Err(err);
    }

    if response.body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            let err = CoreError::parse(&response.body);
            warn!(context, error = %e, preview = %err, "malformed JSON body");
            Err(err)
        }
    }
}
