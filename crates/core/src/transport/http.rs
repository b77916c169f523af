use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::traits::{ApiRequest, Method, RawResponse, Transport};
use crate::errors::CoreError;

/// reqwest-backed transport used against a live backend.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, CoreError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;
        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        // A body that fails mid-stream is still a transport failure.
        let body = response.text().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}
