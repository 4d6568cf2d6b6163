use crate::core::prompt::build_prompt;
use crate::core::response::{parse_valuation, ErrorEnvelope, GenerateContentResponse};
use crate::domain::model::{ArtworkData, ValuationResult};
use crate::domain::ports::{ConfigProvider, ValuationService};
use crate::utils::error::{Result, ValuationError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

/// 透過 Gemini `generateContent`（開啟 Google Search grounding）取得估價
pub struct GeminiValuationClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> GeminiValuationClient<C> {
    pub fn new(config: C) -> Result<Self> {
        if config.request_timeout_secs() == 0 {
            return Err(ValuationError::config(
                "service.request_timeout_secs",
                "timeout must be at least 1 second",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base_url(),
            self.config.model()
        )
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "tools": [{ "google_search": {} }],
            "generationConfig": {
                "temperature": self.config.temperature()
            }
        })
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> ValuationError {
        if e.is_timeout() {
            ValuationError::Timeout {
                seconds: self.config.request_timeout_secs(),
            }
        } else {
            ValuationError::Network(e)
        }
    }
}

/// 非 2xx 回應：盡量取出上游的 error.message
fn upstream_error(status: StatusCode, body: &str) -> ValuationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| match envelope.error.status {
            Some(code) if !envelope.error.message.is_empty() => {
                format!("{} ({})", envelope.error.message, code)
            }
            Some(code) => code,
            None => envelope.error.message,
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    ValuationError::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl<C: ConfigProvider> ValuationService for GeminiValuationClient<C> {
    async fn valuate(&self, data: &ArtworkData) -> Result<ValuationResult> {
        let prompt = build_prompt(data, &self.config);
        let endpoint = self.endpoint();

        tracing::debug!(
            "Requesting valuation from {} (model {}, prompt {} chars)",
            endpoint,
            self.config.model(),
            prompt.len()
        );

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", self.config.api_key())
            .json(&self.request_body(&prompt))
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        tracing::debug!("Valuation service response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        if !status.is_success() {
            let err = upstream_error(status, &body);
            tracing::warn!("Valuation service rejected the request: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let result = parse_valuation(&parsed, self.config.currency())?;

        tracing::debug!(
            "Parsed valuation: {} - {} {} with {} sources",
            result.estimate_low,
            result.estimate_high,
            result.currency,
            result.sources.len()
        );

        Ok(result)
    }
}
