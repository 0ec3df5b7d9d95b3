//! Client for a text-to-text inference endpoint serving an inflection model.
//!
//! Request: `{"inputs": "pluralize: <phrase>"}` (or `singularize:`).
//! Response: `[{"generated_text": "<answer>"}]`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::r#trait::{MorphologyOracle, OracleError};

#[derive(Debug, Clone)]
pub struct HttpMorphologyOracle {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

impl HttpMorphologyOracle {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint), err)]
    async fn generate(&self, task: &str, phrase: &str) -> Result<String, OracleError> {
        let prompt = format!("{task}: {phrase}");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest { inputs: &prompt })
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Unavailable(format!("{status}: {body}")));
        }

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| OracleError::Degenerate(format!("unreadable response: {e}")))?;

        generations
            .into_iter()
            .next()
            .map(|g| g.generated_text)
            .ok_or_else(|| OracleError::Degenerate("no generations in response".to_string()))
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> OracleError {
        if err.is_timeout() {
            OracleError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            OracleError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl MorphologyOracle for HttpMorphologyOracle {
    async fn pluralize(&self, phrase: &str) -> Result<String, OracleError> {
        self.generate("pluralize", phrase).await
    }

    async fn singularize(&self, phrase: &str) -> Result<String, OracleError> {
        self.generate("singularize", phrase).await
    }
}
