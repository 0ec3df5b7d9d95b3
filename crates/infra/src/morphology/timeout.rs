use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::r#trait::{MorphologyOracle, OracleError};

/// Bounds every call of the wrapped oracle. An elapsed call is [`OracleError::Timeout`].
#[derive(Debug, Clone)]
pub struct TimeoutOracle<O> {
    inner: O,
    limit: Duration,
}

impl<O> TimeoutOracle<O> {
    pub fn new(inner: O, limit: Duration) -> Self {
        Self { inner, limit }
    }

    fn elapsed(&self, task: &str, phrase: &str) -> OracleError {
        let after_ms = self.limit.as_millis() as u64;
        warn!(task, phrase, after_ms, "morphology oracle call timed out");
        OracleError::Timeout { after_ms }
    }
}

#[async_trait]
impl<O> MorphologyOracle for TimeoutOracle<O>
where
    O: MorphologyOracle,
{
    async fn pluralize(&self, phrase: &str) -> Result<String, OracleError> {
        tokio::time::timeout(self.limit, self.inner.pluralize(phrase))
            .await
            .map_err(|_| self.elapsed("pluralize", phrase))?
    }

    async fn singularize(&self, phrase: &str) -> Result<String, OracleError> {
        tokio::time::timeout(self.limit, self.inner.singularize(phrase))
            .await
            .map_err(|_| self.elapsed("singularize", phrase))?
    }
}
