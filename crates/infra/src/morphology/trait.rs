use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Output longer than this many characters (beyond the input length) is treated as runaway
/// generation.
pub const MAX_OUTPUT_GROWTH: usize = 24;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("morphology oracle unavailable: {0}")]
    Unavailable(String),

    #[error("morphology oracle timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// The oracle answered, but the answer cannot be an inflection of the input.
    #[error("degenerate morphology output: {0}")]
    Degenerate(String),
}

/// Pluralizes and singularizes noun phrases.
///
/// Callers normalize the input (see `quartermaster_inventory::normalize_phrase`). The
/// answer is best-effort; callers run it through [`validate_output`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MorphologyOracle: Send + Sync {
    async fn pluralize(&self, phrase: &str) -> Result<String, OracleError>;

    async fn singularize(&self, phrase: &str) -> Result<String, OracleError>;
}

#[async_trait]
impl<O> MorphologyOracle for Arc<O>
where
    O: MorphologyOracle + ?Sized,
{
    async fn pluralize(&self, phrase: &str) -> Result<String, OracleError> {
        (**self).pluralize(phrase).await
    }

    async fn singularize(&self, phrase: &str) -> Result<String, OracleError> {
        (**self).singularize(phrase).await
    }
}

/// Reject output that is empty, spans several lines, or is far longer than the input.
/// Returns the trimmed output.
pub fn validate_output(input: &str, output: &str) -> Result<String, OracleError> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return Err(OracleError::Degenerate(format!("empty output for {input:?}")));
    }
    if trimmed.contains(['\n', '\r']) {
        return Err(OracleError::Degenerate(format!("multi-line output for {input:?}")));
    }
    if trimmed.chars().count() > input.chars().count() + MAX_OUTPUT_GROWTH {
        return Err(OracleError::Degenerate(format!("runaway output for {input:?}")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_inflections() {
        assert_eq!(validate_output("sword", " swords \n").unwrap(), "swords");
        assert_eq!(
            validate_output("potion of healing", "potions of healing").unwrap(),
            "potions of healing"
        );
    }

    #[test]
    fn rejects_degenerate_output() {
        assert!(matches!(validate_output("sword", "   "), Err(OracleError::Degenerate(_))));
        assert!(matches!(
            validate_output("sword", "swords\nand more"),
            Err(OracleError::Degenerate(_))
        ));
        let runaway = "swords ".repeat(20);
        assert!(matches!(validate_output("sword", &runaway), Err(OracleError::Degenerate(_))));
    }
}
