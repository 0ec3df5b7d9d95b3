//! Morphology oracle boundary: singular/plural forms of item names.

pub mod http;
pub mod rules;
pub mod timeout;
pub mod r#trait;

pub use http::HttpMorphologyOracle;
pub use rules::RuleBasedOracle;
pub use timeout::TimeoutOracle;
pub use r#trait::{MAX_OUTPUT_GROWTH, MorphologyOracle, OracleError, validate_output};

#[cfg(test)]
pub use r#trait::MockMorphologyOracle;
