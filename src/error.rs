use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the host boundary. The balancing core itself never fails.
#[derive(Debug, Error)]
pub enum BalancerError {
    #[error("Config parse error: {0}")]
    Config(#[source] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Player directory parse error: {0}")]
    Directory(#[source] serde_json::Error),

    #[error("Player stats parse error: {0}")]
    Records(#[source] serde_json::Error),

    #[error("unknown group `{0}` (expected teamA, teamB or unassigned)")]
    UnknownGroup(String),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl From<BalancerError> for JsValue {
    fn from(err: BalancerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
