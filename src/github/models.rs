use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET /search/repositories`
///
/// Items stay loosely typed: the harvester persists whatever fields the
/// endpoint returns, minus the ones shaping removes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Error body returned by the API on non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub documentation_url: Option<String>,
}
