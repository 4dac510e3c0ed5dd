//! JSON types for the backend contract: `POST /api/query` and its responses.

use serde::{Deserialize, Serialize};

/// How many supporting results the backend should consider. Advisory only.
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

/// Client → server: query request body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
    pub k: u32,
}

impl<'a> QueryRequest<'a> {
    pub fn new(query: &'a str, k: u32) -> Self {
        Self { query, k }
    }
}

/// Routing metadata attached to an answer. Produced entirely by the backend;
/// the client passes it through for display.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Routing {
    /// Query classification label. The backend has sent this under both
    /// `query_type` and `type` across revisions; accept either.
    #[serde(alias = "type")]
    pub query_type: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub albums: Vec<String>,
    pub confidence: f64,
    #[serde(default)]
    pub method: Option<String>,
}

impl Routing {
    /// Confidence rendered as a rounded percentage for display.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Server → client: successful answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub answer: String,
    #[serde(default)]
    pub routing: Option<Routing>,
}

/// Server → client: optional JSON error body on non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
