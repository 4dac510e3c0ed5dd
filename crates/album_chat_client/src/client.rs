//! HTTP client: submit a query to the backend, normalize every failure mode
//! into a displayable error, and expose a health check.

use reqwest::header::CONTENT_TYPE;

use crate::messages::{ErrorBody, QueryRequest, QueryResponse};

/// Default backend address when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "ALBUM_CHAT_API_URL";

const BODY_PREVIEW_CHARS: usize = 100;

/// Query client bound to one base URL for its lifetime.
pub struct QueryClient {
    http: reqwest::Client,
    base_url: String,
}

/// Client call error. All variants render to a single user-facing message.
#[derive(Debug)]
pub enum ClientError {
    /// Backend reachable but the response was not JSON (wrong base URL,
    /// server down behind a proxy, routing/CORS misconfiguration).
    MalformedResponse { preview: String },
    /// Backend returned a non-success status, with the JSON `detail` field
    /// when the body carried one.
    Backend { status: u16, detail: Option<String> },
    /// Request failed below the application layer (refused, DNS, timeout).
    Transport(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::MalformedResponse { preview } => write!(
                f,
                "Server returned a non-JSON response. This usually means:\n\
                 1. The API base URL is incorrect\n\
                 2. The API server is not running or not accessible\n\
                 3. There's a routing or CORS issue\n\n\
                 Response preview: {}...",
                preview
            ),
            ClientError::Backend { status, detail } => match detail {
                Some(d) => write!(f, "{}", d),
                None => write!(f, "HTTP error {}", status),
            },
            ClientError::Transport(msg) => {
                if msg.is_empty() {
                    write!(f, "Failed to connect to API server")
                } else {
                    write!(f, "{}", msg)
                }
            }
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

fn preview(text: &str) -> String {
    text.chars().take(BODY_PREVIEW_CHARS).collect()
}

impl QueryClient {
    /// Create a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one query with an advisory result limit `k`.
    ///
    /// The caller is responsible for trimming the text and rejecting empty
    /// input; this method sends whatever it is given. No retry and no
    /// timeout: the call settles when the transport does.
    pub async fn submit_query(
        &self,
        query: &str,
        k: u32,
    ) -> Result<QueryResponse, ClientError> {
        let url = format!("{}/api/query", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&QueryRequest::new(query, k))
            .send()
            .await?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        let body = response.text().await.unwrap_or_default();

        if !is_json {
            return Err(ClientError::MalformedResponse {
                preview: preview(&body),
            });
        }

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.detail);
            return Err(ClientError::Backend {
                status: status.as_u16(),
                detail,
            });
        }

        serde_json::from_str(&body).map_err(|_| ClientError::MalformedResponse {
            preview: preview(&body),
        })
    }

    /// GET `{base_url}/health` and return the parsed JSON body.
    pub async fn check_health(&self) -> Result<serde_json::Value, ClientError> {
        let url = format!("{}/health", self.base_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ClientError::Backend {
                status: response.status().as_u16(),
                detail: Some("Health check failed".to_string()),
            });
        }

        let body = response.text().await.unwrap_or_default();
        serde_json::from_str(&body).map_err(|_| ClientError::MalformedResponse {
            preview: preview(&body),
        })
    }
}
