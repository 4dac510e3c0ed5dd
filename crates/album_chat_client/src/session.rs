//! Interaction session: one owned state bundle driving the ask-answer cycle.
//! At most one query is in flight; history records successful queries only.

use crate::client::QueryClient;
use crate::messages::QueryResponse;

/// How many past queries are shown, most-recent-first. Storage is unbounded.
pub const HISTORY_DISPLAY_LIMIT: usize = 5;

/// Mutable interaction state. Starts idle; each accepted submission runs
/// loading → answered/failed, then the next submission resets it.
#[derive(Debug, Default)]
pub struct Session {
    answer: Option<QueryResponse>,
    error: Option<String>,
    loading: bool,
    /// Text of the in-flight query; appended to history on success.
    pending: Option<String>,
    history: Vec<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a submission. Returns the trimmed query text to send, or
    /// `None` when the text is blank or a query is already in flight (a
    /// submission while loading is a no-op).
    ///
    /// On accept, the previous answer and error are cleared and the session
    /// enters loading.
    pub fn begin(&mut self, text: &str) -> Option<String> {
        if self.loading {
            return None;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.answer = None;
        self.error = None;
        self.loading = true;
        self.pending = Some(trimmed.to_string());
        Some(trimmed.to_string())
    }

    /// Settle the in-flight query with a successful answer. The originally
    /// submitted text (not the backend's echo) is appended to history.
    pub fn settle_ok(&mut self, response: QueryResponse) {
        if let Some(query) = self.pending.take() {
            self.history.push(query);
        }
        self.answer = Some(response);
        self.loading = false;
    }

    /// Settle the in-flight query with a failure. History is untouched so
    /// the user can edit and resubmit the same text.
    pub fn settle_err(&mut self, message: String) {
        self.pending = None;
        self.error = Some(message);
        self.loading = false;
    }

    /// Begin, call the client, and settle. Returns whether the submission
    /// was accepted (exactly one outbound call happens per accepted
    /// submission).
    pub async fn submit(&mut self, client: &QueryClient, text: &str, k: u32) -> bool {
        let query = match self.begin(text) {
            Some(q) => q,
            None => return false,
        };
        match client.submit_query(&query, k).await {
            Ok(response) => self.settle_ok(response),
            Err(e) => self.settle_err(e.to_string()),
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn answer(&self) -> Option<&QueryResponse> {
        self.answer.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The displayed slice of history: at most 5 entries, most-recent-first.
    pub fn recent_queries(&self) -> Vec<&str> {
        self.history
            .iter()
            .rev()
            .take(HISTORY_DISPLAY_LIMIT)
            .map(String::as_str)
            .collect()
    }

    /// Look up the `n`th entry (1-based) of the displayed recent-queries
    /// list for re-submission.
    pub fn recent_entry(&self, n: usize) -> Option<&str> {
        if n == 0 {
            return None;
        }
        self.recent_queries().get(n - 1).copied()
    }
}
