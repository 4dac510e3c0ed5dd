//! Album chat client library (config, HTTP query client, interaction session).
//! Shared by the `album-chat` terminal binary.

pub mod client;
pub mod config;
pub mod messages;
pub mod session;

pub use client::{ClientError, QueryClient, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use config::{default_config_path, resolve_base_url, ApiSection, Config, ConfigError, QuerySection};
pub use messages::{QueryRequest, QueryResponse, Routing, DEFAULT_RESULT_LIMIT};
pub use session::{Session, HISTORY_DISPLAY_LIMIT};
