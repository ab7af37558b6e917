use crate::store::StorageTier;

/// Errors raised by the persistence tiers and the remote session client.
///
/// The layout facade logs these and falls back; only template operations
/// return them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{tier} storage error: {message}")]
    Storage { tier: StorageTier, message: String },

    #[error("remote session error: {0}")]
    Remote(String),

    #[error("remote session returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("remote session is not configured")]
    RemoteDisabled,

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
