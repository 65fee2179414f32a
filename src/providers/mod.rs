/// External service providers for AI integrations
pub mod ai;

use async_trait::async_trait;
use thiserror::Error;

pub use ai::{AIProvider, UniversalAIClient};

/// Failures at the reasoning-engine boundary.
///
/// Rate limiting is kept distinct so callers can back off instead of
/// retrying blindly.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("provider rate limit exhausted: {0}")]
    RateLimited(String),

    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("provider response carried no content")]
    MissingContent,
}

/// Opaque natural-language reasoning collaborator.
///
/// Implementations return the raw text content of the model reply; all
/// structural parsing and sanitization happens in the calling layer, which
/// treats the payload as untrusted.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: Option<&str>,
    ) -> Result<String, EngineError>;
}
