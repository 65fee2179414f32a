use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use secscan::{EngineError, ReasoningEngine};

/// Scripted engine double that counts invocations.
///
/// Responses are served front to back; once the script runs dry it falls
/// back to an empty finding envelope.
pub struct MockEngine {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
    rate_limited: bool,
}

impl MockEngine {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
            rate_limited: false,
        }
    }

    /// An engine whose provider always reports quota exhaustion
    pub fn rate_limited() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            rate_limited: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningEngine for MockEngine {
    async fn complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _credential: Option<&str>,
    ) -> Result<String, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.rate_limited {
            return Err(EngineError::RateLimited("quota exhausted".to_string()));
        }

        let mut responses = self.responses.lock().unwrap();
        Ok(responses
            .pop_front()
            .unwrap_or_else(|| r#"{"errors": []}"#.to_string()))
    }
}
