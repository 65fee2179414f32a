/// Multi-provider AI client implementation
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::providers::{EngineError, ReasoningEngine};
use crate::Config;

/// Supported AI providers for analysis requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AIProvider {
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "xai")]
    XAI,
}

impl std::fmt::Display for AIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AIProvider::Groq => "groq",
            AIProvider::OpenAI => "openai",
            AIProvider::Anthropic => "anthropic",
            AIProvider::Google => "google",
            AIProvider::XAI => "xai",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for AIProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(AIProvider::Groq),
            "openai" => Ok(AIProvider::OpenAI),
            "anthropic" => Ok(AIProvider::Anthropic),
            "google" => Ok(AIProvider::Google),
            "xai" => Ok(AIProvider::XAI),
            _ => Err(anyhow::anyhow!(
                "Invalid provider: {}. Supported: groq, openai, anthropic, google, xai",
                s
            )),
        }
    }
}

impl AIProvider {
    /// Get the default base URL for this provider
    pub fn default_base_url(&self) -> &'static str {
        match self {
            AIProvider::Groq => "https://api.groq.com/openai/v1",
            AIProvider::OpenAI => "https://api.openai.com/v1",
            AIProvider::Anthropic => "https://api.anthropic.com",
            AIProvider::Google => "https://generativelanguage.googleapis.com/v1",
            AIProvider::XAI => "https://api.x.ai/v1",
        }
    }
}

/// Universal AI client that supports multiple providers
pub struct UniversalAIClient {
    client: Client,
    config: Config,
}

impl UniversalAIClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Resolve the API key: a caller-supplied credential wins over config
    fn resolve_key<'a>(&'a self, credential: Option<&'a str>) -> &'a str {
        match credential {
            Some(key) if !key.trim().is_empty() => key,
            _ => self.config.api_key_for(self.config.provider),
        }
    }

    /// OpenAI-compatible chat completions (Groq, OpenAI, and xAI share this format)
    async fn complete_openai_compatible(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: Option<&str>,
    ) -> Result<String, EngineError> {
        let api_key = self.resolve_key(credential);
        let base_url = self.config.base_url_for(self.config.provider);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_prompt
                },
                {
                    "role": "user",
                    "content": user_prompt
                }
            ],
            "response_format": {
                "type": "json_object"
            },
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "stream": false
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let response = check_status(response).await?;

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }

        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let api_response: ChatResponse = response.json().await?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(EngineError::MissingContent)
    }

    /// Anthropic (Claude) implementation
    async fn complete_anthropic(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: Option<&str>,
    ) -> Result<String, EngineError> {
        let api_key = self.resolve_key(credential);
        let base_url = self.config.base_url_for(AIProvider::Anthropic);

        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": user_prompt
                }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system_prompt
        });

        let response = self
            .client
            .post(format!("{}/v1/messages", base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let response = check_status(response).await?;

        #[derive(Deserialize)]
        struct AnthropicResponse {
            content: Vec<Content>,
        }

        #[derive(Deserialize)]
        struct Content {
            text: String,
        }

        let api_response: AnthropicResponse = response.json().await?;

        api_response
            .content
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or(EngineError::MissingContent)
    }

    /// Google (Gemini) implementation
    async fn complete_google(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: Option<&str>,
    ) -> Result<String, EngineError> {
        let api_key = self.resolve_key(credential);
        let base_url = self.config.base_url_for(AIProvider::Google);

        let request_body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": format!("{}\n\n{}", system_prompt, user_prompt)
                        }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": self.config.temperature,
                "maxOutputTokens": self.config.max_tokens,
                "responseMimeType": "application/json"
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent?key={}",
                base_url, self.config.model, api_key
            ))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let response = check_status(response).await?;

        #[derive(Deserialize)]
        struct GoogleResponse {
            candidates: Vec<Candidate>,
        }

        #[derive(Deserialize)]
        struct Candidate {
            content: ContentPart,
        }

        #[derive(Deserialize)]
        struct ContentPart {
            parts: Vec<Part>,
        }

        #[derive(Deserialize)]
        struct Part {
            text: String,
        }

        let api_response: GoogleResponse = response.json().await?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or(EngineError::MissingContent)
    }
}

#[async_trait]
impl ReasoningEngine for UniversalAIClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        credential: Option<&str>,
    ) -> Result<String, EngineError> {
        match self.config.provider {
            AIProvider::Groq | AIProvider::OpenAI | AIProvider::XAI => {
                self.complete_openai_compatible(system_prompt, user_prompt, credential)
                    .await
            }
            AIProvider::Anthropic => {
                self.complete_anthropic(system_prompt, user_prompt, credential)
                    .await
            }
            AIProvider::Google => {
                self.complete_google(system_prompt, user_prompt, credential)
                    .await
            }
        }
    }
}

/// Map non-success statuses to typed errors, keeping 429 distinct
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let body = response.text().await.unwrap_or_default();
        return Err(EngineError::RateLimited(body));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EngineError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}
