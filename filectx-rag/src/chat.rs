//! Chat boundary to the answer-generating language model
//!
//! The model is an opaque external collaborator: it takes an ordered
//! sequence of role-tagged messages and returns one text completion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default chat model served by Ollama.
pub const DEFAULT_CHAT_MODEL: &str = "llama3.1:8b";

/// Default Ollama endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Message role in a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Errors from the answer-generation boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The external chat call failed (connection, HTTP status, or body
    /// decoding).
    #[error("answer service call failed: {source}")]
    Service {
        #[from]
        source: reqwest::Error,
    },

    /// The service answered, but not with a usable completion.
    #[error("answer service returned an invalid response: {message}")]
    InvalidResponse { message: String },
}

/// Trait for chat providers that turn a message exchange into a completion.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Produce a single text completion for the given messages.
    async fn chat(&self, messages: &[ChatMessage]) -> std::result::Result<String, ChatError>;
}

/// Configuration for a chat provider instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the chat service (no trailing path)
    pub base_url: String,
    /// Model name requested from the service
    pub model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
        }
    }
}

impl ChatConfig {
    /// Read `OLLAMA_HOST` and `LLM_MODEL` from the environment, falling back
    /// to the defaults.
    pub fn from_env() -> Self {
        Self::from_env_lookup(
            std::env::var("OLLAMA_HOST").ok(),
            std::env::var("LLM_MODEL").ok(),
        )
    }

    fn from_env_lookup(host: Option<String>, model: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = host {
            config.base_url = host;
        }
        if let Some(model) = model {
            config.model = model;
        }
        config
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatResponseMessage,
}

#[derive(Deserialize)]
struct OllamaChatResponseMessage {
    content: String,
}

/// Chat provider backed by an Ollama server's `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct OllamaChat {
    config: ChatConfig,
    client: reqwest::Client,
}

impl OllamaChat {
    /// Create a provider for the given configuration.
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// The configuration this provider was built with.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

#[async_trait]
impl ChatProvider for OllamaChat {
    async fn chat(&self, messages: &[ChatMessage]) -> std::result::Result<String, ChatError> {
        let url = format!(
            "{}/api/chat",
            self.config.base_url.trim_end_matches('/')
        );
        tracing::debug!(
            "Requesting completion from {} ({} messages)",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&OllamaChatRequest {
                model: &self.config.model,
                messages,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: OllamaChatResponse = response.json().await?;
        if body.message.content.is_empty() {
            return Err(ChatError::InvalidResponse {
                message: "empty completion returned".to_string(),
            });
        }
        Ok(body.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let system = ChatMessage::system("be brief");
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, "be brief");

        let user = ChatMessage::user("what is in a.txt?");
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_messages_serialize_with_lowercase_roles() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let json = serde_json::to_value(&messages).unwrap();
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[1]["role"], "user");
    }

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"message": {"role": "assistant", "content": "42"}, "done": true}"#;
        let parsed: OllamaChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message.content, "42");
    }

    #[test]
    fn test_config_env_lookup() {
        let config = ChatConfig::from_env_lookup(None, Some("qwen2.5:7b".to_string()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "qwen2.5:7b");
    }
}
