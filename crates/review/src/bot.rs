//! Chat-completion bots.
//!
//! The pipeline only talks to [`ChatBot`]; [`OpenAiBot`] is the production
//! implementation against the OpenAI chat completions endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::options::{BotOptions, ReviewOptions};

/// One answer from a chat model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// Trimmed answer text. Empty when the model returned nothing.
    pub text: String,
}

#[async_trait]
pub trait ChatBot: Send + Sync {
    async fn chat(&self, message: &str) -> Result<ChatReply, ReviewError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Build the system prompt sent ahead of every user message.
pub fn system_message(options: &ReviewOptions, bot: &BotOptions, current_date: &str) -> String {
    format!(
        "{}\nKnowledge cutoff: {}\nCurrent date: {}\n\nIMPORTANT: Entire response must be in the language with ISO code: {}",
        options.system_message, bot.token_limits.knowledge_cut_off, current_date, options.language
    )
}

#[derive(Debug, Clone)]
pub struct OpenAiBot {
    client: reqwest::Client,
    api_key: String,
    api_org: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    system_message: String,
}

impl OpenAiBot {
    /// Create a bot for one model. Fails when no API key is configured.
    pub fn new(
        client: reqwest::Client,
        api_key: &str,
        api_org: Option<&str>,
        options: &ReviewOptions,
        bot: BotOptions,
    ) -> Result<Self, ReviewError> {
        if api_key.trim().is_empty() {
            return Err(ReviewError::MissingCredential("OPENAI_API_KEY"));
        }

        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        let system_message = system_message(options, &bot, &today);

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_org: api_org.filter(|o| !o.is_empty()).map(str::to_string),
            endpoint: format!("{}/chat/completions", options.api_base_url.trim_end_matches('/')),
            model: bot.model,
            max_tokens: bot.token_limits.response_tokens,
            temperature: options.model_temperature,
            system_message,
        })
    }
}

#[async_trait]
impl ChatBot for OpenAiBot {
    #[tracing::instrument(skip_all, fields(model = %self.model, prompt_chars = message.len()))]
    async fn chat(&self, message: &str) -> Result<ChatReply, ReviewError> {
        if message.is_empty() {
            return Ok(ChatReply::default());
        }

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_message,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(org) = &self.api_org {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "OpenAI returned an error");
            return Err(ReviewError::Api {
                service: "OpenAI",
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        tracing::debug!(response_chars = text.len(), "Chat completion received");

        Ok(ChatReply { text })
    }
}
