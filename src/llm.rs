use crate::config::{HostedSettings, LocalSettings, ProviderSettings};
use crate::prompt::{Conversation, Message};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Sampling temperature sent to the local model server.
pub const LOCAL_TEMPERATURE: f32 = 0.7;

/// `max_tokens` value the local server reads as "no limit".
pub const LOCAL_UNLIMITED_TOKENS: i64 = -1;

/// Why a provider call produced no text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}: {body}")]
    Status {
        provider: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {provider} response JSON: {source}")]
    Decode {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no choices in {provider} response")]
    NoChoices { provider: String },

    #[error("{provider} returned an empty completion")]
    EmptyContent { provider: String },
}

pub type GenerationResult = Result<String, GenerationError>;

pub trait CompletionProvider {
    /// Human-readable name used in traces and error messages.
    fn name(&self) -> &str;

    /// Makes exactly one request. Transport and protocol problems come back
    /// as `Err`; nothing panics.
    fn generate(&self, conversation: &Conversation, max_tokens: i64, verbose: bool) -> GenerationResult;
}

pub fn build_provider(settings: ProviderSettings) -> Box<dyn CompletionProvider> {
    match settings {
        ProviderSettings::Hosted(hosted) => Box::new(HostedProvider::new(hosted)),
        ProviderSettings::Local(local) => Box::new(LocalProvider::new(local)),
    }
}

/// Token limit policy for the local server.
///
/// Positive values pass through. Zero or negative means "no limit", sent as
/// `-1` rather than `0`. The hosted provider has no such translation and
/// forwards the value as given.
pub fn local_token_limit(max_tokens: i64) -> i64 {
    if max_tokens > 0 {
        max_tokens
    } else {
        LOCAL_UNLIMITED_TOKENS
    }
}

pub struct HostedProvider {
    client: Client,
    settings: HostedSettings,
}

impl HostedProvider {
    pub fn new(settings: HostedSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: HostedSettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

impl CompletionProvider for HostedProvider {
    fn name(&self) -> &str {
        "hosted API"
    }

    fn generate(&self, conversation: &Conversation, max_tokens: i64, verbose: bool) -> GenerationResult {
        let req = HostedChatRequest {
            model: &self.settings.model,
            messages: conversation.messages(),
            max_tokens,
        };
        let builder = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&req);
        send_chat(self.name(), builder, verbose)
    }
}

pub struct LocalProvider {
    client: Client,
    settings: LocalSettings,
}

impl LocalProvider {
    pub fn new(settings: LocalSettings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(client: Client, settings: LocalSettings) -> Self {
        Self { client, settings }
    }
}

impl CompletionProvider for LocalProvider {
    fn name(&self) -> &str {
        "local model"
    }

    fn generate(&self, conversation: &Conversation, max_tokens: i64, verbose: bool) -> GenerationResult {
        let req = LocalChatRequest {
            model: &self.settings.model,
            messages: conversation.messages(),
            temperature: LOCAL_TEMPERATURE,
            max_tokens: local_token_limit(max_tokens),
            stream: false,
        };
        let builder = self.client.post(&self.settings.url).json(&req);
        send_chat(self.name(), builder, verbose)
    }
}

#[derive(Serialize)]
struct HostedChatRequest<'a> {
    model: &'a str,
    messages: [&'a Message; 2],
    max_tokens: i64,
}

#[derive(Serialize)]
struct LocalChatRequest<'a> {
    model: &'a str,
    messages: [&'a Message; 2],
    temperature: f32,
    max_tokens: i64,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

fn send_chat(provider: &str, builder: RequestBuilder, verbose: bool) -> GenerationResult {
    let transport = |source| GenerationError::Transport {
        provider: provider.to_string(),
        source,
    };

    if verbose {
        info!("Sending request to {}...", provider);
    }
    let resp = builder.send().map_err(transport)?;
    if verbose {
        info!("Received response from {}.", provider);
    }

    let status = resp.status();
    let body = resp.text().map_err(transport)?;
    if !status.is_success() {
        return Err(GenerationError::Status {
            provider: provider.to_string(),
            status,
            body,
        });
    }

    parse_completion(provider, &body)
}

fn parse_completion(provider: &str, body: &str) -> GenerationResult {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|source| GenerationError::Decode {
        provider: provider.to_string(),
        source,
    })?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::NoChoices {
            provider: provider.to_string(),
        })?;

    let content = choice.message.content.trim();
    if content.is_empty() {
        return Err(GenerationError::EmptyContent {
            provider: provider.to_string(),
        });
    }
    Ok(content.to_string())
}
