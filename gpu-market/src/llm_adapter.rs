use crate::traits::Extractor;
use crate::types::{MarketError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Settings for the extraction endpoint, read once at startup.
#[derive(Clone)]
pub struct ExtractionConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ExtractionConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_API_BASE` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value lookup. A missing or blank API
    /// key is a configuration error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_blank("OPENAI_API_KEY")
            .ok_or_else(|| MarketError::Config("OPENAI_API_KEY not set in environment variables".to_string()))?;

        Ok(Self {
            api_key,
            api_base: non_blank("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            model: non_blank("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout_seconds: 60,
        })
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// Prompt asking for the four structured fields as a JSON object.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the following structured data from the text:\n\
         - Summary: Short summary of the article\n\
         - Location: The main location, region, or country mentioned (empty if none)\n\
         - Tags: List of relevant keywords\n\
         - Actors: List of people, organizations, or companies mentioned\n\
         Text: {}\n\
         Return only a JSON object with keys: summary, location, tags, actors.",
        text
    )
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Extractor talking to an OpenAI-compatible chat completions endpoint
pub struct OpenAiExtractor {
    client: Client,
    config: ExtractionConfig,
}

impl fmt::Debug for OpenAiExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiExtractor")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

impl OpenAiExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    fn extractor_name(&self) -> String {
        format!("OpenAI ({})", self.config.model)
    }

    async fn extract(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: extraction_prompt(text),
            }],
            temperature: 0.0,
        };

        let url = format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'));
        debug!("Requesting extraction from {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| MarketError::Extraction("Response contained no choices".to_string()))
    }
}

#[derive(Debug, Clone)]
enum MockMode {
    Heuristic,
    Fixed(String),
    Failing(String),
}

/// Mock extractor for development and testing
pub struct MockExtractor {
    name: String,
    mode: MockMode,
    response_delay_ms: u64,
}

impl MockExtractor {
    /// Derives plausible fields from the text itself.
    pub fn new(name: String) -> Self {
        Self {
            name,
            mode: MockMode::Heuristic,
            response_delay_ms: 0,
        }
    }

    /// Always answers with `response`, verbatim.
    pub fn fixed(name: String, response: &str) -> Self {
        Self {
            name,
            mode: MockMode::Fixed(response.to_string()),
            response_delay_ms: 0,
        }
    }

    /// Every call fails with an extraction error.
    pub fn failing(name: String, message: &str) -> Self {
        Self {
            name,
            mode: MockMode::Failing(message.to_string()),
            response_delay_ms: 0,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.response_delay_ms = delay_ms;
        self
    }

    async fn simulate_processing(&self) {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }
    }

    fn heuristic_response(text: &str) -> String {
        let summary = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim()
            .to_string();

        let lower = text.to_lowercase();
        let location = KNOWN_LOCATIONS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, name)| *name)
            .unwrap_or("");

        let mut tags: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| word.len() > 3 && !is_stop_word(word))
            .map(|word| word.to_string())
            .collect();
        tags.sort();
        tags.dedup();
        tags.truncate(5);

        // Capitalised words stand in for named entities
        let mut actors: Vec<String> = text
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| word.len() > 2 && word.chars().next().is_some_and(|c| c.is_uppercase()))
            .map(|word| word.to_string())
            .collect();
        actors.sort();
        actors.dedup();
        actors.truncate(5);

        json!({
            "summary": summary,
            "location": location,
            "tags": tags,
            "actors": actors,
        })
        .to_string()
    }
}

const KNOWN_LOCATIONS: [(&str, &str); 6] = [
    ("europe", "Europe"),
    ("germany", "Germany"),
    ("france", "France"),
    ("united states", "US"),
    ("asia", "Asia"),
    ("japan", "Japan"),
];

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "and" | "with" | "this" | "that" | "these" | "those" | "from" | "into" | "their" | "have" | "will"
            | "about" | "more" | "than" | "your" | "also"
    )
}

#[async_trait]
impl Extractor for MockExtractor {
    fn extractor_name(&self) -> String {
        format!("Mock Extractor ({})", self.name)
    }

    async fn extract(&self, text: &str) -> Result<String> {
        self.simulate_processing().await;

        match &self.mode {
            MockMode::Heuristic => Ok(Self::heuristic_response(text)),
            MockMode::Fixed(response) => Ok(response.clone()),
            MockMode::Failing(message) => Err(MarketError::Extraction(message.clone())),
        }
    }
}
