use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

use docqa_core::{AnswerGenerator, Config, Error, Generation, Result, RetrievedContext};

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.
Answer using ONLY the provided context.
If the answer is not in the context, say: \"I don't know based on the provided documents.\"
Keep answers concise and cite which doc you used (doc_id).";

pub const NO_ANSWER: &str = "I don't know based on the provided documents.";

const SNIPPET_CHARS: usize = 500;

/// Serialize retrieved chunks into the prompt's context block.
pub fn format_context(context: &RetrievedContext) -> String {
    context
        .iter()
        .map(|c| format!("[doc={} chunk={} score={:.3}]\n{}\n", c.doc_id, c.chunk_id, c.score, c.text))
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Offline answer: quotes the best chunk. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtractiveGenerator;

impl ExtractiveGenerator {
    pub fn answer(context: &RetrievedContext) -> String {
        let Some(top) = context.first() else {
            return NO_ANSWER.to_string();
        };
        let text = top.text.trim();
        let mut snippet: String = text.chars().take(SNIPPET_CHARS).collect();
        if text.chars().count() > SNIPPET_CHARS {
            snippet.push_str("...");
        }
        format!(
            "No LLM key detected, so here's a grounded snippet from the most relevant document:\n\n\
             Source: {} (chunk {})\n\n{}",
            top.doc_id, top.chunk_id, snippet
        )
    }
}

impl AnswerGenerator for ExtractiveGenerator {
    fn generate(&self, _question: &str, context: &RetrievedContext) -> Result<Generation> {
        let start = Instant::now();
        let answer = Self::answer(context);
        Ok(Generation { answer, used_remote: false, latency: start.elapsed() })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat-completions client.
///
/// Calls are blocking: each request runs to completion on a private
/// current-thread runtime. A timeout or transport failure is returned as
/// `GenerationBackend` and is not retried.
pub struct RemoteGenerator {
    client: Client,
    runtime: Runtime,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl RemoteGenerator {
    pub fn new(base_url: &str, api_key: &str, model: &str, temperature: f32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::GenerationBackend(format!("cannot build http client: {e}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            client,
            runtime,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
        })
    }

    pub fn from_config(config: &Config, api_key: &str) -> Result<Self> {
        Self::new(
            &config.openai_base_url,
            api_key,
            config.remote_model(),
            config.temperature,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    async fn chat(&self, question: &str, context: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": format!("Context:\n{context}\n\nQuestion:\n{question}") },
            ],
            "temperature": self.temperature,
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::GenerationBackend(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(Error::GenerationBackend(format!("{} returned {status}: {}", self.endpoint, text.trim())));
        }

        let payload: ChatResponse = res
            .json()
            .await
            .map_err(|e| Error::GenerationBackend(format!("unreadable completion: {e}")))?;
        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::GenerationBackend("completion has no choices".to_string()))?;
        choice
            .message
            .content
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::GenerationBackend("completion has no content".to_string()))
    }
}

impl AnswerGenerator for RemoteGenerator {
    fn generate(&self, question: &str, context: &RetrievedContext) -> Result<Generation> {
        let prompt_context = format_context(context);
        let start = Instant::now();
        let answer = self.runtime.block_on(self.chat(question, &prompt_context))?;
        let latency = start.elapsed();
        debug!(model = %self.model, elapsed_ms = latency.as_millis() as u64, "remote answer");
        Ok(Generation { answer, used_remote: true, latency })
    }
}

/// Remote generator when an API key is configured, extractive otherwise.
pub fn select_generator(config: &Config) -> Result<Box<dyn AnswerGenerator>> {
    match config.api_key() {
        Some(key) => {
            info!(model = %config.remote_model(), "using remote generator");
            Ok(Box::new(RemoteGenerator::from_config(config, key)?))
        }
        None => {
            warn!("no API key configured, answers will be extractive");
            Ok(Box::new(ExtractiveGenerator))
        }
    }
}
