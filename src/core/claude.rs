// claude resolver - anthropic messages api

use crate::Error;
use crate::core::resolver::{Message, Resolver, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

pub struct Claude {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: Option<f32>,
}

// what we send to claude
#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<&'a Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

// what claude sends back
#[derive(Deserialize)]
struct Response {
    content: Vec<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl Claude {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: 1024,
            temperature: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Resolver for Claude {
    fn model(&self) -> &str {
        &self.model
    }

    async fn query(&self, history: &[Message]) -> Result<Vec<String>, Error> {
        // the messages api takes system prompts out of band
        let system: Vec<&str> = history
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let request = Request {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages: history.iter().filter(|m| m.role != Role::System).collect(),
            temperature: self.temperature,
        };

        debug!(model = %self.model, messages = request.messages.len(), "querying claude");

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::ResolverQuery(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ResolverQuery(format!("claude returned {status}: {body}")));
        }

        let response: Response = response
            .json()
            .await
            .map_err(|e| Error::ResolverQuery(e.to_string()))?;

        Ok(response
            .content
            .into_iter()
            .filter(|c| c.kind == "text")
            .map(|c| c.text.trim().to_string())
            .collect())
    }
}
