use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4.1-2025-04-14";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    allowed_models: Vec<String>,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn from_env() -> Result<Self> {
        let base_url = dotenv::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = dotenv::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let allowed_models = parse_model_list(
            &dotenv::var("ALLOWED_MODELS").unwrap_or_default(),
            &model,
        );
        let api_key = dotenv::var("LLM_API_KEY")
            .or_else(|_| dotenv::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());

        Self::new(base_url, model, allowed_models, api_key)
    }

    /// The default model is added to `allowed_models` when missing.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        mut allowed_models: Vec<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        let model = model.into();
        if !allowed_models.iter().any(|m| *m == model) {
            allowed_models.insert(0, model.clone());
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model,
            allowed_models,
            api_key,
        })
    }

    pub fn default_model(&self) -> &str {
        &self.model
    }

    pub fn allowed_models(&self) -> &[String] {
        &self.allowed_models
    }

    pub fn is_allowed(&self, model: &str) -> bool {
        self.allowed_models.iter().any(|m| m == model)
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        completions_endpoint(&self.base_url)
    }

    /// Non-streaming chat completion.
    pub async fn chat(&self, messages: &[Message], model_override: Option<&str>) -> Result<String> {
        let model = model_override.unwrap_or(&self.model);
        let body = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": 0.3,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("LLM request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            anyhow::bail!("LLM returned {}: {}", status, truncate(&text, 300));
        }
        let json: serde_json::Value =
            serde_json::from_str(&text).context("Failed to parse LLM JSON")?;

        // choices[0].message.content may be null
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        debug!(model, content_len = content.len(), "LLM completion");
        Ok(content)
    }
}

fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else if base.ends_with("/v1") {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/v1/chat/completions", base)
    }
}

/// Comma-separated allow-list; the default model is always allowed.
fn parse_model_list(raw: &str, default_model: &str) -> Vec<String> {
    let mut models: Vec<String> = raw
        .split(',')
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    if !models.iter().any(|m| m == default_model) {
        models.insert(0, default_model.to_string());
    }
    models
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolution() {
        assert_eq!(
            completions_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("http://localhost:1234"),
            "http://localhost:1234/v1/chat/completions"
        );
        assert_eq!(
            completions_endpoint("https://host/v1/chat/completions"),
            "https://host/v1/chat/completions"
        );
    }

    #[test]
    fn test_model_list_includes_default() {
        assert_eq!(parse_model_list("", DEFAULT_MODEL), vec![DEFAULT_MODEL]);
        assert_eq!(
            parse_model_list("gpt-4o, gpt-4o-mini,", "gpt-4o-mini"),
            vec!["gpt-4o", "gpt-4o-mini"]
        );
        assert_eq!(
            parse_model_list("gpt-4o", DEFAULT_MODEL),
            vec![DEFAULT_MODEL.to_string(), "gpt-4o".to_string()]
        );
    }

    #[test]
    fn test_new_always_allows_default_model() {
        let client = LlmClient::new("http://127.0.0.1:9", "gpt-test", vec!["gpt-other".to_string()], None)
            .unwrap();
        assert_eq!(client.default_model(), "gpt-test");
        assert!(client.is_allowed("gpt-test"));
        assert!(client.is_allowed("gpt-other"));
        assert!(!client.is_allowed("gpt-unknown"));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
