use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

/// Tavily web search, used to ground reports in current sources.
pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl SearchClient {
    /// `None` when `TAVILY_API_KEY` is not set.
    pub fn from_env() -> Result<Option<Self>> {
        let Some(api_key) = dotenv::var("TAVILY_API_KEY").ok().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        Self::new(api_key).map(Some)
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            endpoint: TAVILY_ENDPOINT.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the client at another Tavily-compatible endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": MAX_RESULTS,
        });
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .context("Search request failed")?
            .error_for_status()
            .context("Search returned an error status")?;
        let parsed: TavilyResponse = resp.json().await.context("Failed to parse search JSON")?;

        let mut hits = parsed.results;
        hits.truncate(MAX_RESULTS);
        debug!(query_len = query.len(), hits = hits.len(), "web search complete");
        Ok(hits)
    }
}

/// Render hits as a numbered context block for the prompt.
pub fn format_context(hits: &[SearchHit]) -> String {
    let mut out = String::from("Web search results:\n");
    for (i, hit) in hits.iter().enumerate() {
        let snippet: String = hit.content.chars().take(800).collect();
        out.push_str(&format!(
            "\n[{}] {}\nURL: {}\n{}\n",
            i + 1,
            hit.title,
            hit.url,
            snippet.trim()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tavily_response() {
        let raw = r#"{"query":"acme","results":[{"title":"Acme","url":"https://acme.test","content":"About","score":0.9},{"title":"News","url":"https://news.test"}]}"#;
        let parsed: TavilyResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[1].content, "");
    }

    #[test]
    fn test_format_context_numbers_hits() {
        let hits = vec![SearchHit {
            title: "Acme".to_string(),
            url: "https://acme.test".to_string(),
            content: "  Makes anvils.  ".to_string(),
        }];
        let ctx = format_context(&hits);
        assert!(ctx.contains("[1] Acme"));
        assert!(ctx.contains("URL: https://acme.test"));
        assert!(ctx.contains("Makes anvils."));
    }
}
