pub mod clean;
pub mod prompts;
pub mod references;

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::company::{names_multiple_companies, CompanyMentionExtractor, CompanyMentionSet};
use crate::llm::{LlmClient, Message};
use crate::search::{self, SearchClient, SearchHit};

pub struct ReportRequest {
    pub model_name: String,
    pub query: String,
    pub allow_search: bool,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub query: String,
    pub body: String,
    pub references: Vec<String>,
    pub model: String,
    pub searched: bool,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// The query named several companies; nothing was generated.
    Clarify {
        mentions: CompanyMentionSet,
        notice: &'static str,
    },
    Report(Report),
}

/// Runs the company gate, then search + LLM for single-company queries.
pub struct ReportAgent {
    llm: Arc<LlmClient>,
    search: Option<Arc<SearchClient>>,
    extractor: Arc<CompanyMentionExtractor>,
}

impl ReportAgent {
    pub fn new(
        llm: Arc<LlmClient>,
        search: Option<Arc<SearchClient>>,
        extractor: Arc<CompanyMentionExtractor>,
    ) -> Self {
        Self {
            llm,
            search,
            extractor,
        }
    }

    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub fn llm(&self) -> &LlmClient {
        &self.llm
    }

    pub fn extractor(&self) -> &Arc<CompanyMentionExtractor> {
        &self.extractor
    }

    /// Extraction off the async workers; spaCy inference holds the GIL.
    pub async fn mentions(&self, query: &str) -> Result<CompanyMentionSet> {
        let extractor = self.extractor.clone();
        let query = query.to_string();
        Ok(tokio::task::spawn_blocking(move || extractor.extract(&query)).await?)
    }

    pub async fn generate(
        &self,
        request: &ReportRequest,
        min_response_len: usize,
    ) -> Result<ReportOutcome> {
        if !self.llm.is_allowed(&request.model_name) {
            bail!("Invalid model name selected.");
        }

        let mentions = self.mentions(&request.query).await?;
        if names_multiple_companies(&mentions) {
            info!(
                mention_count = mentions.len(),
                mentions = ?mentions,
                "Query names multiple companies, asking to narrow"
            );
            return Ok(ReportOutcome::Clarify {
                mentions,
                notice: prompts::CLARIFICATION_NOTICE,
            });
        }

        let hits = if request.allow_search {
            self.run_search(&request.query).await
        } else {
            Vec::new()
        };

        let mut messages = vec![Message::system(prompts::SYSTEM_PROMPT)];
        if !hits.is_empty() {
            messages.push(Message::system(prompts::search_context_prompt(
                &search::format_context(&hits),
            )));
        }
        messages.push(Message::user(request.query.clone()));

        let raw = self
            .llm
            .chat(&messages, Some(&request.model_name))
            .await?;
        debug!(raw_len = raw.len(), "Report draft received");

        let body = clean::clean_response(&raw);
        if !is_valid_response(&body, min_response_len) {
            warn!(
                raw_len = raw.len(),
                cleaned_len = body.len(),
                "Report rejected as empty"
            );
            bail!("AI agent could not generate a valid response.");
        }

        let references = references::collect_references(&body, &hits);
        info!(
            model = %request.model_name,
            body_len = body.len(),
            references = references.len(),
            searched = !hits.is_empty(),
            "Report generated"
        );

        Ok(ReportOutcome::Report(Report {
            query: request.query.clone(),
            body,
            references,
            model: request.model_name.clone(),
            searched: !hits.is_empty(),
            generated_at: Utc::now(),
        }))
    }

    /// Search failures degrade to an unsourced report.
    async fn run_search(&self, query: &str) -> Vec<SearchHit> {
        let Some(client) = &self.search else {
            debug!("Search requested but no search client configured");
            return Vec::new();
        };
        match client.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Web search failed, continuing without sources: {:#}", e);
                Vec::new()
            }
        }
    }
}

fn is_valid_response(body: &str, min_len: usize) -> bool {
    let trimmed = body.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min_len
}
