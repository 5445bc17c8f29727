use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::history::ChatHistory;
use crate::report::ReportAgent;

/// Report parameters (admins can modify at runtime).
pub struct AgentConfig {
    pub model: String,
    /// Used when `/brief company` is called without `search`.
    pub allow_search: bool,
    pub min_response_len: usize,
}

impl AgentConfig {
    pub fn new(model: impl Into<String>, allow_search: bool) -> Self {
        Self {
            model: model.into(),
            allow_search,
            min_response_len: 10,
        }
    }
}

pub struct AppState {
    pub agent: Arc<ReportAgent>,
    pub history: Arc<ChatHistory>,
    pub admin_ids: HashSet<u64>,
    pub agent_config: Arc<RwLock<AgentConfig>>,
    pub share_base: String,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
