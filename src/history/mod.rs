pub mod types;

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use types::HistoryEntry;

pub const DEFAULT_LIMIT: usize = 50;

/// Per-user (query, report) pairs for the lifetime of the process.
///
/// Indices handed to users are 1-based in display order, newest first.
pub struct ChatHistory {
    entries: RwLock<HashMap<u64, Vec<HistoryEntry>>>,
    limit: usize,
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl ChatHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            limit: limit.max(1),
        }
    }

    /// `HISTORY_LIMIT` or the default.
    pub fn from_env() -> Self {
        let limit = dotenv::var("HISTORY_LIMIT")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_LIMIT);
        Self::new(limit)
    }

    pub async fn push(&self, user_id: u64, query: &str, response: &str) -> HistoryEntry {
        let entry = HistoryEntry::new(query, response);
        let mut map = self.entries.write().await;
        let list = map.entry(user_id).or_default();
        list.push(entry.clone());
        if list.len() > self.limit {
            let overflow = list.len() - self.limit;
            list.drain(..overflow);
        }
        debug!(user_id, entry_id = %entry.id, count = list.len(), "history entry stored");
        entry
    }

    /// Newest first.
    pub async fn list(&self, user_id: u64) -> Vec<HistoryEntry> {
        let map = self.entries.read().await;
        map.get(&user_id)
            .map(|l| l.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn get(&self, user_id: u64, index: usize) -> Option<HistoryEntry> {
        let map = self.entries.read().await;
        let list = map.get(&user_id)?;
        let pos = position(list.len(), index)?;
        list.get(pos).cloned()
    }

    pub async fn delete(&self, user_id: u64, index: usize) -> Option<HistoryEntry> {
        let mut map = self.entries.write().await;
        let list = map.get_mut(&user_id)?;
        let pos = position(list.len(), index)?;
        let removed = list.remove(pos);
        debug!(user_id, entry_id = %removed.id, "history entry deleted");
        Some(removed)
    }

    /// Returns how many entries were dropped.
    pub async fn clear(&self, user_id: u64) -> usize {
        let mut map = self.entries.write().await;
        map.remove(&user_id).map(|l| l.len()).unwrap_or(0)
    }
}

/// Map a 1-based newest-first index onto storage order.
fn position(len: usize, index: usize) -> Option<usize> {
    if index == 0 || index > len {
        None
    } else {
        Some(len - index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_newest_first() {
        let history = ChatHistory::default();
        history.push(1, "Acme", "first").await;
        history.push(1, "Globex", "second").await;

        let list = history.list(1).await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].query, "Globex");
        assert_eq!(history.get(1, 1).await.unwrap().response, "second");
        assert_eq!(history.get(1, 2).await.unwrap().response, "first");
        assert!(history.get(1, 0).await.is_none());
        assert!(history.get(1, 3).await.is_none());
    }

    #[tokio::test]
    async fn test_users_isolated() {
        let history = ChatHistory::default();
        history.push(1, "Acme", "a").await;
        assert!(history.list(2).await.is_empty());
        assert!(history.get(2, 1).await.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_display_index() {
        let history = ChatHistory::default();
        history.push(7, "Acme", "a").await;
        history.push(7, "Globex", "b").await;
        history.push(7, "Initech", "c").await;

        let removed = history.delete(7, 2).await.unwrap();
        assert_eq!(removed.query, "Globex");
        let queries: Vec<String> = history.list(7).await.into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["Initech", "Acme"]);
        assert!(history.delete(7, 5).await.is_none());
    }

    #[tokio::test]
    async fn test_limit_evicts_oldest() {
        let history = ChatHistory::new(2);
        history.push(1, "one", "1").await;
        history.push(1, "two", "2").await;
        history.push(1, "three", "3").await;
        let queries: Vec<String> = history.list(1).await.into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["three", "two"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let history = ChatHistory::default();
        history.push(3, "Acme", "a").await;
        history.push(3, "Acme", "a").await;
        assert_eq!(history.clear(3).await, 2);
        assert_eq!(history.clear(3).await, 0);
        assert!(history.list(3).await.is_empty());
    }
}
