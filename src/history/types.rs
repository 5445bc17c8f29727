use serde::{Deserialize, Serialize};

/// Short content hash (blake3 hex prefix) identifying a stored report.
pub type EntryId = String;

const ID_LEN: usize = 16;

/// One answered query kept in a user's session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub query: String,
    pub response: String,
    pub created_at: i64,
}

impl HistoryEntry {
    pub fn new(query: &str, response: &str) -> Self {
        let created_at = chrono::Utc::now().timestamp();
        let mut hasher = blake3::Hasher::new();
        hasher.update(query.as_bytes());
        hasher.update(&[0]);
        hasher.update(response.as_bytes());
        hasher.update(&created_at.to_le_bytes());
        let id = hasher.finalize().to_hex().as_str()[..ID_LEN].to_string();

        Self {
            id,
            query: query.to_string(),
            response: response.to_string(),
            created_at,
        }
    }

    /// First 50 characters of the query, for list views.
    pub fn preview(&self) -> String {
        let mut preview: String = self.query.chars().take(50).collect();
        if self.query.chars().count() > 50 {
            preview.push('…');
        }
        preview
    }
}
