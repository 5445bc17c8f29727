use crate::history::types::HistoryEntry;

pub const DEFAULT_SHARE_BASE: &str = "https://mocksharelink.com";

/// Longest file-name stem, in chars.
const MAX_SLUG_CHARS: usize = 80;

/// Markdown document for a stored report.
pub fn render_document(entry: &HistoryEntry) -> String {
    let created = chrono::DateTime::from_timestamp(entry.created_at, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();

    let mut doc = String::from("# Company Insights\n\n");
    doc.push_str(&format!("**Company Query:** {}\n\n", entry.query));
    if !created.is_empty() {
        doc.push_str(&format!("_Generated {}_\n\n", created));
    }
    doc.push_str("## Company Analysis\n\n");
    doc.push_str(entry.response.trim());
    doc.push('\n');
    doc
}

/// `acme_corp.md`-style file name derived from the query.
pub fn document_filename(query: &str) -> String {
    let slug: String = query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let slug: String = slug.trim_matches('_').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "report.md".to_string()
    } else {
        format!("{}.md", slug)
    }
}

/// Link under which a report would be shared. Nothing is uploaded.
pub fn share_link(base: &str, entry: &HistoryEntry) -> String {
    format!("{}/report/{}", base.trim_end_matches('/'), entry.id)
}

pub fn share_base_from_env() -> String {
    dotenv::var("SHARE_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SHARE_BASE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> HistoryEntry {
        HistoryEntry {
            id: "0123456789abcdef".to_string(),
            query: "Acme Corp".to_string(),
            response: "1. 🔍 Company Overview\n- Anvils\n".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_document_layout() {
        let doc = render_document(&entry());
        assert!(doc.starts_with("# Company Insights\n\n**Company Query:** Acme Corp\n\n"));
        assert!(doc.contains("_Generated 1970-01-01 00:00 UTC_"));
        assert!(doc.ends_with("## Company Analysis\n\n1. 🔍 Company Overview\n- Anvils\n"));
    }

    #[test]
    fn test_filename_slug() {
        assert_eq!(document_filename("Acme Corp!"), "acme_corp.md");
        assert_eq!(document_filename("  ??  "), "report.md");
        assert_eq!(document_filename("Société Générale"), "société_générale.md");
    }

    #[test]
    fn test_filename_length_capped() {
        let name = document_filename(&"Acme Corp ".repeat(600));
        assert!(name.ends_with(".md"));
        assert!(name.chars().count() <= MAX_SLUG_CHARS + 3);
        assert!(name.starts_with("acme_corp_acme_corp"));
        assert!(!name.contains("_.md"));

        let wide = document_filename(&"é".repeat(500));
        assert_eq!(wide, format!("{}.md", "é".repeat(MAX_SLUG_CHARS)));
    }

    #[test]
    fn test_share_link() {
        assert_eq!(
            share_link("https://share.test/", &entry()),
            "https://share.test/report/0123456789abcdef"
        );
    }
}
