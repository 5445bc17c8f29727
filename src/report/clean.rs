use std::sync::LazyLock;

use regex::Regex;

use super::prompts::FALLBACK_INDICATORS;

const ANALYSIS_HEADING: &str = "🧠 Company Analysis";

static FIRST_SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*1\.\s*(?:🔍|[A-Z])").expect("first section regex is valid")
});

/// Drop the first paragraph when it is a "no real-time data" disclaimer.
pub fn strip_disclaimer(response: &str) -> String {
    let paragraphs: Vec<&str> = response.trim().split("\n\n").collect();
    let first = paragraphs[0].to_lowercase();

    let rest = if FALLBACK_INDICATORS.iter().any(|k| first.contains(k)) {
        &paragraphs[1..]
    } else {
        &paragraphs[..]
    };
    rest.join("\n\n").trim().to_string()
}

/// Remove chatter between a "🧠 Company Analysis" heading and section 1.
pub fn strip_analysis_preamble(response: &str) -> String {
    let Some(idx) = response.find(ANALYSIS_HEADING) else {
        return response.trim().to_string();
    };
    let heading_end = idx + ANALYSIS_HEADING.len();
    let rest = &response[heading_end..];
    match FIRST_SECTION_RE.find(rest) {
        Some(m) => format!(
            "{}\n\n{}",
            &response[..heading_end],
            rest[m.start()..].trim_start()
        )
        .trim()
        .to_string(),
        None => response.trim().to_string(),
    }
}

/// Both cleaning passes, disclaimer first.
pub fn clean_response(response: &str) -> String {
    strip_analysis_preamble(&strip_disclaimer(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disclaimer_removed() {
        let raw = "I encountered an issue retrieving real-time data, but here is a report.\n\n1. 🔍 Company Overview\nAcme makes anvils.";
        assert_eq!(
            strip_disclaimer(raw),
            "1. 🔍 Company Overview\nAcme makes anvils."
        );
    }

    #[test]
    fn test_disclaimer_match_is_case_insensitive() {
        let raw = "Based On My Expert Knowledge:\n\nBody";
        assert_eq!(strip_disclaimer(raw), "Body");
    }

    #[test]
    fn test_plain_response_kept() {
        let raw = "  1. 🔍 Company Overview\n\nAcme is based in Ohio.  ";
        assert_eq!(strip_disclaimer(raw), "1. 🔍 Company Overview\n\nAcme is based in Ohio.");
    }

    #[test]
    fn test_only_disclaimer_leaves_empty() {
        assert_eq!(strip_disclaimer("I can provide a report later."), "");
    }

    #[test]
    fn test_preamble_removed() {
        let raw = "🧠 Company Analysis\nSure! Here's what I found about Acme.\n\n1. 🔍 Company Overview\n- Anvils";
        assert_eq!(
            strip_analysis_preamble(raw),
            "🧠 Company Analysis\n\n1. 🔍 Company Overview\n- Anvils"
        );
    }

    #[test]
    fn test_preamble_without_sections_untouched() {
        let raw = "🧠 Company Analysis\nNothing numbered here.";
        assert_eq!(strip_analysis_preamble(raw), raw);
    }

    #[test]
    fn test_clean_response_runs_both() {
        let raw = "Compiled from public sources.\n\n🧠 Company Analysis\nIntro\n1. Company Overview";
        assert_eq!(clean_response(raw), "🧠 Company Analysis\n\n1. Company Overview");
    }
}
