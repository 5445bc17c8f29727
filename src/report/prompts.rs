pub const SYSTEM_PROMPT: &str = "You are an expert business intelligence analyst. When given a company name, provide a detailed report with the following structure:

1. 🔍 Company Overview
2. 💰 Financial Summary (Revenue, Profit, Funding, etc.)
3. 📦 Import Activity
4. 🚢 Export Activity
5. 🌍 Global Presence & Offices
6. 🚛 Freight Forwarding History
7. 📌 Actionable Insights
8. 🔗 List of References (with clickable links)

Give an in-depth business overview. Be clear and concise, and use bullet points or headings for readability. Provide references within each category itself.";

/// Returned instead of a report when the query names more than one company.
pub const CLARIFICATION_NOTICE: &str = "⚠️ Important Notice: To ensure clarity and depth in analysis, our AI system is designed to evaluate one company at a time. Please revise your query to reference a single organization for a precise and comprehensive report. 🏢";

/// Leading-paragraph phrases that mark a model apologising for stale data.
pub const FALLBACK_INDICATORS: &[&str] = &[
    "issue retrieving real-time data",
    "based on my expert knowledge",
    "latest publicly available information",
    "compiled from public sources",
    "prior to june 2024",
    "i can provide a report",
    "real-time data isn't available",
];

/// Extra system turn carrying search results; the user turn stays the raw query.
pub fn search_context_prompt(results: &str) -> String {
    format!(
        "{}\n\nUse these results as sources where relevant and cite their URLs.",
        results
    )
}
