use tracing::{error, info};

use crate::commands::send_chunked;
use crate::company::{names_multiple_companies, CompanyMentionSet};
use crate::report::{Report, ReportOutcome, ReportRequest};
use crate::state::Context;

/// Mentions listed in a reply before the rest are summarised as a count.
const MAX_LISTED_MENTIONS: usize = 15;
const MAX_MENTION_CHARS: usize = 60;

/// Generate a company intelligence report
#[poise::command(slash_command, guild_only)]
pub async fn company(
    ctx: Context<'_>,
    #[description = "Company name (one company per request)"] query: String,
    #[description = "Augment the report with web search"] search: Option<bool>,
) -> Result<(), anyhow::Error> {
    ctx.defer().await?;

    let config = ctx.data().agent_config.read().await;
    let model_name = config.model.clone();
    let allow_search = search.unwrap_or(config.allow_search);
    let min_response_len = config.min_response_len;
    drop(config);

    info!(
        user = ctx.author().name,
        query_len = query.len(),
        model = %model_name,
        allow_search,
        "Report requested"
    );

    let request = ReportRequest {
        model_name,
        query,
        allow_search,
    };

    let outcome = match ctx.data().agent.generate(&request, min_response_len).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Report generation failed: {:#}", e);
            ctx.say(format!("❌ Report failed: {}", e)).await?;
            return Ok(());
        }
    };

    match outcome {
        ReportOutcome::Clarify { mentions, notice } => {
            send_chunked(&ctx, &format_clarification(notice, &mentions)).await?;
        }
        ReportOutcome::Report(report) => {
            let entry = ctx
                .data()
                .history
                .push(ctx.author().id.get(), &report.query, &report.body)
                .await;
            send_chunked(&ctx, &format_report(&report, &entry.id)).await?;
        }
    }

    Ok(())
}

/// Show which company mentions a query produces
#[poise::command(slash_command, guild_only)]
pub async fn mentions(
    ctx: Context<'_>,
    #[description = "Text to analyse"] query: String,
) -> Result<(), anyhow::Error> {
    let agent = &ctx.data().agent;
    let found = agent.mentions(&query).await?;

    let mut out = format!("**Mentions found:** {}\n", found.len());
    for line in listed_mentions(&found) {
        out.push_str(&format!("- {}\n", line));
    }
    out.push_str(if names_multiple_companies(&found) {
        "\nThis query would be sent back for narrowing."
    } else {
        "\nThis query would go straight to report generation."
    });
    if !agent.extractor().has_entity_recognizer() {
        out.push_str("\n_Entity model not loaded; pattern recognizers only._");
    }

    ctx.send(poise::CreateReply::default().content(out).ephemeral(true))
        .await?;
    Ok(())
}

fn format_clarification(notice: &str, mentions: &CompanyMentionSet) -> String {
    format!("{}\n\nDetected: {}", notice, listed_mentions(mentions).join(", "))
}

/// At most `MAX_LISTED_MENTIONS` code-quoted mentions, then `(+K more)`.
fn listed_mentions(mentions: &CompanyMentionSet) -> Vec<String> {
    let mut lines: Vec<String> = mentions
        .iter()
        .take(MAX_LISTED_MENTIONS)
        .map(|m| {
            if m.chars().count() > MAX_MENTION_CHARS {
                let short: String = m.chars().take(MAX_MENTION_CHARS).collect();
                format!("`{}…`", short)
            } else {
                format!("`{}`", m)
            }
        })
        .collect();
    if mentions.len() > MAX_LISTED_MENTIONS {
        lines.push(format!("(+{} more)", mentions.len() - MAX_LISTED_MENTIONS));
    }
    lines
}

fn format_report(report: &Report, entry_id: &str) -> String {
    let mut out = format!(
        "### 🧠 Company Analysis\n**Query:** {}\n\n{}",
        report.query, report.body
    );

    let uncited: Vec<&String> = report
        .references
        .iter()
        .filter(|u| !report.body.contains(u.as_str()))
        .collect();
    if !uncited.is_empty() {
        out.push_str("\n\n**Sources:**\n");
        for url in uncited {
            out.push_str(&format!("- <{}>\n", url));
        }
    }

    out.push_str(&format!(
        "\n\n_{} · web search {} · {}_\n_Saved to your history as `{}`. Use `/brief history` to find it._",
        report.model,
        if report.searched { "on" } else { "off" },
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        entry_id
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::CompanyMentionExtractor;
    use crate::report::prompts::CLARIFICATION_NOTICE;

    #[test]
    fn test_format_lists_only_uncited_sources() {
        let report = Report {
            query: "Acme".to_string(),
            body: "1. 🔍 Company Overview (https://acme.test)".to_string(),
            references: vec!["https://acme.test".to_string(), "https://news.test/acme".to_string()],
            model: "gpt".to_string(),
            searched: true,
            generated_at: chrono::Utc::now(),
        };
        let out = format_report(&report, "0123456789abcdef");
        assert!(out.starts_with("### 🧠 Company Analysis\n**Query:** Acme\n\n"));
        assert!(out.contains("**Sources:**\n- <https://news.test/acme>\n"));
        assert!(!out.contains("- <https://acme.test>"));
    }

    #[test]
    fn test_format_without_sources() {
        let report = Report {
            query: "Acme".to_string(),
            body: "Overview".to_string(),
            references: vec![],
            model: "gpt".to_string(),
            searched: false,
            generated_at: chrono::Utc::now(),
        };
        let out = format_report(&report, "0123456789abcdef");
        assert!(!out.contains("Sources"));
        assert!(out.contains("Saved to your history as `0123456789abcdef`"));
        assert!(!out.contains("#1"));
    }

    #[test]
    fn test_clarification_fits_one_message() {
        let query = (0..400usize)
            .map(|i| {
                let hi = (b'a' + (i / 26) as u8) as char;
                let lo = (b'a' + (i % 26) as u8) as char;
                format!("Name{}{}", hi, lo)
            })
            .collect::<Vec<_>>()
            .join(" and ");
        let mentions = CompanyMentionExtractor::new().extract(&query);
        assert!(mentions.len() > MAX_LISTED_MENTIONS);

        let out = format_clarification(CLARIFICATION_NOTICE, &mentions);
        assert!(out.starts_with(CLARIFICATION_NOTICE));
        assert!(out.chars().count() < 2000);
        assert!(out.ends_with(&format!("(+{} more)", mentions.len() - MAX_LISTED_MENTIONS)));
    }

    #[test]
    fn test_long_mention_shortened() {
        let long = format!("Acme{}", "x".repeat(200));
        let mentions: CompanyMentionSet = [long, "Globex".to_string()].into_iter().collect();
        let lines = listed_mentions(&mentions);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), MAX_MENTION_CHARS + 3);
        assert!(lines[0].ends_with("…`"));
        assert_eq!(lines[1], "`Globex`");
    }
}
