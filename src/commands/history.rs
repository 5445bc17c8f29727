use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::send_chunked;
use crate::export;
use crate::history::types::HistoryEntry;
use crate::state::Context;

/// List your reports from this session
#[poise::command(slash_command, guild_only)]
pub async fn history(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let entries = ctx.data().history.list(ctx.author().id.get()).await;

    if entries.is_empty() {
        ctx.say("No reports yet. Use `/brief company` to create one.")
            .await?;
        return Ok(());
    }

    let mut output = String::from("**Chat History**\n\n");
    for (i, entry) in entries.iter().enumerate() {
        output.push_str(&format!("`{}` • {} · _{}_\n", i + 1, entry.preview(), entry.id));
    }
    output.push_str("\nUse `/brief view`, `/brief download`, `/brief share` or `/brief delete` with a number.");

    send_chunked(&ctx, &output).await
}

/// Show a saved report again
#[poise::command(slash_command, guild_only)]
pub async fn view(
    ctx: Context<'_>,
    #[description = "Number from /brief history (1 = newest)"] index: u32,
) -> Result<(), anyhow::Error> {
    let Some(entry) = lookup(&ctx, index).await? else {
        return Ok(());
    };
    let text = format!(
        "### 🧠 Company Analysis\n**Query:** {}\n\n{}",
        entry.query, entry.response
    );
    send_chunked(&ctx, &text).await
}

/// Download a saved report as a document
#[poise::command(slash_command, guild_only)]
pub async fn download(
    ctx: Context<'_>,
    #[description = "Number from /brief history (1 = newest)"] index: u32,
) -> Result<(), anyhow::Error> {
    let Some(entry) = lookup(&ctx, index).await? else {
        return Ok(());
    };
    let filename = export::document_filename(&entry.query);
    let document = export::render_document(&entry);

    info!(
        user = ctx.author().name,
        entry_id = %entry.id,
        filename,
        size = document.len(),
        "Report exported"
    );

    let reply = poise::CreateReply::default()
        .content(format!("📄 **{}**", entry.preview()))
        .attachment(serenity::CreateAttachment::bytes(
            document.into_bytes(),
            filename,
        ));
    ctx.send(reply).await?;
    Ok(())
}

/// Get a shareable link for a saved report
#[poise::command(slash_command, guild_only)]
pub async fn share(
    ctx: Context<'_>,
    #[description = "Number from /brief history (1 = newest)"] index: u32,
) -> Result<(), anyhow::Error> {
    let Some(entry) = lookup(&ctx, index).await? else {
        return Ok(());
    };
    let link = export::share_link(&ctx.data().share_base, &entry);
    ctx.say(format!("🔗 Shareable link for **{}**: {}", entry.preview(), link))
        .await?;
    Ok(())
}

/// Delete a saved report
#[poise::command(slash_command, guild_only)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Number from /brief history (1 = newest)"] index: u32,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    match ctx.data().history.delete(user_id, index as usize).await {
        Some(entry) => {
            ctx.say(format!("🗑 Deleted **{}**.", entry.preview())).await?;
        }
        None => {
            ctx.say(format!("No report #{} in your history.", index))
                .await?;
        }
    }
    Ok(())
}

/// Clear your session history
#[poise::command(slash_command, guild_only)]
pub async fn clear(ctx: Context<'_>) -> Result<(), anyhow::Error> {
    let removed = ctx.data().history.clear(ctx.author().id.get()).await;
    ctx.say(format!("Session cleared ({} report(s) removed).", removed))
        .await?;
    Ok(())
}

/// Fetch an entry, telling the user when the index is out of range.
async fn lookup(ctx: &Context<'_>, index: u32) -> Result<Option<HistoryEntry>, anyhow::Error> {
    let entry = ctx
        .data()
        .history
        .get(ctx.author().id.get(), index as usize)
        .await;
    if entry.is_none() {
        ctx.say(format!(
            "No report #{} in your history. Use `/brief history` to see what's saved.",
            index
        ))
        .await?;
    }
    Ok(entry)
}
