use crate::state::Context;

/// Configure report parameters (admin only)
#[poise::command(slash_command, guild_only)]
pub async fn config(
    ctx: Context<'_>,
    #[description = "model | allow_search | min_response_len"] param: Option<String>,
    #[description = "New value"] value: Option<String>,
) -> Result<(), anyhow::Error> {
    let user_id = ctx.author().id.get();
    if !ctx.data().is_admin(user_id) {
        ctx.say("This command is admin-only.").await?;
        return Ok(());
    }

    match (param.as_deref(), value) {
        // Show current config
        (None, _) => {
            let config = ctx.data().agent_config.read().await;
            let agent = &ctx.data().agent;
            ctx.say(format!(
                "**Report Configuration:**\n\
                 `model`: {}\n\
                 `allow_search`: {} (search client {})\n\
                 `min_response_len`: {}\n\
                 company suffixes: {}\n\
                 entity model: {}",
                config.model,
                config.allow_search,
                if agent.search_enabled() { "configured" } else { "missing" },
                config.min_response_len,
                agent.extractor().suffixes().len(),
                if agent.extractor().has_entity_recognizer() { "loaded" } else { "not loaded" },
            ))
            .await?;
        }
        // Set a parameter
        (Some(key), Some(val)) => {
            let reply = apply(&ctx, key, val.trim()).await;
            ctx.say(reply).await?;
        }
        (Some(_), None) => {
            ctx.say("Provide both `param` and `value`. Example: `/brief config allow_search true`")
                .await?;
        }
    }

    Ok(())
}

async fn apply(ctx: &Context<'_>, key: &str, val: &str) -> String {
    match key {
        "model" => {
            let allowed = ctx.data().agent.llm().allowed_models();
            if !allowed.iter().any(|m| m == val) {
                return format!("`{}` is not an allowed model. Allowed: {}", val, allowed.join(", "));
            }
            ctx.data().agent_config.write().await.model = val.to_string();
            format!("`model` set to {}", val)
        }
        "allow_search" => match parse_bool(val) {
            Some(b) => {
                ctx.data().agent_config.write().await.allow_search = b;
                format!("`allow_search` set to {}", b)
            }
            None => format!("`{}` is not a boolean (use true/false)", val),
        },
        "min_response_len" => match val.parse::<usize>() {
            Ok(n) => {
                ctx.data().agent_config.write().await.min_response_len = n;
                format!("`min_response_len` set to {}", n)
            }
            Err(_) => format!("`{}` is not a number", val),
        },
        _ => format!(
            "Unknown param `{}`. Valid: `model`, `allow_search`, `min_response_len`",
            key
        ),
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
