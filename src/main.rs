use std::collections::HashSet;
use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tokio::sync::RwLock;
use tracing::{error, info, Level};

use customer_brief::commands;
use customer_brief::company::{CompanyMentionExtractor, SpacyRecognizer, SuffixList};
use customer_brief::export;
use customer_brief::history::ChatHistory;
use customer_brief::llm::LlmClient;
use customer_brief::report::ReportAgent;
use customer_brief::search::SearchClient;
use customer_brief::state::{AgentConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let token = dotenv::var("DISCORD_TOKEN")
        .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN required"))?;
    let guild_id: Option<serenity::GuildId> = dotenv::var("DISCORD_GUILD_ID")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(serenity::GuildId::new);

    // Company gate: suffix vocabulary plus the optional spaCy model, resolved once
    let suffixes = SuffixList::from_env();
    info!(count = suffixes.len(), "Company suffixes configured");
    let mut extractor = CompanyMentionExtractor::new().with_suffixes(suffixes);
    let spacy = tokio::task::spawn_blocking(SpacyRecognizer::from_env).await?;
    if let Some(recognizer) = spacy {
        extractor = extractor.with_entity_recognizer(Arc::new(recognizer));
    }
    info!(
        entity_recognizer = extractor.has_entity_recognizer(),
        "Company mention extractor ready"
    );

    // Init LLM client
    let llm_client = Arc::new(LlmClient::from_env()?);
    info!(
        model = llm_client.default_model(),
        allowed = ?llm_client.allowed_models(),
        "LLM client initialized"
    );

    let search_client = SearchClient::from_env()?.map(Arc::new);
    info!(enabled = search_client.is_some(), "Web search");

    let agent_config = AgentConfig::new(llm_client.default_model(), search_client.is_some());
    let agent = Arc::new(ReportAgent::new(
        llm_client,
        search_client,
        Arc::new(extractor),
    ));

    // Parse admin user IDs from env
    let admin_ids: HashSet<u64> = dotenv::var("ADMIN_USER_IDS")
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect();
    if !admin_ids.is_empty() {
        info!(count = admin_ids.len(), "Admin users configured");
    }

    let app_state = AppState {
        agent,
        history: Arc::new(ChatHistory::from_env()),
        admin_ids,
        agent_config: Arc::new(RwLock::new(agent_config)),
        share_base: export::share_base_from_env(),
    };

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::brief()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting CustomerBrief Discord bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
