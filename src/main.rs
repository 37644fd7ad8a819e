// This is the entry point of the moderation bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (AWS Comprehend, term files)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::moderation::{ExplicitTermSet, ModerationService};
use crate::discord::message_handler::handle_message_for_moderation;
use crate::discord::{Data, Error};
use crate::infra::moderation::term_file;
use crate::infra::sentiment::ComprehendClient;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const DEFAULT_TERMS_FILE: &str = "data/explicit_terms.txt";

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if data.watch_messages {
            if let Err(e) = handle_message_for_moderation(ctx, new_message, &*data.moderation).await
            {
                tracing::error!("Error moderating message: {}", e);
            }
        }
    }

    Ok(())
}

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("Missing {} environment variable!", name))
}

/// Build the explicit-term set from the term file and `EXPLICIT_TERMS`.
fn load_explicit_terms() -> anyhow::Result<ExplicitTermSet> {
    let terms = ExplicitTermSet::new();

    match std::env::var("EXPLICIT_TERMS_FILE") {
        Ok(path) => terms.add_terms(term_file::load_terms(&path)?),
        Err(_) => terms.add_terms(term_file::load_terms_if_present(DEFAULT_TERMS_FILE)?),
    }

    if let Ok(list) = std::env::var("EXPLICIT_TERMS") {
        terms.add_terms(term_file::parse_term_list(&list));
    }

    Ok(terms)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let token = required_env("DISCORD_TOKEN")?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Build the sentiment client first so a configuration error stops us
    // before the bot ever connects.

    let access_key = required_env("AWS_ACCESS_KEY_ID")?;
    let secret_key = required_env("AWS_SECRET_ACCESS_KEY")?;
    let region = required_env("AWS_REGION")?;

    let comprehend = match std::env::var("COMPREHEND_ENDPOINT") {
        Ok(endpoint) => {
            ComprehendClient::with_endpoint(&access_key, &secret_key, &region, &endpoint)
        }
        Err(_) => ComprehendClient::new(&access_key, &secret_key, &region),
    }
    .map_err(|e| {
        tracing::error!("Failed to initialize Comprehend client: {}", e);
        e
    })?;

    let terms = Arc::new(load_explicit_terms()?);
    tracing::info!(
        region = comprehend.region(),
        term_count = terms.len(),
        "Moderation configured"
    );

    let moderation = Arc::new(ModerationService::new(comprehend, Arc::clone(&terms)));

    let watch_messages = std::env::var("MODERATION_WATCH_MESSAGES")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(true);

    let data = Data {
        moderation: Arc::clone(&moderation),
        watch_messages,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![discord::commands::moderation()],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered, bot is ready");
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;

    Ok(())
}
