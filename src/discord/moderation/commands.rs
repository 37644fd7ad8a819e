// Text moderation slash commands.
//
// Thin translation layer: pull the text out of the interaction, call the core
// moderation service, format the result.

use crate::core::moderation::{Sentiment, Verdict};
use crate::discord::{Data, Error};
use crate::infra::moderation::term_file::parse_term_list;
use poise::serenity_prelude as serenity;

type Context<'a> = poise::Context<'a, Data, Error>;

fn verdict_color(verdict: Verdict) -> u32 {
    match verdict {
        Verdict::FlaggedExplicit => 0xFF0000,
        Verdict::FlaggedNegative => 0xFFA500,
        Verdict::Approved => 0x00FF00,
    }
}

fn verdict_emoji(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::FlaggedExplicit => "🚫",
        Verdict::FlaggedNegative => "⚠️",
        Verdict::Approved => "✅",
    }
}

/// Terms are stored exactly as typed, surrounding spaces included, so
/// `" ass "` only matches the word on its own. Only an empty term is refused.
fn term_as_typed(term: String) -> Option<String> {
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Text moderation commands.
///
/// Check text against the explicit-term list and sentiment analysis.
#[poise::command(
    slash_command,
    subcommands("check", "sentiment", "scan", "add_term", "add_terms", "terms"),
    guild_only
)]
pub async fn moderation(_ctx: Context<'_>) -> Result<(), Error> {
    // Parent command - shows help
    Ok(())
}

/// Run full moderation on some text and show the verdict.
#[poise::command(slash_command, guild_only)]
pub async fn check(
    ctx: Context<'_>,
    #[description = "Text to moderate"] text: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let verdict = ctx
        .data()
        .moderation
        .moderate(&text)
        .await
        .map_err(|e| Error::from(e.to_string()))?;

    let embed = serenity::CreateEmbed::new()
        .title("🛡️ Moderation Verdict")
        .color(verdict_color(verdict))
        .field(
            "Verdict",
            format!("{} `{}`", verdict_emoji(verdict), verdict),
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Show the sentiment label and negative score for some text.
#[poise::command(slash_command, guild_only)]
pub async fn sentiment(
    ctx: Context<'_>,
    #[description = "Text to analyze"] text: String,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let result = ctx
        .data()
        .moderation
        .analyze_sentiment(&text)
        .await
        .map_err(|e| Error::from(e.to_string()))?;

    let color = match result.label {
        Sentiment::Negative => 0xFF0000,
        Sentiment::Positive => 0x00FF00,
        Sentiment::Neutral | Sentiment::Mixed => 0x808080,
    };

    let embed = serenity::CreateEmbed::new()
        .title("📊 Sentiment")
        .color(color)
        .field("Label", result.label.to_string(), true)
        .field(
            "Negative score",
            format!("{:.4}", result.negative_score),
            true,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

/// Check text against the explicit-term list only.
#[poise::command(slash_command, guild_only)]
pub async fn scan(
    ctx: Context<'_>,
    #[description = "Text to scan"] text: String,
) -> Result<(), Error> {
    let found = ctx.data().moderation.contains_explicit_content(&text);

    let reply = if found {
        "🚫 This text contains a blocked term."
    } else {
        "✅ No blocked terms found."
    };

    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

/// Add a term to the explicit-term list.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn add_term(
    ctx: Context<'_>,
    #[description = "Term to block (matched against lowercased messages)"] term: String,
) -> Result<(), Error> {
    let Some(term) = term_as_typed(term) else {
        ctx.send(
            poise::CreateReply::default()
                .content("❌ The term must not be empty.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    };

    let moderation = &ctx.data().moderation;
    moderation.add_term(term);

    tracing::info!(
        guild_id = ctx.guild_id().map(|g| g.get()),
        term_count = moderation.terms().len(),
        "Explicit term added"
    );

    ctx.send(
        poise::CreateReply::default()
            .content(format!(
                "✅ Term added. {} terms are now blocked.",
                moderation.terms().len()
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Add several comma-separated terms to the explicit-term list.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn add_terms(
    ctx: Context<'_>,
    #[description = "Comma-separated terms to block"] terms: String,
) -> Result<(), Error> {
    let parsed = parse_term_list(&terms);
    if parsed.is_empty() {
        ctx.send(
            poise::CreateReply::default()
                .content("❌ No terms given.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let added = parsed.len();
    let moderation = &ctx.data().moderation;
    moderation.add_terms(parsed);

    tracing::info!(
        guild_id = ctx.guild_id().map(|g| g.get()),
        added,
        term_count = moderation.terms().len(),
        "Explicit terms added"
    );

    ctx.send(
        poise::CreateReply::default()
            .content(format!(
                "✅ Added {} term{}. {} terms are now blocked.",
                added,
                if added == 1 { "" } else { "s" },
                moderation.terms().len()
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Show how many explicit terms are loaded.
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_MESSAGES")]
pub async fn terms(ctx: Context<'_>) -> Result<(), Error> {
    let count = ctx.data().moderation.terms().len();

    ctx.send(
        poise::CreateReply::default()
            .content(format!("📋 {} explicit terms loaded.", count))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
