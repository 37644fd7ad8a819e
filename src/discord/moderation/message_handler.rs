// Discord-specific moderation handling - translates verdicts to Discord actions.

use crate::core::moderation::{ModerationService, SentimentAnalyzer, Verdict};
use crate::discord::Error;
use poise::serenity_prelude as serenity;

/// Moderate a message and apply the matching action.
///
/// Returns the verdict, or `None` if the message was skipped or could not be
/// moderated. A remote failure leaves the message untouched.
pub async fn handle_message_for_moderation<A: SentimentAnalyzer>(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    moderation: &ModerationService<A>,
) -> Result<Option<Verdict>, Error> {
    // Skip bots
    if msg.author.bot {
        return Ok(None);
    }

    // Only moderate guild messages with text
    let guild_id = match msg.guild_id {
        Some(id) => id.get(),
        None => return Ok(None),
    };
    if msg.content.trim().is_empty() {
        return Ok(None);
    }

    let verdict = match moderation.moderate(&msg.content).await {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(
                guild_id,
                message_id = msg.id.get(),
                "Could not moderate message: {}",
                e
            );
            return Ok(None);
        }
    };

    if verdict.is_flagged() {
        tracing::info!(
            guild_id,
            user_id = msg.author.id.get(),
            message_id = msg.id.get(),
            verdict = %verdict,
            "Message flagged"
        );
    }

    apply_verdict(ctx, msg, verdict).await?;

    Ok(Some(verdict))
}

/// Apply the action for a verdict.
async fn apply_verdict(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    verdict: Verdict,
) -> Result<(), Error> {
    match verdict {
        Verdict::Approved => {}

        Verdict::FlaggedExplicit => {
            if let Err(e) = msg.delete(&ctx.http).await {
                tracing::warn!("Failed to delete flagged message: {}", e);
            }

            let notice = format!(
                "🚫 <@{}> your message was removed because it contained a blocked term.",
                msg.author.id
            );
            if let Err(e) = msg.channel_id.say(&ctx.http, &notice).await {
                tracing::warn!("Failed to send removal notice: {}", e);
            }
        }

        Verdict::FlaggedNegative => {
            if let Err(e) = msg
                .reply(&ctx.http, "⚠️ Please keep the conversation civil.")
                .await
            {
                tracing::warn!("Failed to send civility warning: {}", e);
            }
        }
    }

    Ok(())
}
