// Discord layer - commands and event handlers.

#[path = "moderation/commands.rs"]
pub mod commands;

#[path = "moderation/message_handler.rs"]
pub mod message_handler;

use crate::core::moderation::ModerationService;
use crate::infra::sentiment::ComprehendClient;
use std::sync::Arc;

/// Shared state handed to every command and event.
pub struct Data {
    pub moderation: Arc<ModerationService<ComprehendClient>>,
    /// Whether incoming guild messages are moderated automatically
    pub watch_messages: bool,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
