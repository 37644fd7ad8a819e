// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "sentiment/mod.rs"]
pub mod sentiment;

#[path = "moderation/mod.rs"]
pub mod moderation;
