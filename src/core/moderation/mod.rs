// Core moderation module - explicit-term filter plus sentiment screening.
// Following the same pattern as the other core modules.

pub mod moderation_models;
pub mod moderation_service;
pub mod term_filter;

pub use moderation_models::*;
pub use moderation_service::*;
pub use term_filter::ExplicitTermSet;
