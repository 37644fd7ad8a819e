// Moderation service - core business logic for text moderation.
//
// Two stages per call:
// 1. Local screen against the explicit-term set (cheap, deterministic)
// 2. Remote sentiment screen, only if stage 1 found nothing
//
// NO Discord or AWS dependencies here - the remote side is reached through
// the `SentimentAnalyzer` port, implemented in infra.

use super::moderation_models::{SentimentResult, Verdict};
use super::term_filter::ExplicitTermSet;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    /// Client construction failed (bad credentials, region or endpoint).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The sentiment call failed: transport, auth, throttling or a malformed response.
    #[error("Remote call error: {0}")]
    RemoteCall(String),
}

// ============================================================================
// SENTIMENT TRAIT (PORT)
// ============================================================================

/// A remote capability that classifies the sentiment of one document.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Classify `text` and return the top-level label with the negative score.
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult, ModerationError>;
}

// Lets the service hold a boxed analyzer chosen at runtime.
#[async_trait]
impl SentimentAnalyzer for Box<dyn SentimentAnalyzer> {
    async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult, ModerationError> {
        (**self).analyze_sentiment(text).await
    }
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Combines the explicit-term filter with a sentiment analyzer.
pub struct ModerationService<A: SentimentAnalyzer> {
    analyzer: A,
    terms: Arc<ExplicitTermSet>,
}

impl<A: SentimentAnalyzer> ModerationService<A> {
    /// Create a service around an already constructed analyzer and a shared term set.
    pub fn new(analyzer: A, terms: Arc<ExplicitTermSet>) -> Self {
        Self { analyzer, terms }
    }

    /// The term set this service screens against.
    pub fn terms(&self) -> &Arc<ExplicitTermSet> {
        &self.terms
    }

    pub fn add_term(&self, term: impl Into<String>) {
        self.terms.add_term(term);
    }

    pub fn add_terms<I, T>(&self, terms: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.terms.add_terms(terms);
    }

    pub fn contains_explicit_content(&self, text: &str) -> bool {
        self.terms.contains_explicit_content(text)
    }

    /// Run only the remote stage. Errors are passed through unchanged.
    pub async fn analyze_sentiment(&self, text: &str) -> Result<SentimentResult, ModerationError> {
        self.analyzer.analyze_sentiment(text).await
    }

    /// Moderate a piece of text.
    ///
    /// # Returns
    /// - `FlaggedExplicit` if any stored term matches (the analyzer is not called)
    /// - `FlaggedNegative` if the analyzer reports NEGATIVE with a score above 0.7
    /// - `Approved` otherwise
    ///
    /// An analyzer failure is returned as-is; there is no fallback verdict.
    pub async fn moderate(&self, text: &str) -> Result<Verdict, ModerationError> {
        if self.terms.contains_explicit_content(text) {
            tracing::debug!(text_len = text.len(), "Explicit term matched, skipping remote screen");
            return Ok(Verdict::FlaggedExplicit);
        }

        let sentiment = self.analyzer.analyze_sentiment(text).await?;
        tracing::debug!(
            label = %sentiment.label,
            negative_score = sentiment.negative_score,
            "Sentiment received"
        );

        let verdict = if sentiment.is_strongly_negative() {
            Verdict::FlaggedNegative
        } else {
            Verdict::Approved
        };

        Ok(verdict)
    }
}

// ============================================================================
// TESTS
// ============================================================================
