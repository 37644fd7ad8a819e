// Moderation domain models - verdicts and sentiment results.
//
// These are pure domain types with no Discord or AWS dependencies.
// The infra layer converts provider responses into these, and the Discord
// layer converts verdicts into chat actions.

use std::fmt;
use std::str::FromStr;

/// Negative-confidence score above which negative text is flagged.
/// The comparison is strict: a score of exactly 0.7 is approved.
pub const NEGATIVE_THRESHOLD: f64 = 0.7;

/// Language tag sent with every sentiment request.
pub const LANGUAGE_CODE: &str = "en";

/// Final outcome of moderating one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A stored explicit term was found in the text
    FlaggedExplicit,
    /// The remote service judged the text strongly negative
    FlaggedNegative,
    /// Nothing objectionable found
    Approved,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::FlaggedExplicit => "flagged-explicit",
            Verdict::FlaggedNegative => "flagged-negative",
            Verdict::Approved => "approved",
        }
    }

    pub fn is_flagged(&self) -> bool {
        !matches!(self, Verdict::Approved)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level sentiment category reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    /// Provider wire name (upper case).
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when the provider sends a label outside the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSentiment(pub String);

impl fmt::Display for UnknownSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sentiment label '{}'", self.0)
    }
}

impl std::error::Error for UnknownSentiment {}

impl FromStr for Sentiment {
    type Err = UnknownSentiment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(Sentiment::Positive),
            "NEGATIVE" => Ok(Sentiment::Negative),
            "NEUTRAL" => Ok(Sentiment::Neutral),
            "MIXED" => Ok(Sentiment::Mixed),
            other => Err(UnknownSentiment(other.to_string())),
        }
    }
}

/// Result of a single sentiment classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    /// Top-level label
    pub label: Sentiment,
    /// Confidence of the negative category, in [0.0, 1.0]
    pub negative_score: f64,
}

impl SentimentResult {
    pub fn new(label: Sentiment, negative_score: f64) -> Self {
        Self {
            label,
            negative_score,
        }
    }

    /// Whether this result crosses the negative threshold.
    pub fn is_strongly_negative(&self) -> bool {
        self.label == Sentiment::Negative && self.negative_score > NEGATIVE_THRESHOLD
    }
}
