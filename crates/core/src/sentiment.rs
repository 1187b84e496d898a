//! Sentiment analysis seam.
//!
//! The builder only ever uses a mock classifier, but the analyzer is a trait
//! so a real inference backend can be injected later without touching the
//! preview engine.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::FormError;

/// Number of characters a textbox value must exceed before a live sentiment
/// re-analysis is triggered.
pub const SENTIMENT_TRIGGER_LEN: usize = 10;

/// Classified sentiment of a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(FormError::Translation(format!(
                "sentiment must be positive, neutral, or negative, got '{other}'"
            ))),
        }
    }
}

/// Result of analyzing a piece of text.
///
/// Preview-only: never persisted on the field it was computed for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentAnalysis {
    /// Raw model score in `[0, 1)`.
    pub score: f64,
    pub label: SentimentLabel,
    /// Model confidence in `[0.8, 1.0)`.
    pub confidence: f64,
}

/// Injectable analyzer seam.
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> SentimentAnalysis;
}

/// Stand-in classifier used until a real inference call exists.
///
/// The label is derived from text length alone: more than 50 characters is
/// positive, more than 20 neutral, anything shorter negative. Score and
/// confidence are random within their documented ranges.
#[derive(Clone, Copy, Debug, Default)]
pub struct MockSentimentAnalyzer;

impl SentimentAnalyzer for MockSentimentAnalyzer {
    fn analyze(&self, text: &str) -> SentimentAnalysis {
        let mut rng = rand::thread_rng();
        let len = text.chars().count();

        let label = if len > 50 {
            SentimentLabel::Positive
        } else if len > 20 {
            SentimentLabel::Neutral
        } else {
            SentimentLabel::Negative
        };

        SentimentAnalysis {
            score: rng.gen_range(0.0..1.0),
            label,
            confidence: 0.8 + rng.gen_range(0.0..0.2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_text_length() {
        let analyzer = MockSentimentAnalyzer;

        let long = "x".repeat(60);
        assert_eq!(analyzer.analyze(&long).label, SentimentLabel::Positive);

        let medium = "x".repeat(30);
        assert_eq!(analyzer.analyze(&medium).label, SentimentLabel::Neutral);

        let short = "x".repeat(5);
        assert_eq!(analyzer.analyze(&short).label, SentimentLabel::Negative);
    }

    #[test]
    fn boundary_lengths_fall_on_the_lower_label() {
        let analyzer = MockSentimentAnalyzer;
        assert_eq!(
            analyzer.analyze(&"x".repeat(50)).label,
            SentimentLabel::Neutral
        );
        assert_eq!(
            analyzer.analyze(&"x".repeat(20)).label,
            SentimentLabel::Negative
        );
    }

    #[test]
    fn score_and_confidence_stay_in_their_ranges() {
        let analyzer = MockSentimentAnalyzer;
        for _ in 0..100 {
            let analysis = analyzer.analyze("a reasonably upbeat appraisal note");
            assert!((0.0..1.0).contains(&analysis.score), "{}", analysis.score);
            assert!(
                (0.8..1.0).contains(&analysis.confidence),
                "{}",
                analysis.confidence
            );
        }
    }

    #[test]
    fn label_strings_round_trip() {
        for label in [
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ] {
            assert_eq!(
                label.as_str().parse::<SentimentLabel>().expect("parse"),
                label
            );
        }
    }
}
