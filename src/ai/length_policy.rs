//! Adaptive summary-length budget.
//!
//! The engine is asked for a summary no longer than 80% of the input's word
//! count, capped at [`MAX_LENGTH_CEILING`], and no shorter than
//! [`MIN_LENGTH`]. Inputs shorter than [`MIN_CONSISTENT_WORDS`] cannot satisfy
//! both bounds; what happens to them is decided by [`ShortInputPolicy`].

use std::fmt;
use std::str::FromStr;

pub const MIN_LENGTH: u32 = 30;
pub const MAX_LENGTH_CEILING: u32 = 130;

/// Smallest word count whose budget reaches `MIN_LENGTH`: floor(38 * 0.8) = 30.
pub const MIN_CONSISTENT_WORDS: usize = 38;

/// Length bounds handed to the summarization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_length: u32,
    pub max_length: u32,
}

impl LengthBounds {
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.max_length >= self.min_length
    }
}

/// What to do with input whose budget falls below `MIN_LENGTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortInputPolicy {
    /// Skip the engine and return the input unchanged.
    #[default]
    Passthrough,
    /// Raise `max_length` to `MIN_LENGTH` and summarize anyway.
    Clamp,
    /// Refuse with a client error.
    Reject,
}

impl FromStr for ShortInputPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" | "echo" => Ok(Self::Passthrough),
            "clamp" => Ok(Self::Clamp),
            "reject" | "error" => Ok(Self::Reject),
            other => Err(format!(
                "unknown short input policy '{other}' (expected passthrough, clamp or reject)"
            )),
        }
    }
}

impl fmt::Display for ShortInputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Passthrough => "passthrough",
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Outcome of planning a summarization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPlan {
    Summarize(LengthBounds),
    Passthrough { word_count: usize },
    TooShort { word_count: usize, minimum_words: usize },
}

/// Number of whitespace-separated words in `text`.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `min(130, floor(word_count * 0.8))`.
///
/// The floor is taken in integer arithmetic (`* 4 / 5`), which is exact for
/// every non-negative count.
#[must_use]
pub fn naive_max_length(word_count: usize) -> u32 {
    let budget = word_count.saturating_mul(4) / 5;
    u32::try_from(budget)
        .unwrap_or(u32::MAX)
        .min(MAX_LENGTH_CEILING)
}

/// Bounds straight from the heuristic, without any short-input remediation.
/// May be inconsistent for inputs under `MIN_CONSISTENT_WORDS` words.
#[must_use]
pub fn naive_bounds(text: &str) -> LengthBounds {
    LengthBounds {
        min_length: MIN_LENGTH,
        max_length: naive_max_length(count_words(text)),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LengthPolicy {
    short_input: ShortInputPolicy,
}

impl LengthPolicy {
    #[must_use]
    pub fn new(short_input: ShortInputPolicy) -> Self {
        Self { short_input }
    }

    #[must_use]
    pub fn short_input(&self) -> ShortInputPolicy {
        self.short_input
    }

    /// Decide how `text` should be summarized. Never yields `Summarize` with
    /// inconsistent bounds.
    #[must_use]
    pub fn plan(&self, text: &str) -> LengthPlan {
        let word_count = count_words(text);
        let bounds = LengthBounds {
            min_length: MIN_LENGTH,
            max_length: naive_max_length(word_count),
        };

        if bounds.is_consistent() {
            return LengthPlan::Summarize(bounds);
        }

        match self.short_input {
            ShortInputPolicy::Reject => LengthPlan::TooShort {
                word_count,
                minimum_words: MIN_CONSISTENT_WORDS,
            },
            // Nothing to summarize: even a clamped call would hand the engine no words.
            ShortInputPolicy::Clamp if word_count > 0 => LengthPlan::Summarize(LengthBounds {
                min_length: MIN_LENGTH,
                max_length: MIN_LENGTH,
            }),
            ShortInputPolicy::Clamp | ShortInputPolicy::Passthrough => {
                LengthPlan::Passthrough { word_count }
            }
        }
    }
}
