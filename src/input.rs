//! Input validation against utterance and word limits.
//!
//! Raw text is split on runs of sentence-terminal punctuation or newlines:
//!
//! ```text
//! "John left. He came back!\nThen?"
//!  ╰────────╯ ╰───────────╯  ╰───╯
//!  U1         U2             U3
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::model::Utterance;

static UTTERANCE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?\n]+").expect("Invalid utterance break regex"));

/// Limits applied before any text is sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLimits {
    pub max_utterances: usize,
    pub max_words_per_utterance: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_utterances: 5,
            max_words_per_utterance: 10,
        }
    }
}

impl InputLimits {
    pub fn new(max_utterances: usize, max_words_per_utterance: usize) -> Self {
        Self {
            max_utterances,
            max_words_per_utterance,
        }
    }

    /// Validate raw text, returning the utterances it splits into.
    ///
    /// The utterance count is checked before word counts, and the first
    /// utterance over the word limit is the one reported.
    pub fn validate(&self, raw_text: &str) -> Result<Vec<Utterance>, ValidationError> {
        let utterances = split_utterances(raw_text);

        if utterances.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        if utterances.len() > self.max_utterances {
            return Err(ValidationError::TooManyUtterances {
                count: utterances.len(),
                max: self.max_utterances,
            });
        }

        if let Some((index, utterance)) = utterances
            .iter()
            .enumerate()
            .find(|(_, u)| u.word_count() > self.max_words_per_utterance)
        {
            return Err(ValidationError::UtteranceTooLong {
                index,
                words: utterance.word_count(),
                max: self.max_words_per_utterance,
            });
        }

        Ok(utterances)
    }
}

/// Split raw text into trimmed, non-empty utterances.
pub fn split_utterances(raw_text: &str) -> Vec<Utterance> {
    UTTERANCE_BREAK
        .split(raw_text)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(Utterance::new)
        .collect()
}
