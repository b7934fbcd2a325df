//! Surface-word matching against center mentions.
//!
//! Matching is deliberately coarse by default: a word belongs to a mention if
//! it equals *any* normalized word of that mention.
//!
//! ```text
//! mention  "his driver's test"  →  {his, driver, test}
//! word     "his"                →  match
//! word     "test."              →  match
//! ```
//!
//! This over-highlights words that happen to share a word with a multi-word
//! mention. [`MatchPolicy::WholeMention`] is the stricter alternative.

use serde::{Deserialize, Serialize};

/// How a surface word is compared with a (possibly multi-word) mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// The word equals any constituent word of the mention.
    #[default]
    ConstituentWord,
    /// The word equals the whole mention, which must be a single word.
    WholeMention,
}

/// Classification of a single word for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordRole {
    Cb,
    Cf,
    Plain,
}

impl WordRole {
    pub fn is_marked(&self) -> bool {
        !matches!(self, WordRole::Plain)
    }
}

/// Normalize a surface form: lowercase, drop `.,!?`, drop a possessive `'s`.
pub fn normalize_word(word: &str) -> String {
    let stripped: String = word
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '!' | '?'))
        .flat_map(char::to_lowercase)
        .collect();

    for suffix in ["'s", "’s"] {
        if let Some(stem) = stripped.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }

    stripped
}

/// Compares words with mention strings under a [`MatchPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MentionMatcher {
    policy: MatchPolicy,
}

impl MentionMatcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Returns true if `word` belongs to any of `mentions`.
    pub fn classify<S: AsRef<str>>(&self, word: &str, mentions: &[S]) -> bool {
        let word = normalize_word(word);
        if word.is_empty() {
            return false;
        }

        mentions.iter().any(|mention| self.matches(&word, mention.as_ref()))
    }

    fn matches(&self, normalized_word: &str, mention: &str) -> bool {
        let mut parts = mention.split_whitespace().map(normalize_word);
        match self.policy {
            MatchPolicy::ConstituentWord => parts.any(|part| part == normalized_word),
            MatchPolicy::WholeMention => match (parts.next(), parts.next()) {
                (Some(only), None) => only == normalized_word,
                _ => false,
            },
        }
    }

    /// Returns true if the Cb mention occurs literally (case-insensitively)
    /// somewhere in the sentence text.
    ///
    /// When this fails, the mention was resolved to a referent that is not
    /// present in the visible text and no word may be flagged on its account.
    pub fn can_highlight_cb(cb: Option<&str>, sentence: &str) -> bool {
        match cb {
            Some(cb) if !cb.trim().is_empty() => {
                sentence.to_lowercase().contains(&cb.to_lowercase())
            }
            _ => false,
        }
    }
}
