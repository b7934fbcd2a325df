//! Core data model: utterances, centering results, addressable ids and relations.
//!
//! Ids use the same string form the backend and renderer exchange:
//!
//! ```text
//! word-1-0      TokenId { sentence: 1, word: 0 }
//! sentence-2    SentenceId(2)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One sentence-level unit of discourse, split into whitespace-delimited words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
    words: Vec<String>,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let words = text.split_whitespace().map(str::to_string).collect();
        Self { text, words }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// Backend analysis of a single utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenteringResult {
    pub sentence: String,
    /// Backward-looking center, if the backend found one.
    #[serde(rename = "Cb", default)]
    pub cb: Option<String>,
    /// Forward-looking centers in backend order.
    #[serde(rename = "Cf")]
    pub cf: Vec<String>,
}

impl CenteringResult {
    pub fn new(sentence: impl Into<String>, cb: Option<&str>, cf: &[&str]) -> Self {
        Self {
            sentence: sentence.into(),
            cb: cb.map(str::to_string),
            cf: cf.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Address of one word: `(sentence index, word index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    pub sentence: usize,
    pub word: usize,
}

impl TokenId {
    pub fn new(sentence: usize, word: usize) -> Self {
        Self { sentence, word }
    }
}

/// Address of a whole sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SentenceId(pub usize);

/// Either endpoint kind a relation may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorId {
    Word(TokenId),
    Sentence(SentenceId),
}

impl AnchorId {
    pub fn word(sentence: usize, word: usize) -> Self {
        AnchorId::Word(TokenId::new(sentence, word))
    }

    pub fn sentence(index: usize) -> Self {
        AnchorId::Sentence(SentenceId(index))
    }

    /// Index of the sentence this anchor lives in.
    pub fn sentence_index(&self) -> usize {
        match self {
            AnchorId::Word(token) => token.sentence,
            AnchorId::Sentence(SentenceId(index)) => *index,
        }
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorId::Word(token) => write!(f, "word-{}-{}", token.sentence, token.word),
            AnchorId::Sentence(SentenceId(index)) => write!(f, "sentence-{}", index),
        }
    }
}

/// Returned when a string is not a `word-S-W` or `sentence-S` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaddressableId(pub String);

impl fmt::Display for UnaddressableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not an addressable id: {:?}", self.0)
    }
}

impl std::error::Error for UnaddressableId {}

impl FromStr for AnchorId {
    type Err = UnaddressableId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UnaddressableId(s.to_string());
        if let Some(rest) = s.strip_prefix("word-") {
            let (sentence, word) = rest.split_once('-').ok_or_else(invalid)?;
            let sentence = sentence.parse().map_err(|_| invalid())?;
            let word = word.parse().map_err(|_| invalid())?;
            Ok(AnchorId::word(sentence, word))
        } else if let Some(rest) = s.strip_prefix("sentence-") {
            let index = rest.parse().map_err(|_| invalid())?;
            Ok(AnchorId::sentence(index))
        } else {
            Err(invalid())
        }
    }
}

impl Serialize for AnchorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnchorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Side of a rendered element a connector attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
}

/// Directed, anchor-qualified edge between two addressable ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub source_id: AnchorId,
    pub target_id: AnchorId,
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
}

impl Relation {
    /// Edge leaving the bottom of `source` and entering the top of `target`.
    pub fn downward(source: AnchorId, target: AnchorId) -> Self {
        Self {
            source_id: source,
            target_id: target,
            source_anchor: Anchor::Bottom,
            target_anchor: Anchor::Top,
        }
    }

    /// True when the edge points later in the discourse.
    pub fn is_forward(&self) -> bool {
        self.target_id.sentence_index() > self.source_id.sentence_index()
    }
}
