//! Binding of centering results onto the words of each sentence.
//!
//! Binding is eager: every word of every sentence is classified and the
//! relation set is built and filtered up front. Exposure to a renderer is
//! gated separately by the reveal cursor (see [`crate::view`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mention::{MatchPolicy, MentionMatcher, WordRole};
use crate::model::{AnchorId, CenteringResult, TokenId, Utterance};
use crate::relation::{AddressSpace, RelationBuilder, RelationSet, SentenceMentions};
use crate::response::{AnalysisPayload, RelationSource};

/// What counts as evidence for highlighting a word as the Cb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CbEvidence {
    /// The Cb mention must occur literally in the sentence.
    Lexical,
    /// As `Lexical`; otherwise a word is the Cb when a supplied relation links
    /// it to a word of the previous sentence that matches the Cb mention.
    #[default]
    Linked,
}

/// Options controlling word classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchOptions {
    pub policy: MatchPolicy,
    pub cb_evidence: CbEvidence,
}

/// A classified word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundWord {
    pub id: TokenId,
    pub text: String,
    pub role: WordRole,
}

/// A sentence with its centering annotation and classified words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSentence {
    pub index: usize,
    pub utterance: Utterance,
    pub cb: Option<String>,
    pub cf: Vec<String>,
    pub words: Vec<BoundWord>,
}

impl BoundSentence {
    pub fn text(&self) -> &str {
        self.utterance.text()
    }

    pub fn roles(&self) -> Vec<WordRole> {
        self.words.iter().map(|word| word.role).collect()
    }
}

/// A fully bound analysis result: classified sentences plus a relation set
/// whose endpoints all exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundDiscourse {
    sentences: Vec<BoundSentence>,
    relations: RelationSet,
}

impl AddressSpace for BoundDiscourse {
    fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    fn word_count(&self, sentence: usize) -> Option<usize> {
        self.sentences.get(sentence).map(|s| s.words.len())
    }
}

impl AddressSpace for [Utterance] {
    fn sentence_count(&self) -> usize {
        self.len()
    }

    fn word_count(&self, sentence: usize) -> Option<usize> {
        self.get(sentence).map(Utterance::word_count)
    }
}

impl BoundDiscourse {
    /// Bind a validated payload.
    pub fn bind(payload: &AnalysisPayload, options: MatchOptions) -> Self {
        let matcher = MentionMatcher::new(options.policy);
        let utterances: Vec<Utterance> = payload
            .results
            .iter()
            .map(|result| Utterance::new(result.sentence.as_str()))
            .collect();

        let supplied = match &payload.relations {
            RelationSource::Supplied(relations) => {
                let mut set: RelationSet = relations.iter().cloned().collect();
                set.retain_addressable(utterances.as_slice());
                Some(set)
            }
            RelationSource::Derived => None,
        };

        let sentences: Vec<BoundSentence> = payload
            .results
            .iter()
            .zip(utterances)
            .enumerate()
            .map(|(index, (result, utterance))| {
                let roles = classify_sentence(
                    &matcher,
                    options.cb_evidence,
                    index,
                    result,
                    &utterance,
                    index.checked_sub(1).and_then(|i| payload.results.get(i)),
                    supplied.as_ref(),
                );
                let words = utterance
                    .words()
                    .iter()
                    .zip(roles)
                    .enumerate()
                    .map(|(word, (text, role))| BoundWord {
                        id: TokenId::new(index, word),
                        text: text.clone(),
                        role,
                    })
                    .collect();
                BoundSentence {
                    index,
                    utterance,
                    cb: result.cb.clone(),
                    cf: result.cf.clone(),
                    words,
                }
            })
            .collect();

        let relations = match supplied {
            Some(set) => set,
            None => {
                let roles: Vec<Vec<WordRole>> = sentences.iter().map(BoundSentence::roles).collect();
                let mentions: Vec<SentenceMentions<'_>> = sentences
                    .iter()
                    .zip(roles.iter())
                    .map(|(sentence, roles)| SentenceMentions {
                        words: sentence.utterance.words(),
                        roles,
                        cf: &sentence.cf,
                    })
                    .collect();
                RelationBuilder::new(matcher).build(&mentions)
            }
        };

        debug!(
            sentences = sentences.len(),
            relations = relations.len(),
            "bound analysis result"
        );

        Self {
            sentences,
            relations,
        }
    }

    pub fn sentences(&self) -> &[BoundSentence] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&BoundSentence> {
        self.sentences.get(index)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    pub fn word(&self, id: TokenId) -> Option<&BoundWord> {
        self.sentences.get(id.sentence)?.words.get(id.word)
    }
}

/// Classify each word of one sentence. Cb is checked first and wins.
fn classify_sentence(
    matcher: &MentionMatcher,
    evidence: CbEvidence,
    index: usize,
    result: &CenteringResult,
    utterance: &Utterance,
    previous: Option<&CenteringResult>,
    supplied: Option<&RelationSet>,
) -> Vec<WordRole> {
    let cb = result.cb.as_deref();
    let lexical_cb = MentionMatcher::can_highlight_cb(cb, &result.sentence);

    let linked_cb: Vec<bool> = match (evidence, cb, previous, supplied) {
        (CbEvidence::Linked, Some(cb), Some(previous), Some(relations)) if !lexical_cb => {
            let previous_words = Utterance::new(previous.sentence.as_str());
            (0..utterance.word_count())
                .map(|word| {
                    relations
                        .incoming(AnchorId::word(index, word))
                        .filter_map(|relation| match relation.source_id {
                            AnchorId::Word(source) if source.sentence + 1 == index => {
                                previous_words.words().get(source.word)
                            }
                            _ => None,
                        })
                        .any(|source_word| matcher.classify(source_word, &[cb]))
                })
                .collect()
        }
        _ => vec![false; utterance.word_count()],
    };

    utterance
        .words()
        .iter()
        .zip(linked_cb)
        .map(|(word, linked)| {
            let is_cb = match cb {
                Some(cb) if lexical_cb => matcher.classify(word, &[cb]),
                _ => linked,
            };
            if is_cb {
                WordRole::Cb
            } else if matcher.classify(word, &result.cf) {
                WordRole::Cf
            } else {
                WordRole::Plain
            }
        })
        .collect()
}
