//! Relation graph construction between addressable tokens and sentences.
//!
//! Relations either arrive from the backend already addressed, or are derived
//! here from the word classification. Derived edges always run from an earlier
//! Cf word to a later Cb word:
//!
//! ```text
//! U1  John  has  been  acting  quite  odd.
//!     ╰Cf
//!     └─>word-1-0
//! U2  John  called  up  Mike  yesterday.
//!     ╰Cb
//! ```

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::mention::{MentionMatcher, WordRole};
use crate::model::{AnchorId, Relation};

/// The words and sentences that exist in the current result set.
pub trait AddressSpace {
    fn sentence_count(&self) -> usize;
    fn word_count(&self, sentence: usize) -> Option<usize>;

    fn contains(&self, id: &AnchorId) -> bool {
        match id {
            AnchorId::Word(token) => self
                .word_count(token.sentence)
                .map_or(false, |count| token.word < count),
            AnchorId::Sentence(sentence) => sentence.0 < self.sentence_count(),
        }
    }
}

/// Ordered, duplicate-free set of relations.
///
/// At most one relation is kept per `(source, target)` pair; the first one
/// inserted wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationSet {
    relations: Vec<Relation>,
    pairs: HashSet<(AnchorId, AnchorId)>,
}

impl RelationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relation; returns false if its pair was already present.
    pub fn insert(&mut self, relation: Relation) -> bool {
        if !self.pairs.insert((relation.source_id, relation.target_id)) {
            return false;
        }
        self.relations.push(relation);
        true
    }

    /// Insert a relation only if it points forward in the discourse.
    pub fn insert_forward(&mut self, relation: Relation) -> bool {
        if !relation.is_forward() {
            debug!(
                source = %relation.source_id,
                target = %relation.target_id,
                "discarding relation that does not point forward"
            );
            return false;
        }
        self.insert(relation)
    }

    /// Keep only relations whose endpoints both exist in `space`.
    pub fn retain_addressable<A: AddressSpace + ?Sized>(&mut self, space: &A) {
        let before = self.relations.len();
        self.relations.retain(|relation| {
            let keep = space.contains(&relation.source_id) && space.contains(&relation.target_id);
            if !keep {
                warn!(
                    source = %relation.source_id,
                    target = %relation.target_id,
                    "dropping relation with an endpoint outside the result set"
                );
            }
            keep
        });
        if self.relations.len() != before {
            self.pairs = self
                .relations
                .iter()
                .map(|relation| (relation.source_id, relation.target_id))
                .collect();
        }
    }

    /// Relations leaving `anchor`, in insertion order.
    pub fn outgoing(&self, anchor: AnchorId) -> impl Iterator<Item = &Relation> + '_ {
        self.relations
            .iter()
            .filter(move |relation| relation.source_id == anchor)
    }

    /// Relations entering `anchor`, in insertion order.
    pub fn incoming(&self, anchor: AnchorId) -> impl Iterator<Item = &Relation> + '_ {
        self.relations
            .iter()
            .filter(move |relation| relation.target_id == anchor)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.relations.iter()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn into_vec(self) -> Vec<Relation> {
        self.relations
    }
}

impl FromIterator<Relation> for RelationSet {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        let mut set = RelationSet::new();
        for relation in iter {
            set.insert(relation);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RelationSet {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

/// What the builder needs to know about one classified sentence.
#[derive(Debug, Clone, Copy)]
pub struct SentenceMentions<'a> {
    pub words: &'a [String],
    pub roles: &'a [WordRole],
    pub cf: &'a [String],
}

/// Derives Cb/Cf continuity edges when the backend supplies none.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationBuilder {
    matcher: MentionMatcher,
}

impl RelationBuilder {
    pub fn new(matcher: MentionMatcher) -> Self {
        Self { matcher }
    }

    /// Build the relation set for a classified discourse.
    ///
    /// Two passes look at each adjacent sentence pair from both ends:
    /// - backward: each Cb word of sentence *n* searches sentence *n−1* for a
    ///   matching word that belongs to its Cf set;
    /// - forward: each word of sentence *n* that belongs to its Cf set searches
    ///   the Cb words of sentence *n+1*.
    ///
    /// Both produce edges from the earlier word to the later one, so an edge
    /// found by both passes is kept once.
    pub fn build(&self, sentences: &[SentenceMentions<'_>]) -> RelationSet {
        let mut relations = RelationSet::new();

        for (n, current) in sentences.iter().enumerate().skip(1) {
            let previous = &sentences[n - 1];
            for (w, _) in cb_words(*current) {
                for p in self.matching_cf_words(previous, &current.words[w]) {
                    relations.insert_forward(Relation::downward(
                        AnchorId::word(n - 1, p),
                        AnchorId::word(n, w),
                    ));
                }
            }
        }

        for (n, current) in sentences.iter().enumerate() {
            let Some(next) = sentences.get(n + 1) else {
                continue;
            };
            for w in 0..current.words.len() {
                if !self.matcher.classify(&current.words[w], current.cf) {
                    continue;
                }
                for (c, next_word) in cb_words(*next) {
                    if self.matcher.classify(next_word, &[current.words[w].as_str()]) {
                        relations.insert_forward(Relation::downward(
                            AnchorId::word(n, w),
                            AnchorId::word(n + 1, c),
                        ));
                    }
                }
            }
        }

        debug!(count = relations.len(), "derived relations");
        relations
    }

    /// Words of `sentence` that belong to its Cf set and match `word`.
    fn matching_cf_words(&self, sentence: &SentenceMentions<'_>, word: &str) -> Vec<usize> {
        sentence
            .words
            .iter()
            .enumerate()
            .filter(|(_, candidate)| {
                self.matcher.classify(candidate, sentence.cf)
                    && self.matcher.classify(candidate, &[word])
            })
            .map(|(index, _)| index)
            .collect()
    }
}

fn cb_words<'a>(sentence: SentenceMentions<'a>) -> impl Iterator<Item = (usize, &'a String)> + 'a {
    sentence
        .words
        .iter()
        .zip(sentence.roles.iter())
        .enumerate()
        .filter(|(_, (_, role))| **role == WordRole::Cb)
        .map(|(index, (word, _))| (index, word))
}
