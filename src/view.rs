//! Renderer-facing projection of a bound discourse.
//!
//! Only sentences at or before the reveal cursor are exposed, and an edge is
//! exposed only once its target is exposed too, so a renderer never receives a
//! connector to an element it has not drawn.

use serde::{Deserialize, Serialize};

use crate::binding::{BoundDiscourse, BoundSentence};
use crate::mention::WordRole;
use crate::model::{Anchor, AnchorId, Relation};

/// An outgoing connector from the element it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub target_id: AnchorId,
    pub source_anchor: Anchor,
    pub target_anchor: Anchor,
}

impl From<&Relation> for EdgeView {
    fn from(relation: &Relation) -> Self {
        Self {
            target_id: relation.target_id,
            source_anchor: relation.source_anchor,
            target_anchor: relation.target_anchor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordView {
    pub id: AnchorId,
    pub text: String,
    pub role: WordRole,
    pub relations: Vec<EdgeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceView {
    pub id: AnchorId,
    /// `U₁`, `U₂`, ...
    pub label: String,
    pub words: Vec<WordView>,
    pub relations: Vec<EdgeView>,
    /// The Cb mention, or `None`.
    pub cb_label: String,
    /// The Cf mentions as `{a, b}`.
    pub cf_label: String,
}

/// Everything a renderer may draw for the current cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscourseView {
    pub sentences: Vec<SentenceView>,
    /// Index of the last exposed sentence.
    pub cursor: usize,
    pub total: usize,
}

impl DiscourseView {
    /// Project `discourse` through sentence `cursor` (inclusive).
    pub fn through(discourse: &BoundDiscourse, cursor: usize) -> Self {
        let visible = |id: &AnchorId| id.sentence_index() <= cursor;
        let edges = |anchor: AnchorId| -> Vec<EdgeView> {
            discourse
                .relations()
                .outgoing(anchor)
                .filter(|relation| visible(&relation.target_id))
                .map(EdgeView::from)
                .collect()
        };

        let sentences = discourse
            .sentences()
            .iter()
            .take(cursor.saturating_add(1))
            .map(|sentence| SentenceView {
                id: AnchorId::sentence(sentence.index),
                label: utterance_label(sentence.index),
                words: sentence
                    .words
                    .iter()
                    .map(|word| WordView {
                        id: AnchorId::Word(word.id),
                        text: word.text.clone(),
                        role: word.role,
                        relations: edges(AnchorId::Word(word.id)),
                    })
                    .collect(),
                relations: edges(AnchorId::sentence(sentence.index)),
                cb_label: cb_label(sentence),
                cf_label: cf_label(sentence),
            })
            .collect();

        Self {
            sentences,
            cursor,
            total: discourse.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.cursor + 1 >= self.total
    }
}

/// `U` followed by the one-based index in subscript digits.
pub fn utterance_label(index: usize) -> String {
    let digits: String = (index + 1)
        .to_string()
        .chars()
        .filter_map(|digit| digit.to_digit(10))
        .filter_map(|digit| char::from_u32(0x2080 + digit))
        .collect();
    format!("U{}", digits)
}

fn cb_label(sentence: &BoundSentence) -> String {
    sentence.cb.clone().unwrap_or_else(|| "None".to_string())
}

fn cf_label(sentence: &BoundSentence) -> String {
    format!("{{{}}}", sentence.cf.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::MatchOptions;
    use crate::model::CenteringResult;
    use crate::response::AnalysisPayload;

    fn two_sentences() -> BoundDiscourse {
        let payload = AnalysisPayload::supplied(
            vec![
                CenteringResult::new("Jill caught a ball.", None, &["Jill", "ball"]),
                CenteringResult::new("She tossed it to John.", Some("Jill"), &["She", "it", "John"]),
            ],
            vec![
                Relation::downward(AnchorId::word(0, 0), AnchorId::word(1, 0)),
                Relation::downward(AnchorId::sentence(0), AnchorId::sentence(1)),
            ],
        );
        BoundDiscourse::bind(&payload, MatchOptions::default())
    }

    #[test]
    fn test_utterance_labels_use_subscripts() {
        assert_eq!(utterance_label(0), "U₁");
        assert_eq!(utterance_label(11), "U₁₂");
    }

    #[test]
    fn test_cursor_gates_sentences_and_edges() {
        let discourse = two_sentences();

        let first = DiscourseView::through(&discourse, 0);
        assert_eq!(first.sentences.len(), 1);
        assert!(first.sentences[0].words[0].relations.is_empty());
        assert!(first.sentences[0].relations.is_empty());
        assert!(!first.is_complete());

        let all = DiscourseView::through(&discourse, 1);
        assert_eq!(all.sentences.len(), 2);
        assert_eq!(
            all.sentences[0].words[0].relations[0].target_id,
            AnchorId::word(1, 0)
        );
        assert_eq!(all.sentences[0].relations[0].target_id, AnchorId::sentence(1));
        assert!(all.is_complete());
    }

    #[test]
    fn test_summary_labels() {
        let view = DiscourseView::through(&two_sentences(), 1);
        assert_eq!(view.sentences[0].cb_label, "None");
        assert_eq!(view.sentences[0].cf_label, "{Jill, ball}");
        assert_eq!(view.sentences[1].cb_label, "Jill");
        assert_eq!(view.sentences[1].words[0].role, WordRole::Cb);
    }

    #[test]
    fn test_view_serializes_wire_ids() {
        let view = DiscourseView::through(&two_sentences(), 1);
        let json = serde_json::to_value(&view.sentences[0].words[0]).unwrap();
        assert_eq!(json["id"], "word-0-0");
        assert_eq!(json["relations"][0]["targetId"], "word-1-0");
        assert_eq!(json["relations"][0]["sourceAnchor"], "bottom");
        assert_eq!(json["role"], "Cf");
    }
}
