use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::binding::{BoundDiscourse, BoundSentence};
use crate::mention::WordRole;
use crate::model::{AnchorId, Relation};
use crate::view::utterance_label;

const SPACE_PADDING: usize = 2;

/// Plain-text rendering of a bound discourse, one block per sentence.
///
/// ```text
/// U₁  John  has  been  acting  quite  odd.
///     ╰Cf
///       └─>word-1-0
/// U₂  He  called  up  Mike  yesterday.
///     ╰Cb
///         ╰Cf
///                     ╰Cf
/// ```
pub struct DiscourseDisplay<'a> {
    discourse: &'a BoundDiscourse,
    through: Option<usize>,
    show_relations: bool,
}

impl<'a> fmt::Display for DiscourseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.through.unwrap_or(usize::MAX);
        let mut is_first = true;

        for sentence in self.discourse.sentences().iter().take_while(|s| s.index <= last) {
            if is_first {
                is_first = false;
            } else {
                f.write_char('\n')?;
            }
            self.fmt_sentence(f, sentence)?;
        }

        Ok(())
    }
}

impl<'a> DiscourseDisplay<'a> {
    pub fn new(discourse: &'a BoundDiscourse) -> Self {
        DiscourseDisplay {
            discourse,
            through: None,
            show_relations: false,
        }
    }

    /// Only display sentences up to and including `cursor`.
    pub fn through(mut self, cursor: usize) -> Self {
        self.through = Some(cursor);
        self
    }

    /// Render outgoing relations as arrows under their source.
    pub fn with_relations(mut self) -> Self {
        self.show_relations = true;
        self
    }

    fn fmt_sentence(&self, f: &mut fmt::Formatter<'_>, sentence: &BoundSentence) -> fmt::Result {
        let mut opening_line = utterance_label(sentence.index);
        let mut word_start_display_idx = Vec::with_capacity(sentence.words.len());

        for word in &sentence.words {
            opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            word_start_display_idx.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&word.text);
        }

        f.write_str(&opening_line)?;

        if self.show_relations {
            self.fmt_arrows(f, AnchorId::sentence(sentence.index), 0)?;
        }

        for (word, start) in sentence.words.iter().zip(word_start_display_idx) {
            let has_relations = self.show_relations
                && !self.visible_outgoing(AnchorId::Word(word.id)).is_empty();
            if !word.role.is_marked() && !has_relations {
                continue;
            }

            f.write_char('\n')?;
            write_indent(f, start)?;
            f.write_char('╰')?;
            match word.role {
                WordRole::Cb => f.write_str("Cb")?,
                WordRole::Cf => f.write_str("Cf")?,
                WordRole::Plain => {}
            }

            if has_relations {
                self.fmt_arrows(f, AnchorId::Word(word.id), start + SPACE_PADDING)?;
            }
        }

        Ok(())
    }

    fn visible_outgoing(&self, source: AnchorId) -> Vec<&'a Relation> {
        let last = self.through.unwrap_or(usize::MAX);
        self.discourse
            .relations()
            .outgoing(source)
            .filter(|relation| relation.target_id.sentence_index() <= last)
            .collect()
    }

    fn fmt_arrows(&self, f: &mut fmt::Formatter<'_>, source: AnchorId, indent: usize) -> fmt::Result {
        for relation in self.visible_outgoing(source) {
            f.write_char('\n')?;
            write_indent(f, indent)?;
            write!(f, "└─>{}", relation.target_id)?;
        }
        Ok(())
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, width: usize) -> fmt::Result {
    for _ in 0..width {
        f.write_char(' ')?;
    }
    Ok(())
}
