use std::fmt;

use tracing::debug;

use centering_view::{BoundDiscourse, DiscourseView};

/// Identity of one analysis session. Tasks are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A bound result and how far into it the reveal has progressed.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: SessionId,
    discourse: BoundDiscourse,
    cursor: usize,
}

impl AnalysisSession {
    pub fn new(id: SessionId, discourse: BoundDiscourse) -> Self {
        Self {
            id,
            discourse,
            cursor: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn discourse(&self) -> &BoundDiscourse {
        &self.discourse
    }

    /// Index of the last revealed sentence.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.discourse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discourse.is_empty()
    }

    /// The last sentence is revealed.
    pub fn is_complete(&self) -> bool {
        self.cursor + 1 >= self.discourse.len()
    }

    /// Reveal the next sentence. Returns false once complete.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.cursor += 1;
        debug!(session = %self.id, cursor = self.cursor, "revealed sentence");
        true
    }

    pub fn view(&self) -> DiscourseView {
        DiscourseView::through(&self.discourse, self.cursor)
    }
}
