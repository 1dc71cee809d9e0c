//! Highlight overlay driven by paint instructions from the session.
//!
//! Behaves like tags on a text widget: each category owns a set of
//! highlighted ranges that move with the text as it is edited.

use crate::model::{Category, TextRange};

/// Paint instruction emitted by `assign` and `clear`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOp {
    /// Highlight `range` with the category's colour
    Paint { range: TextRange, category: Category },
    /// Remove `category` from every character in `range`
    Unpaint { range: TextRange, category: Category },
}

/// One highlighted segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub range: TextRange,
    pub category: Category,
}

/// Highlighted segments in paint order
#[derive(Debug, Clone, Default)]
pub struct HighlightOverlay {
    segments: Vec<Highlight>,
}

impl HighlightOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: PaintOp) {
        match op {
            PaintOp::Paint { range, category } => {
                if !range.is_empty() {
                    self.segments.push(Highlight { range, category });
                }
            }
            PaintOp::Unpaint { range, category } => self.unpaint(range, category),
        }
    }

    pub fn apply_all(&mut self, ops: impl IntoIterator<Item = PaintOp>) {
        for op in ops {
            self.apply(op);
        }
    }

    fn unpaint(&mut self, range: TextRange, category: Category) {
        let mut kept = Vec::with_capacity(self.segments.len() + 1);
        for seg in self.segments.drain(..) {
            if seg.category != category || !seg.range.overlaps(&range) {
                kept.push(seg);
                continue;
            }
            // Keep whatever lies outside the removed range
            if seg.range.start_offset < range.start_offset {
                kept.push(Highlight {
                    range: TextRange::new(seg.range.start_offset, range.start_offset),
                    category,
                });
            }
            if seg.range.end_offset > range.end_offset {
                kept.push(Highlight {
                    range: TextRange::new(range.end_offset, seg.range.end_offset),
                    category,
                });
            }
        }
        self.segments = kept;
    }

    /// Category shown at `offset`; the most recent paint wins
    pub fn category_at(&self, offset: usize) -> Option<Category> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.range.contains(offset))
            .map(|s| s.category)
    }

    /// Shift segments for `len` bytes inserted at `offset`.
    ///
    /// Text inserted strictly inside a segment extends it; text inserted at
    /// a segment boundary stays unhighlighted.
    pub fn on_insert(&mut self, offset: usize, len: usize) {
        for seg in &mut self.segments {
            if seg.range.start_offset >= offset {
                seg.range.start_offset += len;
                seg.range.end_offset += len;
            } else if seg.range.end_offset > offset {
                seg.range.end_offset += len;
            }
        }
    }

    /// Collapse `deleted` out of every segment, dropping emptied ones
    pub fn on_delete(&mut self, deleted: TextRange) {
        let map = |x: usize| {
            if x <= deleted.start_offset {
                x
            } else if x >= deleted.end_offset {
                x - deleted.len()
            } else {
                deleted.start_offset
            }
        };
        for seg in &mut self.segments {
            seg.range = TextRange::new(map(seg.range.start_offset), map(seg.range.end_offset));
        }
        self.segments.retain(|s| !s.range.is_empty());
    }

    pub fn segments(&self) -> &[Highlight] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }
}
