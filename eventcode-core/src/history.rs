//! Undo/redo history for transcript text edits.
//!
//! Only buffer edits are recorded. Tagging is not undoable; re-tag or clear
//! instead.

use tracing::debug;

/// Maximum number of edits kept for undo
const MAX_HISTORY: usize = 500;

/// A reversible buffer edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `text` was inserted at byte `offset`
    Insert { offset: usize, text: String },
    /// `text` was removed starting at byte `offset`
    Delete { offset: usize, text: String },
}

/// Undo and redo stacks, most recent edit last
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edit that was just applied. Clears the redo stack.
    ///
    /// A typed insertion directly after the previous one joins it, so one
    /// undo removes a whole run of typing up to a line break.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if let (
            Some(Edit::Insert { offset, text }),
            Edit::Insert {
                offset: next,
                text: added,
            },
        ) = (self.undo_stack.last_mut(), &edit)
        {
            if *offset + text.len() == *next && !text.ends_with('\n') && !added.contains('\n') {
                text.push_str(added);
                return;
            }
        }

        self.undo_stack.push(edit);
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Take the most recent edit to revert; it moves to the redo stack
    pub fn pop_undo(&mut self) -> Option<Edit> {
        let edit = self.undo_stack.pop()?;
        debug!(?edit, "undo");
        self.redo_stack.push(edit.clone());
        Some(edit)
    }

    /// Take the most recently undone edit to reapply
    pub fn pop_redo(&mut self) -> Option<Edit> {
        let edit = self.redo_stack.pop()?;
        debug!(?edit, "redo");
        self.undo_stack.push(edit.clone());
        Some(edit)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
