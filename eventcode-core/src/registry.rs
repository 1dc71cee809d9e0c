//! Span registry: selected text content mapped to its category.
//!
//! Entries are keyed by the literal text of a selection, not its position,
//! so every on-screen occurrence of the same text shares one entry.

use serde::Serialize;

use crate::model::Category;

/// One registered span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanAssignment {
    #[serde(rename = "Word/Phrase")]
    pub text: String,
    #[serde(rename = "Category")]
    pub category: Category,
}

/// Insertion-ordered map from span text to category
#[derive(Debug, Clone, Default)]
pub struct SpanRegistry {
    entries: Vec<SpanAssignment>,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<Category> {
        self.entries
            .iter()
            .find(|e| e.text == text)
            .map(|e| e.category)
    }

    /// Set the category for `text`, returning the previous one.
    ///
    /// Re-tagging keeps the entry's original position.
    pub fn insert(&mut self, text: &str, category: Category) -> Option<Category> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.text == text) {
            Some(std::mem::replace(&mut entry.category, category))
        } else {
            self.entries.push(SpanAssignment {
                text: text.to_string(),
                category,
            });
            None
        }
    }

    pub fn remove(&mut self, text: &str) -> Option<Category> {
        let pos = self.entries.iter().position(|e| e.text == text)?;
        Some(self.entries.remove(pos).category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SpanAssignment> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
