//! Annotation session: the transcript buffer plus its span registry.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ExportError, SessionError};
use crate::export;
use crate::model::{Category, TextRange};
use crate::overlay::PaintOp;
use crate::registry::SpanRegistry;

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No destination was chosen; nothing happened
    Cancelled,
    /// File written and session reset
    Saved { path: PathBuf, rows: usize },
}

/// One transcript being coded
#[derive(Debug, Clone)]
pub struct AnnotationSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    buffer: String,
    registry: SpanRegistry,
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            buffer: String::new(),
            registry: SpanRegistry::new(),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.buffer = text.into();
        session
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn registry(&self) -> &SpanRegistry {
        &self.registry
    }

    /// Replace the whole buffer. Registered spans are kept.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Insert `text` at byte `offset` (clamped to the buffer end)
    pub fn insert_str(&mut self, offset: usize, text: &str) -> usize {
        let offset = self.floor_boundary(offset);
        self.buffer.insert_str(offset, text);
        offset
    }

    /// Remove the bytes covered by `range`, returning the removed text
    pub fn delete(&mut self, range: TextRange) -> String {
        let start = self.floor_boundary(range.start_offset);
        let end = self.floor_boundary(range.end_offset);
        self.buffer.drain(start..end).collect()
    }

    /// Exact buffer text under `range`, if it lies on char boundaries
    pub fn slice(&self, range: TextRange) -> Option<&str> {
        self.buffer.get(range.start_offset..range.end_offset)
    }

    fn floor_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.buffer.len());
        while !self.buffer.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }

    /// Tag the selected text with `category`.
    ///
    /// No selection (or an empty one) does nothing. An existing tag on the
    /// same text is removed from the range before the new one is painted.
    pub fn assign(&mut self, selection: Option<TextRange>, category: Category) -> Vec<PaintOp> {
        let Some((range, text)) = self.selected(selection) else {
            return Vec::new();
        };

        let mut ops = Vec::with_capacity(2);
        if let Some(existing) = self.registry.get(&text) {
            ops.push(PaintOp::Unpaint {
                range,
                category: existing,
            });
        }

        self.registry.insert(&text, category);
        ops.push(PaintOp::Paint { range, category });

        debug!(session = %self.id, text = %text, category = %category, "assigned category");
        ops
    }

    /// Remove the tag from the selected text.
    pub fn clear(&mut self, selection: Option<TextRange>) -> Result<Vec<PaintOp>, SessionError> {
        let Some((range, text)) = self.selected(selection) else {
            return Ok(Vec::new());
        };

        let Some(existing) = self.registry.remove(&text) else {
            warn!(session = %self.id, text = %text, "no existing tag to clear");
            return Err(SessionError::NoExistingTag);
        };

        debug!(session = %self.id, text = %text, category = %existing, "cleared category");
        Ok(vec![PaintOp::Unpaint {
            range,
            category: existing,
        }])
    }

    fn selected(&self, selection: Option<TextRange>) -> Option<(TextRange, String)> {
        let range = selection.filter(|r| !r.is_empty())?;
        let text = self.slice(range)?;
        Some((range, text.to_string()))
    }

    /// Write every tagged span and nested substring to `destination`.
    ///
    /// The session is reset only after the file is fully written.
    pub fn export(&mut self, destination: Option<&Path>) -> Result<ExportOutcome, ExportError> {
        let Some(path) = destination else {
            debug!(session = %self.id, "export cancelled");
            return Ok(ExportOutcome::Cancelled);
        };

        let file = File::create(path).map_err(|source| {
            warn!(path = %path.display(), error = %source, "cannot open export destination");
            ExportError::Create {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let rows = export::write_csv(BufWriter::new(file), &self.registry, &self.buffer)
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "export failed"))?;

        info!(
            session = %self.id,
            path = %path.display(),
            rows,
            elapsed_secs = (Utc::now() - self.started_at).num_seconds(),
            "exported session"
        );
        self.reset();

        Ok(ExportOutcome::Saved {
            path: path.to_path_buf(),
            rows,
        })
    }

    /// Start over with an empty buffer and registry
    pub fn reset(&mut self) {
        *self = Self::new();
        info!(session = %self.id, "started new session");
    }
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self::new()
    }
}
