//! Event Coding Core - Platform-agnostic transcript annotation library
//!
//! This crate holds the annotation session (the transcript buffer and the
//! registry mapping selected text to its category), the category colour
//! table, the highlight overlay fed by paint instructions, and the CSV
//! export. Front-ends only capture selections and forward commands.

pub mod actions;
pub mod app;
pub mod cursor;
pub mod error;
pub mod export;
pub mod history;
pub mod model;
pub mod overlay;
pub mod registry;
pub mod session;

pub use app::{App, Focus, Mode, Notice, NoticeKind};
pub use cursor::CursorState;
pub use error::{ExportError, SessionError};
pub use export::{extract_nested, write_csv, HEADER, NESTED_CATEGORY};
pub use history::{Edit, EditHistory};
pub use model::{category_color, Category, Rgb, TextRange, DEFAULT_COLOR};
pub use overlay::{Highlight, HighlightOverlay, PaintOp};
pub use registry::{SpanAssignment, SpanRegistry};
pub use session::{AnnotationSession, ExportOutcome};
