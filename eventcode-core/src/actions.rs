use crate::session::AnnotationSession;

/// Byte offset of the first occurrence of the registry entry at `index`
pub fn entry_offset_by_index(session: &AnnotationSession, index: usize) -> Option<usize> {
    let entry = session.registry().iter().nth(index)?;
    session.text().find(entry.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, TextRange};

    #[test]
    fn test_entry_offset_finds_first_occurrence() {
        let mut session = AnnotationSession::with_text("home, then home again");
        session.assign(Some(TextRange::new(11, 15)), Category::Place);

        assert_eq!(entry_offset_by_index(&session, 0), Some(0));
        assert_eq!(entry_offset_by_index(&session, 1), None);
    }
}
