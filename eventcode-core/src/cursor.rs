/// Editor cursor over the transcript buffer.
///
/// Rows are lines, columns count chars; offsets are byte offsets into the
/// buffer so they can be used directly as `TextRange` bounds.
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Current cursor position (row, col)
    pub row: usize,
    pub col: usize,
    /// Byte offset at which each line starts
    line_starts: Vec<usize>,
    /// Lines of content, without their newlines
    lines: Vec<String>,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            line_starts: vec![0],
            lines: vec![String::new()],
        }
    }

    /// Load content and move the cursor to the top
    pub fn set_content(&mut self, content: &str) {
        self.refresh(content);
        self.row = 0;
        self.col = 0;
    }

    /// Recompute line offsets after an edit, keeping the cursor in bounds
    pub fn refresh(&mut self, content: &str) {
        self.lines = content.split('\n').map(String::from).collect();
        self.line_starts.clear();
        self.line_starts.push(0);

        for (i, c) in content.char_indices() {
            if c == '\n' {
                self.line_starts.push(i + 1);
            }
        }

        self.row = self.row.min(self.lines.len() - 1);
        self.col = self.col.min(self.line_len(self.row));
    }

    /// Get current cursor position as (row, col)
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Byte offset of the cursor
    pub fn offset(&self) -> usize {
        self.cursor_to_offset(self.row, self.col)
    }

    /// Convert (row, col) to byte offset
    pub fn cursor_to_offset(&self, row: usize, col: usize) -> usize {
        let Some(line) = self.lines.get(row) else {
            // Past the last line: end of content
            let last = self.lines.len() - 1;
            return self.line_starts[last] + self.lines[last].len();
        };
        let byte_col = line
            .char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        self.line_starts[row] + byte_col
    }

    /// Convert byte offset to (row, col)
    pub fn offset_to_cursor(&self, offset: usize) -> (usize, usize) {
        for (i, &start) in self.line_starts.iter().enumerate().rev() {
            if offset >= start {
                let line = &self.lines[i];
                let within = (offset - start).min(line.len());
                let col = line
                    .char_indices()
                    .take_while(|(b, _)| *b < within)
                    .count();
                return (i, col);
            }
        }
        (0, 0)
    }

    /// Set cursor to byte offset
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let (row, col) = self.offset_to_cursor(offset);
        self.row = row;
        self.col = col;
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    // Cursor movement methods

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            // Move to end of previous line
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            // Move to start of next line
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_to_start(&mut self) {
        self.col = 0;
    }

    pub fn move_to_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    pub fn move_to_top(&mut self) {
        self.row = 0;
        self.col = 0;
    }

    pub fn move_to_bottom(&mut self) {
        self.row = self.lines.len() - 1;
        self.col = self.line_len(self.row);
    }

    pub fn move_word_forward(&mut self) {
        if let Some(line) = self.lines.get(self.row) {
            let chars: Vec<char> = line.chars().collect();
            let mut col = self.col;

            // Skip current word (non-whitespace)
            while col < chars.len() && !chars[col].is_whitespace() {
                col += 1;
            }
            // Skip whitespace
            while col < chars.len() && chars[col].is_whitespace() {
                col += 1;
            }

            if col >= chars.len() && self.row + 1 < self.lines.len() {
                self.row += 1;
                self.col = 0;
            } else {
                self.col = col;
            }
        }
    }

    /// Move to the end of the current or next word
    pub fn move_word_end(&mut self) {
        if let Some(line) = self.lines.get(self.row) {
            let chars: Vec<char> = line.chars().collect();
            let mut col = self.col;

            while col < chars.len() && chars[col].is_whitespace() {
                col += 1;
            }
            while col < chars.len() && !chars[col].is_whitespace() {
                col += 1;
            }
            self.col = col;
        }
    }

    pub fn move_word_back(&mut self) {
        if self.col == 0 {
            if self.row > 0 {
                self.row -= 1;
                self.col = self.line_len(self.row);
            }
            return;
        }

        if let Some(line) = self.lines.get(self.row) {
            let chars: Vec<char> = line.chars().collect();
            let mut col = self.col;

            // Skip whitespace backwards
            while col > 0 && chars.get(col - 1).map(|c| c.is_whitespace()).unwrap_or(false) {
                col -= 1;
            }
            // Skip word backwards
            while col > 0 && chars.get(col - 1).map(|c| !c.is_whitespace()).unwrap_or(false) {
                col -= 1;
            }

            self.col = col;
        }
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}
