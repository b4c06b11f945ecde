//! Character cursor for traversing source code, tracking line/column as it goes.

use spi_util::Position;

/// A cursor over source text. Tracks byte position plus 1-indexed line and
/// column, the way the lexer needs for every token it mints.
pub struct Cursor<'a> {
    source: &'a [u8],
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current byte, or `\0` at end of input. The source is 8-bit per the
    /// language's encoding contract, so byte-indexing is sufficient.
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    pub fn char_at(&self, offset: usize) -> char {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            '\0'
        } else {
            self.source[pos] as char
        }
    }

    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Advances past the current character, updating line/column. A newline
    /// bumps the line counter and resets the column before the advance
    /// itself moves past it.
    pub fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        if self.current_char() == '\n' {
            self.line += 1;
            self.column = 0;
        }
        self.position += 1;
        if !self.is_at_end() {
            self.column += 1;
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracks_line_and_column_across_newline() {
        let mut c = Cursor::new("ab\ncd");
        assert_eq!(c.current_char(), 'a');
        c.advance();
        c.advance();
        assert_eq!(c.current_char(), '\n');
        assert_eq!(c.position(), Position::new(1, 3));
        c.advance();
        assert_eq!(c.current_char(), 'c');
        assert_eq!(c.position(), Position::new(2, 1));
    }

    #[test]
    fn peek_does_not_advance() {
        let c = Cursor::new("xy");
        assert_eq!(c.peek_char(1), 'y');
        assert_eq!(c.current_char(), 'x');
    }

    #[test]
    fn is_at_end_after_exhausting_source() {
        let mut c = Cursor::new("a");
        assert!(!c.is_at_end());
        c.advance();
        assert!(c.is_at_end());
        assert_eq!(c.current_char(), '\0');
    }
}
