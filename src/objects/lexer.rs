/// Character cursor over a single line of an OBJ file.
///
/// Unlike a token stream, the cursor never skips whitespace on its own:
/// the face grammar depends on what sits directly after an index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lexer<'a> {
    line: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        return Lexer { line, position: 0 };
    }

    pub fn char(&self) -> Option<char> {
        return self.line[self.position..].chars().next();
    }

    /// Column of the current character, starting at 1.
    pub fn col(&self) -> usize {
        return self.line[..self.position].chars().count() + 1;
    }

    pub fn advance(&mut self) {
        if let Some(c) = self.char() {
            self.position += c.len_utf8();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.char() {
            match c {
                c if c.is_whitespace() => self.advance(),
                _ => break,
            }
        }
    }

    /// Consumes `expected` if it is the current character.
    pub fn consume(&mut self, expected: char) -> bool {
        if self.char() == Some(expected) {
            self.advance();
            return true;
        }

        return false;
    }

    /// Skips leading whitespace and returns the next whitespace-delimited word.
    pub fn consume_word(&mut self) -> Option<&'a str> {
        self.skip_whitespace();

        let start = self.position;
        while let Some(c) = self.char() {
            match c {
                c if c.is_whitespace() => break,
                _ => self.advance(),
            }
        }

        if start == self.position {
            return None;
        }

        return Some(&self.line[start..self.position]);
    }

    /// Reads a floating point word; leading whitespace is skipped.
    pub fn consume_float(&mut self) -> Option<f32> {
        return self.consume_word()?.parse::<f32>().ok();
    }

    /// Reads an optionally signed integer starting exactly at the cursor.
    ///
    /// Stops at the first non-digit, so `12/3` yields `12` and leaves the
    /// cursor on the slash. On failure the cursor is left untouched.
    pub fn consume_integer(&mut self) -> Option<i32> {
        let start = self.position;
        let mut cursor = *self;

        if matches!(cursor.char(), Some('-') | Some('+')) {
            cursor.advance();
        }

        let digits = cursor.position;
        while let Some(c) = cursor.char() {
            match c {
                c if c.is_ascii_digit() => cursor.advance(),
                _ => break,
            }
        }

        if cursor.position == digits {
            return None;
        }

        let value = self.line[start..cursor.position].parse::<i32>().ok()?;
        *self = cursor;

        return Some(value);
    }
}
