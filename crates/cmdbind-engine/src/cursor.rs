//! Character-level reader over the argument text of one command line.
//!
//! The cursor owns a read position into an immutable string. Every read is
//! bounds-checked and reports [`ReadError`] instead of panicking. Positions
//! are byte offsets and always sit on a char boundary, so they can be saved
//! and restored for backtracking.

/// Failure of a single cursor read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("read past end of input at position {position}")]
    OutOfBounds { position: usize },

    #[error("Invalid {expected} '{token}'")]
    Malformed {
        expected: &'static str,
        token: String,
    },
}

/// Characters that may appear in a word token.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

/// Characters that may appear in a numeric token.
pub fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '-')
}

/// Read cursor over a borrowed input string.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The full text this cursor reads from.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current read position (byte offset).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Restore a previously saved position.
    pub fn set_position(&mut self, pos: usize) -> Result<(), ReadError> {
        if !self.input.is_char_boundary(pos) {
            return Err(ReadError::OutOfBounds { position: pos });
        }
        self.pos = pos;
        Ok(())
    }

    /// True iff at least one more character is available.
    pub fn can_read(&self) -> bool {
        self.pos < self.input.len()
    }

    /// The next character, without consuming it.
    pub fn peek(&self) -> Result<char, ReadError> {
        self.input[self.pos..]
            .chars()
            .next()
            .ok_or(ReadError::OutOfBounds { position: self.pos })
    }

    /// Consume and return the next character.
    pub fn read(&mut self) -> Result<char, ReadError> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Ok(c)
    }

    /// Advance over the maximal run of characters matching `pred` and
    /// return the skipped text.
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &self.input[start..self.pos]
    }

    /// Skip a run of the space character only. Tabs and other whitespace
    /// are left in place.
    pub fn skip_space(&mut self) {
        self.skip_while(|c| c == ' ');
    }

    /// Read a word: alphanumerics plus `_ - . +`.
    pub fn read_word(&mut self) -> &'a str {
        self.skip_while(is_word_char)
    }

    /// Read an integer token.
    pub fn read_int(&mut self) -> Result<i64, ReadError> {
        let token = self.skip_while(is_number_char);
        token.parse().map_err(|_| ReadError::Malformed {
            expected: "number",
            token: token.to_string(),
        })
    }

    /// Read a floating point token.
    pub fn read_number(&mut self) -> Result<f64, ReadError> {
        let token = self.skip_while(is_number_char);
        token.parse().map_err(|_| ReadError::Malformed {
            expected: "decimal number",
            token: token.to_string(),
        })
    }

    /// Read `true` or `false`, case-insensitively.
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        let token = self.read_word();
        if token.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ReadError::Malformed {
                expected: "boolean",
                token: token.to_string(),
            })
        }
    }

    /// The unread remainder. Does not advance.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consume and return the unread remainder.
    pub fn read_rest(&mut self) -> &'a str {
        let rest = self.rest();
        self.pos = self.input.len();
        rest
    }
}
