#[cfg(test)]
#[path = "./cursor_tests.rs"]
mod tests;

/// Positional view over the source text.
///
/// The text is normalized on construction (`\r\n` folded to `\n`, per the
/// TOML spec) so every scanner downstream is newline-agnostic. Positions are
/// zero-based code-point offsets into the normalized text and only ever
/// increase.
pub(crate) struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut iter = text.chars().peekable();
        while let Some(c) = iter.next() {
            if c == '\r' && iter.peek() == Some(&'\n') {
                continue;
            }
            chars.push(c);
        }
        Cursor { chars, pos: 0 }
    }

    /// Current position as a code-point offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Returns the next character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Remaining characters from the current position to end of input.
    #[inline]
    pub fn rest(&self) -> &[char] {
        &self.chars[self.pos.min(self.chars.len())..]
    }

    /// Consumes and returns the next character.
    #[inline]
    pub fn take(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Advances the position by `count`, clamped to end of input.
    #[inline]
    pub fn skip(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.chars.len());
    }

    /// Consumes the next character if it equals `c`.
    #[inline]
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips a maximal run of characters matching `pred`, returning how many
    /// were skipped.
    pub fn skip_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Advances to the first occurrence of the literal `needle` (or to end of
    /// input if absent), returning how many characters were skipped. The
    /// needle itself is not consumed.
    pub fn skip_until(&mut self, needle: &str) -> usize {
        let start = self.pos;
        let pat: Vec<char> = needle.chars().collect();
        if pat.is_empty() {
            return 0;
        }
        let mut i = self.pos;
        while i < self.chars.len() {
            if self.chars[i] == pat[0] && self.chars[i..].starts_with(&pat) {
                self.pos = i;
                return i - start;
            }
            i += 1;
        }
        self.pos = self.chars.len();
        self.pos - start
    }
}
