#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;

use std::fmt::{self, Debug, Display};

/// Broad class of a decoding problem.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Severity {
    /// A malformed token: bad escape, bad digit grouping, illegal character.
    Lexical,
    /// Input that does not fit the grammar: unterminated or misplaced
    /// constructs, unexpected tokens, exceeded nesting depth.
    Structural,
    /// Well-formed input that violates a document rule: duplicate keys,
    /// redefined tables, dotted keys crossing non-tables.
    Semantic,
}

/// Problems the decoder can record.
#[derive(Clone, PartialEq)]
pub enum ErrorKind {
    /// A control character not allowed in a string.
    InvalidCharInString(char),

    /// A control character not allowed in a comment.
    InvalidCharInComment(char),

    /// An unrecognized character after a backslash in a basic string.
    InvalidEscape(char),

    /// A non-hex character inside a `\u`/`\U` escape.
    InvalidHexEscape(char),

    /// A `\u`/`\U` escape naming a value outside the unicode scalar range.
    InvalidEscapeValue(u32),

    /// A number failed to scan: bad underscore placement, leading zero,
    /// out-of-range magnitude, or stray characters.
    InvalidNumber,

    /// Input shaped like a date or time with an out-of-range component.
    InvalidDatetime,

    /// End of input reached before a string's closing delimiter.
    UnterminatedString,

    /// End of input reached where a value was required.
    UnexpectedEof,

    /// Arrays and inline tables nested beyond the depth bound.
    NestingTooDeep,

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A multiline string used where a key was expected.
    MultilineStringKey,

    /// An unquoted non-keyword token where a value was expected.
    UnquotedString,

    /// A key bound a second time within one table.
    DuplicateKey {
        /// The duplicate key.
        key: String,
        /// Position of the first binding.
        first: usize,
    },

    /// A header-defined table defined again by another header.
    DuplicateTable {
        /// The table name.
        name: String,
        /// Position of the first definition.
        first: usize,
    },

    /// An `[[array-of-tables]]` header naming an existing plain table.
    RedefineAsArray,

    /// A dotted key attempting to extend something that cannot be extended.
    DottedKeyInvalidType {
        /// Position where the blocking value was first bound.
        first: usize,
    },
}

impl ErrorKind {
    /// Classifies this kind per the lexical/structural/semantic taxonomy.
    pub fn severity(&self) -> Severity {
        match self {
            Self::InvalidCharInString(..)
            | Self::InvalidCharInComment(..)
            | Self::InvalidEscape(..)
            | Self::InvalidHexEscape(..)
            | Self::InvalidEscapeValue(..)
            | Self::InvalidNumber
            | Self::InvalidDatetime => Severity::Lexical,
            Self::UnterminatedString
            | Self::UnexpectedEof
            | Self::NestingTooDeep
            | Self::Wanted { .. }
            | Self::MultilineStringKey
            | Self::UnquotedString => Severity::Structural,
            Self::DuplicateKey { .. }
            | Self::DuplicateTable { .. }
            | Self::RedefineAsArray
            | Self::DottedKeyInvalidType { .. } => Severity::Semantic,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidCharInComment(..) => "invalid-char-in-comment",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::InvalidEscapeValue(..) => "invalid-escape-value",
            Self::InvalidNumber => "invalid-number",
            Self::InvalidDatetime => "invalid-datetime",
            Self::UnterminatedString => "unterminated-string",
            Self::UnexpectedEof => "unexpected-eof",
            Self::NestingTooDeep => "nesting-too-deep",
            Self::Wanted { .. } => "wanted",
            Self::MultilineStringKey => "multiline-string-key",
            Self::UnquotedString => "unquoted-string",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::RedefineAsArray => "redefine-as-array",
            Self::DottedKeyInvalidType { .. } => "dotted-key-invalid-type",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

/// A positioned, non-fatal problem recorded during a decode.
///
/// `pos` is a zero-based code-point offset into the (newline-normalized)
/// source text. `Display` renders the human-readable message.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Where the problem was detected.
    pub pos: usize,
    /// What the problem was.
    pub kind: ErrorKind,
}

impl std::error::Error for Diagnostic {}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InvalidCharInString(c) => {
                write!(f, "invalid character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidCharInComment(c) => {
                write!(f, "invalid character in comment: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscapeValue(v) => write!(f, "invalid escape value: `{v}`"),
            ErrorKind::InvalidNumber => f.write_str("invalid number"),
            ErrorKind::InvalidDatetime => f.write_str("invalid date-time"),
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::UnexpectedEof => f.write_str("unexpected eof encountered"),
            ErrorKind::NestingTooDeep => {
                f.write_str("arrays and inline tables nested too deeply")
            }
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::MultilineStringKey => {
                f.write_str("multiline strings are not allowed for key")
            }
            ErrorKind::UnquotedString => {
                f.write_str("invalid TOML value, did you mean to use a quoted string?")
            }
            ErrorKind::DuplicateKey { key, first } => {
                write!(f, "duplicate key: `{key}` (first bound at offset {first})")
            }
            ErrorKind::DuplicateTable { name, first } => {
                write!(
                    f,
                    "redefinition of table `{name}` (first defined at offset {first})"
                )
            }
            ErrorKind::RedefineAsArray => f.write_str("table redefined as array"),
            ErrorKind::DottedKeyInvalidType { first } => {
                write!(
                    f,
                    "dotted key attempted to extend non-table type (first bound at offset {first})"
                )
            }
        }
    }
}

/// Ordered, append-only diagnostic collection shared through the whole
/// scan/parse call tree. Recording never aborts the decode.
#[derive(Default)]
pub(crate) struct Diagnostics {
    list: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pos: usize, kind: ErrorKind) {
        self.list.push(Diagnostic { pos, kind });
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }
}
