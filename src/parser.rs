use crate::cursor::Cursor;
use crate::error::{Diagnostic, Diagnostics, ErrorKind};
use crate::table::{Key, Table};
use crate::time::DateTime;
use crate::value::{Array, Value};

/// Nesting bound for arrays and inline tables, guarding against stack
/// exhaustion on adversarial input.
const MAX_NESTING: usize = 200;

// ---------------------------------------------------------------------------
// Lightweight internal error -- zero-sized, no payload.
// When a routine returns Err(ParseError), the diagnostic has already been
// appended to Parser::diags; the marker only unwinds to a recovery point.
// ---------------------------------------------------------------------------

#[derive(Copy, Clone)]
struct ParseError;

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    cursor: Cursor,
    diags: Diagnostics,

    /// Key path from the root to the current table, set by the most recent
    /// successful `[header]` / `[[header]]`. Array-of-tables segments resolve
    /// to the last element.
    path: Vec<String>,

    /// Current array/inline-table nesting depth.
    depth: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Parser {
            cursor: Cursor::new(input),
            diags: Diagnostics::new(),
            path: Vec::new(),
            depth: 0,
        }
    }

    // -- diagnostics --------------------------------------------------------

    fn error(&mut self, pos: usize, kind: ErrorKind) -> ParseError {
        self.diags.push(pos, kind);
        ParseError
    }

    // -- whitespace and comments --------------------------------------------

    fn eat_whitespace(&mut self) -> usize {
        self.cursor.skip_while(|c| c == ' ' || c == '\t')
    }

    /// Consumes a comment up to (but not past) the next newline, recording a
    /// diagnostic for every disallowed control character in its body.
    fn eat_comment(&mut self) -> bool {
        if !self.cursor.eat('#') {
            return false;
        }
        while let Some(c) = self.cursor.peek() {
            if c == '\n' {
                break;
            }
            self.cursor.skip(1);
            if is_bad_control(c) {
                self.diags
                    .push(self.cursor.pos() - 1, ErrorKind::InvalidCharInComment(c));
            }
        }
        true
    }

    /// Skips whitespace and comments until neither makes progress. A no-op
    /// when neither is present.
    fn eat_ws_and_comments(&mut self) {
        loop {
            let skipped_ws = self.eat_whitespace() > 0;
            let skipped_comment = self.eat_comment();
            if !skipped_ws && !skipped_comment {
                break;
            }
        }
    }

    /// Skips whitespace, newlines, and comments, as permitted between array
    /// elements.
    fn eat_intermediate(&mut self) {
        loop {
            self.eat_whitespace();
            if self.cursor.eat('\n') {
                continue;
            }
            if self.eat_comment() {
                continue;
            }
            break;
        }
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), ParseError> {
        if self.cursor.at_end() || self.cursor.eat('\n') {
            Ok(())
        } else {
            let pos = self.cursor.pos();
            let found = self.describe_next();
            Err(self.error(
                pos,
                ErrorKind::Wanted {
                    expected: "a newline",
                    found,
                },
            ))
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), ParseError> {
        if self.cursor.eat(c) {
            Ok(())
        } else {
            let pos = self.cursor.pos();
            let found = self.describe_next();
            Err(self.error(pos, ErrorKind::Wanted { expected, found }))
        }
    }

    /// Describes the token at the cursor for `Wanted` diagnostics.
    fn describe_next(&self) -> &'static str {
        match self.cursor.peek() {
            None => "eof",
            Some('\n') => "a newline",
            Some(' ' | '\t') => "whitespace",
            Some('#') => "a comment",
            Some('=') => "an equals",
            Some('.') => "a period",
            Some(',') => "a comma",
            Some(':') => "a colon",
            Some('+') => "a plus",
            Some('{') => "a left brace",
            Some('}') => "a right brace",
            Some('[') => "a left bracket",
            Some(']') => "a right bracket",
            Some('\'' | '"') => "a string",
            Some(c) if is_bare_key_char(c) => "an identifier",
            Some(_) => "a character",
        }
    }

    // -- key scanning -------------------------------------------------------

    fn read_bare_key(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.cursor.peek() {
            if !is_bare_key_char(c) {
                break;
            }
            name.push(c);
            self.cursor.skip(1);
        }
        name
    }

    fn read_table_key(&mut self) -> Result<Key, ParseError> {
        let pos = self.cursor.pos();
        match self.cursor.peek() {
            Some(q @ ('"' | '\'')) => {
                self.cursor.skip(1);
                let (name, multiline) = self.read_string(q)?;
                if multiline {
                    return Err(self.error(pos, ErrorKind::MultilineStringKey));
                }
                Ok(Key::new(name, pos))
            }
            Some(c) if is_bare_key_char(c) => {
                let name = self.read_bare_key();
                Ok(Key::new(name, pos))
            }
            Some(_) => {
                let found = self.describe_next();
                Err(self.error(
                    pos,
                    ErrorKind::Wanted {
                        expected: "a table key",
                        found,
                    },
                ))
            }
            None => Err(self.error(
                pos,
                ErrorKind::Wanted {
                    expected: "a table key",
                    found: "eof",
                },
            )),
        }
    }

    // -- string scanning ----------------------------------------------------

    /// Reads a string whose opening delimiter (one `"` or `'`) was just
    /// consumed. Detects the multiline form from the remaining delimiter run,
    /// trims a newline immediately following a multiline opener, and returns
    /// the decoded content plus whether the string was multiline.
    ///
    /// Basic strings (`"`) process escapes; literal strings (`'`) do not.
    fn read_string(&mut self, delim: char) -> Result<(String, bool), ParseError> {
        let start = self.cursor.pos() - 1;
        let mut multiline = false;
        if self.cursor.eat(delim) {
            if self.cursor.eat(delim) {
                multiline = true;
            } else {
                return Ok((String::new(), false));
            }
        }
        if multiline {
            self.cursor.eat('\n');
        }

        let mut out = String::new();
        loop {
            let i = self.cursor.pos();
            let Some(c) = self.cursor.peek() else {
                return Err(self.error(start, ErrorKind::UnterminatedString));
            };
            if c == '\n' && !multiline {
                // Left unconsumed so the assembler can resume on this line
                // boundary.
                return Err(self.error(i, ErrorKind::InvalidCharInString('\n')));
            }
            self.cursor.skip(1);

            match c {
                '\n' => out.push('\n'),
                c if c == delim => {
                    if !multiline {
                        return Ok((out, false));
                    }
                    if !self.cursor.eat(delim) {
                        out.push(delim);
                        continue;
                    }
                    if !self.cursor.eat(delim) {
                        out.push(delim);
                        out.push(delim);
                        continue;
                    }
                    // Closing run found; up to two further quotes belong to
                    // the content.
                    if self.cursor.eat(delim) {
                        out.push(delim);
                    }
                    if self.cursor.eat(delim) {
                        out.push(delim);
                    }
                    return Ok((out, true));
                }
                '\\' if delim == '"' => {
                    self.read_basic_escape(start, multiline, &mut out)?;
                }
                c if is_bad_control(c) => {
                    return Err(self.error(i, ErrorKind::InvalidCharInString(c)));
                }
                c => out.push(c),
            }
        }
    }

    fn read_basic_escape(
        &mut self,
        string_start: usize,
        multiline: bool,
        out: &mut String,
    ) -> Result<(), ParseError> {
        let i = self.cursor.pos();
        let Some(c) = self.cursor.take() else {
            return Err(self.error(string_start, ErrorKind::UnterminatedString));
        };

        match c {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => out.push(self.read_hex(4, string_start, i)?),
            'U' => out.push(self.read_hex(8, string_start, i)?),
            ' ' | '\t' | '\n' if multiline => {
                // Line-ending backslash: the backslash, trailing whitespace,
                // the newline, and all following whitespace are removed.
                if c != '\n' {
                    loop {
                        match self.cursor.peek() {
                            Some(' ' | '\t') => self.cursor.skip(1),
                            Some('\n') => {
                                self.cursor.skip(1);
                                break;
                            }
                            _ => return Err(self.error(i, ErrorKind::InvalidEscape(c))),
                        }
                    }
                }
                self.cursor
                    .skip_while(|c| c == ' ' || c == '\t' || c == '\n');
            }
            c => return Err(self.error(i, ErrorKind::InvalidEscape(c))),
        }
        Ok(())
    }

    fn read_hex(
        &mut self,
        n: usize,
        string_start: usize,
        escape_start: usize,
    ) -> Result<char, ParseError> {
        let mut value = 0u32;
        for _ in 0..n {
            let i = self.cursor.pos();
            let Some(c) = self.cursor.take() else {
                return Err(self.error(string_start, ErrorKind::UnterminatedString));
            };
            match c.to_digit(16) {
                Some(d) => value = value * 16 + d,
                None => return Err(self.error(i, ErrorKind::InvalidHexEscape(c))),
            }
        }
        match char::from_u32(value) {
            Some(c) => Ok(c),
            None => Err(self.error(escape_start, ErrorKind::InvalidEscapeValue(value))),
        }
    }

    // -- number scanning ----------------------------------------------------

    /// Collects the maximal run of characters that can appear in a number,
    /// boolean, or `inf`/`nan` token.
    fn read_scalar_token(&mut self) -> (usize, String) {
        let start = self.cursor.pos();
        let mut token = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.') {
                token.push(c);
                self.cursor.skip(1);
            } else {
                break;
            }
        }
        (start, token)
    }

    fn number(&mut self, start: usize, token: &str) -> Result<Value, ParseError> {
        match token {
            "inf" | "+inf" => return Ok(Value::Float(f64::INFINITY)),
            "-inf" => return Ok(Value::Float(f64::NEG_INFINITY)),
            "nan" | "+nan" => return Ok(Value::Float(f64::NAN.copysign(1.0))),
            "-nan" => return Ok(Value::Float(f64::NAN.copysign(-1.0))),
            _ => {}
        }
        if let Some(digits) = token.strip_prefix("0x") {
            return self.radix_integer(start, digits, 16);
        }
        if let Some(digits) = token.strip_prefix("0o") {
            return self.radix_integer(start, digits, 8);
        }
        if let Some(digits) = token.strip_prefix("0b") {
            return self.radix_integer(start, digits, 2);
        }
        if token.contains(['.', 'e', 'E']) {
            return self.float(start, token);
        }
        let Some(cleaned) = clean_digits(token, 10, true, false) else {
            return Err(self.error(start, ErrorKind::InvalidNumber));
        };
        match cleaned.parse::<i64>() {
            Ok(v) => Ok(Value::Integer(v)),
            Err(_) => Err(self.error(start, ErrorKind::InvalidNumber)),
        }
    }

    fn radix_integer(
        &mut self,
        start: usize,
        digits: &str,
        radix: u32,
    ) -> Result<Value, ParseError> {
        let Some(cleaned) = clean_digits(digits, radix, false, true) else {
            return Err(self.error(start, ErrorKind::InvalidNumber));
        };
        match i64::from_str_radix(&cleaned, radix) {
            Ok(v) => Ok(Value::Integer(v)),
            Err(_) => Err(self.error(start, ErrorKind::InvalidNumber)),
        }
    }

    fn float(&mut self, start: usize, token: &str) -> Result<Value, ParseError> {
        let (mantissa, exponent) = match token.find(['e', 'E']) {
            Some(i) => (&token[..i], Some(&token[i + 1..])),
            None => (token, None),
        };
        let (integral, fraction) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], Some(&mantissa[i + 1..])),
            None => (mantissa, None),
        };

        let Some(mut cleaned) = clean_digits(integral, 10, true, false) else {
            return Err(self.error(start, ErrorKind::InvalidNumber));
        };
        if let Some(fraction) = fraction {
            let Some(frac) = clean_digits(fraction, 10, false, true) else {
                return Err(self.error(start, ErrorKind::InvalidNumber));
            };
            cleaned.push('.');
            cleaned.push_str(&frac);
        }
        if let Some(exponent) = exponent {
            let Some(exp) = clean_digits(exponent, 10, true, true) else {
                return Err(self.error(start, ErrorKind::InvalidNumber));
            };
            cleaned.push('E');
            cleaned.push_str(&exp);
        }

        match cleaned.parse::<f64>() {
            // A finite literal must stay finite; overflow is a scan error.
            Ok(f) if f.is_finite() => Ok(Value::Float(f)),
            _ => Err(self.error(start, ErrorKind::InvalidNumber)),
        }
    }

    // -- datetime scanning --------------------------------------------------

    fn datetime(&mut self) -> Result<Value, ParseError> {
        let start = self.cursor.pos();
        match DateTime::munch(self.cursor.rest()) {
            Some((consumed, dt)) => {
                self.cursor.skip(consumed);
                Ok(Value::Datetime(dt))
            }
            None => Err(self.error(start, ErrorKind::InvalidDatetime)),
        }
    }

    // -- value parsing ------------------------------------------------------

    fn value(&mut self) -> Result<Value, ParseError> {
        let at = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            return Err(self.error(at, ErrorKind::UnexpectedEof));
        };
        match c {
            '"' | '\'' => {
                self.cursor.skip(1);
                let (s, _multiline) = self.read_string(c)?;
                Ok(Value::String(s))
            }
            '[' => self.array(),
            '{' => self.inline_table(),
            c if c.is_ascii_digit() => {
                if is_datetime_shape(self.cursor.rest()) {
                    return self.datetime();
                }
                let (start, token) = self.read_scalar_token();
                self.number(start, &token)
            }
            '+' | '-' | '.' => {
                let (start, token) = self.read_scalar_token();
                self.number(start, &token)
            }
            c if is_bare_key_char(c) => {
                let (start, token) = self.read_scalar_token();
                match token.as_str() {
                    "true" => Ok(Value::Boolean(true)),
                    "false" => Ok(Value::Boolean(false)),
                    "inf" | "nan" => self.number(start, &token),
                    _ if token.starts_with('_') => self.number(start, &token),
                    _ => Err(self.error(at, ErrorKind::UnquotedString)),
                }
            }
            _ => {
                let found = self.describe_next();
                Err(self.error(
                    at,
                    ErrorKind::Wanted {
                        expected: "a value",
                        found,
                    },
                ))
            }
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        let start = self.cursor.pos();
        self.cursor.skip(1); // [
        if self.depth >= MAX_NESTING {
            return Err(self.error(start, ErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = self.array_contents();
        self.depth -= 1;
        result
    }

    fn array_contents(&mut self) -> Result<Value, ParseError> {
        let mut arr = Array::new();
        loop {
            self.eat_intermediate();
            if self.cursor.eat(']') {
                return Ok(Value::Array(arr));
            }
            let val = self.value()?;
            arr.push(val);
            self.eat_intermediate();
            if !self.cursor.eat(',') {
                break;
            }
        }
        self.eat_intermediate();
        self.expect(']', "a right bracket")?;
        Ok(Value::Array(arr))
    }

    fn inline_table(&mut self) -> Result<Value, ParseError> {
        let start = self.cursor.pos();
        self.cursor.skip(1); // {
        if self.depth >= MAX_NESTING {
            return Err(self.error(start, ErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = self.inline_table_contents();
        self.depth -= 1;
        result
    }

    /// Parses `key = value` pairs up to the closing brace. Newlines are not
    /// permitted anywhere inside an inline table; the resulting table is
    /// frozen against any later extension.
    fn inline_table_contents(&mut self) -> Result<Value, ParseError> {
        let mut table = Table::new();
        self.eat_whitespace();
        if self.cursor.eat('}') {
            table.frozen = true;
            return Ok(Value::Table(table));
        }
        loop {
            let segments = self.read_dotted_key()?;
            self.expect('=', "an equals")?;
            self.eat_whitespace();
            let val = self.value()?;
            let _ = self.insert_dotted(&mut table, segments, val);

            self.eat_whitespace();
            if self.cursor.eat('}') {
                table.frozen = true;
                return Ok(Value::Table(table));
            }
            self.expect(',', "a comma")?;
            self.eat_whitespace();
            if self.cursor.eat('}') {
                table.frozen = true;
                return Ok(Value::Table(table));
            }
        }
    }

    // -- document assembly --------------------------------------------------

    /// Reads `key` or `key.key.…`, leaving the cursor on the character after
    /// the trailing whitespace.
    fn read_dotted_key(&mut self) -> Result<Vec<Key>, ParseError> {
        let mut segments = vec![self.read_table_key()?];
        self.eat_whitespace();
        while self.cursor.eat('.') {
            self.eat_whitespace();
            segments.push(self.read_table_key()?);
            self.eat_whitespace();
        }
        Ok(segments)
    }

    /// Resolves dotted segments inside `table` and binds the leaf, erroring
    /// on a re-bound leaf or a path crossing a non-extensible value.
    fn insert_dotted(
        &mut self,
        table: &mut Table,
        segments: Vec<Key>,
        value: Value,
    ) -> Result<(), ParseError> {
        let Some((last, intermediate)) = segments.split_last() else {
            return Ok(());
        };
        let mut table = table;
        for key in intermediate {
            table = self.navigate_dotted_key(table, key)?;
        }
        if table.contains_key(&last.name) {
            let first = table.key_pos(&last.name).unwrap_or(0);
            return Err(self.error(
                last.pos,
                ErrorKind::DuplicateKey {
                    key: last.name.clone(),
                    first,
                },
            ));
        }
        table.insert(last.clone(), value);
        Ok(())
    }

    /// Navigates one intermediate segment of a dotted key, creating a dotted
    /// sub-table on demand. Existing tables may be extended only if they were
    /// not written inline and not defined by a header.
    fn navigate_dotted_key<'t>(
        &mut self,
        table: &'t mut Table,
        key: &Key,
    ) -> Result<&'t mut Table, ParseError> {
        if !table.contains_key(&key.name) {
            let mut new = Table::new();
            new.dotted = true;
            table.insert(key.clone(), Value::Table(new));
        } else {
            let first = table.key_pos(&key.name).unwrap_or(0);
            let extensible = matches!(
                table.get(&key.name),
                Some(Value::Table(t)) if !t.frozen && !t.defined
            );
            if !extensible {
                return Err(self.error(key.pos, ErrorKind::DottedKeyInvalidType { first }));
            }
        }
        match table.get_mut(&key.name) {
            Some(Value::Table(t)) => Ok(t),
            _ => unreachable!("dotted segment was just verified to be a table"),
        }
    }

    /// Parses a `[name]` or `[[name]]` header line and rebinds the current
    /// table path.
    fn table_header(&mut self, root: &mut Table) -> Result<(), ParseError> {
        let header_pos = self.cursor.pos();
        self.cursor.skip(1); // [
        let is_array = self.cursor.eat('[');
        self.eat_whitespace();
        let segments = self.read_dotted_key()?;
        self.expect(']', "a right bracket")?;
        if is_array {
            self.expect(']', "a right bracket")?;
        }
        self.eat_whitespace();
        self.eat_comment();
        self.eat_newline_or_eof()?;

        // A failed binding is not a structural problem: the diagnostic is
        // already recorded and the previously bound table stays current.
        let _ = self.bind_header(root, &segments, is_array, header_pos);
        Ok(())
    }

    fn bind_header(
        &mut self,
        root: &mut Table,
        segments: &[Key],
        is_array: bool,
        header_pos: usize,
    ) -> Result<(), ParseError> {
        let Some((last, intermediate)) = segments.split_last() else {
            return Ok(());
        };
        let mut table = &mut *root;
        for key in intermediate {
            table = self.navigate_header_intermediate(table, key)?;
        }
        if is_array {
            self.bind_array_of_tables(table, last, header_pos)?;
        } else {
            self.bind_table(table, last, header_pos)?;
        }
        self.path.clear();
        self.path.extend(segments.iter().map(|k| k.name.clone()));
        Ok(())
    }

    /// Navigates one intermediate header segment (`a` in `[a.b.c]`),
    /// creating implicit tables on demand and descending into the last entry
    /// of an array-of-tables.
    fn navigate_header_intermediate<'t>(
        &mut self,
        table: &'t mut Table,
        key: &Key,
    ) -> Result<&'t mut Table, ParseError> {
        if !table.contains_key(&key.name) {
            table.insert(key.clone(), Value::Table(Table::new()));
        }
        let first = table.key_pos(&key.name).unwrap_or(0);
        match table.get_mut(&key.name) {
            Some(Value::Table(t)) if !t.frozen => Ok(t),
            Some(Value::Array(arr)) if arr.aot => match arr.last_mut() {
                Some(Value::Table(t)) => Ok(t),
                _ => Err(self.error(
                    key.pos,
                    ErrorKind::DuplicateKey {
                        key: key.name.clone(),
                        first,
                    },
                )),
            },
            _ => Err(self.error(
                key.pos,
                ErrorKind::DuplicateKey {
                    key: key.name.clone(),
                    first,
                },
            )),
        }
    }

    /// Binds the final segment of a `[name]` header: a fresh or implicit
    /// table becomes explicitly defined; anything else is a redefinition.
    fn bind_table(
        &mut self,
        table: &mut Table,
        key: &Key,
        header_pos: usize,
    ) -> Result<(), ParseError> {
        if !table.contains_key(&key.name) {
            let mut new = Table::new();
            new.defined = true;
            table.insert(key.clone(), Value::Table(new));
            return Ok(());
        }
        let first = table.key_pos(&key.name).unwrap_or(0);
        match table.get_mut(&key.name) {
            Some(Value::Table(t)) => {
                if t.defined {
                    Err(self.error(
                        header_pos,
                        ErrorKind::DuplicateTable {
                            name: key.name.clone(),
                            first,
                        },
                    ))
                } else if t.frozen || t.dotted {
                    Err(self.error(
                        key.pos,
                        ErrorKind::DuplicateKey {
                            key: key.name.clone(),
                            first,
                        },
                    ))
                } else {
                    t.defined = true;
                    Ok(())
                }
            }
            _ => Err(self.error(
                key.pos,
                ErrorKind::DuplicateKey {
                    key: key.name.clone(),
                    first,
                },
            )),
        }
    }

    /// Binds the final segment of a `[[name]]` header, appending exactly one
    /// table to the array (creating the array on first occurrence).
    fn bind_array_of_tables(
        &mut self,
        table: &mut Table,
        key: &Key,
        header_pos: usize,
    ) -> Result<(), ParseError> {
        if !table.contains_key(&key.name) {
            let mut entry = Table::new();
            entry.defined = true;
            table.insert(
                key.clone(),
                Value::Array(Array::with_first_entry(Value::Table(entry))),
            );
            return Ok(());
        }
        let first = table.key_pos(&key.name).unwrap_or(0);
        match table.get_mut(&key.name) {
            Some(Value::Array(arr)) if arr.aot => {
                let mut entry = Table::new();
                entry.defined = true;
                arr.push(Value::Table(entry));
                Ok(())
            }
            Some(Value::Table(_)) => Err(self.error(header_pos, ErrorKind::RedefineAsArray)),
            _ => Err(self.error(
                key.pos,
                ErrorKind::DuplicateKey {
                    key: key.name.clone(),
                    first,
                },
            )),
        }
    }

    /// Parses one `key = value` line into the current table.
    fn key_value(&mut self, root: &mut Table) -> Result<(), ParseError> {
        let segments = self.read_dotted_key()?;
        self.expect('=', "an equals")?;
        self.eat_whitespace();
        let val = self.value()?;
        self.eat_whitespace();
        self.eat_comment();
        self.eat_newline_or_eof()?;

        let table = open_current(root, &self.path);
        // Binding failures (duplicate keys, blocked dotted paths) are
        // recorded, but the line itself was well-formed, so no resync.
        let _ = self.insert_dotted(table, segments, val);
        Ok(())
    }

    /// Skips to the start of the next line so scanning can resume after a
    /// recoverable error.
    fn recover_to_next_line(&mut self) {
        self.cursor.skip_until("\n");
        self.cursor.skip(1);
    }

    fn parse_document(&mut self) -> Table {
        let mut root = Table::new();
        loop {
            self.eat_ws_and_comments();
            if self.cursor.eat('\n') {
                continue;
            }
            let result = match self.cursor.peek() {
                None => break,
                Some('[') => self.table_header(&mut root),
                Some(_) => self.key_value(&mut root),
            };
            if result.is_err() {
                self.recover_to_next_line();
            }
        }
        root
    }
}

/// Walks the current-table path from the root. Every segment was validated
/// when its header was bound, and entries are never removed, so the walk
/// cannot meet anything but tables and arrays-of-tables.
fn open_current<'t>(root: &'t mut Table, path: &[String]) -> &'t mut Table {
    let mut table = root;
    for segment in path {
        table = match table.get_mut(segment) {
            Some(Value::Table(t)) => t,
            Some(Value::Array(arr)) => match arr.last_mut() {
                Some(Value::Table(t)) => t,
                _ => unreachable!("array-of-tables entries are tables"),
            },
            _ => unreachable!("current-table path resolves through tables"),
        };
    }
    table
}

// ---------------------------------------------------------------------------
// Top-level decode entry points
// ---------------------------------------------------------------------------

/// Decodes TOML source text into a document table, collecting every problem
/// found instead of stopping at the first.
///
/// An empty diagnostic list means success. A non-empty list means failure;
/// the returned table then holds whatever was assembled before the errors
/// (everything, when every error was recoverable).
pub fn decode(text: &str) -> (Table, Vec<Diagnostic>) {
    let mut parser = Parser::new(text);
    let document = parser.parse_document();
    (document, parser.diags.into_vec())
}

/// Like [`decode`], but returns `default` verbatim whenever any diagnostic
/// was recorded.
pub fn decode_or_default(text: &str, default: Table) -> Table {
    let (document, diagnostics) = decode(text);
    if diagnostics.is_empty() {
        document
    } else {
        default
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[inline]
fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Control characters disallowed in strings and comments (tab excepted).
#[inline]
fn is_bad_control(c: char) -> bool {
    (c < ' ' && c != '\t') || c == '\u{7f}'
}

/// Whether the upcoming characters look like the start of a time (`dd:`) or
/// date (`dddd-dd-`). Only shaped input is handed to the datetime scanner;
/// shaped input the scanner rejects is a malformed datetime, not a number.
fn is_datetime_shape(rest: &[char]) -> bool {
    matches!(rest, [_, _, ':', _, _, ..]) || matches!(rest, [_, _, _, _, '-', _, _, '-', ..])
}

/// Validates digit grouping for one radix and returns the digits with
/// underscores stripped (a `-` sign is preserved, `+` dropped). Underscores
/// must sit between digits. A leading zero is only allowed for a lone `0`
/// unless `allow_leading_zeros` (radix-prefixed digits, fractions,
/// exponents).
fn clean_digits(
    s: &str,
    radix: u32,
    allow_sign: bool,
    allow_leading_zeros: bool,
) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    if allow_sign {
        if let Some(r) = s.strip_prefix('-') {
            out.push('-');
            rest = r;
        } else if let Some(r) = s.strip_prefix('+') {
            rest = r;
        }
    }

    let mut prev_digit = false;
    let mut digits = 0usize;
    let mut leading_zero = false;
    for c in rest.chars() {
        if c == '_' {
            if !prev_digit {
                return None;
            }
            prev_digit = false;
            continue;
        }
        if !c.is_digit(radix) {
            return None;
        }
        if digits == 0 && c == '0' {
            leading_zero = true;
        }
        digits += 1;
        prev_digit = true;
        out.push(c);
    }
    if digits == 0 || !prev_digit {
        return None;
    }
    if leading_zero && digits > 1 && !allow_leading_zeros {
        return None;
    }
    Some(out)
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
