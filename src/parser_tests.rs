use super::*;
use crate::error::Severity;

#[track_caller]
fn decode_ok(input: &str) -> Table {
    let (doc, diagnostics) = decode(input);
    assert!(
        diagnostics.is_empty(),
        "unexpected diagnostics for {input:?}: {diagnostics:?}"
    );
    doc
}

#[track_caller]
fn decode_err(input: &str) -> (Table, Vec<Diagnostic>) {
    let (doc, diagnostics) = decode(input);
    assert!(!diagnostics.is_empty(), "expected diagnostics for {input:?}");
    (doc, diagnostics)
}

#[track_caller]
fn lookup<'a>(doc: &'a Table, path: &str) -> &'a Value {
    let mut parts = path.split('.');
    let first = parts.next().unwrap();
    let mut value = doc
        .get(first)
        .unwrap_or_else(|| panic!("missing key `{first}`"));
    for part in parts {
        value = value
            .as_table()
            .and_then(|t| t.get(part))
            .unwrap_or_else(|| panic!("missing key `{part}` in `{path}`"));
    }
    value
}

#[test]
fn basic_scalar_values() {
    // empty document
    let doc = decode_ok("");
    assert!(doc.is_empty());

    let doc = decode_ok("a = \"hello\"");
    assert_eq!(doc.get("a").unwrap().as_str(), Some("hello"));

    let doc = decode_ok("a = 42");
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(42));

    let doc = decode_ok("a = -100");
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(-100));

    let doc = decode_ok("a = 3.14");
    let f = doc.get("a").unwrap().as_float().unwrap();
    assert!((f - 3.14).abs() < f64::EPSILON);

    let doc = decode_ok("a = true");
    assert_eq!(doc.get("a").unwrap().as_bool(), Some(true));
    let doc = decode_ok("a = false");
    assert_eq!(doc.get("a").unwrap().as_bool(), Some(false));

    let doc = decode_ok("a = 1\nb = 2\nc = 3");
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1));
    assert_eq!(doc.get("c").unwrap().as_integer(), Some(3));
}

#[test]
fn string_escapes() {
    let cases = [
        (r#"a = "line1\nline2""#, "line1\nline2"),
        (r#"a = "col1\tcol2""#, "col1\tcol2"),
        (r#"a = "path\\to""#, "path\\to"),
        (r#"a = "say \"hi\"""#, "say \"hi\""),
        (r#"a = "bell\b form\f cr\r""#, "bell\u{8} form\u{c} cr\r"),
        (r#"a = "\u0041""#, "A"),
        (r#"a = "\u00e9""#, "é"),
        (r#"a = "\U00000041""#, "A"),
        (r#"a = "\U0001F600""#, "\u{1F600}"),
    ];
    for (input, expected) in cases {
        let doc = decode_ok(input);
        assert_eq!(
            doc.get("a").unwrap().as_str(),
            Some(expected),
            "input: {input}"
        );
    }
}

#[test]
fn bad_escapes_are_lexical_diagnostics() {
    let cases = [
        (r#"a = "\q""#, ErrorKind::InvalidEscape('q')),
        (r#"a = "\x41""#, ErrorKind::InvalidEscape('x')),
        (r#"a = "\u00G1""#, ErrorKind::InvalidHexEscape('G')),
        (r#"a = "\uD800""#, ErrorKind::InvalidEscapeValue(0xD800)),
        (r#"a = "\U00110000""#, ErrorKind::InvalidEscapeValue(0x110000)),
    ];
    for (input, expected) in cases {
        let (doc, diagnostics) = decode_err(input);
        assert_eq!(diagnostics.len(), 1, "input: {input}");
        assert_eq!(diagnostics[0].kind, expected, "input: {input}");
        assert_eq!(diagnostics[0].kind.severity(), Severity::Lexical);
        assert!(!doc.contains_key("a"));
    }
}

#[test]
fn literal_strings_take_text_verbatim() {
    let doc = decode_ok(r"a = 'C:\Users\nobody'");
    assert_eq!(doc.get("a").unwrap().as_str(), Some(r"C:\Users\nobody"));

    let doc = decode_ok("a = 'tom \"preston\"'");
    assert_eq!(doc.get("a").unwrap().as_str(), Some("tom \"preston\""));

    let doc = decode_ok("a = ''");
    assert_eq!(doc.get("a").unwrap().as_str(), Some(""));
}

#[test]
fn multiline_strings() {
    // a newline right after the opener is trimmed
    let doc = decode_ok("s = \"\"\"\nfoo\nbar\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("foo\nbar"));

    let doc = decode_ok("s = '''\nfoo\nbar'''");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("foo\nbar"));

    // no trim without the leading newline
    let doc = decode_ok("s = \"\"\"foo\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("foo"));

    // embedded quote runs shorter than the closing delimiter
    let doc = decode_ok("s = \"\"\"a\"b\"\"c\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("a\"b\"\"c"));

    // up to two extra quotes belong to the content
    let doc = decode_ok("s = \"\"\"abc\"\"\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("abc\"\""));

    // escapes still work in multiline basic strings
    let doc = decode_ok("s = \"\"\"a\\tb\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("a\tb"));

    // but not in multiline literal strings
    let doc = decode_ok("s = '''a\\tb'''");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("a\\tb"));
}

#[test]
fn line_continuation_backslash() {
    let doc = decode_ok("s = \"\"\"one \\\n     two\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("one two"));

    // trailing whitespace after the backslash is fine
    let doc = decode_ok("s = \"\"\"one \\  \n\n  two\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("one two"));

    // a backslash-space with no newline before content is an error
    let (_, diagnostics) = decode_err("s = \"\"\"one \\ two\"\"\"");
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidEscape(' '));
}

#[test]
fn integers_in_every_base() {
    let cases = [
        ("a = 0", 0),
        ("a = +99", 99),
        ("a = 1_000", 1_000),
        ("a = 5_349_221", 5_349_221),
        ("a = 0xDEADBEEF", 0xDEAD_BEEF),
        ("a = 0xdead_beef", 0xDEAD_BEEF),
        ("a = 0o755", 0o755),
        ("a = 0o0", 0),
        ("a = 0b11010110", 0b1101_0110),
        ("a = 9223372036854775807", i64::MAX),
        ("a = -9223372036854775808", i64::MIN),
    ];
    for (input, expected) in cases {
        let doc = decode_ok(input);
        assert_eq!(
            doc.get("a").unwrap().as_integer(),
            Some(expected),
            "input: {input}"
        );
    }
}

#[test]
fn floats() {
    let cases = [
        ("a = 1.0", 1.0),
        ("a = -0.01", -0.01),
        ("a = 5e+22", 5e22),
        ("a = 1e06", 1e6),
        ("a = -2E-2", -2e-2),
        ("a = 6.626e-34", 6.626e-34),
        ("a = 9_224_617.445_991", 9_224_617.445_991),
        ("a = inf", f64::INFINITY),
        ("a = +inf", f64::INFINITY),
        ("a = -inf", f64::NEG_INFINITY),
    ];
    for (input, expected) in cases {
        let doc = decode_ok(input);
        assert_eq!(
            doc.get("a").unwrap().as_float(),
            Some(expected),
            "input: {input}"
        );
    }

    let doc = decode_ok("a = nan");
    assert!(doc.get("a").unwrap().as_float().unwrap().is_nan());
    let doc = decode_ok("a = -nan");
    let f = doc.get("a").unwrap().as_float().unwrap();
    assert!(f.is_nan() && f.is_sign_negative());
}

#[test]
fn malformed_numbers_are_lexical_diagnostics() {
    let bad = [
        "a = 1__000",
        "a = _100",
        "a = 100_",
        "a = 1_000_",
        "a = 0123",
        "a = 01.5",
        "a = 1.",
        "a = .5",
        "a = 1.2.3",
        "a = 1e",
        "a = 0x",
        "a = 0xG1",
        "a = -0x10",
        "a = 0b2",
        "a = 9223372036854775808",
        "a = 1e400",
    ];
    for input in bad {
        let (doc, diagnostics) = decode_err(input);
        assert_eq!(diagnostics.len(), 1, "input: {input}");
        assert_eq!(
            diagnostics[0].kind,
            ErrorKind::InvalidNumber,
            "input: {input}"
        );
        assert_eq!(diagnostics[0].pos, 4, "input: {input}");
        assert!(!doc.contains_key("a"));
    }
}

#[test]
fn underscore_grouping_accepts_and_rejects() {
    let doc = decode_ok("a = 1_000");
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1000));

    for input in ["a = 1__000", "a = _100"] {
        let (_, diagnostics) = decode_err(input);
        assert_eq!(diagnostics[0].kind.severity(), Severity::Lexical);
    }
}

#[test]
fn datetime_values() {
    let cases = [
        ("a = 1979-05-27T07:32:00Z", "datetime"),
        ("a = 1979-05-27 07:32:00-07:00", "datetime"),
        ("a = 1979-05-27T07:32:00", "datetime-local"),
        ("a = 1979-05-27", "date-local"),
        ("a = 07:32:00", "time-local"),
        ("a = 07:32:00.999", "time-local"),
    ];
    for (input, tag) in cases {
        let doc = decode_ok(input);
        let dt = doc.get("a").unwrap().as_datetime().unwrap();
        assert_eq!(dt.type_str(), tag, "input: {input}");
    }

    // shaped like a datetime but out of range
    let (_, diagnostics) = decode_err("a = 1979-13-01");
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidDatetime);
    assert_eq!(diagnostics[0].pos, 4);
    let (_, diagnostics) = decode_err("a = 25:00:00");
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidDatetime);
}

#[test]
fn unquoted_text_is_not_a_value() {
    let (doc, diagnostics) = decode_err("a = hello");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::UnquotedString);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Structural);
    assert!(doc.is_empty());
}

#[test]
fn arrays() {
    let doc = decode_ok("a = [1, 2, 3]");
    let arr = doc.get("a").unwrap().as_array().unwrap();
    let ints: Vec<_> = arr.iter().filter_map(Value::as_integer).collect();
    assert_eq!(ints, [1, 2, 3]);

    // empty, trailing comma, heterogeneous
    let doc = decode_ok("a = []");
    assert!(doc.get("a").unwrap().as_array().unwrap().is_empty());
    let doc = decode_ok("a = [1, 2,]");
    assert_eq!(doc.get("a").unwrap().as_array().unwrap().len(), 2);
    let doc = decode_ok("a = [1, \"two\", 3.0]");
    assert_eq!(doc.get("a").unwrap().as_array().unwrap().len(), 3);

    // newlines and comments between elements
    let doc = decode_ok("a = [\n  1, # one\n  2,\n  # three?\n  3\n]");
    assert_eq!(doc.get("a").unwrap().as_array().unwrap().len(), 3);

    // nesting
    let doc = decode_ok("a = [[1, 2], [3]]");
    let outer = doc.get("a").unwrap().as_array().unwrap();
    assert_eq!(outer.len(), 2);
    let inner = outer.get(0).unwrap().as_array().unwrap();
    assert_eq!(inner.len(), 2);
}

#[test]
fn unterminated_array_reports_once() {
    let (_, diagnostics) = decode_err("a = [1, 2");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::Wanted {
            expected: "a right bracket",
            found: "eof"
        }
    );
    assert_eq!(diagnostics[0].kind.severity(), Severity::Structural);
}

#[test]
fn inline_tables() {
    let doc = decode_ok("p = {x = 1, y = 2}");
    assert_eq!(lookup(&doc, "p.x").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "p.y").as_integer(), Some(2));

    let doc = decode_ok("p = {}");
    assert!(doc.get("p").unwrap().as_table().unwrap().is_empty());

    let doc = decode_ok("p = {q = {r = 1}}");
    assert_eq!(lookup(&doc, "p.q.r").as_integer(), Some(1));

    // dotted keys inside an inline table
    let doc = decode_ok("p = {a.b = 1, a.c = 2}");
    assert_eq!(lookup(&doc, "p.a.b").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "p.a.c").as_integer(), Some(2));

    // trailing comma
    let doc = decode_ok("p = {x = 1,}");
    assert_eq!(lookup(&doc, "p.x").as_integer(), Some(1));
}

#[test]
fn inline_tables_reject_newlines() {
    let (_, diagnostics) = decode_err("p = {x = 1,\ny = 2}");
    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics[0].kind.severity(), Severity::Structural);
}

#[test]
fn inline_tables_are_closed() {
    // a header cannot reopen an inline table
    let (_, diagnostics) = decode_err("p = {x = 1}\n[p]\n");
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DuplicateKey {
            key: "p".into(),
            first: 0
        }
    );

    // neither can a dotted key
    let (_, diagnostics) = decode_err("p = {x = 1}\np.y = 2\n");
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DottedKeyInvalidType { first: 0 }
    );
}

#[test]
fn dotted_keys() {
    let doc = decode_ok("a.b.c = 1\na.b.d = 2\na.e = 3");
    assert_eq!(lookup(&doc, "a.b.c").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "a.b.d").as_integer(), Some(2));
    assert_eq!(lookup(&doc, "a.e").as_integer(), Some(3));

    // dotted keys bind inside the current table
    let doc = decode_ok("[t]\na.b = 1");
    assert_eq!(lookup(&doc, "t.a.b").as_integer(), Some(1));

    // whitespace around dots
    let doc = decode_ok("a . b = 1");
    assert_eq!(lookup(&doc, "a.b").as_integer(), Some(1));
}

#[test]
fn dotted_key_through_scalar_is_semantic() {
    let (doc, diagnostics) = decode_err("a = 1\na.b = 2");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DottedKeyInvalidType { first: 0 }
    );
    assert_eq!(diagnostics[0].kind.severity(), Severity::Semantic);
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1));
}

#[test]
fn key_forms() {
    let doc = decode_ok("bare-key_1 = 1");
    assert!(doc.contains_key("bare-key_1"));

    let doc = decode_ok("\"quoted key\" = 1");
    assert!(doc.contains_key("quoted key"));

    // a quoted dot does not split the key
    let doc = decode_ok("'a.b' = 1");
    assert!(doc.contains_key("a.b"));
    assert_eq!(doc.len(), 1);

    let doc = decode_ok("\"\" = 1");
    assert!(doc.contains_key(""));

    let (_, diagnostics) = decode_err("\"\"\"k\"\"\" = 1");
    assert_eq!(diagnostics[0].kind, ErrorKind::MultilineStringKey);
}

#[test]
fn table_headers() {
    let doc = decode_ok("[a]\nx = 1\n[b.c]\ny = 2");
    assert_eq!(lookup(&doc, "a.x").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "b.c.y").as_integer(), Some(2));

    // an implicit table may be defined later
    let doc = decode_ok("[a.b]\nx = 1\n[a]\ny = 2");
    assert_eq!(lookup(&doc, "a.b.x").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "a.y").as_integer(), Some(2));

    // whitespace inside the brackets
    let doc = decode_ok("[ a . b ]\nx = 1");
    assert_eq!(lookup(&doc, "a.b.x").as_integer(), Some(1));
}

#[test]
fn duplicate_key_is_one_semantic_diagnostic() {
    let (doc, diagnostics) = decode_err("a = 1\na = 2\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DuplicateKey {
            key: "a".into(),
            first: 0
        }
    );
    // positioned at the second binding
    assert_eq!(diagnostics[0].pos, 6);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Semantic);
    // the first binding wins
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1));
}

#[test]
fn duplicate_table_header() {
    let (doc, diagnostics) = decode_err("[a]\nx = 1\n[a]\ny = 2\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DuplicateTable {
            name: "a".into(),
            first: 1
        }
    );
    // positioned at the second header
    assert_eq!(diagnostics[0].pos, 10);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Semantic);

    // the failed header leaves the previous table in effect
    assert_eq!(lookup(&doc, "a.x").as_integer(), Some(1));
    assert_eq!(lookup(&doc, "a.y").as_integer(), Some(2));
}

#[test]
fn dotted_table_cannot_be_headed() {
    let (_, diagnostics) = decode_err("a.b = 1\n[a]\n");
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::DuplicateKey {
            key: "a".into(),
            first: 0
        }
    );
}

#[test]
fn arrays_of_tables() {
    let (doc, diagnostics) = decode("[[fruit]]\n[[fruit]]\n");
    assert!(diagnostics.is_empty());
    let fruit = doc.get("fruit").unwrap().as_array().unwrap();
    assert_eq!(fruit.len(), 2);
    assert!(fruit.iter().all(|v| v.as_table().is_some()));

    let doc = decode_ok(
        "[[fruit]]\n\
         name = \"apple\"\n\
         [fruit.physical]\n\
         color = \"red\"\n\
         [[fruit.variety]]\n\
         name = \"red delicious\"\n\
         [[fruit]]\n\
         name = \"banana\"\n",
    );
    let fruit = doc.get("fruit").unwrap().as_array().unwrap();
    assert_eq!(fruit.len(), 2);

    let apple = fruit.get(0).unwrap().as_table().unwrap();
    assert_eq!(apple.get("name").unwrap().as_str(), Some("apple"));
    assert_eq!(lookup(apple, "physical.color").as_str(), Some("red"));
    let variety = apple.get("variety").unwrap().as_array().unwrap();
    assert_eq!(
        lookup(variety.get(0).unwrap().as_table().unwrap(), "name").as_str(),
        Some("red delicious")
    );

    let banana = fruit.get(1).unwrap().as_table().unwrap();
    assert_eq!(banana.get("name").unwrap().as_str(), Some("banana"));
}

#[test]
fn header_kind_conflicts() {
    // a plain table reopened as an array of tables
    let (_, diagnostics) = decode_err("[a]\n[[a]]\n");
    assert_eq!(diagnostics[0].kind, ErrorKind::RedefineAsArray);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Semantic);

    // an array of tables reopened as a plain table
    let (_, diagnostics) = decode_err("[[a]]\n[a]\n");
    assert!(matches!(
        diagnostics[0].kind,
        ErrorKind::DuplicateKey { .. }
    ));

    // a literal array cannot be extended by headers
    let (_, diagnostics) = decode_err("a = [1]\n[[a]]\n");
    assert!(matches!(
        diagnostics[0].kind,
        ErrorKind::DuplicateKey { .. }
    ));
}

#[test]
fn unterminated_string_reports_once() {
    let (doc, diagnostics) = decode_err("s = \"abc");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::UnterminatedString);
    assert_eq!(diagnostics[0].pos, 4);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Structural);
    assert!(doc.is_empty());

    let (_, diagnostics) = decode_err("s = \"\"\"abc\nmore");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::UnterminatedString);
}

#[test]
fn newline_inside_single_line_string() {
    let (doc, diagnostics) = decode_err("s = \"abc\nb = 2\n");
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidCharInString('\n'));
    // scanning resumes on the very next line
    assert_eq!(doc.get("b").unwrap().as_integer(), Some(2));
}

#[test]
fn recovery_continues_line_by_line() {
    let (doc, diagnostics) = decode_err(
        "good1 = 1\n\
         bad = \n\
         good2 = 2\n\
         worse = 1__0\n\
         good3 = 3\n",
    );
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::Wanted {
            expected: "a value",
            found: "a newline"
        }
    );
    assert_eq!(diagnostics[1].kind, ErrorKind::InvalidNumber);
    // diagnostics arrive in source order
    assert!(diagnostics[0].pos < diagnostics[1].pos);

    assert_eq!(doc.get("good1").unwrap().as_integer(), Some(1));
    assert_eq!(doc.get("good2").unwrap().as_integer(), Some(2));
    assert_eq!(doc.get("good3").unwrap().as_integer(), Some(3));
    assert!(!doc.contains_key("bad"));
    assert!(!doc.contains_key("worse"));
}

#[test]
fn junk_after_value_discards_the_line() {
    let (doc, diagnostics) = decode_err("a = 1 junk\nb = 2\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        ErrorKind::Wanted {
            expected: "a newline",
            found: "an identifier"
        }
    );
    assert!(!doc.contains_key("a"));
    assert_eq!(doc.get("b").unwrap().as_integer(), Some(2));
}

#[test]
fn nesting_depth_is_bounded() {
    let deep_ok = format!("a = {}0{}", "[".repeat(200), "]".repeat(200));
    decode_ok(&deep_ok);

    let too_deep = format!("a = {}0{}", "[".repeat(201), "]".repeat(201));
    let (_, diagnostics) = decode_err(&too_deep);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::NestingTooDeep);
    assert_eq!(diagnostics[0].kind.severity(), Severity::Structural);

    // inline tables count against the same bound
    let mixed = format!(
        "a = {}{}1{}{}",
        "{x = ".repeat(150),
        "[".repeat(60),
        "]".repeat(60),
        "}".repeat(150)
    );
    let (_, diagnostics) = decode_err(&mixed);
    assert_eq!(diagnostics[0].kind, ErrorKind::NestingTooDeep);
}

#[test]
fn comments() {
    let doc = decode_ok(
        "# full line comment\n\
         a = 1 # trailing comment\n\
         [t] # header comment\n\
         b = 2\n\
         # final comment with no newline",
    );
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1));
    assert_eq!(lookup(&doc, "t.b").as_integer(), Some(2));

    // a control character in a comment is reported but not fatal
    let (doc, diagnostics) = decode_err("# ab\u{1}cd\nok = 1\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidCharInComment('\u{1}'));
    assert_eq!(diagnostics[0].pos, 4);
    assert_eq!(doc.get("ok").unwrap().as_integer(), Some(1));
}

#[test]
fn control_chars_in_strings() {
    let (_, diagnostics) = decode_err("a = \"b\u{1}c\"");
    assert_eq!(diagnostics[0].kind, ErrorKind::InvalidCharInString('\u{1}'));
    assert_eq!(diagnostics[0].pos, 6);

    // tab is fine
    let doc = decode_ok("a = \"b\tc\"");
    assert_eq!(doc.get("a").unwrap().as_str(), Some("b\tc"));
}

#[test]
fn crlf_is_normalized() {
    let doc = decode_ok("a = 1\r\nb = 2\r\n");
    assert_eq!(doc.get("a").unwrap().as_integer(), Some(1));
    assert_eq!(doc.get("b").unwrap().as_integer(), Some(2));

    // positions count the normalized text
    let (_, diagnostics) = decode_err("a = 1\r\na = 2\r\n");
    assert_eq!(diagnostics[0].pos, 6);

    let doc = decode_ok("s = \"\"\"\r\nfoo\r\nbar\"\"\"");
    assert_eq!(doc.get("s").unwrap().as_str(), Some("foo\nbar"));
}

#[test]
fn missing_value_at_eof() {
    let (_, diagnostics) = decode_err("a =");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, ErrorKind::UnexpectedEof);
}

#[test]
fn skipping_is_a_no_op_without_whitespace() {
    let mut p = Parser::new("abc");
    p.eat_ws_and_comments();
    assert_eq!(p.cursor.pos(), 0);

    let mut p = Parser::new(" \t# comment\nrest");
    p.eat_ws_and_comments();
    // stops before the newline
    assert_eq!(p.cursor.peek(), Some('\n'));
}

#[test]
fn decode_or_default_falls_back_on_any_diagnostic() {
    let (default, _) = decode("fallback = true");

    let good = decode_or_default("a = 1", default.clone());
    assert_eq!(good.get("a").unwrap().as_integer(), Some(1));
    assert!(!good.contains_key("fallback"));

    let bad = decode_or_default("a = 1__0", default);
    assert_eq!(bad.get("fallback").unwrap().as_bool(), Some(true));
    assert!(!bad.contains_key("a"));
}

#[test]
fn randomized_key_value_documents() {
    let mut rng = oorandom::Rand32::new(0x6c656e69);
    for _ in 0..50 {
        let count = rng.rand_range(1..20) as usize;
        let mut input = String::new();
        let mut expected = Vec::new();
        for i in 0..count {
            let v = rng.rand_range(0..1_000_000) as i64;
            input.push_str(&format!("key_{i} = {v}\n"));
            expected.push((format!("key_{i}"), v));
        }
        let doc = decode_ok(&input);
        assert_eq!(doc.len(), count);
        for (key, v) in expected {
            assert_eq!(doc.get(&key).unwrap().as_integer(), Some(v), "key: {key}");
        }
    }
}
