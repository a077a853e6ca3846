use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use serde::Serialize;

use crate::ir::Number;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    #[serde(rename = "{")]
    LBrace,
    #[serde(rename = "}")]
    RBrace,
    #[serde(rename = "[")]
    LBracket,
    #[serde(rename = "]")]
    RBracket,
    #[serde(rename = "=")]
    Assign,
    #[serde(rename = ",")]
    Comma,
}

impl Operator {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '{' => Some(Self::LBrace),
            '}' => Some(Self::RBrace),
            '[' => Some(Self::LBracket),
            ']' => Some(Self::RBracket),
            '=' => Some(Self::Assign),
            ',' => Some(Self::Comma),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::LBrace => '{',
            Self::RBrace => '}',
            Self::LBracket => '[',
            Self::RBracket => ']',
            Self::Assign => '=',
            Self::Comma => ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    /// Contents of a double-quoted literal, quotes stripped
    Str(String),
    Number(Number),
    /// Digit run that fits neither `i64` nor a finite `f64`, kept verbatim
    OutOfRange(String),
    Operator(Operator),
    Identifier(String),
}

/// Renders the token the way it appeared in the source, minus string quotes.
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Str(text) | TokenKind::Identifier(text) | TokenKind::OutOfRange(text) => {
                f.write_str(text)
            }
            TokenKind::Number(number) => write!(f, "{}", number),
            TokenKind::Operator(op) => write!(f, "{}", op.as_char()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// True when the token renders as `literal`, whatever its kind. A quoted
    /// `"]"` therefore matches `]`.
    pub fn is_literal(&self, literal: &str) -> bool {
        match &self.kind {
            TokenKind::Str(text) | TokenKind::Identifier(text) | TokenKind::OutOfRange(text) => {
                text == literal
            }
            TokenKind::Operator(op) => {
                let mut chars = literal.chars();
                chars.next() == Some(op.as_char()) && chars.next().is_none()
            }
            TokenKind::Number(number) => number.to_string() == literal,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// A non-blank, non-comment physical line, already trimmed.
struct Line<'a> {
    text: &'a str,
    number: usize,
    /// Byte offset of `text` within the whole source
    offset: usize,
    /// Characters of leading whitespace trimmed off `text`
    indent: usize,
}

impl Line<'_> {
    fn span(&self, start: usize, end: usize) -> Span {
        Span {
            line: self.number,
            column: self.indent + self.text[..start].chars().count() + 1,
            start: self.offset + start,
            end: self.offset + end,
        }
    }
}

/// Splits `source` into tokens. Never fails: characters that start no token
/// are dropped.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    for (index, (line_start, raw)) in physical_lines(source).into_iter().enumerate() {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let indent = raw.len() - raw.trim_start().len();
        let line = Line {
            text,
            number: index + 1,
            offset: line_start + indent,
            indent: raw[..indent].chars().count(),
        };
        tokenize_line(&line, &mut tokens);
    }

    tokens
}

/// Line terminators: `\r\n` counts once, and besides `\n` and `\r` the
/// vertical tab, form feed, file/group/record separators, NEL and the Unicode
/// line and paragraph separators all end a line.
fn is_line_break(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Lines without their terminators, each with its byte offset in `source`.
fn physical_lines(source: &str) -> Vec<(usize, &str)> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = source.char_indices().peekable();

    while let Some((at, ch)) = chars.next() {
        if !is_line_break(ch) {
            continue;
        }
        lines.push((start, &source[start..at]));
        start = at + ch.len_utf8();
        if ch == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    if start < source.len() {
        lines.push((start, &source[start..]));
    }

    lines
}

fn tokenize_line(line: &Line<'_>, tokens: &mut Vec<Token>) {
    let text = line.text;
    let mut chars = text.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        let kind = match ch {
            '"' => match text[start + 1..].find('"') {
                Some(len) => {
                    let contents = &text[start + 1..start + 1 + len];
                    skip_to(&mut chars, start + len + 2);
                    TokenKind::Str(contents.to_string())
                }
                None => {
                    // no closing quote on this line
                    tracing::trace!(line = line.number, "dropping unterminated quote");
                    chars.next();
                    continue;
                }
            },
            '0'..='9' => parse_number(&mut chars, text),
            _ => {
                if let Some(op) = Operator::from_char(ch) {
                    chars.next();
                    TokenKind::Operator(op)
                } else if is_word_char(ch) {
                    TokenKind::Identifier(parse_identifier(&mut chars, text).to_string())
                } else {
                    if !ch.is_whitespace() {
                        tracing::trace!(line = line.number, %ch, "dropping unrecognised character");
                    }
                    chars.next();
                    continue;
                }
            }
        };

        let end = position(&mut chars, text);
        let token = Token {
            kind,
            span: line.span(start, end),
        };
        tracing::debug!(line = token.span.line, column = token.span.column, kind = ?token.kind, "token");
        tokens.push(token);
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn position(chars: &mut Peekable<CharIndices<'_>>, text: &str) -> usize {
    chars.peek().map_or(text.len(), |&(at, _)| at)
}

fn skip_to(chars: &mut Peekable<CharIndices<'_>>, end: usize) {
    while matches!(chars.peek(), Some(&(at, _)) if at < end) {
        chars.next();
    }
}

fn eat_digits(chars: &mut Peekable<CharIndices<'_>>) {
    while matches!(chars.peek(), Some((_, '0'..='9'))) {
        chars.next();
    }
}

/// `[0-9]+` optionally followed by `.` and `[0-9]*`.
fn parse_number(chars: &mut Peekable<CharIndices<'_>>, text: &str) -> TokenKind {
    let start = position(chars, text);

    eat_digits(chars);
    if matches!(chars.peek(), Some((_, '.'))) {
        chars.next();
        eat_digits(chars);
    }

    classify_number(&text[start..position(chars, text)])
}

/// The subtype follows the dot alone. A literal the subtype cannot hold is
/// not coerced; the parser rejects it where a value is expected.
fn classify_number(lexeme: &str) -> TokenKind {
    let number = if lexeme.contains('.') {
        lexeme
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Number::Float)
    } else {
        lexeme.parse::<i64>().ok().map(Number::Integer)
    };

    match number {
        Some(number) => TokenKind::Number(number),
        None => TokenKind::OutOfRange(lexeme.to_string()),
    }
}

fn parse_identifier<'a>(chars: &mut Peekable<CharIndices<'_>>, text: &'a str) -> &'a str {
    let start = position(chars, text);

    while matches!(chars.peek(), Some(&(_, ch)) if is_word_char(ch)) {
        chars.next();
    }

    &text[start..position(chars, text)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|token| token.kind).collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    fn string(text: &str) -> TokenKind {
        TokenKind::Str(text.to_string())
    }

    fn op(op: Operator) -> TokenKind {
        TokenKind::Operator(op)
    }

    #[test]
    fn test_flat_assignment() {
        assert_eq!(
            kinds(r#"name = "Tetromino""#),
            vec![ident("name"), op(Operator::Assign), string("Tetromino")]
        );
    }

    #[rstest]
    #[case("42", Number::Integer(42))]
    #[case("3.14", Number::Float(3.14))]
    #[case("3.", Number::Float(3.0))]
    #[case("007", Number::Integer(7))]
    #[case("9223372036854775807", Number::Integer(i64::MAX))]
    fn test_number_subtype(#[case] source: &str, #[case] expected: Number) {
        assert_eq!(kinds(source), vec![TokenKind::Number(expected)]);
    }

    #[rstest]
    #[case("9223372036854775808")]
    #[case("18446744073709551615")]
    fn test_integer_overflow_keeps_lexeme(#[case] source: &str) {
        assert_eq!(kinds(source), vec![TokenKind::OutOfRange(source.to_string())]);
    }

    #[test]
    fn test_huge_float_is_never_infinite() {
        let source = format!("{}.5", "9".repeat(400));

        assert_eq!(kinds(&source), vec![TokenKind::OutOfRange(source.clone())]);
    }

    #[rstest]
    #[case("# c\ra = 1")]
    #[case("# c\r\na = 1")]
    #[case("# c\u{2028}a = 1")]
    #[case("# c\u{0c}a = 1")]
    fn test_line_breaks_end_comments(#[case] source: &str) {
        let tokens = tokenize(source);

        assert_eq!(
            tokens.iter().map(|token| token.kind.clone()).collect::<Vec<_>>(),
            vec![ident("a"), op(Operator::Assign), TokenKind::Number(Number::Integer(1))]
        );
        assert_eq!(tokens[0].span.line, 2);
    }

    #[test]
    fn test_line_numbers_with_bare_carriage_returns() {
        let tokens = tokenize("a = 1\r\rb = 2\r");

        assert_eq!(tokens[3].span.line, 3);
        assert_eq!(tokens[3].span.start, 7);
    }

    #[test]
    fn test_is_literal_ignores_kind() {
        let tokens = tokenize(r#"] "]" "," x 4.0"#);

        assert!(tokens[0].is_literal("]"));
        assert!(tokens[1].is_literal("]"));
        assert!(tokens[2].is_literal(","));
        assert!(tokens[3].is_literal("x"));
        assert!(tokens[4].is_literal("4.0"));
        assert!(!tokens[0].is_literal("]]"));
        assert!(!tokens[2].is_literal("]"));
    }

    #[rstest]
    #[case("")]
    #[case("   \t  ")]
    #[case("# a comment = [1, 2]")]
    #[case("    # indented comment")]
    #[case("\n\n\r\n")]
    fn test_blank_and_comment_lines_produce_nothing(#[case] source: &str) {
        assert!(tokenize(source).is_empty());
    }

    #[test]
    fn test_all_operators() {
        assert_eq!(
            kinds("{ } [ ] = ,"),
            vec![
                op(Operator::LBrace),
                op(Operator::RBrace),
                op(Operator::LBracket),
                op(Operator::RBracket),
                op(Operator::Assign),
                op(Operator::Comma),
            ]
        );
    }

    #[test]
    fn test_unrecognised_characters_are_dropped() {
        assert_eq!(
            kinds("a = -5; @b"),
            vec![
                ident("a"),
                op(Operator::Assign),
                TokenKind::Number(Number::Integer(5)),
                ident("b"),
            ]
        );
    }

    #[test]
    fn test_hash_inside_line_is_not_a_comment() {
        assert_eq!(
            kinds(r##"color = "#ff0000" # trailing"##),
            vec![
                ident("color"),
                op(Operator::Assign),
                string("#ff0000"),
                ident("trailing"),
            ]
        );
    }

    #[test]
    fn test_string_has_no_escapes() {
        // the backslash does not protect the quote, the string ends there
        assert_eq!(
            kinds(r#"s = "a\"b""#),
            vec![ident("s"), op(Operator::Assign), string("a\\"), ident("b")]
        );
    }

    #[test]
    fn test_empty_string_is_kept() {
        assert_eq!(kinds(r#"s = """#), vec![ident("s"), op(Operator::Assign), string("")]);
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        assert_eq!(
            kinds(r#"s = "open"#),
            vec![ident("s"), op(Operator::Assign), ident("open")]
        );
    }

    #[test]
    fn test_number_then_word() {
        assert_eq!(
            kinds("123abc abc123 1.2.3"),
            vec![
                TokenKind::Number(Number::Integer(123)),
                ident("abc"),
                ident("abc123"),
                TokenKind::Number(Number::Float(1.2)),
                TokenKind::Number(Number::Integer(3)),
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("pieza_ñ = 1")[0], ident("pieza_ñ"));
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let tokens = tokenize("# header\n\n  width = 4\nname = \"I\"\n");

        let spans: Vec<(usize, usize)> = tokens
            .iter()
            .map(|token| (token.span.line, token.span.column))
            .collect();
        assert_eq!(spans, vec![(3, 3), (3, 9), (3, 11), (4, 1), (4, 6), (4, 8)]);

        assert_eq!(tokens[0].span.start, 12);
        assert_eq!(tokens[0].span.end, 17);
        assert_eq!(tokens[5].span.end - tokens[5].span.start, 3);
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let source = "piece = { width = 4 height = 2.5 }\nlist = [piece, \"x\"]\n";

        assert_eq!(tokenize(source), tokenize(source));
    }

    #[test]
    fn test_token_serializes_with_span() {
        let tokens = tokenize("a = 2.5");

        let json = serde_json::to_string(&tokens[1]).unwrap();

        assert_eq!(
            json,
            r#"{"kind":{"Operator":"="},"span":{"line":1,"column":3,"start":2,"end":3}}"#
        );
        assert_eq!(
            serde_json::to_string(&tokens[2].kind).unwrap(),
            r#"{"Number":2.5}"#
        );
    }

    #[test]
    fn test_literal_rendering() {
        let rendered: Vec<String> = tokenize(r#"a = "text" 4 4.0 ["#)
            .iter()
            .map(|token| token.to_string())
            .collect();

        assert_eq!(rendered, vec!["a", "=", "text", "4", "4.0", "["]);
    }
}
