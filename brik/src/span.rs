use serde::Serialize;

/// Where a token sits in the source. `line` and `column` are 1-based and
/// count characters; `start` and `end` are byte offsets into the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}
