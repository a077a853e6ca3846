pub mod lexer;
pub mod parser;

use crate::error::BrikError;
use crate::ir::Document;
use crate::options::ParseOptions;

/// Source text to document: tokenize, then parse.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Document, BrikError> {
    let tokens = lexer::tokenize(source);
    tracing::debug!(count = tokens.len(), "tokenized source");
    let document = parser::parse_tokens(tokens, options)?;
    Ok(document)
}
