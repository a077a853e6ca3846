use crate::error::BrikError;
use crate::ir::{Document, Table, Value};
use crate::options::ParseOptions;
use super::lexer::{Operator, Token, TokenKind};

pub fn parse_tokens(tokens: Vec<Token>, options: &ParseOptions) -> Result<Document, BrikError> {
    let mut parser = Parser::new(tokens, options);
    parser.parse_document()
}

/// Which assignment list is being read; only changes the wording of errors.
#[derive(Clone, Copy)]
enum Scope {
    TopLevel,
    Block,
}

impl Scope {
    fn suffix(self) -> &'static str {
        match self {
            Scope::TopLevel => "",
            Scope::Block => " in block",
        }
    }
}

struct Parser<'o> {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    options: &'o ParseOptions,
}

impl<'o> Parser<'o> {
    fn new(tokens: Vec<Token>, options: &'o ParseOptions) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            options,
        }
    }

    /// The document doubles as the symbol table: each binding becomes
    /// visible to list elements only after its value is fully parsed.
    fn parse_document(&mut self) -> Result<Document, BrikError> {
        let mut document = Document::new();

        while !self.is_at_end() {
            let name = self.parse_key(Scope::TopLevel)?;
            let value = self.parse_value(&document)?;
            tracing::debug!(%name, "bound top-level identifier");
            document.insert(name, value);
        }

        Ok(document)
    }

    /// `identifier =`, leaving the cursor on the value.
    fn parse_key(&mut self, scope: Scope) -> Result<String, BrikError> {
        let name = match self.advance() {
            Some(Token { kind: TokenKind::Identifier(name), .. }) => name.clone(),
            found => {
                let found = describe(found);
                return Err(self.syntax_error(format!(
                    "expected identifier{}, found {}",
                    scope.suffix(),
                    found
                )));
            }
        };

        match self.advance() {
            Some(token) if token.is_literal("=") => Ok(name),
            found => {
                let found = describe(found);
                Err(self.syntax_error(format!(
                    "expected '='{}, found {}",
                    scope.suffix(),
                    found
                )))
            }
        }
    }

    fn parse_value(&mut self, symbols: &Document) -> Result<Value, BrikError> {
        let Some(token) = self.peek() else {
            return Err(self.syntax_error("expected a value after '='".to_string()));
        };

        match &token.kind {
            TokenKind::Str(text) => {
                let value = Value::Str(text.clone());
                self.advance();
                Ok(value)
            }
            TokenKind::Number(number) => {
                let value = Value::Number(*number);
                self.advance();
                Ok(value)
            }
            TokenKind::OutOfRange(lexeme) => {
                let message = format!("number '{}' is out of range", lexeme);
                self.advance();
                Err(self.syntax_error(message))
            }
            TokenKind::Operator(Operator::LBrace) => self.nested(|parser| parser.parse_block(symbols)),
            TokenKind::Operator(Operator::LBracket) => self.nested(|parser| parser.parse_list(symbols)),
            _ => {
                let message = format!("unexpected value '{}'", token);
                self.advance();
                Err(self.syntax_error(message))
            }
        }
    }

    /// `{ (identifier = value)* }`. Names bound here stay local to the block.
    /// Like the separators below, the closer is matched on its text, so a
    /// quoted `"}"` also ends the block.
    fn parse_block(&mut self, symbols: &Document) -> Result<Value, BrikError> {
        self.advance(); // consume '{'
        let mut block = Table::new();

        while self.peek().is_some_and(|token| !token.is_literal("}")) {
            let name = self.parse_key(Scope::Block)?;
            let value = self.parse_value(symbols)?;
            block.insert(name, value);
        }

        self.close(Operator::RBrace, "block")?;
        Ok(Value::Block(block))
    }

    /// `[ (element ,?)* ]`. A bare identifier element is resolved against the
    /// top-level `symbols` only.
    fn parse_list(&mut self, symbols: &Document) -> Result<Value, BrikError> {
        self.advance(); // consume '['
        let mut items = Vec::new();

        while let Some(token) = self.peek() {
            if token.is_literal("]") {
                break;
            }

            if let TokenKind::Identifier(name) = &token.kind {
                let name = name.clone();
                self.advance();
                match symbols.get(&name) {
                    Some(value) => items.push(value.clone()),
                    None => {
                        return Err(BrikError::NameError {
                            line: self.current_line(),
                            name,
                        });
                    }
                }
            } else {
                items.push(self.parse_value(symbols)?);
            }

            if self.peek().is_some_and(|token| token.is_literal(",")) {
                self.advance(); // consume ','
            }
        }

        self.close(Operator::RBracket, "list")?;
        Ok(Value::List(items))
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, BrikError>,
    ) -> Result<T, BrikError> {
        if self.depth >= self.options.max_depth {
            return Err(BrikError::NestingTooDeep {
                line: self.current_line(),
                limit: self.options.max_depth,
            });
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Consumes the closing delimiter. Running out of tokens first is only an
    /// error under `strict_delimiters`.
    fn close(&mut self, delimiter: Operator, what: &str) -> Result<(), BrikError> {
        if self.advance().is_none() && self.options.strict_delimiters {
            return Err(self.syntax_error(format!(
                "unterminated {}: expected '{}' before end of input",
                what,
                delimiter.as_char()
            )));
        }
        Ok(())
    }

    // Helpers

    fn syntax_error(&self, message: String) -> BrikError {
        BrikError::SyntaxError {
            line: self.current_line(),
            message,
        }
    }

    /// Line of the last consumed token, or 1 before anything is consumed.
    fn current_line(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map_or(1, |token| token.span.line)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position);
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}
