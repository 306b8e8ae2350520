//! Recursive descent parser for kern description files.
//!
//! Produces a flat AST (`Module` plus `ExprArena`) from the lexer's
//! layout-aware token stream. Parsing never stops at the first error: each
//! broken statement is recorded as a [`ParseError`] and the parser resumes at
//! the next statement, so the output always contains every well-formed
//! declaration of the file.

mod cursor;
mod error;
mod grammar;
mod recovery;

use kern_ir::{ExprArena, Module, StmtId, StringInterner, TokenKind, TokenList};
use tracing::debug;

pub use cursor::Cursor;
pub use error::ParseError;

/// Result of parsing: the module, its arena, and every error found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput {
    pub module: Module,
    pub arena: ExprArena,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every error as a renderable diagnostic, in source order.
    pub fn diagnostics(&self) -> Vec<kern_diagnostic::Diagnostic> {
        let mut errors: Vec<&ParseError> = self.errors.iter().collect();
        errors.sort_by_key(|e| e.span.start);
        errors.into_iter().map(ParseError::to_diagnostic).collect()
    }
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
            arena: ExprArena::with_capacity(tokens.len() * 4),
            errors: Vec::new(),
        }
    }

    /// Parse a whole file.
    pub fn parse_module(mut self) -> ParseOutput {
        let mut body: Vec<StmtId> = Vec::new();

        while !self.cursor.is_at_end() {
            // A stray `Dedent` can only follow an earlier layout error.
            if self.cursor.eat(TokenKind::Dedent) || self.cursor.eat(TokenKind::Newline) {
                continue;
            }
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(err) => self.recover(err),
            }
        }

        let module = Module {
            body: self.arena.alloc_stmt_list(body),
        };
        debug!(
            statements = module.body.len(),
            errors = self.errors.len(),
            "parsed module"
        );

        ParseOutput {
            module,
            arena: self.arena,
            errors: self.errors,
        }
    }

    /// Record `err` and skip to the next statement.
    fn recover(&mut self, err: ParseError) {
        debug!(code = %err.code, message = %err.message, "parse error, synchronizing");
        self.errors.push(err);
        recovery::synchronize(&mut self.cursor);
    }
}

/// Parse a token list.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> ParseOutput {
    Parser::new(tokens, interner).parse_module()
}

/// Lex and parse `source`. Lexer errors come first in `errors`.
pub fn parse_source(source: &str, interner: &StringInterner) -> ParseOutput {
    let lexed = kern_lexer::lex(source, interner);
    let mut output = parse(&lexed.tokens, interner);
    if !lexed.errors.is_empty() {
        let mut errors: Vec<ParseError> = lexed.errors.into_iter().map(ParseError::from).collect();
        errors.append(&mut output.errors);
        output.errors = errors;
    }
    output
}

#[cfg(test)]
mod tests;
