//! Token cursor for navigating the token stream.
//!
//! Low-level token access for the parser: looking at the current token,
//! peeking one ahead, advancing, and expecting specific kinds.

use kern_diagnostic::ErrorCode;
use kern_ir::{Name, Span, StringInterner, Token, TokenKind, TokenList};
use tracing::trace;

use crate::ParseError;

/// Cursor over a `TokenList`.
///
/// Reading past the end yields `Eof`, so a list that lacks the trailing
/// `Eof` token is still safe to parse.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    interner: &'a StringInterner,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, interner: &'a StringInterner) -> Self {
        Cursor {
            tokens,
            interner,
            pos: 0,
        }
    }

    #[inline]
    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    fn eof_token(&self) -> Token {
        let end = self.tokens.as_slice().last().map_or(0, |t| t.span.end);
        Token::new(TokenKind::Eof, Span::point(end))
    }

    #[inline]
    pub fn current(&self) -> Token {
        self.tokens
            .get(self.pos)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the last consumed token, or the current span at the start.
    pub fn previous_span(&self) -> Span {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span,
            None => self.current_span(),
        }
    }

    /// Kind of the token after the current one.
    pub fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Compare the current token against a payload-free kind.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    #[inline]
    pub fn check_ident(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Ident(_))
    }

    /// Consume the current token. At `Eof` the cursor stays put.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        trace!(
            pos = self.pos,
            kind = token.kind.describe(),
            span_start = token.span.start,
            span_end = token.span.end,
            "advance"
        );
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect the current token to be `kind`, advance and return it.
    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind))
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_error(&self, kind: TokenKind) -> ParseError {
        ParseError::unexpected(kind.describe(), self.current_kind(), self.current_span())
    }

    /// Expect and consume an identifier, returning its interned name.
    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.make_expect_ident_error())
        }
    }

    #[cold]
    #[inline(never)]
    fn make_expect_ident_error(&self) -> ParseError {
        let found = self.current_kind();
        let err = ParseError::new(
            ErrorCode::E1004,
            format!("expected identifier, found {}", found.describe()),
            self.current_span(),
        )
        .with_context("expected identifier");
        match found {
            TokenKind::Reserved(_)
            | TokenKind::Def
            | TokenKind::Class
            | TokenKind::Return
            | TokenKind::For
            | TokenKind::In
            | TokenKind::If
            | TokenKind::Import
            | TokenKind::From
            | TokenKind::While
            | TokenKind::With
            | TokenKind::Is => err.with_help("keywords cannot be used as names"),
            _ => err,
        }
    }
}

#[cfg(test)]
mod tests;
