//! Primary expressions: literals, names and bracketed forms.

use kern_diagnostic::ErrorCode;
use kern_ir::{Expr, ExprId, ExprKind, ExprRange, Span, TokenKind};
use tracing::trace;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Int(value) => ExprKind::Int(value),
            TokenKind::Float(bits) => ExprKind::Float(bits),
            TokenKind::Str(_) => return Ok(self.parse_strings()),
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::None => ExprKind::None,
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBracket => return self.parse_list(),
            TokenKind::LBrace => return self.parse_dict(),
            // The lexer already reported this token.
            TokenKind::Error => ExprKind::Error,
            TokenKind::Reserved(keyword) => {
                let text = self.cursor.interner().lookup(keyword);
                return Err(ParseError::unsupported(&format!("`{text}`"), token.span));
            }
            found => {
                trace!(found = found.describe(), "parse_primary -> no expression");
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found {}", found.describe()),
                    token.span,
                )
                .with_context("expected expression"));
            }
        };
        self.cursor.advance();
        Ok(self.arena.alloc_expr(Expr::new(kind, token.span)))
    }

    /// One or more adjacent string literals, concatenated: `"a" "b"`.
    fn parse_strings(&mut self) -> ExprId {
        let first = self.cursor.advance();
        let TokenKind::Str(mut name) = first.kind else {
            return self.arena.alloc_expr(Expr::new(ExprKind::Error, first.span));
        };
        if let TokenKind::Str(_) = self.cursor.current_kind() {
            let interner = self.cursor.interner();
            let mut text = interner.lookup(name).to_owned();
            while let TokenKind::Str(next) = self.cursor.current_kind() {
                self.cursor.advance();
                text.push_str(interner.lookup(next));
            }
            name = interner.intern(&text);
        }
        let span = first.span.merge(self.cursor.previous_span());
        self.arena.alloc_expr(Expr::new(ExprKind::Str(name), span))
    }

    /// `()`, `(expr)` or `(a, b, ...)`.
    fn parse_paren(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        if self.cursor.eat(TokenKind::RParen) {
            let span = open.merge(self.cursor.previous_span());
            return Ok(self
                .arena
                .alloc_expr(Expr::new(ExprKind::Tuple(ExprRange::EMPTY), span)));
        }

        let first = self.parse_expr()?;
        if self.cursor.check(TokenKind::For) {
            return Err(ParseError::unsupported(
                "generator expression",
                self.cursor.current_span(),
            ));
        }
        if !self.cursor.check(TokenKind::Comma) {
            self.expect_closer(TokenKind::RParen, open, "parenthesis")?;
            return Ok(first);
        }

        let mut elems = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RParen) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        self.expect_closer(TokenKind::RParen, open, "tuple")?;
        Ok(self.alloc_sequence(elems, open, ExprKind::Tuple))
    }

    /// `[a, b]` or `[elt for target in iter if cond]`.
    fn parse_list(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        if self.cursor.eat(TokenKind::RBracket) {
            return Ok(self.alloc_sequence(Vec::new(), open, ExprKind::List));
        }

        let first = self.parse_expr()?;
        if self.cursor.check(TokenKind::For) {
            return self.parse_list_comp(first, open);
        }

        let mut elems = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if self.cursor.check(TokenKind::RBracket) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        self.expect_closer(TokenKind::RBracket, open, "list")?;
        Ok(self.alloc_sequence(elems, open, ExprKind::List))
    }

    fn parse_list_comp(&mut self, elt: ExprId, open: Span) -> Result<ExprId, ParseError> {
        self.cursor.expect(TokenKind::For)?;
        let target = self.parse_target_list()?;
        self.cursor.expect(TokenKind::In)?;
        let iter = self.parse_expr()?;
        let cond = if self.cursor.eat(TokenKind::If) {
            self.parse_expr()?
        } else {
            ExprId::INVALID
        };
        if matches!(self.cursor.current_kind(), TokenKind::For | TokenKind::If) {
            return Err(ParseError::unsupported(
                "more than one comprehension clause",
                self.cursor.current_span(),
            ));
        }
        self.expect_closer(TokenKind::RBracket, open, "list comprehension")?;
        let span = open.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_expr(Expr::new(
            ExprKind::ListComp {
                elt,
                target,
                iter,
                cond,
            },
            span,
        )))
    }

    /// `{}` or `{k: v, ...}`.
    fn parse_dict(&mut self) -> Result<ExprId, ParseError> {
        let open = self.cursor.advance().span;
        let mut keys = Vec::new();
        let mut values = Vec::new();

        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            if self.cursor.check(TokenKind::DoubleStar) {
                return Err(ParseError::unsupported(
                    "dictionary unpacking",
                    self.cursor.current_span(),
                ));
            }
            let key = self.parse_expr()?;
            if !self.cursor.check(TokenKind::Colon) {
                return Err(ParseError::unsupported(
                    "set literal",
                    open.merge(self.cursor.previous_span()),
                ));
            }
            self.cursor.advance();
            let value = self.parse_expr()?;
            if self.cursor.check(TokenKind::For) {
                return Err(ParseError::unsupported(
                    "dictionary comprehension",
                    self.cursor.current_span(),
                ));
            }
            keys.push(key);
            values.push(value);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closer(TokenKind::RBrace, open, "dictionary")?;

        let span = open.merge(self.cursor.previous_span());
        let keys = self.arena.alloc_expr_list(keys);
        let values = self.arena.alloc_expr_list(values);
        Ok(self
            .arena
            .alloc_expr(Expr::new(ExprKind::Dict { keys, values }, span)))
    }

    fn alloc_sequence(
        &mut self,
        elems: Vec<ExprId>,
        open: Span,
        make: fn(ExprRange) -> ExprKind,
    ) -> ExprId {
        let span = open.merge(self.cursor.previous_span());
        let range = self.arena.alloc_expr_list(elems);
        self.arena.alloc_expr(Expr::new(make(range), span))
    }
}
