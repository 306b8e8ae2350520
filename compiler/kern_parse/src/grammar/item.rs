//! Declarations: functions, classes, decorators, parameters and imports.

use kern_diagnostic::ErrorCode;
use kern_ir::{
    ClassDef, ExprId, ExprRange, FunctionDef, ImportDef, ImportItem, Name, Param, Span, Stmt,
    StmtId, StmtKind, TokenKind,
};
use tracing::trace;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `@decorator NEWLINE ... (def | class)`
    pub(crate) fn parse_decorated(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let mut decorators = Vec::new();
        while self.cursor.eat(TokenKind::At) {
            decorators.push(self.parse_expr()?);
            self.cursor.expect(TokenKind::Newline)?;
        }
        let decorators = self.arena.alloc_expr_list(decorators);

        match self.cursor.current_kind() {
            TokenKind::Def => self.parse_function_def(decorators, start),
            TokenKind::Class => self.parse_class_def(decorators, start),
            found => Err(ParseError::unexpected(
                "`def` or `class` after decorator",
                found,
                self.cursor.current_span(),
            )),
        }
    }

    /// `def name(params) [-> returns]: body`
    pub(crate) fn parse_function_def(
        &mut self,
        decorators: ExprRange,
        start: Span,
    ) -> Result<StmtId, ParseError> {
        self.cursor.expect(TokenKind::Def)?;
        let name = self.cursor.expect_ident()?;
        trace!(name = self.cursor.interner().lookup(name), "parse_function_def");

        self.cursor.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        let params = self.arena.alloc_params(params);

        let returns = if self.cursor.eat(TokenKind::Arrow) {
            self.parse_expr()?
        } else {
            ExprId::INVALID
        };
        let header_end = self.cursor.previous_span();
        let body = self.parse_suite()?;

        let span = start.merge(self.cursor.previous_span());
        let func = self.arena.alloc_function(FunctionDef {
            name,
            params,
            body,
            decorators,
            returns,
            span,
        });
        // The statement span covers only the header, so diagnostics on a
        // whole function stay one line long.
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::Def(func), start.merge(header_end))))
    }

    /// Parameter list after `(`, through `)`.
    fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let open = self.cursor.previous_span();
        let mut params: Vec<Param> = Vec::new();

        while !self.cursor.check(TokenKind::RParen) {
            if matches!(
                self.cursor.current_kind(),
                TokenKind::Star | TokenKind::DoubleStar | TokenKind::Slash
            ) {
                return Err(ParseError::unsupported(
                    "variadic or position-only parameters",
                    self.cursor.current_span(),
                ));
            }
            if self.cursor.is_at_end() {
                break;
            }

            let param = self.parse_param()?;
            if params.iter().any(|p| p.name == param.name) {
                let text = self.cursor.interner().lookup(param.name);
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!("duplicate parameter `{text}`"),
                    param.span,
                )
                .with_context("already declared in this list"));
            }
            if !param.has_default() && params.last().is_some_and(Param::has_default) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "parameter without a default follows parameter with a default",
                    param.span,
                ));
            }
            params.push(param);

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_closer(TokenKind::RParen, open, "parameter list")?;
        Ok(params)
    }

    /// `name [: annotation] [= default]`
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.cursor.current_span();
        let name = self.cursor.expect_ident()?;
        let annotation = if self.cursor.eat(TokenKind::Colon) {
            self.parse_expr()?
        } else {
            ExprId::INVALID
        };
        let default = if self.cursor.eat(TokenKind::Assign) {
            self.parse_expr()?
        } else {
            ExprId::INVALID
        };
        Ok(Param {
            name,
            annotation,
            default,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `class name[(bases)]: body`
    pub(crate) fn parse_class_def(
        &mut self,
        decorators: ExprRange,
        start: Span,
    ) -> Result<StmtId, ParseError> {
        self.cursor.expect(TokenKind::Class)?;
        let name = self.cursor.expect_ident()?;
        trace!(name = self.cursor.interner().lookup(name), "parse_class_def");

        let mut bases = Vec::new();
        if self.cursor.check(TokenKind::LParen) {
            let open = self.cursor.advance().span;
            while !self.cursor.check(TokenKind::RParen) && !self.cursor.is_at_end() {
                if self.cursor.check_ident() && self.cursor.peek_next_kind() == TokenKind::Assign {
                    return Err(ParseError::unsupported(
                        "class keyword arguments",
                        self.cursor.current_span(),
                    ));
                }
                bases.push(self.parse_expr()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
            self.expect_closer(TokenKind::RParen, open, "base list")?;
        }
        let bases = self.arena.alloc_expr_list(bases);
        let header_end = self.cursor.previous_span();
        let body = self.parse_suite()?;

        let span = start.merge(self.cursor.previous_span());
        let class = self.arena.alloc_class(ClassDef {
            name,
            bases,
            body,
            decorators,
            span,
        });
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::Class(class), start.merge(header_end))))
    }

    /// `import a.b [as c], d`
    pub(crate) fn parse_import(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::Import)?.span;
        let mut items = Vec::new();
        loop {
            let path = self.parse_dotted_name()?;
            let alias = self.parse_alias()?;
            items.push(ImportItem { path, alias });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(self.finish_import(Name::EMPTY, items, start))
    }

    /// `from a.b import c [as d], e` or `from a import (c, d)`
    pub(crate) fn parse_from_import(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(TokenKind::From)?.span;
        if self.cursor.check(TokenKind::Dot) {
            return Err(ParseError::unsupported(
                "relative import",
                self.cursor.current_span(),
            ));
        }
        let from = self.parse_dotted_name()?;
        self.cursor.expect(TokenKind::Import)?;

        if self.cursor.check(TokenKind::Star) {
            return Err(ParseError::unsupported(
                "`import *`",
                self.cursor.current_span(),
            ));
        }
        let parenthesized = self.cursor.eat(TokenKind::LParen);
        let mut items = Vec::new();
        loop {
            if parenthesized && self.cursor.check(TokenKind::RParen) {
                break;
            }
            let path = self.cursor.expect_ident()?;
            let alias = self.parse_alias()?;
            items.push(ImportItem { path, alias });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        if parenthesized {
            self.cursor.expect(TokenKind::RParen)?;
        }
        Ok(self.finish_import(from, items, start))
    }

    fn finish_import(&mut self, from: Name, items: Vec<ImportItem>, start: Span) -> StmtId {
        let span = start.merge(self.cursor.previous_span());
        let import = self.arena.alloc_import(ImportDef { from, items, span });
        self.arena
            .alloc_stmt(Stmt::new(StmtKind::Import(import), span))
    }

    fn parse_alias(&mut self) -> Result<Name, ParseError> {
        if self.cursor.eat(TokenKind::As) {
            self.cursor.expect_ident()
        } else {
            Ok(Name::EMPTY)
        }
    }

    /// `a.b.c`, interned as written.
    fn parse_dotted_name(&mut self) -> Result<Name, ParseError> {
        let first = self.cursor.expect_ident()?;
        if !self.cursor.check(TokenKind::Dot) {
            return Ok(first);
        }
        let interner = self.cursor.interner();
        let mut path = interner.lookup(first).to_owned();
        while self.cursor.eat(TokenKind::Dot) {
            let part = self.cursor.expect_ident()?;
            path.push('.');
            path.push_str(interner.lookup(part));
        }
        Ok(interner.intern(&path))
    }
}
