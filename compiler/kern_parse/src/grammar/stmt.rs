//! Statement parsing.
//!
//! Compound statements (`if`, `for`, `while`, `with`, `def`, `class`) own a
//! suite; everything else is a simple statement terminated by `Newline`.

use kern_diagnostic::ErrorCode;
use kern_ir::{
    BinaryOp, ExprId, ExprKind, ExprRange, Span, Stmt, StmtId, StmtKind, StmtRange, TokenKind,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement, simple or compound.
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::At => self.parse_decorated(),
            TokenKind::Def => self.parse_function_def(ExprRange::EMPTY, self.cursor.current_span()),
            TokenKind::Class => self.parse_class_def(ExprRange::EMPTY, self.cursor.current_span()),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::With => self.parse_with(),
            TokenKind::Indent => Err(ParseError::new(
                ErrorCode::E1001,
                "unexpected indent",
                self.cursor.current_span(),
            )
            .with_context("this line is indented deeper than the block it is in")),
            _ => {
                let stmt = self.parse_simple_statement()?;
                self.expect_newline()?;
                Ok(stmt)
            }
        }
    }

    fn parse_simple_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.at_simple_statement_end() {
                    ExprId::INVALID
                } else {
                    self.parse_expr_list()?
                };
                StmtKind::Return(value)
            }
            TokenKind::Pass => {
                self.cursor.advance();
                StmtKind::Pass
            }
            TokenKind::Break => {
                self.cursor.advance();
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.cursor.advance();
                StmtKind::Continue
            }
            TokenKind::Import => return self.parse_import(),
            TokenKind::From => return self.parse_from_import(),
            TokenKind::Reserved(keyword) => {
                let text = self.cursor.interner().lookup(keyword);
                return Err(ParseError::unsupported(&format!("`{text}`"), start));
            }
            _ => return self.parse_expr_statement(),
        };
        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_stmt(Stmt::new(kind, span)))
    }

    fn at_simple_statement_end(&self) -> bool {
        matches!(
            self.cursor.current_kind(),
            TokenKind::Newline | TokenKind::Eof | TokenKind::Dedent
        )
    }

    pub(crate) fn expect_newline(&mut self) -> Result<(), ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Newline => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::Dedent => Ok(()),
            found => Err(ParseError::unexpected(
                "end of line",
                found,
                self.cursor.current_span(),
            )),
        }
    }

    /// Expression statement, assignment (`a = b = value`) or augmented
    /// assignment (`a += value`).
    fn parse_expr_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.current_span();
        let first = self.parse_expr_list()?;

        if let Some(op) = aug_assign_op(self.cursor.current_kind()) {
            self.check_aug_target(first)?;
            self.cursor.advance();
            let value = self.parse_expr_list()?;
            let span = start.merge(self.cursor.previous_span());
            return Ok(self.arena.alloc_stmt(Stmt::new(
                StmtKind::AugAssign {
                    target: first,
                    op,
                    value,
                },
                span,
            )));
        }

        if !self.cursor.check(TokenKind::Assign) {
            let span = self.arena.get_expr(first).span;
            return Ok(self.arena.alloc_stmt(Stmt::new(StmtKind::Expr(first), span)));
        }

        let mut exprs = vec![first];
        while self.cursor.eat(TokenKind::Assign) {
            exprs.push(self.parse_expr_list()?);
        }
        let value = exprs.pop().unwrap_or(first);
        for &target in &exprs {
            self.check_target(target)?;
        }
        let targets = self.arena.alloc_expr_list(exprs);
        let span = start.merge(self.cursor.previous_span());
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::Assign { targets, value }, span)))
    }

    /// Validate an assignment or `for` target, element-wise for tuples and
    /// lists.
    pub(crate) fn check_target(&self, id: ExprId) -> Result<(), ParseError> {
        let expr = self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Tuple(elems) | ExprKind::List(elems) => {
                for &elem in self.arena.get_expr_list(elems) {
                    self.check_target(elem)?;
                }
                Ok(())
            }
            // Already reported by the lexer or an inner parse.
            ExprKind::Error => Ok(()),
            kind if kind.is_assignable() => Ok(()),
            _ => Err(invalid_target(expr.span)),
        }
    }

    fn check_aug_target(&self, id: ExprId) -> Result<(), ParseError> {
        let expr = self.arena.get_expr(id);
        match expr.kind {
            ExprKind::Ident(_) | ExprKind::Attribute { .. } | ExprKind::Subscript { .. } => Ok(()),
            _ => Err(invalid_target(expr.span)
                .with_help("augmented assignment needs a single name, attribute or subscript")),
        }
    }

    /// `: NEWLINE INDENT stmt+ DEDENT`, or a single simple statement on the
    /// header line (`if x: return y`).
    ///
    /// A missing indented block is recorded and yields an empty body, so the
    /// statements that follow are still parsed at the outer level.
    pub(crate) fn parse_suite(&mut self) -> Result<StmtRange, ParseError> {
        self.cursor.expect(TokenKind::Colon)?;

        if !self.cursor.check(TokenKind::Newline) {
            let stmt = self.parse_simple_statement()?;
            self.expect_newline()?;
            return Ok(self.arena.alloc_stmt_list([stmt]));
        }
        self.cursor.advance();

        if !self.cursor.check(TokenKind::Indent) {
            self.errors.push(
                ParseError::new(
                    ErrorCode::E1005,
                    "expected an indented block",
                    self.cursor.previous_span(),
                )
                .with_context("block starts after this line")
                .with_help("use `pass` for an empty block"),
            );
            return Ok(StmtRange::EMPTY);
        }
        self.cursor.advance();

        let mut stmts = Vec::new();
        while !self.cursor.check(TokenKind::Dedent) && !self.cursor.is_at_end() {
            if self.cursor.eat(TokenKind::Newline) {
                continue;
            }
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => self.recover(err),
            }
        }
        self.cursor.eat(TokenKind::Dedent);
        Ok(self.arena.alloc_stmt_list(stmts))
    }

    /// `if cond: ... elif cond: ... else: ...`
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        self.parse_if_rest(start)
    }

    /// Everything after `if`/`elif`. Each `elif` becomes a nested `If` in
    /// the else branch.
    fn parse_if_rest(&mut self, start: Span) -> Result<StmtId, ParseError> {
        let cond = self.parse_expr()?;
        let then_body = self.parse_suite()?;

        let else_body = match self.cursor.current_kind() {
            TokenKind::Elif => {
                let elif_start = self.cursor.advance().span;
                let nested = self.parse_if_rest(elif_start)?;
                self.arena.alloc_stmt_list([nested])
            }
            TokenKind::Else => {
                self.cursor.advance();
                self.parse_suite()?
            }
            _ => StmtRange::EMPTY,
        };

        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_stmt(Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        )))
    }

    /// `for target in iter: body`
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let target = self.parse_target_list()?;
        self.cursor.expect(TokenKind::In)?;
        let iter = self.parse_expr_list()?;
        let body = self.parse_suite()?;
        self.reject_loop_else()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::For { target, iter, body }, span)))
    }

    /// `while cond: body`
    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let cond = self.parse_expr()?;
        let body = self.parse_suite()?;
        self.reject_loop_else()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self
            .arena
            .alloc_stmt(Stmt::new(StmtKind::While { cond, body }, span)))
    }

    fn reject_loop_else(&self) -> Result<(), ParseError> {
        if self.cursor.check(TokenKind::Else) {
            return Err(ParseError::unsupported(
                "`else` on a loop",
                self.cursor.current_span(),
            ));
        }
        Ok(())
    }

    /// `with context [as target]: body`
    fn parse_with(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span;
        let context = self.parse_expr()?;
        let target = if self.cursor.eat(TokenKind::As) {
            let target = self.parse_postfix()?;
            self.check_target(target)?;
            target
        } else {
            ExprId::INVALID
        };
        if self.cursor.check(TokenKind::Comma) {
            return Err(ParseError::unsupported(
                "more than one context manager",
                self.cursor.current_span(),
            ));
        }
        let body = self.parse_suite()?;
        let span = start.merge(self.cursor.previous_span());
        Ok(self.arena.alloc_stmt(Stmt::new(
            StmtKind::With {
                context,
                target,
                body,
            },
            span,
        )))
    }
}

fn invalid_target(span: Span) -> ParseError {
    ParseError::new(ErrorCode::E1007, "cannot assign to this expression", span)
        .with_context("not a name, attribute, subscript or unpacking")
}

fn aug_assign_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusAssign => Some(BinaryOp::Add),
        TokenKind::MinusAssign => Some(BinaryOp::Sub),
        TokenKind::StarAssign => Some(BinaryOp::Mul),
        TokenKind::SlashAssign => Some(BinaryOp::Div),
        _ => None,
    }
}
