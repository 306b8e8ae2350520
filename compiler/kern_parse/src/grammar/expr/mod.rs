//! Expression parsing.
//!
//! One function per precedence level, lowest first:
//!
//! | level | syntax |
//! |---|---|
//! | `parse_binary_or` | `a or b` |
//! | `parse_binary_and` | `a and b` |
//! | `parse_not` | `not a` |
//! | `parse_comparison` | `a < b`, `a in b`, `a is not b` (not chained) |
//! | `parse_arith` | `a + b` |
//! | `parse_term` | `a * b`, `a // b` |
//! | `parse_unary` | `-a` |
//! | `parse_power` | `a ** b` (right-associative) |
//! | `parse_postfix` | calls, attributes, subscripts |
//! | `parse_primary` | literals, names, brackets |
//!
//! The levels match `BinaryOp::precedence`, which the printer uses to
//! decide where parentheses go.

mod operators;
mod postfix;
mod primary;

use kern_ir::{BinaryOp, Expr, ExprId, ExprKind, TokenKind, UnaryOp};
use kern_stack::ensure_sufficient_stack;

use operators::{additive_op, can_start_expr, comparison_op, multiplicative_op};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a single expression (no bare tuple).
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary_or())
    }

    /// `a, b, c` as a tuple, or a single expression without a comma.
    pub(crate) fn parse_expr_list(&mut self) -> Result<ExprId, ParseError> {
        let first = self.parse_expr()?;
        if !self.cursor.check(TokenKind::Comma) {
            return Ok(first);
        }
        let mut elems = vec![first];
        while self.cursor.eat(TokenKind::Comma) {
            if !can_start_expr(self.cursor.current_kind()) {
                break;
            }
            elems.push(self.parse_expr()?);
        }
        Ok(self.alloc_bare_tuple(first, elems))
    }

    /// Targets of `for` and comprehensions: `i, (a, b)`. Stops before `in`.
    pub(crate) fn parse_target_list(&mut self) -> Result<ExprId, ParseError> {
        let first = self.parse_postfix()?;
        let target = if self.cursor.check(TokenKind::Comma) {
            let mut elems = vec![first];
            while self.cursor.eat(TokenKind::Comma) {
                if self.cursor.check(TokenKind::In) {
                    break;
                }
                elems.push(self.parse_postfix()?);
            }
            self.alloc_bare_tuple(first, elems)
        } else {
            first
        };
        self.check_target(target)?;
        Ok(target)
    }

    fn alloc_bare_tuple(&mut self, first: ExprId, elems: Vec<ExprId>) -> ExprId {
        let span = self
            .arena
            .get_expr(first)
            .span
            .merge(self.cursor.previous_span());
        let range = self.arena.alloc_expr_list(elems);
        self.arena.alloc_expr(Expr::new(ExprKind::Tuple(range), span))
    }

    fn alloc_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self
            .arena
            .get_expr(left)
            .span
            .merge(self.arena.get_expr(right).span);
        self.arena
            .alloc_expr(Expr::new(ExprKind::Binary { op, left, right }, span))
    }

    fn parse_binary_or(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_binary_and()?;
        while self.cursor.eat(TokenKind::Or) {
            let right = self.parse_binary_and()?;
            left = self.alloc_binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_binary_and(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_not()?;
        while self.cursor.eat(TokenKind::And) {
            let right = self.parse_not()?;
            left = self.alloc_binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<ExprId, ParseError> {
        if !self.cursor.check(TokenKind::Not) {
            return self.parse_comparison();
        }
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_not())?;
        let span = start.merge(self.arena.get_expr(operand).span);
        Ok(self.arena.alloc_expr(Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            },
            span,
        )))
    }

    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let left = self.parse_arith()?;
        let Some((op, width)) = comparison_op(&self.cursor) else {
            return Ok(left);
        };
        for _ in 0..width {
            self.cursor.advance();
        }
        let right = self.parse_arith()?;
        let expr = self.alloc_binary(op, left, right);

        if comparison_op(&self.cursor).is_some() {
            return Err(ParseError::unsupported(
                "chained comparison",
                self.cursor.current_span(),
            )
            .with_help("split it with `and`: `a < b and b < c`"));
        }
        Ok(expr)
    }

    fn parse_arith(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_term()?;
        while let Some(op) = additive_op(self.cursor.current_kind()) {
            self.cursor.advance();
            let right = self.parse_term()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = multiplicative_op(self.cursor.current_kind()) {
            self.cursor.advance();
            let right = self.parse_unary()?;
            left = self.alloc_binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(self.arena.get_expr(operand).span);
        Ok(self
            .arena
            .alloc_expr(Expr::new(ExprKind::Unary { op, operand }, span)))
    }

    /// `base ** exponent`. The exponent is a unary expression, which makes
    /// `**` right-associative and lets `2 ** -1` parse.
    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let base = self.parse_postfix()?;
        if !self.cursor.eat(TokenKind::DoubleStar) {
            return Ok(base);
        }
        let exponent = ensure_sufficient_stack(|| self.parse_unary())?;
        Ok(self.alloc_binary(BinaryOp::Pow, base, exponent))
    }
}
