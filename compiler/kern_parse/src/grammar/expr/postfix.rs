//! Postfix operators: calls, attribute access and subscripts.
//!
//! `a.b(...)` is parsed directly into `MethodCall` rather than a `Call` of an
//! `Attribute`, so the call rewriter can classify calls without looking
//! through the callee.

use kern_diagnostic::ErrorCode;
use kern_ir::{CallArg, CallArgRange, Expr, ExprId, ExprKind, Name, Span, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.arena.get_expr(expr).span;
            let kind = match self.cursor.current_kind() {
                TokenKind::LParen => {
                    let open = self.cursor.advance().span;
                    let args = self.parse_call_args(open)?;
                    ExprKind::Call { func: expr, args }
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let attr = self.cursor.expect_ident()?;
                    if self.cursor.check(TokenKind::LParen) {
                        let open = self.cursor.advance().span;
                        let args = self.parse_call_args(open)?;
                        ExprKind::MethodCall {
                            receiver: expr,
                            method: attr,
                            args,
                        }
                    } else {
                        ExprKind::Attribute { value: expr, attr }
                    }
                }
                TokenKind::LBracket => {
                    let open = self.cursor.advance().span;
                    self.reject_slice()?;
                    let index = self.parse_expr_list()?;
                    self.reject_slice()?;
                    self.expect_closer(TokenKind::RBracket, open, "subscript")?;
                    ExprKind::Subscript { value: expr, index }
                }
                _ => break,
            };
            let span = start.merge(self.cursor.previous_span());
            expr = self.arena.alloc_expr(Expr::new(kind, span));
        }
        Ok(expr)
    }

    fn reject_slice(&self) -> Result<(), ParseError> {
        if self.cursor.check(TokenKind::Colon) {
            return Err(ParseError::unsupported("slicing", self.cursor.current_span()));
        }
        Ok(())
    }

    /// Arguments after `(`, through `)`. Positional arguments must come
    /// before keyword arguments.
    fn parse_call_args(&mut self, open: Span) -> Result<CallArgRange, ParseError> {
        let mut args: Vec<CallArg> = Vec::new();

        while !self.cursor.check(TokenKind::RParen) && !self.cursor.is_at_end() {
            let start = self.cursor.current_span();
            if matches!(
                self.cursor.current_kind(),
                TokenKind::Star | TokenKind::DoubleStar
            ) {
                return Err(ParseError::unsupported("argument unpacking", start));
            }

            let keyword = match self.cursor.current_kind() {
                TokenKind::Ident(name) if self.cursor.peek_next_kind() == TokenKind::Assign => {
                    self.cursor.advance();
                    self.cursor.advance();
                    Some(name)
                }
                _ => None,
            };
            let value = self.parse_expr()?;
            if self.cursor.check(TokenKind::For) {
                return Err(ParseError::unsupported(
                    "generator expression",
                    self.cursor.current_span(),
                )
                .with_help("use a list comprehension: `f([x for x in xs])`"));
            }
            let span = start.merge(self.cursor.previous_span());

            match keyword {
                Some(name) => {
                    self.check_repeated_keyword(&args, name, span)?;
                    args.push(CallArg::keyword(name, value, span));
                }
                None if args.iter().any(CallArg::is_keyword) => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        "positional argument follows keyword argument",
                        span,
                    ));
                }
                None => args.push(CallArg::positional(value, span)),
            }

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }

        self.expect_closer(TokenKind::RParen, open, "argument list")?;
        Ok(self.arena.alloc_call_args(args))
    }

    fn check_repeated_keyword(
        &self,
        args: &[CallArg],
        name: Name,
        span: Span,
    ) -> Result<(), ParseError> {
        if args.iter().any(|arg| arg.name == name) {
            let text = self.cursor.interner().lookup(name);
            return Err(ParseError::new(
                ErrorCode::E1001,
                format!("keyword argument `{text}` repeated"),
                span,
            ));
        }
        Ok(())
    }

    /// Expect a closing bracket; at end of input, point at the opener.
    ///
    /// The lexer drops newlines inside brackets, so a `Newline` here is the
    /// one it adds at end of input.
    pub(crate) fn expect_closer(
        &mut self,
        close: TokenKind,
        open: Span,
        what: &str,
    ) -> Result<(), ParseError> {
        if matches!(
            self.cursor.current_kind(),
            TokenKind::Eof | TokenKind::Newline | TokenKind::Dedent
        ) {
            return Err(
                ParseError::new(ErrorCode::E1003, format!("unclosed {what}"), open)
                    .with_context(format!("expected {} to close this", close.describe())),
            );
        }
        self.cursor.expect(close)?;
        Ok(())
    }
}
