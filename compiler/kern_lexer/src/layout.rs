//! Indentation layout.
//!
//! Turns the flat token stream into one where blocks are delimited by
//! `Indent`/`Dedent` and logical lines end in `Newline`:
//! - newlines inside `()`, `[]`, `{}` are dropped
//! - blank and comment-only lines produce nothing
//! - the indentation of a line is measured at its first token
//!   (tabs advance to the next multiple of 8)

use kern_ir::{Span, Token, TokenKind, TokenList};
use smallvec::SmallVec;

use crate::LexError;

const TAB_WIDTH: u32 = 8;

pub(crate) struct Layout<'src> {
    source: &'src str,
    tokens: TokenList,
    /// Open indentation levels; the bottom entry is always column 0.
    indents: SmallVec<[u32; 16]>,
    /// Open brackets.
    brackets: SmallVec<[TokenKind; 16]>,
    line_start: usize,
    at_line_start: bool,
}

impl<'src> Layout<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        let mut indents = SmallVec::new();
        indents.push(0);
        Layout {
            source,
            // Rough estimate: one token per four bytes.
            tokens: TokenList::with_capacity(source.len() / 4 + 1),
            indents,
            brackets: SmallVec::new(),
            line_start: 0,
            at_line_start: true,
        }
    }

    /// Whether the last token ends a logical line's content.
    fn line_has_content(&self) -> bool {
        !matches!(
            self.tokens.last_kind(),
            None | Some(TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent)
        )
    }

    /// A physical newline at `span`.
    pub(crate) fn newline(&mut self, span: Span) {
        self.line_start = span.end as usize;
        if !self.brackets.is_empty() {
            return;
        }
        if self.line_has_content() {
            self.tokens.push(Token::new(TokenKind::Newline, span));
        }
        self.at_line_start = true;
    }

    fn indent_width(&self, token_start: usize) -> u32 {
        let prefix = self.source.get(self.line_start..token_start).unwrap_or("");
        prefix.chars().fold(0, |width, c| match c {
            '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
            '\x0C' => 0,
            _ => width + 1,
        })
    }

    fn apply_indent(&mut self, span: Span, errors: &mut Vec<LexError>) {
        let width = self.indent_width(span.start as usize);
        let mark = Span::point(span.start);
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            self.tokens.push(Token::new(TokenKind::Indent, mark));
            return;
        }

        while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| width < top) {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, mark));
        }
        if self.indents.last().copied().unwrap_or(0) != width {
            errors.push(LexError::InconsistentDedent { span });
        }
    }

    fn track_bracket(&mut self, kind: TokenKind, span: Span, errors: &mut Vec<LexError>) {
        let closer = match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                self.brackets.push(kind);
                return;
            }
            TokenKind::RParen => ')',
            TokenKind::RBracket => ']',
            TokenKind::RBrace => '}',
            _ => return,
        };
        if self.brackets.pop().is_none() {
            errors.push(LexError::UnmatchedBracket { ch: closer, span });
        }
    }

    /// A significant token.
    pub(crate) fn push(&mut self, kind: TokenKind, span: Span, errors: &mut Vec<LexError>) {
        if self.at_line_start {
            self.at_line_start = false;
            self.apply_indent(span, errors);
        }
        self.track_bracket(kind, span, errors);
        self.tokens.push(Token::new(kind, span));
    }

    /// Close the last line and every open block, then append `Eof`.
    pub(crate) fn finish(mut self) -> TokenList {
        let end = u32::try_from(self.source.len())
            .unwrap_or_else(|_| panic!("source file exceeds {} bytes", u32::MAX));
        let eof = Span::point(end);
        if self.line_has_content() {
            self.tokens.push(Token::new(TokenKind::Newline, eof));
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.tokens.push(Token::new(TokenKind::Dedent, eof));
        }
        self.tokens.push(Token::new(TokenKind::Eof, eof));
        self.tokens
    }
}
