//! Raw token to `TokenKind` conversion, with interning.

use kern_ir::{Span, StringInterner, TokenKind};

use crate::escape::unescape;
use crate::raw_token::{RawError, RawToken};
use crate::LexError;

/// Parse an integer literal body, skipping `_` separators.
pub(crate) fn parse_int(digits: &str, radix: u32) -> Result<i64, RawError> {
    let mut value: i64 = 0;
    let mut seen_digit = false;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix).ok_or(RawError::InvalidNumber)?;
        value = value
            .checked_mul(i64::from(radix))
            .and_then(|v| v.checked_add(i64::from(digit)))
            .ok_or(RawError::InvalidNumber)?;
        seen_digit = true;
    }
    if seen_digit {
        Ok(value)
    } else {
        Err(RawError::InvalidNumber)
    }
}

/// Parse a float literal; allocates only when `_` separators are present.
pub(crate) fn parse_float(text: &str) -> Result<f64, RawError> {
    let parsed = if text.contains('_') {
        text.replace('_', "").parse()
    } else {
        text.parse()
    };
    parsed.map_err(|_| RawError::InvalidNumber)
}

/// `(is_raw, prefix_len, quote_len)` of a string token.
fn string_parts(slice: &str) -> (bool, usize, usize) {
    let prefix = slice
        .chars()
        .next()
        .filter(|c| c.is_ascii_alphabetic())
        .map_or(0, char::len_utf8);
    let raw = matches!(slice.as_bytes().first(), Some(b'r' | b'R'));
    let quote = if slice[prefix..].starts_with("\"\"\"") || slice[prefix..].starts_with("'''") {
        3
    } else {
        1
    };
    (raw, prefix, quote)
}

fn convert_string(
    slice: &str,
    span: Span,
    interner: &StringInterner,
    errors: &mut Vec<LexError>,
) -> TokenKind {
    let (raw, prefix, quote) = string_parts(slice);
    let body_start = prefix + quote;
    let body = slice.get(body_start..slice.len() - quote).unwrap_or("");
    if raw {
        return TokenKind::Str(interner.intern(body));
    }
    let offset = span.start + u32::try_from(body_start).unwrap_or(0);
    TokenKind::Str(interner.intern(&unescape(body, offset, errors)))
}

/// Convert a raw token to a `TokenKind`, interning identifiers and strings.
pub(crate) fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
    errors: &mut Vec<LexError>,
) -> TokenKind {
    match raw {
        // Literals
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f.to_bits()),
        RawToken::Str | RawToken::TripleStr => convert_string(slice, span, interner, errors),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        // Keywords
        RawToken::Def => TokenKind::Def,
        RawToken::Class => TokenKind::Class,
        RawToken::Return => TokenKind::Return,
        RawToken::Pass => TokenKind::Pass,
        RawToken::For => TokenKind::For,
        RawToken::In => TokenKind::In,
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::Import => TokenKind::Import,
        RawToken::From => TokenKind::From,
        RawToken::As => TokenKind::As,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::None => TokenKind::None,
        RawToken::While => TokenKind::While,
        RawToken::With => TokenKind::With,
        RawToken::Is => TokenKind::Is,
        RawToken::Break => TokenKind::Break,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Reserved => TokenKind::Reserved(interner.intern(slice)),

        // Delimiters
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::At => TokenKind::At,

        // Assignment
        RawToken::Assign => TokenKind::Assign,
        RawToken::PlusAssign => TokenKind::PlusAssign,
        RawToken::MinusAssign => TokenKind::MinusAssign,
        RawToken::StarAssign => TokenKind::StarAssign,
        RawToken::SlashAssign => TokenKind::SlashAssign,

        // Operators
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::DoubleStar => TokenKind::DoubleStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::DoubleSlash => TokenKind::DoubleSlash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,

        // The callback of this variant always fails, and trivia is
        // consumed before conversion.
        RawToken::UnterminatedStr
        | RawToken::Comment
        | RawToken::LineContinuation
        | RawToken::Newline => TokenKind::Error,
    }
}

#[cfg(test)]
mod tests;
