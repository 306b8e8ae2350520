//! Token to operator mapping for the binary precedence levels.

use kern_ir::{BinaryOp, TokenKind};

use crate::Cursor;

/// `+` / `-`
pub(super) fn additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

/// `*` / `/` / `//` / `%`
pub(super) fn multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::DoubleSlash => Some(BinaryOp::FloorDiv),
        TokenKind::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

/// Comparison operator at the cursor, with the number of tokens it spans
/// (`not in` and `is not` take two).
pub(super) fn comparison_op(cursor: &Cursor<'_>) -> Option<(BinaryOp, usize)> {
    let op = match cursor.current_kind() {
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::In => BinaryOp::In,
        TokenKind::Not if cursor.peek_next_kind() == TokenKind::In => {
            return Some((BinaryOp::NotIn, 2));
        }
        TokenKind::Is if cursor.peek_next_kind() == TokenKind::Not => {
            return Some((BinaryOp::IsNot, 2));
        }
        TokenKind::Is => BinaryOp::Is,
        _ => return None,
    };
    Some((op, 1))
}

/// Tokens that can begin an expression; used to tell a trailing comma
/// (`x = 1,`) from a separator.
pub(super) fn can_start_expr(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Str(_)
            | TokenKind::Ident(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::None
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Minus
            | TokenKind::Plus
            | TokenKind::Not
            | TokenKind::Error
    )
}
