//! Error recovery for the parser.
//!
//! After an error the parser skips to the start of the next statement at
//! the nesting level where the error happened. Indentation tokens are
//! balanced while skipping, so a broken `def` line also drops the block
//! that belongs to it instead of reporting it as a stray indent.

use kern_ir::TokenKind;

use super::cursor::Cursor;

/// Skip past the rest of the current logical line, plus any indented
/// block that hangs off it.
pub(crate) fn synchronize(cursor: &mut Cursor<'_>) {
    let mut depth = 0u32;
    loop {
        match cursor.current_kind() {
            TokenKind::Eof => return,
            TokenKind::Newline if depth == 0 => {
                cursor.advance();
                if cursor.check(TokenKind::Indent) {
                    skip_block(cursor);
                }
                return;
            }
            TokenKind::Indent => depth += 1,
            TokenKind::Dedent => {
                if depth == 0 {
                    // End of the enclosing block; the block parser consumes it.
                    return;
                }
                depth -= 1;
                if depth == 0 {
                    cursor.advance();
                    return;
                }
            }
            _ => {}
        }
        cursor.advance();
    }
}

/// Skip an indented block, starting at its `Indent`, through its `Dedent`.
pub(crate) fn skip_block(cursor: &mut Cursor<'_>) {
    let mut depth = 0u32;
    loop {
        match cursor.advance().kind {
            TokenKind::Eof => return,
            TokenKind::Indent => depth += 1,
            TokenKind::Dedent => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests;
