//! Backslash escape processing for non-raw string literals.
//!
//! Unknown escapes such as `\d` are kept verbatim, as Python does.

use kern_ir::Span;

use crate::LexError;

fn hex_escape(chars: &mut std::str::CharIndices<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value * 16 + c.to_digit(16)?;
    }
    char::from_u32(value)
}

/// Resolve escapes in `body`. `offset` is the byte position of `body` in the
/// source, used to place errors.
pub(crate) fn unescape(body: &str, offset: u32, errors: &mut Vec<LexError>) -> String {
    if !body.contains('\\') {
        return body.to_owned();
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((start, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0C'),
            'v' => out.push('\x0B'),
            '\\' | '\'' | '"' => out.push(escaped),
            '\n' => {}
            'x' | 'u' | 'U' => {
                let digits = match escaped {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut lookahead = chars.clone();
                if let Some(ch) = hex_escape(&mut lookahead, digits) {
                    out.push(ch);
                    chars = lookahead;
                } else {
                    let end = lookahead.offset().min(body.len());
                    let text = &body[start..end];
                    errors.push(LexError::InvalidEscape {
                        text: text.to_owned(),
                        span: Span::new(
                            offset + u32::try_from(start).unwrap_or(0),
                            offset + u32::try_from(end).unwrap_or(0),
                        ),
                    });
                    out.push('\\');
                    out.push(escaped);
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}
