//! The logos-derived tokenizer, before interning and layout.

use logos::{Lexer, Logos};

use crate::convert::{parse_float, parse_int};

/// Why logos rejected a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RawError {
    #[default]
    InvalidChar,
    UnterminatedString,
    InvalidNumber,
}

/// Raw token from logos. Comments and line continuations are skipped here;
/// newlines are kept for the layout pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = RawError)]
#[logos(skip r"[ \t\x0C\r]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    #[regex(r"\\[ \t]*\r?\n", logos::skip)]
    LineContinuation,

    #[token("\n")]
    Newline,

    // Keywords
    #[token("def")]
    Def,
    #[token("class")]
    Class,
    #[token("return")]
    Return,
    #[token("pass")]
    Pass,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("import")]
    Import,
    #[token("from")]
    From,
    #[token("as")]
    As,
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,
    #[token("while")]
    While,
    #[token("with")]
    With,
    #[token("is")]
    Is,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,

    // Keywords the parser rejects with a targeted message
    #[token("assert")]
    #[token("async")]
    #[token("await")]
    #[token("del")]
    #[token("except")]
    #[token("finally")]
    #[token("global")]
    #[token("lambda")]
    #[token("nonlocal")]
    #[token("raise")]
    #[token("try")]
    #[token("yield")]
    Reserved,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("->")]
    Arrow,
    #[token("@")]
    At,

    // Assignment
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    DoubleStar,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,

    // Numbers
    #[regex(r"0[xX][0-9a-fA-F_]+", |lex| parse_int(&lex.slice()[2..], 16))]
    #[regex(r"0[oO][0-7_]+", |lex| parse_int(&lex.slice()[2..], 8))]
    #[regex(r"0[bB][01_]+", |lex| parse_int(&lex.slice()[2..], 2))]
    #[regex(r"[0-9][0-9_]*", |lex| parse_int(lex.slice(), 10))]
    Int(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| parse_float(lex.slice()))]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+", |lex| parse_float(lex.slice()))]
    Float(f64),

    // Strings: optional prefix, one line, escapes resolved during conversion
    #[regex(r#"[rRuUfFbB]?"([^"\\\n]|\\.)*""#)]
    #[regex(r#"[rRuUfFbB]?'([^'\\\n]|\\.)*'"#)]
    Str,

    // Triple-quoted strings may span lines; the callback finds the closer.
    #[regex(r#"[rRuUfFbB]?""""#, triple_quoted)]
    #[regex(r"[rRuUfFbB]?'''", triple_quoted)]
    TripleStr,

    // A quote with no closer before the end of the line.
    #[regex(r#"[rRuUfFbB]?"([^"\\\n]|\\.)*"#, unterminated)]
    #[regex(r#"[rRuUfFbB]?'([^'\\\n]|\\.)*"#, unterminated)]
    UnterminatedStr,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

fn unterminated(_: &mut Lexer<'_, RawToken>) -> Result<(), RawError> {
    Err(RawError::UnterminatedString)
}

/// Extend the current token to the matching triple quote, honoring
/// backslash escapes.
fn triple_quoted(lex: &mut Lexer<'_, RawToken>) -> Result<(), RawError> {
    let quote = if lex.slice().ends_with('"') {
        b'"'
    } else {
        b'\''
    };
    let rest = lex.remainder().as_bytes();
    let mut end = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == quote && rest[i..].starts_with(&[quote, quote, quote]) => {
                end = Some(i + 3);
                break;
            }
            _ => i += 1,
        }
    }
    let len = rest.len();
    match end {
        Some(end) => {
            lex.bump(end);
            Ok(())
        }
        None => {
            lex.bump(len);
            Err(RawError::UnterminatedString)
        }
    }
}
