use std::fmt;

/// Error codes for all diagnostics.
///
/// Format: E#### where the first digit is the stage:
/// - E0xxx: lexer
/// - E1xxx: parser
/// - E2xxx: kernel transformation
/// - E3xxx: evaluation
/// - E9xxx: internal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Invalid escape sequence
    E0004,
    /// Dedent to a level that matches no enclosing block
    E0005,
    /// Closing bracket without a matching opener
    E0006,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected an indented block
    E1005,
    /// Syntax outside the supported language subset
    E1006,
    /// Invalid assignment target
    E1007,

    // Transformation Errors (E2xxx)
    /// Declaring unit or member not found, or not unique
    E2001,
    /// Row function or helper has an unsupported shape
    E2002,
    /// Helper called through the receiver but never declared
    E2003,
    /// Receiver-rooted call of unsupported form
    E2004,

    // Evaluation Errors (E3xxx)
    /// Undefined name
    E3001,
    /// Unsupported operand types
    E3002,
    /// Wrong number or names of arguments
    E3003,
    /// Division by zero
    E3004,
    /// Index out of range
    E3005,
    /// Value is not callable
    E3006,
    /// Unknown attribute
    E3007,
    /// Integer overflow
    E3008,
    /// Column sequences of different lengths
    E3009,
    /// Unpacking a value into the wrong number of targets
    E3010,
    /// Maximum recursion depth exceeded
    E3011,
    /// Construct the evaluator does not execute
    E3012,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E1001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E0006 => "E0006",
            // Parser
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            // Transformation
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            // Evaluation
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E3008 => "E3008",
            ErrorCode::E3009 => "E3009",
            ErrorCode::E3010 => "E3010",
            ErrorCode::E3011 => "E3011",
            ErrorCode::E3012 => "E3012",
            // Internal
            ErrorCode::E9001 => "E9001",
        }
    }

    /// Lexer or parser error (E0xxx, E1xxx).
    pub fn is_syntax_error(&self) -> bool {
        let code = self.as_str();
        code.starts_with("E0") || code.starts_with("E1")
    }

    /// Transformation error (E2xxx).
    pub fn is_transform_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    /// Short description of the error class.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "invalid escape sequence",
            ErrorCode::E0005 => "inconsistent dedent",
            ErrorCode::E0006 => "unmatched closing bracket",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "expected an indented block",
            ErrorCode::E1006 => "unsupported syntax",
            ErrorCode::E1007 => "invalid assignment target",
            ErrorCode::E2001 => "lookup failed",
            ErrorCode::E2002 => "unsupported shape",
            ErrorCode::E2003 => "unresolved helper",
            ErrorCode::E2004 => "malformed receiver call",
            ErrorCode::E3001 => "undefined name",
            ErrorCode::E3002 => "unsupported operand types",
            ErrorCode::E3003 => "argument mismatch",
            ErrorCode::E3004 => "division by zero",
            ErrorCode::E3005 => "index out of range",
            ErrorCode::E3006 => "not callable",
            ErrorCode::E3007 => "unknown attribute",
            ErrorCode::E3008 => "integer overflow",
            ErrorCode::E3009 => "column length mismatch",
            ErrorCode::E3010 => "unpacking mismatch",
            ErrorCode::E3011 => "recursion limit",
            ErrorCode::E3012 => "unsupported at runtime",
            ErrorCode::E9001 => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests;
