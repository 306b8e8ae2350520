//! Parser tests.
//!
//! - `parser`: statements, declarations and expressions
//! - `errors`: error reporting and recovery across whole files
//! - `description_file`: a complete description module with decorators,
//!   docstrings, comprehensions and nested defs

mod parser;
