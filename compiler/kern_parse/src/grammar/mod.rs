//! Grammar modules for the parser.
//!
//! - `stmt`: statements, blocks and assignment targets
//! - `item`: `def`, `class`, decorators, parameters, imports
//! - `expr`: expressions, by precedence level

mod expr;
mod item;
mod stmt;
