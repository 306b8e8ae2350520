//! Kern command-line driver.
//!
//! ```text
//! description file
//!     │  kern_parse::parse_source
//!     ▼
//! SourceUnit ──► transform ──► Kernel ──► kern_fmt (kernel, check)
//!                                  │
//!                                  └────► kern_eval::run_kernel (run)
//! ```
//!
//! The binary in `main.rs` dispatches to [`commands`]; flags are parsed by
//! [`options::Options`].

pub mod commands;
pub mod options;
pub mod tracing_setup;
