//! Tracing initialization for the CLI.
//!
//! Library crates only emit events; the binary installs the subscriber.
//! Enable with `RUST_LOG`, e.g. `RUST_LOG=kern_transform=debug` or
//! `RUST_LOG=kern_eval=trace`.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical subscriber filtered by `RUST_LOG`. Does nothing
/// when `RUST_LOG` is unset. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
