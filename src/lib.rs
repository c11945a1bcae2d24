//! Geometry and state engine for a layered-body diagram editor.
//!
//! Bodies ("parts") stack vertically without gaps. Each part can carry
//! symmetric vertices that pinch or widen its outline, special forms on
//! its sides, and a PIN or BOX connector at either end. Free shapes may be
//! attached to a part and follow it through every resize and move.
//!
//! [`Editor`] is the entry point: it owns the model and a view cache of
//! derived geometry that a UI layer renders as-is.

pub mod color;
pub mod connector;
pub mod drag;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod prompt;
pub mod rulers;
pub mod serialize;
pub mod settings;
pub mod svg;
pub mod units;
pub mod view;

pub use editor::{DrawTool, Editor, HandleHit, PressOutcome};
pub use error::{EditorError, Result};

/// Installs the global `tracing` subscriber. `RUST_LOG` narrows or widens
/// the default `info` level.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
