//! Terminal helpers for the ricambi tools
//!
//! - Status messages and formatting
//! - A spinner for slow loads
//! - Viewport probing and table/card rendering of result pages

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod render;
pub mod viewport;

pub use render::Renderer;
pub use viewport::{FixedProbe, Layout, NoProbe, TerminalProbe, ViewportProbe};
