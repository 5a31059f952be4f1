// src/output/mod.rs
//! Output handling with separate planning and execution.
//!
//! Renderers produce strings, an [`OutputPlan`] says where they go, and
//! [`deliver`] is the only step that touches stdout, files or the clipboard.

mod clipboard;
mod render;
mod types;
mod writer;

pub use clipboard::copy_to_clipboard;
pub use render::{render_archive, render_search_hits, render_toc_outline};
pub use types::{
    CompletedOperation, DeliveryTarget, ExecutionStats, FailedOperation, OutputPlan, OutputReport,
};
pub use writer::{deliver, ensure_delivered};
