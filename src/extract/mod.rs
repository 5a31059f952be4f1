//! Walks over a page's block graph: flattened text and table of contents.

mod page;
mod state;
mod text;
mod toc;
mod walker;

pub use page::resolve_page_content;
pub use state::TraversalContext;
pub use text::{extract_text, extract_text_from_graph};
pub use toc::{build_toc, build_toc_from_graph, normalize_indent_levels, TocEntry};
pub use walker::walk;
