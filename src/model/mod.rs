//! Data model: record maps as fetched, typed block views, post metadata.

mod block;
mod graph;
mod post;
mod record_map;
mod rich_text;

pub use block::{
    Block, BlockCommon, BlockVisitor, ContainerBlock, HeadingBlock, HeadingLevel, OtherBlock,
    PageBlock, ReferenceBlock, TextBlock,
};
pub use graph::BlockGraph;
pub use post::{valid_timestamp, DateStamp, Post, TextList};
pub use record_map::{BlockRecord, BlockValue, RecordMap};
pub use rich_text::RichText;

/// The page being rendered: its id plus, when the caller already knows it,
/// the ordered list of top-level block ids.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageRef {
    pub id: String,
    #[serde(default)]
    pub content: Option<Vec<String>>,
}

impl PageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: None,
        }
    }

    pub fn with_content(id: impl Into<String>, content: Vec<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content),
        }
    }
}
