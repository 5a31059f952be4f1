use super::record_map::BlockValue;
use super::rich_text::RichText;

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Text($pattern) => $result,
            Block::Heading($pattern) => $result,
            Block::Page($pattern) => $result,
            Block::TransclusionReference($pattern) => $result,
            Block::TransclusionContainer($pattern) => $result,
            Block::Other($pattern) => $result,
        }
    };
}

/// Fields every block kind carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockCommon<'a> {
    pub id: &'a str,
    pub title: RichText<'a>,
    pub content: &'a [String],
}

/// Heading depth as Notion names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    Header,
    SubHeader,
    SubSubHeader,
}

impl HeadingLevel {
    fn from_type(block_type: &str) -> Option<Self> {
        match block_type {
            "header" => Some(Self::Header),
            "sub_header" => Some(Self::SubHeader),
            "sub_sub_header" => Some(Self::SubSubHeader),
            _ => None,
        }
    }

    /// Nominal outline depth: H1, H2, H3 map to 0, 1, 2.
    pub fn nominal_depth(self) -> usize {
        match self {
            Self::Header => 0,
            Self::SubHeader => 1,
            Self::SubSubHeader => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::SubHeader => "sub_header",
            Self::SubSubHeader => "sub_sub_header",
        }
    }
}

/// Plain text block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBlock<'a> {
    pub common: BlockCommon<'a>,
}

/// Heading block of any of the three levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingBlock<'a> {
    pub common: BlockCommon<'a>,
    pub level: HeadingLevel,
}

/// Page block; either the page being rendered or a sub-page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBlock<'a> {
    pub common: BlockCommon<'a>,
}

/// Synced-block reference: shows the subtree of another block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceBlock<'a> {
    pub common: BlockCommon<'a>,
    pub pointer: Option<&'a str>,
}

/// Source of a synced block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBlock<'a> {
    pub common: BlockCommon<'a>,
}

/// Any block type this crate does not interpret (images, code, table rows...)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OtherBlock<'a> {
    pub common: BlockCommon<'a>,
    pub block_type: &'a str,
}

/// Typed view of one block-map entry, borrowed from its [`BlockValue`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block<'a> {
    Text(TextBlock<'a>),
    Heading(HeadingBlock<'a>),
    Page(PageBlock<'a>),
    TransclusionReference(ReferenceBlock<'a>),
    TransclusionContainer(ContainerBlock<'a>),
    Other(OtherBlock<'a>),
}

impl<'a> Block<'a> {
    /// Builds the typed view, or `None` when the value has no usable id.
    pub fn from_value(value: &'a BlockValue) -> Option<Self> {
        let id = value.id.as_deref().filter(|id| !id.trim().is_empty())?;
        let common = BlockCommon {
            id,
            title: RichText::new(value.properties.as_ref().and_then(|p| p.get("title"))),
            content: value.content.as_deref().unwrap_or_default(),
        };
        let block_type = value.block_type.as_deref().unwrap_or_default();

        let block = match block_type {
            "text" => Block::Text(TextBlock { common }),
            "page" => Block::Page(PageBlock { common }),
            "transclusion_reference" => Block::TransclusionReference(ReferenceBlock {
                common,
                pointer: value.transclusion_pointer(),
            }),
            "transclusion_container" => Block::TransclusionContainer(ContainerBlock { common }),
            other => match HeadingLevel::from_type(other) {
                Some(level) => Block::Heading(HeadingBlock { common, level }),
                None => Block::Other(OtherBlock {
                    common,
                    block_type: other,
                }),
            },
        };
        Some(block)
    }

    /// Get the block's ID
    pub fn id(&self) -> &'a str {
        match_all_blocks!(self, b => b.common.id)
    }

    /// Get the ordered child ids
    pub fn content(&self) -> &'a [String] {
        match_all_blocks!(self, b => b.common.content)
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon<'a> {
        match_all_blocks!(self, b => &b.common)
    }

    /// Get block type name
    pub fn block_type(&self) -> &'a str {
        match self {
            Block::Text(_) => "text",
            Block::Heading(b) => b.level.as_str(),
            Block::Page(_) => "page",
            Block::TransclusionReference(_) => "transclusion_reference",
            Block::TransclusionContainer(_) => "transclusion_container",
            Block::Other(b) => b.block_type,
        }
    }

    /// Accept a visitor
    pub fn accept<V: BlockVisitor>(&self, visitor: &mut V) {
        match self {
            Block::Text(b) => visitor.visit_text(b),
            Block::Heading(b) => visitor.visit_heading(b),
            Block::Page(b) => visitor.visit_page(b),
            Block::TransclusionReference(b) => visitor.visit_reference(b),
            Block::TransclusionContainer(b) => visitor.visit_container(b),
            Block::Other(b) => visitor.visit_other(b),
        }
    }
}

/// Visitor over the blocks of a page walk.
///
/// All methods default to doing nothing, so implementors only override the
/// block kinds they care about.
pub trait BlockVisitor {
    fn visit_text(&mut self, _block: &TextBlock<'_>) {}
    fn visit_heading(&mut self, _block: &HeadingBlock<'_>) {}
    fn visit_page(&mut self, _block: &PageBlock<'_>) {}
    fn visit_reference(&mut self, _block: &ReferenceBlock<'_>) {}
    fn visit_container(&mut self, _block: &ContainerBlock<'_>) {}
    fn visit_other(&mut self, _block: &OtherBlock<'_>) {}
}
