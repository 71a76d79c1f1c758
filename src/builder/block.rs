//! The ordered, append-only block list behind a report

use super::banner::NavItem;
use super::section::{SectionBlock, SectionEnd};
use super::table::TableBlock;
use crate::image::Figure;
use crate::LineStatus;

/// Position of a block in document order. Stable for the builder's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(usize);

impl BlockId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line of body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub status: Option<LineStatus>,
}

/// One addressable unit of the document, rendered only at serialization
#[derive(Debug, Clone)]
pub enum Block {
    /// Inline label/value panel
    Header(Vec<NavItem>),
    SectionStart(SectionBlock),
    SectionEnd(SectionEnd),
    Line(TextLine),
    LineBreak,
    Table(TableBlock),
    Figure(Figure),
    /// Trusted markup emitted verbatim
    Html(String),
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header(_) => "header",
            Block::SectionStart(_) => "section",
            Block::SectionEnd(_) => "section end",
            Block::Line(_) => "line",
            Block::LineBreak => "line break",
            Block::Table(_) => "table",
            Block::Figure(_) => "figure",
            Block::Html(_) => "html",
        }
    }
}

/// Append-only sequence of blocks, addressable by [`BlockId`]
#[derive(Debug, Clone, Default)]
pub struct BlockSequence {
    blocks: Vec<Block>,
}

impl BlockSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block at the end and return its id
    pub fn append(&mut self, block: Block) -> BlockId {
        let id = BlockId(self.blocks.len());
        log::debug!("append {} block #{}", block.kind(), id);
        self.blocks.push(block);
        id
    }

    /// Overwrite a block in place, returning the previous one.
    ///
    /// Low-level escape hatch for swapping a whole block. `ReportBuilder`
    /// patches sections and tables field by field through [`get_mut`]
    /// instead, so their handles and evaluated rows are never replaced.
    ///
    /// [`get_mut`]: Self::get_mut
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this sequence.
    pub fn replace_at(&mut self, id: BlockId, block: Block) -> Block {
        let len = self.blocks.len();
        let slot = self
            .blocks
            .get_mut(id.0)
            .unwrap_or_else(|| panic!("block id {} out of range (len {})", id.0, len));
        std::mem::replace(slot, block)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
