//! Document model for reconstructed PDF layouts.
//!
//! These types are the hand-off points between pipeline stages: the page
//! source produces [`PositionedWord`]s, the layout stages turn them into
//! [`ContentBlock`]s, and the assembler emits a [`StyledDocument`] that a
//! writer turns into a concrete file. The model is writer-agnostic.

mod block;
mod document;
mod style;
mod table;
mod word;

pub use block::{ContentBlock, LineBlock, StyledBlock};
pub use document::{Metadata, PageLayout, StyledDocument};
pub use style::{Alignment, BlockStyle};
pub use table::{BBox, TableBlock};
pub use word::PositionedWord;
