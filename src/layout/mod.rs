//! Layout reconstruction engine.
//!
//! Turns the positioned words and ruling lines of a page into an ordered,
//! styled sequence of text lines and tables:
//!
//! 1. [`group_words_by_line`] clusters words into lines by their top edge
//! 2. [`build_line_block`] aggregates each line's bounds and font metadata
//! 3. [`TableDetector`] normalizes the tables found by a [`TableFinder`]
//! 4. [`compose_page`] merges lines and tables into reading order
//! 5. [`StyleInference`] derives font, alignment and spacing per block
//! 6. [`Assembler`] runs the above per page and builds the document

mod analyzer;
mod assembler;
mod classify;
mod compositor;
mod grouper;
mod options;
mod style;
mod tables;

pub use analyzer::{build_line_block, is_bold_font, median};
pub use assembler::{page_context, Assembler};
pub use classify::{ClassifierRule, LineClassifier, Matcher, StyleOverride};
pub use compositor::{compose_page, drop_lines_inside_tables};
pub use grouper::group_words_by_line;
pub use options::{LayoutOptions, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE};
pub use style::{clamp_spacing, is_centered, PageContext, StyleInference};
pub use tables::{FoundTable, Strategy, TableDetector, TableFinder, TableSettings};
