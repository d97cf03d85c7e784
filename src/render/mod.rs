//! Rendering of styled documents.
//!
//! [`write_document`] drives any [`DocumentWriter`]; the crate ships a plain
//! text writer and JSON serialization of the document model.

mod json;
mod text;
mod writer;

pub use json::{from_json, to_json, JsonFormat};
pub use text::{to_text, TextWriter};
pub use writer::{column_widths, write_document, DocumentWriter, Length, PageSetup};
