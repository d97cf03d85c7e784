//! Plain text rendering for styled documents.

use crate::error::{Error, Result};
use crate::model::{BlockStyle, StyledDocument};

use super::writer::{write_document, DocumentWriter, Length, PageSetup};

/// Writer producing plain text.
///
/// Centered paragraphs are padded to the middle of `line_width` columns,
/// table rows become tab-separated lines, and pages are separated by a form
/// feed. When page numbers are requested each page ends with a centered
/// `Page N` line.
#[derive(Debug, Clone)]
pub struct TextWriter {
    line_width: usize,
    pages: Vec<String>,
    page_numbers: bool,
}

impl TextWriter {
    /// Create a text writer with an 80-column line width.
    pub fn new() -> Self {
        Self {
            line_width: 80,
            pages: vec![String::new()],
            page_numbers: false,
        }
    }

    /// Set the line width used for centering.
    pub fn with_line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    fn current(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn centered(&self, text: &str) -> String {
        let len = text.chars().count();
        let pad = self.line_width.saturating_sub(len) / 2;
        format!("{}{}", " ".repeat(pad), text)
    }
}

impl Default for TextWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for TextWriter {
    fn paragraph(&mut self, text: &str, style: &BlockStyle) -> Result<()> {
        let line = if style.is_centered() {
            self.centered(text)
        } else {
            text.to_string()
        };
        let page = self.current();
        page.push_str(&line);
        page.push('\n');
        Ok(())
    }

    fn table(
        &mut self,
        rows: &[Vec<String>],
        _widths: Option<&[Length]>,
        _style: &BlockStyle,
    ) -> Result<()> {
        let page = self.current();
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace('\n', " ")).collect();
            page.push_str(&cells.join("\t"));
            page.push('\n');
        }
        Ok(())
    }

    fn spacer(&mut self, _space_after: f32) -> Result<()> {
        self.current().push('\n');
        Ok(())
    }

    fn page_break(&mut self) -> Result<()> {
        self.pages.push(String::new());
        Ok(())
    }

    fn footer_page_number(&mut self) -> Result<()> {
        self.page_numbers = true;
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>> {
        let pages = std::mem::take(&mut self.pages);
        let rendered: Vec<String> = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                if self.page_numbers {
                    page.push('\n');
                    page.push_str(&self.centered(&format!("Page {}", i + 1)));
                    page.push('\n');
                }
                page
            })
            .collect();
        Ok(rendered.join("\x0c").into_bytes())
    }
}

/// Render a styled document as plain text with page numbers.
pub fn to_text(doc: &StyledDocument) -> Result<String> {
    let mut writer = TextWriter::new();
    let bytes = write_document(doc, &PageSetup::default(), &mut writer)?;
    String::from_utf8(bytes).map_err(|e| Error::Render(format!("text output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Alignment;

    #[test]
    fn test_centered_paragraph() {
        let mut writer = TextWriter::new().with_line_width(20);
        let mut style = BlockStyle::new("Arial", 11.0);
        style.alignment = Alignment::Center;

        writer.paragraph("Title", &style).unwrap();
        writer.paragraph("body", &BlockStyle::new("Arial", 11.0)).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "       Title\nbody\n");
    }

    #[test]
    fn test_table_rows_are_tab_separated() {
        let mut writer = TextWriter::new();
        let rows = vec![
            vec!["Name".to_string(), "Qty".to_string()],
            vec!["multi\nline".to_string(), String::new()],
        ];
        writer
            .table(&rows, None, &BlockStyle::new("Arial", 11.0))
            .unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "Name\tQty\nmulti line\t\n");
    }

    #[test]
    fn test_pages_and_footer() {
        let style = BlockStyle::new("Arial", 11.0);
        let mut writer = TextWriter::new().with_line_width(10);
        writer.paragraph("one", &style).unwrap();
        writer.page_break().unwrap();
        writer.paragraph("two", &style).unwrap();
        writer.footer_page_number().unwrap();

        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let pages: Vec<&str> = out.split('\x0c').collect();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0], "one\n\n  Page 1\n");
        assert_eq!(pages[1], "two\n\n  Page 2\n");
    }

    #[test]
    fn test_to_text_empty_document() {
        let text = to_text(&StyledDocument::new()).unwrap();
        assert!(text.contains("Page 1"));
    }
}
