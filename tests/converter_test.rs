//! Integration tests for the converter module.

use std::path::Path;
use std::sync::{Arc, Mutex};

use relayout::convert::{ConvertOptions, DocumentConverter, FallbackConverter, LayoutConverter};
use relayout::error::{Error, Result};
use relayout::model::{PageLayout, StyledDocument};

/// Mock converter counting its invocations.
struct MockConverter {
    name: &'static str,
    fail: bool,
    calls: Mutex<usize>,
}

impl MockConverter {
    fn new(name: &'static str, fail: bool) -> Self {
        Self {
            name,
            fail,
            calls: Mutex::new(0),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl DocumentConverter for MockConverter {
    fn name(&self) -> &str {
        self.name
    }

    fn convert_bytes(&self, _bytes: &[u8], _options: &ConvertOptions) -> Result<StyledDocument> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(Error::Other(format!("{} failed", self.name)));
        }
        let mut doc = StyledDocument::new();
        doc.metadata.producer = Some(self.name.to_string());
        doc.pages.push(PageLayout::new(0, 612.0, 792.0));
        Ok(doc)
    }
}

#[test]
fn test_primary_success_skips_fallback() {
    let primary = Arc::new(MockConverter::new("hifi", false));
    let fallback = Arc::new(MockConverter::new("layout", false));
    let chain = FallbackConverter::new(primary.clone(), fallback.clone());

    let doc = chain.convert_bytes(b"%PDF-1.4", &ConvertOptions::default()).unwrap();
    assert_eq!(doc.metadata.producer.as_deref(), Some("hifi"));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);
}

#[test]
fn test_primary_failure_uses_fallback() {
    let primary = Arc::new(MockConverter::new("hifi", true));
    let fallback = Arc::new(MockConverter::new("layout", false));
    let chain = FallbackConverter::new(primary.clone(), fallback.clone());

    let doc = chain.convert_bytes(b"%PDF-1.4", &ConvertOptions::default()).unwrap();
    assert_eq!(doc.metadata.producer.as_deref(), Some("layout"));
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 1);
}

#[test]
fn test_default_convert_reads_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let converter = MockConverter::new("hifi", false);
    let doc = converter.convert(&path, &ConvertOptions::default()).unwrap();
    assert_eq!(doc.page_count(), 1);
    assert_eq!(converter.calls(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let converter = MockConverter::new("hifi", false);
    let err = converter
        .convert(Path::new("/nonexistent/input.pdf"), &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(converter.calls(), 0);
}

#[test]
fn test_layout_converter_as_fallback() {
    let chain = FallbackConverter::new(
        Arc::new(MockConverter::new("hifi", true)),
        Arc::new(LayoutConverter::new()),
    );
    assert_eq!(chain.name(), "hifi+layout");

    let err = chain
        .convert_bytes(b"not a pdf", &ConvertOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownFormat));
}
