//! PDF page source built on lopdf.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_format_from_bytes, detect_format_from_path};
use crate::error::{Error, Result};
use crate::model::Metadata;

use super::content::{decode_text_simple, get_number, FontTable, Interpreter, PageFrame};
use super::{spans_to_words, PageSource, RawPage};

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Parent links followed when looking up inherited page attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// [`PageSource`] reading words and ruling lines from a PDF.
pub struct LopdfSource {
    doc: LopdfDocument,
    page_ids: Vec<ObjectId>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        detect_format_from_path(path)?;
        let doc = LopdfDocument::load(path).map_err(Error::from)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let doc = LopdfDocument::load_mem(data).map_err(Error::from)?;
        Ok(Self::from_document(doc))
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let page_ids = doc.get_pages().into_values().collect();
        Self { doc, page_ids }
    }

    /// PDF version from the file header.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.page_ids.len()))
    }

    /// MediaBox of a page, following `Parent` links.
    fn media_box(&self, page_id: ObjectId) -> [f32; 4] {
        let mut dict = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(current) = dict else { break };

            if let Ok(obj) = current.get(b"MediaBox") {
                if let Ok(array) = self.resolve(obj).as_array() {
                    let values: Vec<f32> = array
                        .iter()
                        .filter_map(|o| get_number(self.resolve(o)))
                        .collect();
                    if let &[x0, y0, x1, y1] = values.as_slice() {
                        return [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)];
                    }
                }
            }

            dict = current
                .get(b"Parent")
                .and_then(Object::as_reference)
                .and_then(|id| self.doc.get_dictionary(id))
                .ok();
        }
        DEFAULT_MEDIA_BOX
    }

    /// Concatenated, decompressed content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page = self.doc.get_dictionary(page_id)?;
        let Ok(contents) = page.get(b"Contents") else {
            return Ok(Vec::new());
        };

        let streams: Vec<&Object> = match self.resolve(contents) {
            Object::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        let mut content = Vec::new();
        for obj in streams {
            match self.resolve(obj) {
                Object::Stream(stream) => {
                    let data = stream.decompressed_content().unwrap_or_else(|e| {
                        log::warn!("page {:?}: reading undecodable stream raw: {}", page_id, e);
                        stream.content.clone()
                    });
                    content.extend_from_slice(&data);
                    content.push(b'\n');
                }
                _ => return Err(Error::PdfParse("Invalid content stream".to_string())),
            }
        }
        Ok(content)
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn page(&self, index: usize) -> Result<RawPage> {
        let page_id = self.page_id(index)?;
        let [left, bottom, right, top] = self.media_box(page_id);

        let fonts = LopdfFonts::new(&self.doc, self.doc.get_page_fonts(page_id)?);
        let data = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&data)
            .map_err(|e| Error::PdfParse(format!("Page {}: {}", index + 1, e)))?;

        let output = Interpreter::new(&fonts, PageFrame { left, top }).run(&content.operations);
        let words = spans_to_words(&output.spans, top);

        log::debug!(
            "page {}: {} spans, {} words, {} edges",
            index,
            output.spans.len(),
            words.len(),
            output.edges.len()
        );

        Ok(RawPage {
            index,
            width: right - left,
            height: top - bottom,
            words,
            edges: output.edges,
        })
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.version());
        metadata.page_count = self.page_count();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .map(|obj| self.resolve(obj))
            .and_then(Object::as_dict);

        if let Ok(info) = info {
            metadata.title = info_string(info, b"Title");
            metadata.author = info_string(info, b"Author");
            metadata.subject = info_string(info, b"Subject");
            metadata.creator = info_string(info, b"Creator");
            metadata.producer = info_string(info, b"Producer");
            metadata.created = info_string(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
            metadata.modified = info_string(info, b"ModDate").and_then(|s| parse_pdf_date(&s));
        }

        metadata
    }
}

impl std::fmt::Debug for LopdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfSource")
            .field("version", &self.doc.version)
            .field("pages", &self.page_ids.len())
            .finish()
    }
}

/// Width table of a simple font.
struct Widths {
    first_char: u32,
    widths: Vec<f32>,
}

/// Fonts of one page, keyed by resource name.
struct LopdfFonts<'a> {
    doc: &'a LopdfDocument,
    fonts: BTreeMap<Vec<u8>, &'a Dictionary>,
    widths: HashMap<Vec<u8>, Widths>,
}

impl<'a> LopdfFonts<'a> {
    fn new(doc: &'a LopdfDocument, fonts: BTreeMap<Vec<u8>, &'a Dictionary>) -> Self {
        let widths = fonts
            .iter()
            .filter_map(|(name, font)| Some((name.clone(), read_widths(doc, font)?)))
            .collect();
        Self { doc, fonts, widths }
    }
}

impl FontTable for LopdfFonts<'_> {
    fn base_font(&self, resource: &[u8]) -> Option<String> {
        self.fonts
            .get(resource)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|obj| obj.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).to_string())
    }

    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String {
        self.fonts
            .get(resource)
            .and_then(|font| font.get_font_encoding(self.doc).ok())
            .and_then(|encoding| LopdfDocument::decode_text(&encoding, bytes).ok())
            .unwrap_or_else(|| decode_text_simple(bytes))
    }

    fn widths(&self, resource: &[u8], bytes: &[u8]) -> Option<Vec<f32>> {
        let table = self.widths.get(resource)?;
        Some(
            bytes
                .iter()
                .map(|&b| {
                    (b as u32)
                        .checked_sub(table.first_char)
                        .and_then(|i| table.widths.get(i as usize))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect(),
        )
    }
}

/// `FirstChar`/`Widths` of a simple font. Composite fonts have none.
fn read_widths(doc: &LopdfDocument, font: &Dictionary) -> Option<Widths> {
    let resolve = |obj: &'_ Object| -> Option<Object> {
        match obj {
            Object::Reference(id) => doc.get_object(*id).ok().cloned(),
            other => Some(other.clone()),
        }
    };

    if font.get(b"Subtype").and_then(Object::as_name).ok() == Some(b"Type0".as_slice()) {
        return None;
    }

    let first_char = get_number(&resolve(font.get(b"FirstChar").ok()?)?)? as u32;
    let widths = match resolve(font.get(b"Widths").ok()?)? {
        Object::Array(items) => items
            .iter()
            .map(|o| resolve(o).as_ref().and_then(get_number).unwrap_or(0.0))
            .collect(),
        _ => return None,
    };

    Some(Widths { first_char, widths })
}

/// String value of an Info dictionary entry.
fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(bytes) => Some(String::from_utf8_lossy(bytes).to_string()),
        _ => None,
    }
    .filter(|s| !s.trim().is_empty())
}

/// Parse a PDF date string (`D:YYYYMMDDHHmmSS...`).
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(default)
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
