//! Content stream interpretation: text spans and ruling segments.

use lopdf::content::Operation;
use lopdf::Object;

use super::Edge;

/// Glyph advance used when a font carries no width table, as a fraction of
/// the font size.
const FALLBACK_ADVANCE: f32 = 0.5;

/// TJ adjustments beyond this (thousandths of text space, leftwards) split
/// words.
const WORD_BREAK_ADJUSTMENT: f32 = 200.0;

/// Segments whose endpoints differ by less than this along one axis count as
/// axis-aligned.
const AXIS_TOLERANCE: f32 = 0.5;

/// Run of text drawn by one show operation, in PDF user space.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextSpan {
    pub text: String,
    pub x0: f32,
    pub x1: f32,
    pub baseline: f32,
    pub font_size: f32,
    pub font_name: Option<String>,
}

/// Font lookups needed to decode and measure shown strings.
pub(crate) trait FontTable {
    /// Base font name of a font resource.
    fn base_font(&self, resource: &[u8]) -> Option<String>;

    /// Decode string bytes shown with a font resource.
    fn decode(&self, resource: &[u8], bytes: &[u8]) -> String;

    /// Per-byte glyph widths in thousandths of text space, if the font is a
    /// simple font with a width table.
    fn widths(&self, resource: &[u8], bytes: &[u8]) -> Option<Vec<f32>>;
}

/// Page box the interpreter maps user space into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageFrame {
    /// Left edge of the MediaBox
    pub left: f32,
    /// Top edge of the MediaBox
    pub top: f32,
}

/// Output of interpreting one page's content.
#[derive(Debug, Default)]
pub(crate) struct PageContent {
    pub spans: Vec<TextSpan>,
    pub edges: Vec<Edge>,
}

/// Affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn translation(tx: f32, ty: f32) -> Self {
        Matrix {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    fn from_operands(operands: &[Object]) -> Option<Self> {
        if operands.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: get_number(&operands[0])?,
            b: get_number(&operands[1])?,
            c: get_number(&operands[2])?,
            d: get_number(&operands[3])?,
            e: get_number(&operands[4])?,
            f: get_number(&operands[5])?,
        })
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[derive(Debug, Clone)]
struct TextState {
    font_resource: Vec<u8>,
    font_name: Option<String>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    horizontal_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_resource: Vec::new(),
            font_name: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    from: (f32, f32),
    to: (f32, f32),
    rect: bool,
}

/// Content stream interpreter for one page.
pub(crate) struct Interpreter<'a, F: FontTable> {
    fonts: &'a F,
    frame: PageFrame,
    ctm: Matrix,
    stack: Vec<(Matrix, TextState)>,
    text: TextState,
    tm: Matrix,
    tlm: Matrix,
    in_text: bool,
    path: Vec<Segment>,
    current: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
    output: PageContent,
}

impl<'a, F: FontTable> Interpreter<'a, F> {
    pub(crate) fn new(fonts: &'a F, frame: PageFrame) -> Self {
        Self {
            fonts,
            frame,
            ctm: Matrix::IDENTITY,
            stack: Vec::new(),
            text: TextState::default(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            in_text: false,
            path: Vec::new(),
            current: None,
            subpath_start: None,
            output: PageContent::default(),
        }
    }

    /// Run all operations and return the collected spans and edges.
    pub(crate) fn run(mut self, operations: &[Operation]) -> PageContent {
        for op in operations {
            self.step(op);
        }
        self.output
    }

    fn step(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            // Graphics state
            "q" => self.stack.push((self.ctm, self.text.clone())),
            "Q" => {
                if let Some((ctm, text)) = self.stack.pop() {
                    self.ctm = ctm;
                    self.text = text;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }

            // Text objects and state
            "BT" => {
                self.in_text = true;
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => self.in_text = false,
            "Tf" => {
                if let Some(Object::Name(name)) = operands.first() {
                    self.text.font_name = self
                        .fonts
                        .base_font(name)
                        .or_else(|| Some(String::from_utf8_lossy(name).to_string()));
                    self.text.font_resource = name.clone();
                }
                if let Some(size) = operands.get(1).and_then(get_number) {
                    self.text.font_size = size;
                }
            }
            "Tc" => set_number(&mut self.text.char_spacing, operands.first()),
            "Tw" => set_number(&mut self.text.word_spacing, operands.first()),
            "TL" => set_number(&mut self.text.leading, operands.first()),
            "Ts" => set_number(&mut self.text.rise, operands.first()),
            "Tz" => {
                if let Some(scale) = operands.first().and_then(get_number) {
                    self.text.horizontal_scale = scale / 100.0;
                }
            }

            // Text positioning
            "Td" => {
                if let (Some(tx), Some(ty)) = number_pair(operands) {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = number_pair(operands) {
                    self.text.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.tm = m;
                    self.tlm = m;
                }
            }
            "T*" => self.next_line(0.0, -self.text.leading),

            // Text showing
            "Tj" => {
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show(items);
                }
            }
            "'" => {
                self.next_line(0.0, -self.text.leading);
                if let Some(s @ Object::String(..)) = operands.first() {
                    self.show(std::slice::from_ref(s));
                }
            }
            "\"" => {
                set_number(&mut self.text.word_spacing, operands.first());
                set_number(&mut self.text.char_spacing, operands.get(1));
                self.next_line(0.0, -self.text.leading);
                if let Some(s @ Object::String(..)) = operands.get(2) {
                    self.show(std::slice::from_ref(s));
                }
            }

            // Path construction
            "m" => {
                if let (Some(x), Some(y)) = number_pair(operands) {
                    let p = self.ctm.apply(x, y);
                    self.current = Some(p);
                    self.subpath_start = Some(p);
                }
            }
            "l" => {
                if let (Some(x), Some(y)) = number_pair(operands) {
                    let p = self.ctm.apply(x, y);
                    if let Some(from) = self.current {
                        self.path.push(Segment {
                            from,
                            to: p,
                            rect: false,
                        });
                    }
                    self.current = Some(p);
                }
            }
            "c" | "v" | "y" => {
                // Curves never form rulings; only the current point moves.
                let n = operands.len();
                if n >= 2 {
                    if let (Some(x), Some(y)) =
                        (get_number(&operands[n - 2]), get_number(&operands[n - 1]))
                    {
                        self.current = Some(self.ctm.apply(x, y));
                    }
                }
            }
            "re" => self.rectangle(operands),
            "h" => self.close_subpath(),

            // Path painting
            "S" => self.paint(true, false),
            "s" => {
                self.close_subpath();
                self.paint(true, false);
            }
            "f" | "F" | "f*" => self.paint(false, true),
            "B" | "B*" => self.paint(true, true),
            "b" | "b*" => {
                self.close_subpath();
                self.paint(true, true);
            }
            "n" => self.clear_path(),

            _ => {}
        }
    }

    fn next_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn show(&mut self, items: &[Object]) {
        if !self.in_text {
            return;
        }

        let mut span: Option<TextSpan> = None;
        let size = self.text.font_size;
        let scale = self.text.horizontal_scale;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let decoded = self.fonts.decode(&self.text.font_resource, bytes);
                    let advance = self.advance(bytes, &decoded);

                    let start = self.device_point(0.0);
                    self.tm = Matrix::translation(advance, 0.0).then(&self.tm);
                    let end = self.device_point(0.0);

                    let current = span.get_or_insert_with(|| TextSpan {
                        text: String::new(),
                        x0: start.0,
                        x1: start.0,
                        baseline: start.1,
                        font_size: size * self.tm.then(&self.ctm).vertical_scale(),
                        font_name: self.text.font_name.clone(),
                    });
                    current.text.push_str(&decoded);
                    current.x0 = current.x0.min(start.0).min(end.0);
                    current.x1 = current.x1.max(start.0).max(end.0);
                }
                Object::Integer(_) | Object::Real(_) => {
                    let adjustment = get_number(item).unwrap_or(0.0);
                    let tx = -adjustment / 1000.0 * size * scale;
                    self.tm = Matrix::translation(tx, 0.0).then(&self.tm);

                    let breaks_word = -adjustment > WORD_BREAK_ADJUSTMENT
                        && span
                            .as_ref()
                            .and_then(|s| s.text.chars().last())
                            .is_some_and(|c| !is_spaceless_script_char(c));
                    if breaks_word {
                        self.push_span(span.take());
                    }
                }
                _ => {}
            }
        }

        self.push_span(span);
    }

    fn push_span(&mut self, span: Option<TextSpan>) {
        if let Some(mut span) = span.filter(|s| !s.text.trim().is_empty()) {
            span.x0 -= self.frame.left;
            span.x1 -= self.frame.left;
            self.output.spans.push(span);
        }
    }

    /// Horizontal advance in text space for a shown string.
    fn advance(&self, bytes: &[u8], decoded: &str) -> f32 {
        let state = &self.text;
        let total = match self.fonts.widths(&state.font_resource, bytes) {
            Some(widths) => widths
                .iter()
                .zip(bytes)
                .map(|(w, b)| {
                    let word = if *b == b' ' { state.word_spacing } else { 0.0 };
                    w / 1000.0 * state.font_size + state.char_spacing + word
                })
                .sum::<f32>(),
            None => decoded
                .chars()
                .map(|c| {
                    let word = if c == ' ' { state.word_spacing } else { 0.0 };
                    FALLBACK_ADVANCE * state.font_size + state.char_spacing + word
                })
                .sum::<f32>(),
        };
        total * state.horizontal_scale
    }

    fn device_point(&self, x: f32) -> (f32, f32) {
        self.tm.then(&self.ctm).apply(x, self.text.rise)
    }

    fn rectangle(&mut self, operands: &[Object]) {
        let values: Vec<f32> = operands.iter().filter_map(get_number).collect();
        let &[x, y, w, h] = values.as_slice() else {
            return;
        };

        let corners = [
            self.ctm.apply(x, y),
            self.ctm.apply(x + w, y),
            self.ctm.apply(x + w, y + h),
            self.ctm.apply(x, y + h),
        ];
        for i in 0..4 {
            self.path.push(Segment {
                from: corners[i],
                to: corners[(i + 1) % 4],
                rect: true,
            });
        }
        self.current = Some(corners[0]);
        self.subpath_start = Some(corners[0]);
    }

    fn close_subpath(&mut self) {
        if let (Some(from), Some(to)) = (self.current, self.subpath_start) {
            if from != to {
                self.path.push(Segment {
                    from,
                    to,
                    rect: false,
                });
            }
            self.current = Some(to);
        }
    }

    fn paint(&mut self, stroke: bool, fill: bool) {
        let segments = std::mem::take(&mut self.path);
        for segment in segments {
            if stroke || (fill && segment.rect) {
                if let Some(edge) = self.to_edge(&segment) {
                    self.output.edges.push(edge);
                }
            }
        }
        self.clear_path();
    }

    fn clear_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn to_edge(&self, segment: &Segment) -> Option<Edge> {
        let (x0, y0) = segment.from;
        let (x1, y1) = segment.to;
        let x0 = x0 - self.frame.left;
        let x1 = x1 - self.frame.left;
        let top0 = self.frame.top - y0;
        let top1 = self.frame.top - y1;

        let edge = if (top0 - top1).abs() < AXIS_TOLERANCE {
            Edge::horizontal(x0, x1, (top0 + top1) / 2.0)
        } else if (x0 - x1).abs() < AXIS_TOLERANCE {
            Edge::vertical((x0 + x1) / 2.0, top0, top1)
        } else {
            return None;
        };

        Some(if segment.rect { edge.from_rect() } else { edge })
    }
}

fn set_number(target: &mut f32, operand: Option<&Object>) {
    if let Some(value) = operand.and_then(get_number) {
        *target = value;
    }
}

fn number_pair(operands: &[Object]) -> (Option<f32>, Option<f32>) {
    (
        operands.first().and_then(get_number),
        operands.get(1).and_then(get_number),
    )
}

/// Numeric value of a PDF object.
pub(crate) fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Chinese and Japanese scripts put no spaces between words; Hangul does.
fn is_spaceless_script_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2EBEF
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x3000..=0x303F)
}

/// Decode string bytes without font information: UTF-16BE with BOM, then
/// UTF-8, then Latin-1.
pub(crate) fn decode_text_simple(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let utf16: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
