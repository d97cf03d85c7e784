//! Style inference for composed page blocks.

use crate::model::{Alignment, BlockStyle, ContentBlock, LineBlock, StyledBlock};

use super::options::LayoutOptions;

/// Page-wide values a block falls back on when its own metadata is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    /// Page width in points
    pub width: f32,
    /// Median font size of all words on the page
    pub dominant_font_size: Option<f32>,
    /// First font name seen on the page
    pub dominant_font_name: Option<String>,
}

impl PageContext {
    /// Create a context with no dominant font.
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Set the dominant font.
    pub fn with_dominant_font(mut self, name: Option<String>, size: Option<f32>) -> Self {
        self.dominant_font_name = name;
        self.dominant_font_size = size;
        self
    }
}

/// Clamp a vertical gap into `[0, max]`.
pub fn clamp_spacing(gap: f32, max: f32) -> f32 {
    gap.max(0.0).min(max)
}

/// Check whether a horizontal center lies within `tolerance * width` of the
/// page center. The boundary counts as centered.
pub fn is_centered(center_x: f32, width: f32, tolerance: f32) -> bool {
    (center_x - width / 2.0).abs() <= tolerance * width
}

/// Assigns presentation attributes to content blocks.
pub struct StyleInference<'a> {
    options: &'a LayoutOptions,
}

impl<'a> StyleInference<'a> {
    /// Create an inference pass over the given options.
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Style every block of a page in order.
    ///
    /// Each block's spacing is measured against the top of the block that
    /// follows it.
    pub fn style_page(&self, blocks: Vec<ContentBlock>, context: &PageContext) -> Vec<StyledBlock> {
        let next_tops: Vec<Option<f32>> = blocks
            .iter()
            .skip(1)
            .map(|b| Some(b.top()))
            .chain(std::iter::once(None))
            .collect();

        blocks
            .into_iter()
            .zip(next_tops)
            .flat_map(|(block, next_top)| self.style_block(block, next_top, context))
            .collect()
    }

    /// Style one block.
    ///
    /// Text lines with no visible text produce nothing. A table is followed
    /// by a spacer when another block comes after it.
    pub fn style_block(
        &self,
        block: ContentBlock,
        next_top: Option<f32>,
        context: &PageContext,
    ) -> Vec<StyledBlock> {
        match block {
            ContentBlock::Text(line) => {
                if line.text().is_empty() {
                    return Vec::new();
                }
                let style = self.text_style(&line, next_top, context);
                vec![StyledBlock::Content {
                    block: ContentBlock::Text(line),
                    style,
                }]
            }
            ContentBlock::Table(table) => {
                let bottom = table.bbox.bottom;
                let style = BlockStyle::new(
                    self.fallback_name(None, context),
                    self.fallback_size(None, context),
                );
                let mut styled = vec![StyledBlock::Content {
                    block: ContentBlock::Table(table),
                    style,
                }];
                if let Some(top) = next_top {
                    styled.push(StyledBlock::Spacer {
                        space_after: clamp_spacing(top - bottom, self.options.max_spacing),
                    });
                }
                styled
            }
        }
    }

    fn text_style(&self, line: &LineBlock, next_top: Option<f32>, context: &PageContext) -> BlockStyle {
        let mut style = BlockStyle::new(
            self.fallback_name(line.font_name(), context),
            self.fallback_size(line.font_size(), context),
        );
        style.bold = line.is_bold();

        if context.width > 0.0
            && is_centered(line.center_x(), context.width, self.options.center_tolerance)
        {
            style.alignment = Alignment::Center;
        }

        style.space_after =
            next_top.map(|top| clamp_spacing(top - line.bottom(), self.options.max_spacing));

        if let Some(classifier) = &self.options.classifier {
            let text = line.text();
            if let Some(rule) = classifier.classify(&text) {
                log::trace!("line {:?} matched rule {}", text, rule.name);
                rule.style.apply(&mut style);
            }
        }

        style
    }

    fn fallback_size(&self, size: Option<f32>, context: &PageContext) -> f32 {
        size.or(context.dominant_font_size)
            .unwrap_or(self.options.fallback_font_size)
    }

    fn fallback_name(&self, name: Option<&str>, context: &PageContext) -> String {
        name.map(str::to_string)
            .or_else(|| context.dominant_font_name.clone())
            .unwrap_or_else(|| self.options.fallback_font_name.clone())
    }
}
