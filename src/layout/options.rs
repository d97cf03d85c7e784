//! Layout options and configuration.

use super::classify::LineClassifier;
use super::tables::TableSettings;

/// Font size used when neither a line nor its page reports one.
pub const DEFAULT_FONT_SIZE: f32 = 11.0;

/// Font family used when neither a line nor its page reports one.
pub const DEFAULT_FONT_NAME: &str = "Times New Roman";

/// Options for rebuilding page layouts.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Max distance in points between rounded word tops on the same line
    pub line_tolerance: f32,

    /// Max distance of a line's center from the page center, as a fraction
    /// of the page width, for the line to count as centered
    pub center_tolerance: f32,

    /// Upper bound for inferred spacing after a block, in points
    pub max_spacing: f32,

    /// Last-resort font size
    pub fallback_font_size: f32,

    /// Last-resort font family
    pub fallback_font_name: String,

    /// Settings handed to the table finder
    pub table_settings: TableSettings,

    /// Drop text lines that sit inside a detected table
    pub suppress_table_text: bool,

    /// Lay out pages on the rayon thread pool
    pub parallel: bool,

    /// Optional rule table overriding inferred styles for known line patterns
    pub classifier: Option<LineClassifier>,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line grouping tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance.max(0.0);
        self
    }

    /// Set the centering tolerance (fraction of page width).
    pub fn with_center_tolerance(mut self, tolerance: f32) -> Self {
        self.center_tolerance = tolerance.clamp(0.0, 0.5);
        self
    }

    /// Set the spacing cap.
    pub fn with_max_spacing(mut self, points: f32) -> Self {
        self.max_spacing = points.max(0.0);
        self
    }

    /// Set the last-resort font.
    pub fn with_fallback_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.fallback_font_name = name.into();
        self.fallback_font_size = size;
        self
    }

    /// Set table finder settings.
    pub fn with_table_settings(mut self, settings: TableSettings) -> Self {
        self.table_settings = settings;
        self
    }

    /// Enable or disable dropping text lines inside tables.
    pub fn with_suppress_table_text(mut self, suppress: bool) -> Self {
        self.suppress_table_text = suppress;
        self
    }

    /// Enable or disable parallel page layout.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page layout.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the line classifier.
    pub fn with_classifier(mut self, classifier: LineClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            center_tolerance: 0.08,
            max_spacing: 12.0,
            fallback_font_size: DEFAULT_FONT_SIZE,
            fallback_font_name: DEFAULT_FONT_NAME.to_string(),
            table_settings: TableSettings::default(),
            suppress_table_text: false,
            parallel: true,
            classifier: None,
        }
    }
}
