//! Rule-based style overrides for recognizable lines.
//!
//! A [`LineClassifier`] is an ordered list of rules. The first rule whose
//! [`Matcher`] accepts a line's text wins and its [`StyleOverride`] is laid
//! over the inferred style.

use regex::Regex;

use crate::model::{Alignment, BlockStyle};

/// Style attributes a rule forces. `None` leaves the inferred value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOverride {
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub underline: Option<bool>,
    pub alignment: Option<Alignment>,
}

impl StyleOverride {
    /// Create an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a font size.
    pub fn size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Force bold.
    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    /// Force underline.
    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    /// Force center alignment.
    pub fn centered(mut self) -> Self {
        self.alignment = Some(Alignment::Center);
        self
    }

    /// Apply the override to a style.
    pub fn apply(&self, style: &mut BlockStyle) {
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(bold) = self.bold {
            style.bold = bold;
        }
        if let Some(underline) = self.underline {
            style.underline = underline;
        }
        if let Some(alignment) = self.alignment {
            style.alignment = alignment;
        }
    }
}

/// Predicate over a line's trimmed text.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Text contains the substring
    Contains(String),
    /// Text contains every substring
    ContainsAll(Vec<String>),
    /// Text contains at least one substring
    ContainsAny(Vec<String>),
    /// Text matches the regex
    Regex(Regex),
    /// Text has cased letters and none of them is lowercase
    AllCaps,
    /// All-caps text ending with a colon
    UppercaseWithColon,
    /// Every inner matcher accepts the text
    All(Vec<Matcher>),
}

impl Matcher {
    /// Build a `ContainsAny` matcher from string slices.
    pub fn any_of(needles: &[&str]) -> Self {
        Matcher::ContainsAny(needles.iter().map(|s| s.to_string()).collect())
    }

    /// Check the matcher against a line of text.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Matcher::Contains(needle) => text.contains(needle.as_str()),
            Matcher::ContainsAll(needles) => needles.iter().all(|n| text.contains(n.as_str())),
            Matcher::ContainsAny(needles) => needles.iter().any(|n| text.contains(n.as_str())),
            Matcher::Regex(re) => re.is_match(text),
            Matcher::AllCaps => is_all_caps(text),
            Matcher::UppercaseWithColon => is_all_caps(text) && text.ends_with(':'),
            Matcher::All(matchers) => matchers.iter().all(|m| m.matches(text)),
        }
    }
}

fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// A named matcher with the style it forces.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    pub name: String,
    pub matcher: Matcher,
    pub style: StyleOverride,
}

impl ClassifierRule {
    /// Create a rule.
    pub fn new(name: impl Into<String>, matcher: Matcher, style: StyleOverride) -> Self {
        Self {
            name: name.into(),
            matcher,
            style,
        }
    }
}

/// Ordered rule table; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    rules: Vec<ClassifierRule>,
}

impl LineClassifier {
    /// Create an empty classifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (lowest priority so far).
    pub fn with_rule(mut self, rule: ClassifierRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Find the first rule matching the (trimmed) text.
    pub fn classify(&self, text: &str) -> Option<&ClassifierRule> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matcher.matches(text))
    }

    /// Rules for court and mediation application forms.
    pub fn legal_forms() -> Self {
        let section_labels = [
            "Name of",
            "Name,",
            "Address and contact details",
            "REGISTERED ADDRESS",
            "CORRESPONDENCE",
            "DETAILS OF",
            "Nature of disputes",
        ];

        Self::new()
            .with_rule(ClassifierRule::new(
                "form-title",
                Matcher::ContainsAll(vec!["FORM".into(), "'A'".into()]),
                StyleOverride::new().size(14.0).bold().centered(),
            ))
            .with_rule(ClassifierRule::new(
                "main-heading",
                Matcher::Contains("MEDIATION APPLICATION FORM".into()),
                StyleOverride::new().size(16.0).bold().centered(),
            ))
            .with_rule(ClassifierRule::new(
                "rule-reference",
                Matcher::any_of(&["REFER RULE", "[REFER"]),
                StyleOverride::new().size(11.0).centered(),
            ))
            .with_rule(ClassifierRule::new(
                "authority",
                Matcher::any_of(&[
                    "Mumbai District Legal Services Authority",
                    "City Civil Court, Mumbai",
                ]),
                StyleOverride::new().size(12.0).bold().centered(),
            ))
            .with_rule(ClassifierRule::new(
                "section-heading",
                Matcher::UppercaseWithColon,
                StyleOverride::new().size(12.0).bold().underline(),
            ))
            .with_rule(ClassifierRule::new(
                "numbered-item",
                Matcher::Regex(Regex::new(r"^\d.").unwrap()),
                StyleOverride::new().size(11.0),
            ))
            .with_rule(ClassifierRule::new(
                "section-label-caps",
                Matcher::All(vec![Matcher::any_of(&section_labels), Matcher::AllCaps]),
                StyleOverride::new().size(11.0).bold(),
            ))
            .with_rule(ClassifierRule::new(
                "section-label",
                Matcher::any_of(&section_labels),
                StyleOverride::new().size(11.0),
            ))
            .with_rule(ClassifierRule::new(
                "template-field",
                Matcher::any_of(&["{{", "{%"]),
                StyleOverride::new().size(11.0),
            ))
            .with_rule(ClassifierRule::new(
                "label",
                Matcher::any_of(&[
                    "Telephone No.",
                    "Mobile No.",
                    "Email ID",
                    "Address",
                    "Name",
                    "Applicant",
                    "Defendant",
                    "info@kslegal.co.in",
                ]),
                StyleOverride::new().size(11.0),
            ))
            .with_rule(ClassifierRule::new(
                "act-reference",
                Matcher::any_of(&["COMM. COURTS", "Commercial Courts Act", "RULES"]),
                StyleOverride::new().size(11.0),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_name(classifier: &LineClassifier, text: &str) -> Option<String> {
        classifier.classify(text).map(|r| r.name.clone())
    }

    #[test]
    fn test_all_caps() {
        assert!(is_all_caps("DETAILS OF THE PARTY"));
        assert!(is_all_caps("SECTION 3:"));
        assert!(!is_all_caps("Details"));
        assert!(!is_all_caps("1234"));
    }

    #[test]
    fn test_legal_forms_priority() {
        let classifier = LineClassifier::legal_forms();

        assert_eq!(rule_name(&classifier, "FORM 'A'").as_deref(), Some("form-title"));
        assert_eq!(
            rule_name(&classifier, "MEDIATION APPLICATION FORM").as_deref(),
            Some("main-heading")
        );
        assert_eq!(
            rule_name(&classifier, "[REFER RULE 3(1)]").as_deref(),
            Some("rule-reference")
        );
        assert_eq!(
            rule_name(&classifier, "PARTICULARS OF THE APPLICANT:").as_deref(),
            Some("section-heading")
        );
        assert_eq!(
            rule_name(&classifier, "1 {{client_name}}").as_deref(),
            Some("numbered-item")
        );
        assert_eq!(
            rule_name(&classifier, "DETAILS OF APPLICANT").as_deref(),
            Some("section-label-caps")
        );
        assert_eq!(
            rule_name(&classifier, "Name of the applicant").as_deref(),
            Some("section-label")
        );
        assert_eq!(
            rule_name(&classifier, "Mobile No. {{ phone }}").as_deref(),
            Some("template-field")
        );
        assert_eq!(rule_name(&classifier, "Email ID").as_deref(), Some("label"));
        assert_eq!(
            rule_name(&classifier, "write to info@kslegal.co.in").as_deref(),
            Some("label")
        );
        assert_eq!(rule_name(&classifier, "Some plain sentence."), None);
    }

    #[test]
    fn test_single_digit_is_not_numbered_item() {
        let classifier = LineClassifier::legal_forms();
        assert_eq!(rule_name(&classifier, "7"), None);
    }

    #[test]
    fn test_override_applies_only_set_fields() {
        let mut style = BlockStyle::new("Arial", 9.0);
        style.bold = true;

        StyleOverride::new().size(11.0).apply(&mut style);
        assert_eq!(style.font_size, 11.0);
        assert!(style.bold);
        assert_eq!(style.font_name, "Arial");

        StyleOverride::new().underline().centered().apply(&mut style);
        assert!(style.underline);
        assert!(style.is_centered());
    }

    #[test]
    fn test_custom_rule() {
        let classifier = LineClassifier::new().with_rule(ClassifierRule::new(
            "chapter",
            Matcher::Regex(Regex::new(r"^Chapter \d+$").unwrap()),
            StyleOverride::new().size(18.0).bold(),
        ));
        assert_eq!(rule_name(&classifier, "  Chapter 12 ").as_deref(), Some("chapter"));
        assert!(classifier.classify("").is_none());
    }
}
