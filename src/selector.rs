//! The selector data model.
//!
//! Selectors are abstract, document-independent descriptions of a span of
//! text, mirroring the Web Annotation selector shapes: a quoted snippet with
//! optional disambiguating context, a character-offset pair, a structural
//! range bounded by two further selectors, or a CSS selector (carried in the
//! model, but anchoring it requires a native query engine and is rejected by
//! dispatch). Any selector may carry a `refinedBy` selector, forming a
//! refinement chain that progressively narrows the matched region.
//!
//! Selectors are immutable, caller-owned values. The engine never mutates
//! them; one selector may be anchored against many scopes and documents.
//! They serialize to and from the annotation model's JSON:
//!
//! ```
//! use textanchor::selector::{Selector, TextQuoteSelector};
//!
//! let selector: Selector = serde_json::from_str(
//!     r#"{ "type": "TextQuoteSelector", "exact": "not", "prefix": "or " }"#,
//! ).unwrap();
//! assert_eq!(selector.kind(), "TextQuoteSelector");
//! ```

use serde::{Deserialize, Serialize};

/// A selector, tagged by `type` as in the annotation JSON model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Selector {
    CssSelector(CssSelector),
    TextQuoteSelector(TextQuoteSelector),
    TextPositionSelector(TextPositionSelector),
    RangeSelector(RangeSelector),
}

impl Selector {
    /// The selector's type tag, as it appears in the JSON model.
    pub fn kind(&self) -> &'static str {
        match self {
            Selector::CssSelector(_) => "CssSelector",
            Selector::TextQuoteSelector(_) => "TextQuoteSelector",
            Selector::TextPositionSelector(_) => "TextPositionSelector",
            Selector::RangeSelector(_) => "RangeSelector",
        }
    }

    /// The nested selector refining this one, if any.
    pub fn refined_by(&self) -> Option<&Selector> {
        match self {
            Selector::CssSelector(s) => s.refined_by.as_deref(),
            Selector::TextQuoteSelector(s) => s.refined_by.as_deref(),
            Selector::TextPositionSelector(s) => s.refined_by.as_deref(),
            Selector::RangeSelector(s) => s.refined_by.as_deref(),
        }
    }
}

/// A CSS selector naming an element of a tree-shaped document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CssSelector {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_by: Option<Box<Selector>>,
}

/// A quoted snippet of text, with optional surrounding context to pick the
/// intended occurrence when the quote appears more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuoteSelector {
    pub exact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_by: Option<Box<Selector>>,
}

impl TextQuoteSelector {
    pub fn new(exact: impl Into<String>) -> Self {
        Self {
            exact: exact.into(),
            prefix: None,
            suffix: None,
            refined_by: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn refined_by(mut self, selector: impl Into<Selector>) -> Self {
        self.refined_by = Some(Box::new(selector.into()));
        self
    }
}

/// A pair of character offsets into the logical concatenation of the scope's
/// chunk contents, measured in UTF-16 code units. Offset `0` is the first
/// character of the scope's first chunk; the span is half-open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPositionSelector {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_by: Option<Box<Selector>>,
}

impl TextPositionSelector {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            refined_by: None,
        }
    }

    pub fn refined_by(mut self, selector: impl Into<Selector>) -> Self {
        self.refined_by = Some(Box::new(selector.into()));
        self
    }
}

/// A structural range whose start and end are each located by a further
/// selector of any kind. The range runs from the beginning of what the
/// start selector matches to the beginning of what the end selector matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSelector {
    pub start_selector: Box<Selector>,
    pub end_selector: Box<Selector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_by: Option<Box<Selector>>,
}

impl RangeSelector {
    pub fn new(start: impl Into<Selector>, end: impl Into<Selector>) -> Self {
        Self {
            start_selector: Box::new(start.into()),
            end_selector: Box::new(end.into()),
            refined_by: None,
        }
    }

    pub fn refined_by(mut self, selector: impl Into<Selector>) -> Self {
        self.refined_by = Some(Box::new(selector.into()));
        self
    }
}

impl From<CssSelector> for Selector {
    fn from(selector: CssSelector) -> Self {
        Selector::CssSelector(selector)
    }
}

impl From<TextQuoteSelector> for Selector {
    fn from(selector: TextQuoteSelector) -> Self {
        Selector::TextQuoteSelector(selector)
    }
}

impl From<TextPositionSelector> for Selector {
    fn from(selector: TextPositionSelector) -> Self {
        Selector::TextPositionSelector(selector)
    }
}

impl From<RangeSelector> for Selector {
    fn from(selector: RangeSelector) -> Self {
        Selector::RangeSelector(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinement_chain_is_reachable_through_any_variant() {
        let selector: Selector = TextQuoteSelector::new("annotated world")
            .refined_by(TextQuoteSelector::new("tat"))
            .into();
        let refined = selector.refined_by().unwrap();
        assert_eq!(refined.kind(), "TextQuoteSelector");
        assert!(refined.refined_by().is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let selector: Selector = RangeSelector::new(
            TextQuoteSelector::new("ann"),
            TextPositionSelector::new(3, 7),
        )
        .into();
        let json = serde_json::to_value(&selector).unwrap();
        assert_eq!(json["type"], "RangeSelector");
        assert_eq!(json["startSelector"]["type"], "TextQuoteSelector");
        assert_eq!(json["endSelector"]["start"], 3);
        assert!(json.get("refinedBy").is_none());
    }
}
