//! Character-level annotations over line text.
//!
//! An [`Annotation`] labels a half-open character range `[start, end)` of a
//! line with a kind and a string value. Kinds form a closed set; each kind
//! validates its own value format when an annotation is built or decoded.
//!
//! ## Modules
//!
//! - [`bbox`]: pixel boxes and their relative JSON encoding
//! - [`merger`]: coalescing of same-valued spans and the contradiction filter

pub mod bbox;
pub mod merger;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{DedocError, Result};
use crate::text::Span;

pub use bbox::{BBox, RelativeBBox};
pub use merger::AnnotationMerger;

/// The closed set of annotation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationKind {
    Bold,
    Italic,
    Underlined,
    Size,
    BBox,
    Confidence,
    Alignment,
    Indentation,
    Spacing,
    Strike,
    Style,
    Subscript,
    Superscript,
    Table,
    Attachment,
    LinkedText,
    Color,
    Reference,
}

const ALIGNMENTS: [&str; 4] = ["left", "right", "center", "both"];

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 18] = [
        Self::Bold,
        Self::Italic,
        Self::Underlined,
        Self::Size,
        Self::BBox,
        Self::Confidence,
        Self::Alignment,
        Self::Indentation,
        Self::Spacing,
        Self::Strike,
        Self::Style,
        Self::Subscript,
        Self::Superscript,
        Self::Table,
        Self::Attachment,
        Self::LinkedText,
        Self::Color,
        Self::Reference,
    ];

    /// Wire name used in `{start, end, name, value}` dictionaries.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underlined => "underlined",
            Self::Size => "size",
            Self::BBox => "bounding box",
            Self::Confidence => "confidence",
            Self::Alignment => "alignment",
            Self::Indentation => "indentation",
            Self::Spacing => "spacing",
            Self::Strike => "strike",
            Self::Style => "style",
            Self::Subscript => "subscript",
            Self::Superscript => "superscript",
            Self::Table => "table",
            Self::Attachment => "attachment",
            Self::LinkedText => "linked_text",
            Self::Color => "color_annotation",
            Self::Reference => "reference",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether adjacent equal-valued spans of this kind may be coalesced.
    ///
    /// Per-span payloads (confidence, boxes, references) never are.
    pub fn is_mergeable(self) -> bool {
        !matches!(
            self,
            Self::Confidence
                | Self::BBox
                | Self::Table
                | Self::Attachment
                | Self::LinkedText
                | Self::Reference
        )
    }

    fn is_flag(self) -> bool {
        matches!(
            self,
            Self::Bold
                | Self::Italic
                | Self::Underlined
                | Self::Strike
                | Self::Subscript
                | Self::Superscript
        )
    }

    /// Checks `value` against this kind's value format.
    pub fn validate(self, value: &str) -> Result<()> {
        let fail = |reason: String| Err(DedocError::annotation(self.name(), reason));

        if self.is_flag() {
            return match value {
                "True" | "False" => Ok(()),
                _ => fail(format!("value should be \"True\" or \"False\", got {value:?}")),
            };
        }

        match self {
            Self::Size => match value.parse::<f64>() {
                Ok(size) if size.is_finite() && size >= 0.0 => Ok(()),
                _ => fail(format!("value should be a non-negative number, got {value:?}")),
            },
            Self::Indentation => match value.parse::<f64>() {
                Ok(indent) if indent.is_finite() => Ok(()),
                _ => fail(format!("value should be a number, got {value:?}")),
            },
            Self::Spacing => match value.parse::<u64>() {
                Ok(_) => Ok(()),
                Err(_) => fail(format!("value should be a non-negative integer, got {value:?}")),
            },
            Self::Confidence => match value.parse::<f64>() {
                Ok(confidence) if (0.0..=100.0).contains(&confidence) => Ok(()),
                _ => fail(format!("value should be a number in [0, 100], got {value:?}")),
            },
            Self::Alignment if ALIGNMENTS.contains(&value) => Ok(()),
            Self::Alignment => fail(format!(
                "value should be one of {}, got {value:?}",
                ALIGNMENTS.join(", ")
            )),
            Self::BBox => match serde_json::from_str::<RelativeBBox>(value) {
                Ok(_) => Ok(()),
                Err(err) => fail(format!("value should be a relative box JSON: {err}")),
            },
            Self::Color => match serde_json::from_str::<Rgb>(value) {
                Ok(rgb) if rgb.in_range() => Ok(()),
                Ok(_) => fail("color components should be in [0, 255]".to_string()),
                Err(err) => fail(format!("value should be an RGB JSON: {err}")),
            },
            Self::Table | Self::Attachment | Self::Reference if value.is_empty() => {
                fail("referenced uid should not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Rgb {
    red: f64,
    green: f64,
    blue: f64,
}

impl Rgb {
    fn in_range(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|c| (0.0..=255.0).contains(c))
    }
}

/// A labeled character range `[start, end)` of a line.
///
/// Equality and hashing consider `(name, value, start, end)` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "AnnotationRecord", into = "AnnotationRecord")]
pub struct Annotation {
    kind: AnnotationKind,
    start: usize,
    end: usize,
    value: String,
    is_mergeable: bool,
}

impl Annotation {
    /// Builds a validated annotation with the kind's default mergeability.
    pub fn new(kind: AnnotationKind, start: usize, end: usize, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if start > end {
            return Err(DedocError::annotation(
                kind.name(),
                format!("start {start} is after end {end}"),
            ));
        }
        kind.validate(&value)?;
        Ok(Self {
            kind,
            start,
            end,
            value,
            is_mergeable: kind.is_mergeable(),
        })
    }

    pub fn flag(kind: AnnotationKind, start: usize, end: usize, on: bool) -> Result<Self> {
        Self::new(kind, start, end, if on { "True" } else { "False" })
    }

    pub fn bold(start: usize, end: usize) -> Result<Self> {
        Self::flag(AnnotationKind::Bold, start, end, true)
    }

    pub fn italic(start: usize, end: usize) -> Result<Self> {
        Self::flag(AnnotationKind::Italic, start, end, true)
    }

    pub fn size(start: usize, end: usize, size: f64) -> Result<Self> {
        Self::new(AnnotationKind::Size, start, end, size.to_string())
    }

    pub fn confidence(start: usize, end: usize, confidence: f64) -> Result<Self> {
        Self::new(AnnotationKind::Confidence, start, end, confidence.to_string())
    }

    pub fn table(start: usize, end: usize, uid: impl Into<String>) -> Result<Self> {
        Self::new(AnnotationKind::Table, start, end, uid)
    }

    pub fn attachment(start: usize, end: usize, uid: impl Into<String>) -> Result<Self> {
        Self::new(AnnotationKind::Attachment, start, end, uid)
    }

    pub fn bbox(start: usize, end: usize, bbox: &BBox, page_width: u32, page_height: u32) -> Result<Self> {
        let value = bbox.to_relative_json(page_width, page_height)?;
        Self::new(AnnotationKind::BBox, start, end, value)
    }

    pub fn color(start: usize, end: usize, red: f64, green: f64, blue: f64) -> Result<Self> {
        let value = bbox::to_wire_json(&Rgb { red, green, blue })?;
        Self::new(AnnotationKind::Color, start, end, value)
    }

    /// Overrides the kind's default mergeability.
    #[must_use]
    pub fn with_mergeable(mut self, is_mergeable: bool) -> Self {
        self.is_mergeable = is_mergeable;
        self
    }

    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_mergeable(&self) -> bool {
        self.is_mergeable
    }

    /// Same label over other bounds. Callers keep `start <= end`.
    pub(crate) fn with_span(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted annotation span {start}..{end}");
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    pub(crate) fn shifted(&self, offset: usize) -> Self {
        self.with_span(self.start + offset, self.end + offset)
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "start": self.start,
            "end": self.end,
            "name": self.name(),
            "value": self.value,
        })
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.value == other.value
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Annotation {}

impl Hash for Annotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.value.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{}, {})", self.name(), self.start, self.end, self.value)
    }
}

/// Dictionary form `{start, end, name, value}`.
///
/// Bounds are signed so that negative input is reported as an annotation
/// error rather than a generic decode failure.
#[derive(Debug, Serialize, Deserialize)]
struct AnnotationRecord {
    start: i64,
    end: i64,
    name: String,
    value: String,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = DedocError;

    fn try_from(record: AnnotationRecord) -> Result<Self> {
        let kind = AnnotationKind::from_name(&record.name)
            .ok_or_else(|| DedocError::annotation(&record.name, "unknown annotation name"))?;
        let bound = |value: i64| {
            usize::try_from(value).map_err(|_| {
                DedocError::annotation(kind.name(), format!("negative bound {value}"))
            })
        };
        Annotation::new(kind, bound(record.start)?, bound(record.end)?, record.value)
    }
}

impl From<Annotation> for AnnotationRecord {
    fn from(annotation: Annotation) -> Self {
        Self {
            start: annotation.start as i64,
            end: annotation.end as i64,
            name: annotation.kind.name().to_string(),
            value: annotation.value,
        }
    }
}
