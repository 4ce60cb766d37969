use regex::Regex;
use std::ops::{Add, Range};

use super::hierarchy_level::HierarchyLevel;
use super::metadata::LineMetadata;
use crate::annotations::{Annotation, AnnotationMerger};
use crate::error::{DedocError, Result};
use crate::text;

/// A physical text unit with its metadata and character annotations.
///
/// Offsets of annotations are character offsets into [`LineWithMeta::line`].
#[derive(Debug, Clone)]
pub struct LineWithMeta {
    line: String,
    metadata: LineMetadata,
    annotations: Vec<Annotation>,
    uid: String,
}

impl LineWithMeta {
    /// Creates a line with a fresh random uid.
    pub fn new(line: impl Into<String>, metadata: LineMetadata, annotations: Vec<Annotation>) -> Self {
        Self {
            line: line.into(),
            metadata,
            annotations,
            uid: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// A line with default metadata and no annotations.
    pub fn from_text(line: impl Into<String>) -> Self {
        Self::new(line, LineMetadata::default(), Vec::new())
    }

    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: HierarchyLevel) -> Self {
        self.metadata.hierarchy_level = Some(level);
        self
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        text::char_len(&self.line)
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn metadata(&self) -> &LineMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut LineMetadata {
        &mut self.metadata
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Vec<Annotation> {
        &mut self.annotations
    }

    pub fn hierarchy_level(&self) -> Option<&HierarchyLevel> {
        self.metadata.hierarchy_level.as_ref()
    }

    pub fn set_hierarchy_level(&mut self, level: HierarchyLevel) {
        self.metadata.hierarchy_level = Some(level);
    }

    /// The sub-line `[range.start, range.end)` with re-based annotations.
    ///
    /// Annotations are clipped to the window; those not overlapping it are
    /// dropped. Bounds are never clamped.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        let Range { start, end: stop } = range;
        let len = self.len();
        if start > stop || stop > len {
            return Err(DedocError::SliceOutOfRange { start, stop, len });
        }

        let annotations = self
            .annotations
            .iter()
            .filter(|a| a.start() < stop && a.end() > start)
            .map(|a| a.with_span(a.start().max(start) - start, a.end().min(stop) - start))
            .collect();

        Ok(Self {
            line: text::char_slice(&self.line, start, stop).to_string(),
            metadata: self.metadata.clone(),
            annotations,
            uid: self.uid.clone(),
        })
    }

    /// Slicing with an explicit step. Only a step of 1 is supported.
    pub fn slice_by(&self, range: Range<usize>, step: isize) -> Result<Self> {
        if step != 1 {
            return Err(DedocError::UnsupportedSlice { step });
        }
        self.slice(range)
    }

    /// One character as a line. Negative indices count from the end.
    pub fn char_at(&self, index: isize) -> Result<Self> {
        let len = self.len();
        let signed_len = len as isize;
        if len == 0 || index >= signed_len || index < -signed_len {
            return Err(DedocError::IndexOutOfRange { index, len });
        }
        let index = index.rem_euclid(signed_len) as usize;
        self.slice(index..index + 1)
    }

    /// Splits after every match of `separator`.
    ///
    /// Each piece keeps this line's metadata and uid. A line without
    /// matches comes back as a single piece.
    pub fn split(&self, separator: &Regex) -> Result<Vec<Self>> {
        let len = self.len();
        let mut borders: Vec<usize> = text::match_spans(&self.line, separator)
            .into_iter()
            .map(|span| span.end)
            .collect();
        borders.push(0);
        borders.push(len);
        borders.sort_unstable();
        borders.dedup();

        if borders.len() <= 2 {
            return Ok(vec![self.clone()]);
        }
        borders
            .windows(2)
            .map(|pair| self.slice(pair[0]..pair[1]))
            .collect()
    }

    /// Appends `other`, re-basing its annotations and merging the result.
    ///
    /// Metadata and uid stay those of `self`.
    pub fn concat(&self, other: &LineWithMeta) -> Self {
        if other.line.is_empty() {
            return self.clone();
        }
        let offset = self.len();
        let line = format!("{}{}", self.line, other.line);
        let annotations: Vec<Annotation> = self
            .annotations
            .iter()
            .cloned()
            .chain(other.annotations.iter().map(|a| a.shifted(offset)))
            .collect();

        Self {
            annotations: AnnotationMerger::merge(&annotations, &line),
            line,
            metadata: self.metadata.clone(),
            uid: self.uid.clone(),
        }
    }

    /// Appends plain text. Annotations are left as they are.
    pub fn append_text(&self, suffix: &str) -> Self {
        let mut out = self.clone();
        out.line.push_str(suffix);
        out
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "text": self.line,
            "annotations": self.annotations.iter().map(Annotation::to_dict).collect::<Vec<_>>(),
        })
    }
}

impl Add<&LineWithMeta> for LineWithMeta {
    type Output = LineWithMeta;

    fn add(self, other: &LineWithMeta) -> LineWithMeta {
        self.concat(other)
    }
}

impl Add<&str> for LineWithMeta {
    type Output = LineWithMeta;

    fn add(self, other: &str) -> LineWithMeta {
        self.append_text(other)
    }
}
