use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::hierarchy_level::{HierarchyLevel, ParagraphType};

/// Value stored in a line's extra metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl ExtraValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for ExtraValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ExtraValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ExtraValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ExtraValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Per-line metadata filled by readers and level extractors.
#[derive(Debug, Clone, Default)]
pub struct LineMetadata {
    pub page_id: u32,
    pub line_id: Option<u32>,
    /// Resolved level. `None` until an extraction strategy has run.
    pub hierarchy_level: Option<HierarchyLevel>,
    /// Level suggested by source markup (styles, numbering, tags).
    pub tag_hierarchy_level: Option<HierarchyLevel>,
    pub predicted_classes: Option<BTreeMap<String, f64>>,
    other_fields: BTreeMap<String, ExtraValue>,
}

impl LineMetadata {
    pub fn new(page_id: u32, line_id: Option<u32>) -> Self {
        Self {
            page_id,
            line_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: HierarchyLevel) -> Self {
        self.hierarchy_level = Some(level);
        self
    }

    #[must_use]
    pub fn with_tag_level(mut self, level: HierarchyLevel) -> Self {
        self.tag_hierarchy_level = Some(level);
        self
    }

    /// Type of the resolved level, `raw_text` when there is none yet.
    pub fn paragraph_type(&self) -> ParagraphType {
        self.hierarchy_level
            .as_ref()
            .map_or(ParagraphType::RawText, |level| level.paragraph_type().clone())
    }

    pub fn other_fields(&self) -> &BTreeMap<String, ExtraValue> {
        &self.other_fields
    }

    pub fn field(&self, name: &str) -> Option<&ExtraValue> {
        self.other_fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<ExtraValue>) {
        self.other_fields.insert(name.into(), value.into());
    }

    /// Later values win on key clashes.
    pub fn extend_other_fields<I, K, V>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ExtraValue>,
    {
        self.other_fields
            .extend(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Flat dictionary: the fixed keys plus every extra field.
    ///
    /// Fixed keys take precedence over extra fields of the same name.
    pub fn to_dict(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut dict: serde_json::Map<String, serde_json::Value> = self
            .other_fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::json!(v)))
            .collect();
        dict.insert(
            "paragraph_type".to_string(),
            serde_json::json!(self.paragraph_type().as_str()),
        );
        dict.insert("page_id".to_string(), serde_json::json!(self.page_id));
        dict.insert("line_id".to_string(), serde_json::json!(self.line_id));
        if let Some(classes) = &self.predicted_classes {
            dict.insert("predicted_classes".to_string(), serde_json::json!(classes));
        }
        dict
    }
}
