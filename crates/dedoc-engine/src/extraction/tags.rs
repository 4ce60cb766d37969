use super::HierarchyLevelStrategy;
use crate::error::Result;
use crate::models::{HierarchyLevel, LineWithMeta};

/// Trusts the level the reader derived from source markup.
///
/// Lines whose tag level is missing or unknown become raw text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagLevelExtractor;

impl TagLevelExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl HierarchyLevelStrategy for TagLevelExtractor {
    fn assign(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>> {
        Ok(lines
            .into_iter()
            .map(|mut line| {
                let level = match &line.metadata().tag_hierarchy_level {
                    Some(tag) if !tag.is_unknown() => tag.clone(),
                    _ => HierarchyLevel::raw_text(),
                };
                line.set_hierarchy_level(level);
                line
            })
            .collect())
    }
}
