//! Hierarchy level assignment.
//!
//! Structuring only needs every line to carry a [`HierarchyLevel`]; how it
//! got there is up to the [`HierarchyLevelStrategy`] picked for the
//! document type.
//!
//! ## Strategies
//!
//! - [`PatternLevelExtractor`]: numbered lists and named legal headers by regex
//! - [`TagLevelExtractor`]: levels suggested by the source markup
//! - [`ClassifierLevelExtractor`]: an opaque [`LineTypeClassifier`]
//!
//! [`HierarchyLevel`]: crate::models::HierarchyLevel

pub mod classifier;
pub mod patterns;
pub mod tags;

use crate::error::Result;
use crate::models::LineWithMeta;

pub use classifier::{ClassifierLevelExtractor, LineTypeClassifier};
pub use patterns::PatternLevelExtractor;
pub use tags::TagLevelExtractor;

/// Assigns a hierarchy level to every line, keeping the line order.
pub trait HierarchyLevelStrategy {
    fn assign(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>>;
}
