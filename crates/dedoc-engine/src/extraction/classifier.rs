use super::HierarchyLevelStrategy;
use crate::error::{DedocError, Result};
use crate::models::LineWithMeta;

/// Opaque line-type model.
///
/// Implementations fill `hierarchy_level` and usually
/// `metadata.predicted_classes`. Output must be deterministic for identical
/// input; nothing else is assumed about how the labels are produced.
pub trait LineTypeClassifier {
    fn predict(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>>;
}

impl<F> LineTypeClassifier for F
where
    F: Fn(Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>>,
{
    fn predict(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>> {
        self(lines)
    }
}

/// Level assignment backed by a [`LineTypeClassifier`].
#[derive(Debug, Clone)]
pub struct ClassifierLevelExtractor<C> {
    classifier: C,
}

impl<C: LineTypeClassifier> ClassifierLevelExtractor<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }
}

impl<C: LineTypeClassifier> HierarchyLevelStrategy for ClassifierLevelExtractor<C> {
    fn assign(&self, lines: Vec<LineWithMeta>) -> Result<Vec<LineWithMeta>> {
        let expected = lines.len();
        let lines = self.classifier.predict(lines)?;

        if lines.len() != expected {
            return Err(DedocError::Classifier(format!(
                "returned {} lines for {expected} inputs",
                lines.len()
            )));
        }
        if let Some(line) = lines.iter().find(|l| l.hierarchy_level().is_none()) {
            log::warn!("Classifier left line {} without a hierarchy level", line.uid());
            return Err(DedocError::Classifier(format!(
                "line {:?} has no hierarchy level",
                line.line()
            )));
        }

        Ok(lines)
    }
}
