/// Errors raised by the structuring core.
///
/// Everything here is synchronous and local to one document: callers that
/// process batches record the error against the document and move on.
#[derive(Debug, thiserror::Error)]
pub enum DedocError {
    #[error("Invalid hierarchy level: {reason}")]
    InvalidHierarchyLevel { reason: String },

    #[error("Invalid {name} annotation: {reason}")]
    InvalidAnnotation { name: String, reason: String },

    #[error("Slice [{start}:{stop}] out of range for line of length {len}")]
    SliceOutOfRange { start: usize, stop: usize, len: usize },

    #[error("Index {index} out of range for line of length {len}")]
    IndexOutOfRange { index: isize, len: usize },

    #[error("Slicing with step {step} is not implemented")]
    UnsupportedSlice { step: isize },

    #[error("Invalid table: {reason}")]
    InvalidTable { reason: String },

    #[error("{stage} failed on {line}: {reason}")]
    Structure {
        stage: &'static str,
        line: String,
        reason: String,
    },

    #[error("Bad structure type {requested}, available structure types is: {available}")]
    UnknownStructureType { requested: String, available: String },

    #[error("Line type classifier failed: {0}")]
    Classifier(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DedocError {
    pub(crate) fn annotation(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAnnotation {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn hierarchy(reason: impl Into<String>) -> Self {
        Self::InvalidHierarchyLevel {
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = DedocError> = std::result::Result<T, E>;
