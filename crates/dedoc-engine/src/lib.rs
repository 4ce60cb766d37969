pub mod annotations;
pub mod error;
pub mod extraction;
pub mod models;
pub mod pipeline;
pub mod snapshot;
pub mod structure;
pub mod text;

// Re-export key types for easier usage
pub use annotations::{Annotation, AnnotationKind, AnnotationMerger, BBox};
pub use error::{DedocError, Result};
pub use extraction::HierarchyLevelStrategy;
pub use models::*;
pub use pipeline::StructurePipeline;
pub use structure::{StructureConstructor, StructureConstructorComposition, TablePatcher};
