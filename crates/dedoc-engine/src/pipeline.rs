use dedoc_config::{LevelStrategy, StructureSettings};

use crate::error::{DedocError, Result};
use crate::extraction::{HierarchyLevelStrategy, PatternLevelExtractor, TagLevelExtractor};
use crate::models::{DocumentContent, UnstructuredDocument};
use crate::structure::{StructureConstructorComposition, TablePatcher};

/// Reader output in, structured document out.
///
/// Stages run in order: level assignment, table insertion (optional), then
/// the structure constructor, which patches lists itself. Each call owns
/// its document, so one pipeline can serve any number of documents.
pub struct StructurePipeline {
    strategy: Box<dyn HierarchyLevelStrategy>,
    insert_table: bool,
    structure_type: Option<String>,
    constructors: StructureConstructorComposition,
}

impl StructurePipeline {
    pub fn new(strategy: Box<dyn HierarchyLevelStrategy>) -> Self {
        Self {
            strategy,
            insert_table: false,
            structure_type: None,
            constructors: StructureConstructorComposition::default(),
        }
    }

    pub fn from_settings(settings: &StructureSettings) -> Self {
        let strategy: Box<dyn HierarchyLevelStrategy> = match settings.level_strategy {
            LevelStrategy::Patterns => Box::new(PatternLevelExtractor::new()),
            LevelStrategy::Tags => Box::new(TagLevelExtractor::new()),
        };
        log::debug!("Level strategy {:?}", settings.level_strategy);

        Self::new(strategy)
            .with_insert_table(settings.insert_table)
            .with_structure_type(settings.structure_type.clone())
    }

    #[must_use]
    pub fn with_insert_table(mut self, insert_table: bool) -> Self {
        self.insert_table = insert_table;
        self
    }

    #[must_use]
    pub fn with_structure_type(mut self, structure_type: impl Into<String>) -> Self {
        let structure_type = structure_type.into();
        self.structure_type = (!structure_type.is_empty()).then_some(structure_type);
        self
    }

    #[must_use]
    pub fn with_constructors(mut self, constructors: StructureConstructorComposition) -> Self {
        self.constructors = constructors;
        self
    }

    pub fn run(&self, mut document: UnstructuredDocument) -> Result<DocumentContent> {
        let line_count = document.lines.len();
        document.lines = self
            .strategy
            .assign(std::mem::take(&mut document.lines))
            .map_err(|e| stage_error("level assignment", e))?;
        log::debug!("Assigned levels to {line_count} lines");

        if self.insert_table {
            document = TablePatcher::insert_table(document);
        }

        self.constructors
            .construct(document, self.structure_type.as_deref())
            .map_err(|e| stage_error("structure construction", e))
    }
}

impl Default for StructurePipeline {
    fn default() -> Self {
        Self::from_settings(&StructureSettings::default())
    }
}

/// Names the failing stage unless the error already does.
fn stage_error(stage: &'static str, error: DedocError) -> DedocError {
    match error {
        DedocError::Structure { .. } | DedocError::UnknownStructureType { .. } => error,
        other => DedocError::Structure {
            stage,
            line: "document".to_string(),
            reason: other.to_string(),
        },
    }
}
