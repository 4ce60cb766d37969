use std::path::PathBuf;

use super::line::LineWithMeta;
use super::table::Table;
use super::tree::DocumentTree;

/// A file embedded in the source document.
#[derive(Debug, Clone)]
pub struct AttachedFile {
    pub uid: String,
    pub original_name: String,
    pub tmp_file_path: PathBuf,
    pub need_content_analysis: bool,
}

/// Reader output: a flat, ordered line stream plus out-of-band tables.
#[derive(Debug, Clone, Default)]
pub struct UnstructuredDocument {
    pub lines: Vec<LineWithMeta>,
    pub tables: Vec<Table>,
    pub attachments: Vec<AttachedFile>,
    pub warnings: Vec<String>,
}

impl UnstructuredDocument {
    pub fn new(lines: Vec<LineWithMeta>, tables: Vec<Table>) -> Self {
        Self {
            lines,
            tables,
            ..Self::default()
        }
    }

    pub fn table(&self, uid: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.uid() == uid)
    }
}

/// Structured result: the document tree and the tables it references.
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub tables: Vec<Table>,
    pub structure: DocumentTree,
    pub warnings: Vec<String>,
}

impl DocumentContent {
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "structure": self.structure.to_dict(),
            "tables": self.tables.iter().map(Table::to_dict).collect::<Vec<_>>(),
            "warnings": self.warnings,
        })
    }
}
