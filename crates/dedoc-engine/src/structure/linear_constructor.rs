use super::{StructureConstructor, split_document_name};
use crate::error::Result;
use crate::models::{DocumentContent, DocumentTree, UnstructuredDocument};

/// Flat structure: every line is a direct child of the root.
///
/// Title lines still become the root text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearConstructor;

impl StructureConstructor for LinearConstructor {
    fn construct(&self, document: UnstructuredDocument) -> Result<DocumentContent> {
        let (title, body) = split_document_name(document.lines);

        let mut tree = DocumentTree::new(&title);
        let root = tree.root();
        for line in &body {
            tree.add_child(root, line);
        }
        tree.merge_annotations();

        Ok(DocumentContent {
            tables: document.tables,
            structure: tree,
            warnings: document.warnings,
        })
    }
}
