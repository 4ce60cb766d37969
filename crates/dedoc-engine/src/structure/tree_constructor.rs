use super::{StructureConstructor, list_patcher::ListPatcher, split_document_name};
use crate::error::{DedocError, Result};
use crate::models::{DocumentContent, DocumentTree, HierarchyLevel, UnstructuredDocument};

/// Builds the document outline from the line levels.
///
/// Lines at `(0, 0)` become the root text. Every other line either
/// continues the current node (same level and type, multiline allowed) or
/// climbs up to the first ancestor with a lower level and becomes its last
/// child.
///
/// ```text
/// root (0, 0)
/// ├── chapter (1, 0)
/// │   ├── article (2, 0)
/// │   │   └── item (2, 1)
/// │   └── article (2, 0)
/// └── chapter (1, 0)
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeConstructor;

impl StructureConstructor for TreeConstructor {
    fn construct(&self, document: UnstructuredDocument) -> Result<DocumentContent> {
        let UnstructuredDocument {
            lines,
            tables,
            warnings,
            ..
        } = document;

        let (title, body) = split_document_name(lines);
        let body = ListPatcher::patch(body);

        let mut tree = DocumentTree::new(&title);
        let mut cursor = tree.root();
        let raw_text = HierarchyLevel::raw_text();

        for line in &body {
            let level = line.hierarchy_level().unwrap_or(&raw_text);

            let current = tree[cursor].hierarchy_level();
            if level.can_be_multiline()
                && level == current
                && level.paragraph_type() == current.paragraph_type()
            {
                tree.add_text(cursor, line);
                continue;
            }

            while tree[cursor].hierarchy_level() >= level {
                cursor = tree.parent(cursor).ok_or_else(|| DedocError::Structure {
                    stage: "tree construction",
                    line: format!("line {:?}", line.line()),
                    reason: format!("level {level} does not fit under the document root"),
                })?;
            }
            cursor = tree.add_child(cursor, line);
        }

        tree.merge_annotations();
        log::debug!(
            "Built tree of {} nodes from {} title and {} body lines",
            tree.node_count(),
            title.len(),
            body.len()
        );

        Ok(DocumentContent {
            tables,
            structure: tree,
            warnings,
        })
    }
}
