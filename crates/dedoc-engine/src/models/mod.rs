//! Document data model.
//!
//! Readers produce an [`UnstructuredDocument`]: ordered [`LineWithMeta`]s
//! plus [`Table`]s referenced from lines by uid. Structuring turns it into a
//! [`DocumentContent`] whose [`DocumentTree`] is an arena of nodes.

pub mod document;
pub mod hierarchy_level;
pub mod line;
pub mod metadata;
pub mod table;
pub mod tree;

pub use document::{AttachedFile, DocumentContent, UnstructuredDocument};
pub use hierarchy_level::{HierarchyLevel, ParagraphType, SubLevel};
pub use line::LineWithMeta;
pub use metadata::{ExtraValue, LineMetadata};
pub use table::{Cell, Table, TableMetadata};
pub use tree::{DocumentTree, NodeId, PageSpan, TreeNode};
