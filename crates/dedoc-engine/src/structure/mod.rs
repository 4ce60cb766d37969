//! Structure construction.
//!
//! Turns a levelled [`UnstructuredDocument`] into [`DocumentContent`].
//!
//! ## Components
//!
//! - [`TreeConstructor`]: nested outline following hierarchy levels
//! - [`LinearConstructor`]: every line directly under the root
//! - [`ListPatcher`]: synthetic `list` ancestors for list items
//! - [`TablePatcher`]: splices table rows and cells into the line stream
//! - [`StructureConstructorComposition`]: picks a constructor by name

pub mod linear_constructor;
pub mod list_patcher;
pub mod table_patcher;
pub mod tree_constructor;

use std::collections::BTreeMap;

use crate::error::{DedocError, Result};
use crate::models::{DocumentContent, LineWithMeta, UnstructuredDocument};

pub use linear_constructor::LinearConstructor;
pub use list_patcher::ListPatcher;
pub use table_patcher::TablePatcher;
pub use tree_constructor::TreeConstructor;

pub trait StructureConstructor {
    fn construct(&self, document: UnstructuredDocument) -> Result<DocumentContent>;
}

/// Structure constructors by structure type name.
pub struct StructureConstructorComposition {
    constructors: BTreeMap<String, Box<dyn StructureConstructor>>,
    default_constructor: Box<dyn StructureConstructor>,
}

impl StructureConstructorComposition {
    pub fn new(default_constructor: Box<dyn StructureConstructor>) -> Self {
        Self {
            constructors: BTreeMap::new(),
            default_constructor,
        }
    }

    #[must_use]
    pub fn with_constructor(
        mut self,
        structure_type: impl Into<String>,
        constructor: Box<dyn StructureConstructor>,
    ) -> Self {
        self.constructors.insert(structure_type.into(), constructor);
        self
    }

    /// Space-separated names of the registered structure types.
    pub fn available(&self) -> String {
        self.constructors
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Builds with the constructor registered for `structure_type`.
    ///
    /// An absent or empty type selects the default constructor.
    pub fn construct(
        &self,
        document: UnstructuredDocument,
        structure_type: Option<&str>,
    ) -> Result<DocumentContent> {
        match structure_type {
            Some(name) if self.constructors.contains_key(name) => {
                self.constructors[name].construct(document)
            }
            None | Some("") => self.default_constructor.construct(document),
            Some(name) => {
                log::warn!("Unknown structure type {name}");
                Err(DedocError::UnknownStructureType {
                    requested: name.to_string(),
                    available: self.available(),
                })
            }
        }
    }
}

impl Default for StructureConstructorComposition {
    fn default() -> Self {
        Self::new(Box::new(TreeConstructor))
            .with_constructor("linear", Box::new(LinearConstructor))
            .with_constructor("tree", Box::new(TreeConstructor))
    }
}

/// Separates `(0, 0)` lines, which name the document, from the body.
pub(crate) fn split_document_name(lines: Vec<LineWithMeta>) -> (Vec<LineWithMeta>, Vec<LineWithMeta>) {
    lines
        .into_iter()
        .partition(|line| line.hierarchy_level().is_some_and(|l| l.is_document_name()))
}
