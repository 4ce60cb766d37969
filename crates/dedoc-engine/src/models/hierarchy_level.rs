use std::cmp::Ordering;
use std::fmt;

use crate::error::{DedocError, Result};

/// Paragraph type tag carried by every hierarchy level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParagraphType {
    Root,
    Header,
    NamedHeader,
    StyleHeader,
    Toc,
    TocItem,
    List,
    ListItem,
    BulletListItem,
    Paragraph,
    RawText,
    Footer,
    PageId,
    Table,
    TableRow,
    TableCell,
    Unknown,
    /// Reader-specific type outside the common vocabulary.
    Other(String),
}

impl ParagraphType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Header => "header",
            Self::NamedHeader => "named_header",
            Self::StyleHeader => "style_header",
            Self::Toc => "toc",
            Self::TocItem => "toc_item",
            Self::List => "list",
            Self::ListItem => "list_item",
            Self::BulletListItem => "bullet_list_item",
            Self::Paragraph => "paragraph",
            Self::RawText => "raw_text",
            Self::Footer => "footer",
            Self::PageId => "page_id",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::TableCell => "table_cell",
            Self::Unknown => "unknown",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for ParagraphType {
    fn from(name: &str) -> Self {
        match name {
            "root" => Self::Root,
            "header" => Self::Header,
            "named_header" => Self::NamedHeader,
            "style_header" => Self::StyleHeader,
            "toc" => Self::Toc,
            "toc_item" => Self::TocItem,
            "list" => Self::List,
            "list_item" => Self::ListItem,
            "bullet_list_item" => Self::BulletListItem,
            "paragraph" => Self::Paragraph,
            "raw_text" => Self::RawText,
            "footer" => Self::Footer,
            "page_id" => Self::PageId,
            "table" => Self::Table,
            "table_row" => Self::TableRow,
            "table_cell" => Self::TableCell,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ParagraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Rank {
    Placeholder,
    Item,
}

/// Second component of a hierarchy level.
///
/// A placeholder sorts strictly between `value - 1` and `value`, which lets
/// the list patcher splice an ancestor in front of an item without
/// renumbering anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubLevel {
    value: u32,
    rank: Rank,
}

impl SubLevel {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            rank: Rank::Item,
        }
    }

    pub fn placeholder_before(value: u32) -> Self {
        Self {
            value,
            rank: Rank::Placeholder,
        }
    }

    pub fn value(self) -> u32 {
        self.value
    }

    pub fn is_placeholder(self) -> bool {
        self.rank == Rank::Placeholder
    }
}

impl fmt::Display for SubLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::Item => write!(f, "{}", self.value),
            Rank::Placeholder => write!(f, "{}", f64::from(self.value) - 0.5),
        }
    }
}

/// Position of a line in the document outline.
///
/// Levels compare by `(level_1, level_2)` when both are defined. Levels
/// without numbers (raw text, unknown) never compare as less than anything,
/// and defined levels are less than undefined ones. Equality holds for equal
/// defined pairs, and between two raw text or two unknown levels.
///
/// `partial_cmp` answers "less" first, then "equal", then "greater", so
/// `a >= b` is exactly `!(a < b)`. The one asymmetric case is two raw text
/// levels carrying different numbers: the lower one is less than the
/// higher, while the higher one reports equal.
#[derive(Debug, Clone)]
pub struct HierarchyLevel {
    level_1: Option<u32>,
    level_2: Option<SubLevel>,
    can_be_multiline: bool,
    paragraph_type: ParagraphType,
}

impl HierarchyLevel {
    pub fn new(
        level_1: u32,
        level_2: u32,
        can_be_multiline: bool,
        paragraph_type: impl Into<ParagraphType>,
    ) -> Self {
        Self {
            level_1: Some(level_1),
            level_2: Some(SubLevel::new(level_2)),
            can_be_multiline,
            paragraph_type: paragraph_type.into(),
        }
    }

    /// Checked constructor for levels coming from untrusted sources.
    pub fn try_new(
        level_1: Option<u32>,
        level_2: Option<u32>,
        can_be_multiline: bool,
        paragraph_type: impl Into<ParagraphType>,
    ) -> Result<Self> {
        let paragraph_type = paragraph_type.into();
        match (level_1, level_2) {
            (Some(l1), Some(l2)) => Ok(Self::new(l1, l2, can_be_multiline, paragraph_type)),
            (None, None)
                if matches!(paragraph_type, ParagraphType::RawText | ParagraphType::Unknown) =>
            {
                Ok(Self {
                    level_1: None,
                    level_2: None,
                    can_be_multiline,
                    paragraph_type,
                })
            }
            _ => Err(DedocError::hierarchy(format!(
                "{paragraph_type} requires both levels, got ({level_1:?}, {level_2:?})"
            ))),
        }
    }

    pub fn root() -> Self {
        Self::new(0, 0, true, ParagraphType::Root)
    }

    pub fn raw_text() -> Self {
        Self {
            level_1: None,
            level_2: None,
            can_be_multiline: true,
            paragraph_type: ParagraphType::RawText,
        }
    }

    pub fn unknown() -> Self {
        Self {
            level_1: None,
            level_2: None,
            can_be_multiline: true,
            paragraph_type: ParagraphType::Unknown,
        }
    }

    /// Synthetic list ancestor sorting right before this level.
    pub fn list_placeholder(&self) -> Option<Self> {
        let (level_1, level_2) = self.key()?;
        Some(Self {
            level_1: Some(level_1),
            level_2: Some(SubLevel::placeholder_before(level_2.value())),
            can_be_multiline: false,
            paragraph_type: ParagraphType::List,
        })
    }

    /// Same flags and type under new numbers.
    #[must_use]
    pub fn renumbered(&self, level_1: u32, level_2: u32) -> Self {
        Self::new(
            level_1,
            level_2,
            self.can_be_multiline,
            self.paragraph_type.clone(),
        )
    }

    pub fn level_1(&self) -> Option<u32> {
        self.level_1
    }

    pub fn level_2(&self) -> Option<SubLevel> {
        self.level_2
    }

    pub fn can_be_multiline(&self) -> bool {
        self.can_be_multiline
    }

    pub fn paragraph_type(&self) -> &ParagraphType {
        &self.paragraph_type
    }

    pub fn key(&self) -> Option<(u32, SubLevel)> {
        Some((self.level_1?, self.level_2?))
    }

    pub fn is_defined(&self) -> bool {
        self.key().is_some()
    }

    pub fn is_raw_text(&self) -> bool {
        self.paragraph_type == ParagraphType::RawText
    }

    pub fn is_unknown(&self) -> bool {
        self.paragraph_type == ParagraphType::Unknown
    }

    pub fn is_list_item(&self) -> bool {
        self.paragraph_type == ParagraphType::ListItem
    }

    /// `(0, 0)`: the line is part of the document name.
    pub fn is_document_name(&self) -> bool {
        self.key() == Some((0, SubLevel::new(0)))
    }

    fn precedes(&self, other: &Self) -> bool {
        match (self.key(), other.key()) {
            (Some(a), Some(b)) => a < b,
            (None, _) => false,
            (Some(_), None) => true,
        }
    }
}

impl PartialEq for HierarchyLevel {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.key(), other.key())
            && a == b
        {
            return true;
        }
        (self.is_raw_text() && other.is_raw_text()) || (self.is_unknown() && other.is_unknown())
    }
}

impl PartialOrd for HierarchyLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(if self.precedes(other) {
            Ordering::Less
        } else if self == other {
            Ordering::Equal
        } else {
            Ordering::Greater
        })
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some((l1, l2)) => write!(f, "({l1}, {l2}) {}", self.paragraph_type),
            None => write!(f, "(-, -) {}", self.paragraph_type),
        }
    }
}
