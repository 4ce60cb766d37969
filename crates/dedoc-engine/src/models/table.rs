use super::line::LineWithMeta;
use crate::annotations::Annotation;
use crate::error::{DedocError, Result};
use crate::text;

/// One grid position of a table.
#[derive(Debug, Clone)]
pub struct Cell {
    pub lines: Vec<LineWithMeta>,
    colspan: u32,
    rowspan: u32,
    /// Filler for a position covered by another cell's span.
    pub invisible: bool,
}

impl Cell {
    pub fn new(lines: Vec<LineWithMeta>) -> Self {
        Self {
            lines,
            colspan: 1,
            rowspan: 1,
            invisible: false,
        }
    }

    pub fn spanning(lines: Vec<LineWithMeta>, colspan: u32, rowspan: u32) -> Result<Self> {
        if colspan == 0 || rowspan == 0 {
            return Err(DedocError::InvalidTable {
                reason: format!("cell spans must be at least 1, got colspan={colspan} rowspan={rowspan}"),
            });
        }
        Ok(Self {
            colspan,
            rowspan,
            ..Self::new(lines)
        })
    }

    /// Filler cell for positions consumed by a spanning cell.
    pub fn invisible() -> Self {
        Self {
            invisible: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn colspan(&self) -> u32 {
        self.colspan
    }

    pub fn rowspan(&self) -> u32 {
        self.rowspan
    }

    /// Text of all lines, joined with newlines.
    pub fn get_text(&self) -> String {
        self.lines
            .iter()
            .map(LineWithMeta::line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Annotations of all lines, re-based onto [`Cell::get_text`].
    pub fn get_annotations(&self) -> Vec<Annotation> {
        let mut offset = 0;
        let mut annotations = Vec::new();
        for line in &self.lines {
            annotations.extend(line.annotations().iter().map(|a| a.shifted(offset)));
            offset += text::char_len(line.line()) + 1;
        }
        annotations
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "text": self.get_text(),
            "colspan": self.colspan,
            "rowspan": self.rowspan,
            "invisible": self.invisible,
            "annotations": self.get_annotations().iter().map(Annotation::to_dict).collect::<Vec<_>>(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableMetadata {
    pub uid: String,
    pub page_id: Option<u32>,
    pub rotated_angle: f64,
    pub title: String,
    /// Set once the table has been spliced into the line stream.
    pub is_inserted: bool,
}

impl TableMetadata {
    pub fn new(uid: impl Into<String>, page_id: Option<u32>) -> Self {
        Self {
            uid: uid.into(),
            page_id,
            ..Self::default()
        }
    }
}

/// A table owned by the document, referenced from lines by uid.
#[derive(Debug, Clone)]
pub struct Table {
    cells: Vec<Vec<Cell>>,
    pub metadata: TableMetadata,
}

impl Table {
    /// Builds a table whose rows all have the same number of cells.
    pub fn new(cells: Vec<Vec<Cell>>, metadata: TableMetadata) -> Result<Self> {
        if let Some(first) = cells.first()
            && let Some((row, bad)) = cells.iter().enumerate().find(|(_, r)| r.len() != first.len())
        {
            return Err(DedocError::InvalidTable {
                reason: format!(
                    "table {} row {row} has {} cells, expected {}",
                    metadata.uid,
                    bad.len(),
                    first.len()
                ),
            });
        }
        Ok(Self { cells, metadata })
    }

    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn uid(&self) -> &str {
        &self.metadata.uid
    }

    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "cells": self
                .cells
                .iter()
                .map(|row| row.iter().map(Cell::to_dict).collect::<Vec<_>>())
                .collect::<Vec<_>>(),
            "metadata": {
                "uid": self.metadata.uid,
                "page_id": self.metadata.page_id,
                "rotated_angle": self.metadata.rotated_angle,
                "title": self.metadata.title,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::metadata::LineMetadata;
    use pretty_assertions::assert_eq;

    fn cell(text: &str) -> Cell {
        Cell::new(vec![LineWithMeta::from_text(text)])
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let err = Table::new(
            vec![vec![cell("a"), cell("b")], vec![cell("c")]],
            TableMetadata::new("t1", Some(0)),
        )
        .unwrap_err();

        assert!(err.to_string().contains("row 1 has 1 cells, expected 2"));
    }

    #[test]
    fn test_spanning_cell_with_fillers() {
        let host = Cell::spanning(vec![LineWithMeta::from_text("wide")], 2, 1).unwrap();
        let table = Table::new(
            vec![vec![host, Cell::invisible()], vec![cell("a"), cell("b")]],
            TableMetadata::new("t1", Some(0)),
        )
        .unwrap();

        assert_eq!(table.cells()[0][0].colspan(), 2);
        assert!(table.cells()[0][1].invisible);
        assert!(Cell::spanning(Vec::new(), 0, 1).is_err());
    }

    #[test]
    fn test_cell_text_and_annotations_span_lines() {
        let cell = Cell::new(vec![
            LineWithMeta::from_text("first"),
            LineWithMeta::new("second", LineMetadata::default(), vec![Annotation::bold(0, 6).unwrap()]),
        ]);

        assert_eq!(cell.get_text(), "first\nsecond");
        let annotations = cell.get_annotations();
        assert_eq!((annotations[0].start(), annotations[0].end()), (6, 12));
    }

    #[test]
    fn test_to_dict() {
        let mut metadata = TableMetadata::new("t1", Some(2));
        metadata.title = "Prices".to_string();
        let table = Table::new(vec![vec![cell("x")]], metadata).unwrap();

        assert_eq!(
            table.to_dict(),
            serde_json::json!({
                "cells": [[{
                    "text": "x",
                    "colspan": 1,
                    "rowspan": 1,
                    "invisible": false,
                    "annotations": [],
                }]],
                "metadata": {"uid": "t1", "page_id": 2, "rotated_angle": 0.0, "title": "Prices"},
            })
        );
    }
}
