use crate::annotations::AnnotationKind;
use crate::models::{
    HierarchyLevel, LineMetadata, LineWithMeta, ParagraphType, Table, UnstructuredDocument,
};

/// Copies tables into the line stream so they become tree nodes.
///
/// A table lands right after the first line that references it through a
/// table annotation; unreferenced tables go to the end. Raw text is pushed
/// below every structured level first so it can never become an ancestor
/// of a table. Tables already marked as inserted are skipped, which makes
/// patching twice a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct TablePatcher;

impl TablePatcher {
    pub fn insert_table(mut document: UnstructuredDocument) -> UnstructuredDocument {
        let max_level = document
            .lines
            .iter()
            .filter_map(LineWithMeta::hierarchy_level)
            .filter(|level| !level.is_raw_text() && !is_table_part(level))
            .filter_map(HierarchyLevel::level_1)
            .max()
            .unwrap_or(0);

        let lines = std::mem::take(&mut document.lines);
        let mut patched = Vec::with_capacity(lines.len());
        let mut inserted = 0usize;

        for mut line in lines {
            if line.hierarchy_level().is_none_or(HierarchyLevel::is_raw_text) {
                let level = line
                    .hierarchy_level()
                    .cloned()
                    .unwrap_or_else(HierarchyLevel::raw_text)
                    .renumbered(max_level + 1, 0);
                line.set_hierarchy_level(level);
            }

            let referenced: Vec<String> = line
                .annotations()
                .iter()
                .filter(|a| a.kind() == AnnotationKind::Table)
                .map(|a| a.value().to_string())
                .collect();
            patched.push(line);

            for uid in referenced {
                match document.tables.iter_mut().find(|t| t.uid() == uid) {
                    Some(table) if !table.metadata.is_inserted => {
                        patched.extend(table_lines(table, max_level));
                        inserted += 1;
                    }
                    Some(_) => {}
                    None => log::warn!("Line references unknown table {uid}"),
                }
            }
        }

        for table in document.tables.iter_mut().filter(|t| !t.metadata.is_inserted) {
            patched.extend(table_lines(table, max_level));
            inserted += 1;
        }

        log::debug!("Inserted {inserted} tables below level {max_level}");
        document.lines = patched;
        document
    }
}

/// Lines produced by an earlier patching pass.
fn is_table_part(level: &HierarchyLevel) -> bool {
    matches!(
        level.paragraph_type(),
        ParagraphType::Table | ParagraphType::TableRow | ParagraphType::TableCell
    )
}

/// Table node, then one row node per row with its cell nodes.
fn table_lines(table: &mut Table, max_level: u32) -> Vec<LineWithMeta> {
    table.metadata.is_inserted = true;
    let page_id = table.metadata.page_id.unwrap_or(0);
    let metadata = |level_1: u32, paragraph_type: ParagraphType| {
        LineMetadata::new(page_id, None).with_level(HierarchyLevel::new(level_1, 0, false, paragraph_type))
    };

    let mut lines = vec![
        LineWithMeta::new("", metadata(max_level + 2, ParagraphType::Table), Vec::new())
            .with_uid(format!("table_{}", table.uid())),
    ];
    for row in table.cells() {
        lines.push(LineWithMeta::new(
            "",
            metadata(max_level + 3, ParagraphType::TableRow),
            Vec::new(),
        ));
        lines.extend(row.iter().map(|cell| {
            LineWithMeta::new(
                cell.get_text(),
                metadata(max_level + 4, ParagraphType::TableCell),
                cell.get_annotations(),
            )
        }));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotation;
    use crate::models::{Cell, TableMetadata};
    use pretty_assertions::assert_eq;

    fn table(uid: &str) -> Table {
        let cells = vec![
            vec![Cell::new(vec![LineWithMeta::from_text("a")]), Cell::new(vec![LineWithMeta::from_text("b")])],
            vec![Cell::new(vec![LineWithMeta::from_text("c")]), Cell::new(vec![LineWithMeta::from_text("d")])],
        ];
        Table::new(cells, TableMetadata::new(uid, Some(2))).unwrap()
    }

    fn header(text: &str, l1: u32) -> LineWithMeta {
        LineWithMeta::from_text(text).with_level(HierarchyLevel::new(l1, 0, false, ParagraphType::Header))
    }

    fn anchor(text: &str, uid: &str) -> LineWithMeta {
        let annotation = Annotation::table(0, text.chars().count(), uid).unwrap();
        LineWithMeta::new(text, LineMetadata::default(), vec![annotation]).with_level(HierarchyLevel::raw_text())
    }

    fn describe(document: &UnstructuredDocument) -> Vec<String> {
        document
            .lines
            .iter()
            .map(|l| {
                let level = l.hierarchy_level().unwrap();
                let (l1, _) = level.key().unwrap();
                format!("{l1} {} {}", level.paragraph_type(), l.line())
            })
            .collect()
    }

    #[test]
    fn test_table_follows_anchor_line() {
        let document = UnstructuredDocument::new(
            vec![header("Chapter", 1), anchor("see table", "t1"), header("Next", 2)],
            vec![table("t1")],
        );

        let patched = TablePatcher::insert_table(document);

        assert_eq!(
            describe(&patched),
            vec![
                "1 header Chapter",
                "3 raw_text see table",
                "4 table ",
                "5 table_row ",
                "6 table_cell a",
                "6 table_cell b",
                "5 table_row ",
                "6 table_cell c",
                "6 table_cell d",
                "2 header Next",
            ]
        );
        assert!(patched.tables[0].metadata.is_inserted);
        assert_eq!(patched.lines[2].uid(), "table_t1");
        assert_eq!(patched.lines[2].metadata().page_id, 2);
        assert_eq!(patched.lines[2].metadata().line_id, None);
    }

    #[test]
    fn test_unreferenced_tables_are_appended_in_order() {
        let document = UnstructuredDocument::new(
            vec![header("Chapter", 1)],
            vec![table("first"), table("second")],
        );

        let patched = TablePatcher::insert_table(document);

        let uids: Vec<_> = patched
            .lines
            .iter()
            .filter(|l| l.uid().starts_with("table_"))
            .map(LineWithMeta::uid)
            .collect();
        assert_eq!(uids, vec!["table_first", "table_second"]);
        assert_eq!(patched.lines.len(), 1 + 2 * 7);
    }

    #[test]
    fn test_raw_text_without_structure_goes_to_level_one() {
        let document = UnstructuredDocument::new(vec![LineWithMeta::from_text("plain")], Vec::new());

        let patched = TablePatcher::insert_table(document);

        assert_eq!(describe(&patched), vec!["1 raw_text plain"]);
        assert!(patched.lines[0].hierarchy_level().unwrap().can_be_multiline());
    }

    #[test]
    fn test_unknown_uid_is_skipped() {
        let document = UnstructuredDocument::new(vec![anchor("dangling", "missing")], Vec::new());

        let patched = TablePatcher::insert_table(document);

        assert_eq!(patched.lines.len(), 1);
    }

    #[test]
    fn test_second_reference_does_not_duplicate() {
        let document = UnstructuredDocument::new(
            vec![anchor("one", "t1"), anchor("two", "t1")],
            vec![table("t1")],
        );

        let patched = TablePatcher::insert_table(document);

        assert_eq!(patched.lines.len(), 2 + 7);
        assert_eq!(patched.lines[8].line(), "two");
    }

    #[test]
    fn test_patching_twice_is_idempotent() {
        let document = UnstructuredDocument::new(
            vec![header("Chapter", 1), anchor("see table", "t1")],
            vec![table("t1"), table("t2")],
        );

        let once = TablePatcher::insert_table(document);
        let count = once.lines.len();
        let twice = TablePatcher::insert_table(once);

        assert_eq!(twice.lines.len(), count);
    }

    #[test]
    fn test_patching_twice_keeps_the_tree() {
        use crate::snapshot;
        use crate::structure::{StructureConstructor, TreeConstructor};

        let document = || {
            UnstructuredDocument::new(
                vec![
                    header("Chapter", 1),
                    anchor("see table", "t1"),
                    LineWithMeta::from_text("after the table").with_level(HierarchyLevel::raw_text()),
                ],
                vec![table("t1")],
            )
        };
        let outline = |document: UnstructuredDocument| {
            let content = TreeConstructor.construct(document).unwrap();
            snapshot::render(&content.structure)
        };

        let once = TablePatcher::insert_table(document());
        let twice = TablePatcher::insert_table(TablePatcher::insert_table(document()));

        assert_eq!(describe(&twice), describe(&once));
        assert_eq!(outline(twice), outline(once));
    }

    #[test]
    fn test_cell_annotations_are_carried() {
        let bold_line = LineWithMeta::new("bold", LineMetadata::default(), vec![Annotation::bold(0, 4).unwrap()]);
        let cells = vec![vec![Cell::new(vec![LineWithMeta::from_text("x"), bold_line])]];
        let table = Table::new(cells, TableMetadata::new("t", None)).unwrap();

        let patched = TablePatcher::insert_table(UnstructuredDocument::new(Vec::new(), vec![table]));

        let cell = &patched.lines[2];
        assert_eq!(cell.line(), "x\nbold");
        let spans: Vec<_> = cell.annotations().iter().map(|a| (a.name(), a.start(), a.end())).collect();
        assert_eq!(spans, vec![("bold", 2, 6)]);
        assert_eq!(cell.metadata().page_id, 0);
    }
}
