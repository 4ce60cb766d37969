use crate::models::{HierarchyLevel, LineMetadata, LineWithMeta};

/// Inserts empty `list` lines so that list items always hang under a list node.
///
/// Walks the lines keeping a stack of list levels seen so far. A list item
/// gets a placeholder right before it when nothing on the stack is at its
/// level already; the placeholder sorts between the previous sub-level and
/// the item's own, so the tree builder nests it without special cases.
/// Structured lines that are not list items clear the stack, raw text does
/// not touch it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListPatcher;

impl ListPatcher {
    /// Returns `lines` with placeholders inserted.
    ///
    /// Every list that opens gets one, so a well-formed `list_item` run such
    /// as `[(1,0), (1,0), (1,1), (1,0)]` still gains a placeholder ahead of
    /// its first item and another ahead of the nested one. Only input whose
    /// heads are already typed `list` passes through unchanged.
    pub fn patch(lines: Vec<LineWithMeta>) -> Vec<LineWithMeta> {
        let mut open_levels: Vec<HierarchyLevel> = Vec::new();
        let mut patched = Vec::with_capacity(lines.len());
        let mut inserted = 0usize;

        for line in lines {
            match line.hierarchy_level() {
                Some(level) if level.is_list_item() => {
                    while open_levels.last().is_some_and(|top| top > level) {
                        open_levels.pop();
                    }
                    let opens_list = open_levels.last().is_none_or(|top| top < level);
                    if opens_list && let Some(placeholder) = level.list_placeholder() {
                        patched.push(placeholder_line(&line, placeholder));
                        open_levels.push(level.clone());
                        inserted += 1;
                    }
                }
                Some(level) if !level.is_raw_text() => open_levels.clear(),
                _ => {}
            }
            patched.push(line);
        }

        log::debug!("Inserted {inserted} list placeholders");
        patched
    }
}

fn placeholder_line(item: &LineWithMeta, level: HierarchyLevel) -> LineWithMeta {
    let metadata = LineMetadata::new(item.metadata().page_id, item.metadata().line_id).with_level(level);
    LineWithMeta::new("", metadata, Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ParagraphType;
    use pretty_assertions::assert_eq;

    fn line(l1: u32, l2: u32, paragraph_type: ParagraphType) -> LineWithMeta {
        LineWithMeta::new(
            format!("{l1}.{l2}"),
            LineMetadata::new(3, Some(l2)),
            Vec::new(),
        )
        .with_level(HierarchyLevel::new(l1, l2, false, paragraph_type))
    }

    fn describe(lines: &[LineWithMeta]) -> Vec<String> {
        lines
            .iter()
            .map(|l| {
                let level = l.hierarchy_level().unwrap();
                let (l1, l2) = level.key().unwrap();
                format!("({l1}, {l2}) {}", level.paragraph_type())
            })
            .collect()
    }

    #[test]
    fn test_list_typed_lines_are_left_alone() {
        let levels = [(1, 0), (1, 0), (1, 1), (1, 0), (1, 0)];
        let lines: Vec<_> = levels.iter().map(|&(a, b)| line(a, b, ParagraphType::List)).collect();
        let before = describe(&lines);

        let patched = ListPatcher::patch(lines);

        assert_eq!(describe(&patched), before);
    }

    #[test]
    fn test_list_typed_lines_out_of_order_are_left_alone() {
        let levels = [(1, 1), (1, 0), (1, 0)];
        let lines: Vec<_> = levels.iter().map(|&(a, b)| line(a, b, ParagraphType::List)).collect();
        let before = describe(&lines);

        let patched = ListPatcher::patch(lines);

        assert_eq!(describe(&patched), before);
    }

    #[test]
    fn test_list_items_get_placeholders_on_each_deeper_level() {
        let levels = [(1, 0), (1, 0), (1, 1), (1, 0), (1, 0)];
        let lines: Vec<_> = levels.iter().map(|&(a, b)| line(a, b, ParagraphType::ListItem)).collect();

        let patched = ListPatcher::patch(lines);

        assert_eq!(
            describe(&patched),
            vec![
                "(1, -0.5) list",
                "(1, 0) list_item",
                "(1, 0) list_item",
                "(1, 0.5) list",
                "(1, 1) list_item",
                "(1, 0) list_item",
                "(1, 0) list_item",
            ]
        );
    }

    #[test]
    fn test_shallower_item_after_deeper_one_opens_new_list() {
        let levels = [(1, 1), (1, 0), (1, 0)];
        let lines: Vec<_> = levels.iter().map(|&(a, b)| line(a, b, ParagraphType::ListItem)).collect();

        let patched = ListPatcher::patch(lines);

        assert_eq!(
            describe(&patched),
            vec![
                "(1, 0.5) list",
                "(1, 1) list_item",
                "(1, -0.5) list",
                "(1, 0) list_item",
                "(1, 0) list_item",
            ]
        );
    }

    #[test]
    fn test_header_resets_open_lists() {
        let lines = vec![
            line(2, 1, ParagraphType::ListItem),
            line(1, 0, ParagraphType::Header),
            line(2, 1, ParagraphType::ListItem),
        ];

        let patched = ListPatcher::patch(lines);

        assert_eq!(patched.len(), 5);
        assert_eq!(patched[3].hierarchy_level().unwrap().paragraph_type(), &ParagraphType::List);
    }

    #[test]
    fn test_raw_text_keeps_open_lists() {
        let lines = vec![
            line(2, 1, ParagraphType::ListItem),
            LineWithMeta::from_text("continuation").with_level(HierarchyLevel::raw_text()),
            LineWithMeta::from_text("no level yet"),
            line(2, 1, ParagraphType::ListItem),
        ];

        let patched = ListPatcher::patch(lines);

        assert_eq!(patched.len(), 5);
    }

    #[test]
    fn test_placeholder_copies_position() {
        let patched = ListPatcher::patch(vec![line(2, 4, ParagraphType::ListItem)]);

        let placeholder = &patched[0];
        assert_eq!(placeholder.line(), "");
        assert!(placeholder.annotations().is_empty());
        assert_eq!(placeholder.metadata().page_id, 3);
        assert_eq!(placeholder.metadata().line_id, Some(4));
        assert!(!placeholder.hierarchy_level().unwrap().can_be_multiline());
    }
}
