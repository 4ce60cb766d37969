use crate::models::{DocumentTree, NodeId};

/// Renders the tree as an indented outline, one node per line.
///
/// ```text
/// 0 (0, 0) root ""
///   0.0 (1, 1) named_header "Глава 1" [bold 0..7]
/// ```
pub fn render(tree: &DocumentTree) -> String {
    let mut out = String::new();
    render_node(tree, tree.root(), 0, &mut out);
    out
}

fn render_node(tree: &DocumentTree, id: NodeId, depth: usize, out: &mut String) {
    let node = &tree[id];
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{} {} {:?}", node.node_id(), node.hierarchy_level(), node.text()));
    for a in node.annotations() {
        out.push_str(&format!(" [{} {}..{}]", a.name(), a.start(), a.end()));
    }
    out.push('\n');

    for &child in tree.children(id) {
        render_node(tree, child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Annotation;
    use crate::models::{HierarchyLevel, LineMetadata, LineWithMeta, ParagraphType};

    #[test]
    fn test_render_indents_children() {
        let mut tree = DocumentTree::new(&[]);
        let chapter = LineWithMeta::new("Chapter", LineMetadata::default(), vec![Annotation::bold(0, 7).unwrap()])
            .with_level(HierarchyLevel::new(1, 0, false, ParagraphType::Header));
        let chapter = tree.add_child(tree.root(), &chapter);
        tree.add_child(chapter, &LineWithMeta::from_text("two\nlines"));

        insta::assert_snapshot!(render(&tree), @r#"
        0 (0, 0) root ""
          0.0 (1, 0) header "Chapter" [bold 0..7]
            0.0.0 (-, -) raw_text "two\nlines"
        "#);
    }
}
