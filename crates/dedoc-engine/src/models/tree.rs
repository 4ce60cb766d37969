use serde::Serialize;
use std::ops::Index;

use super::hierarchy_level::HierarchyLevel;
use super::line::LineWithMeta;
use super::metadata::LineMetadata;
use crate::annotations::{Annotation, AnnotationMerger};
use crate::text;

/// Index of a node inside its [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Part of a node's text that came from another page than the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSpan {
    pub page_id: u32,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    node_id: String,
    text: String,
    annotations: Vec<Annotation>,
    metadata: LineMetadata,
    hierarchy_level: HierarchyLevel,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    additional_page_ids: Vec<PageSpan>,
}

impl TreeNode {
    /// Dotted path from the root, `"0"` for the root itself.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn metadata(&self) -> &LineMetadata {
        &self.metadata
    }

    /// Level of the line that opened this node.
    pub fn hierarchy_level(&self) -> &HierarchyLevel {
        &self.hierarchy_level
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn additional_page_ids(&self) -> &[PageSpan] {
        &self.additional_page_ids
    }

    /// Appends a line's text, newline-separated, re-basing its annotations.
    fn append_line(&mut self, line: &LineWithMeta) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        let offset = text::char_len(&self.text);
        self.annotations
            .extend(line.annotations().iter().map(|a| a.shifted(offset)));
        self.text.push_str(line.line());

        let page_id = line.metadata().page_id;
        if page_id != self.metadata.page_id && !line.is_empty() {
            self.additional_page_ids.push(PageSpan {
                page_id,
                start: offset,
                end: offset + line.len(),
            });
        }
    }

    /// First line of the text, without trailing whitespace.
    fn heading(&self) -> &str {
        self.text.lines().next().unwrap_or_default().trim_end()
    }
}

/// Rooted document outline stored as an arena of nodes.
///
/// Nodes refer to their parent and children by [`NodeId`]; the root is
/// always the first node.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    nodes: Vec<TreeNode>,
}

impl DocumentTree {
    /// Creates the root from the document name lines (possibly none).
    pub fn new(title_lines: &[LineWithMeta]) -> Self {
        let page_id = title_lines
            .iter()
            .map(|l| l.metadata().page_id)
            .min()
            .unwrap_or(0);
        let line_id = title_lines
            .iter()
            .filter_map(|l| l.metadata().line_id)
            .min()
            .unwrap_or(0);

        let mut root = TreeNode {
            node_id: "0".to_string(),
            text: String::new(),
            annotations: Vec::new(),
            metadata: LineMetadata::new(page_id, Some(line_id)).with_level(HierarchyLevel::root()),
            hierarchy_level: HierarchyLevel::root(),
            parent: None,
            children: Vec::new(),
            additional_page_ids: Vec::new(),
        };
        for line in title_lines {
            root.append_line(line);
        }

        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[][..], |n| n.children.as_slice())
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Adds `line` as the last child of `parent` and returns the new node.
    ///
    /// Lines without a level are attached as raw text.
    pub fn add_child(&mut self, parent: NodeId, line: &LineWithMeta) -> NodeId {
        let id = NodeId(self.nodes.len());
        let node_id = format!("{}.{}", self[parent].node_id, self[parent].children.len());

        let hierarchy_level = line
            .hierarchy_level()
            .cloned()
            .unwrap_or_else(HierarchyLevel::raw_text);
        let mut metadata = line.metadata().clone();
        metadata.hierarchy_level = Some(hierarchy_level.clone());
        self.nodes.push(TreeNode {
            node_id,
            text: line.line().to_string(),
            annotations: line.annotations().to_vec(),
            metadata,
            hierarchy_level,
            parent: Some(parent),
            children: Vec::new(),
            additional_page_ids: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Continues the text of `node` with another physical line.
    pub fn add_text(&mut self, node: NodeId, line: &LineWithMeta) {
        self.nodes[node.0].append_line(line);
    }

    /// Merges every node's annotations over its final text.
    pub fn merge_annotations(&mut self) {
        for node in &mut self.nodes {
            node.annotations = AnnotationMerger::merge(&node.annotations, &node.text);
        }
    }

    /// Node ids in depth-first pre-order, root first.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    /// Nested dictionary of the whole tree.
    pub fn to_dict(&self) -> serde_json::Value {
        self.node_to_dict(self.root(), &[])
    }

    fn node_to_dict(&self, id: NodeId, headers: &[&str]) -> serde_json::Value {
        let node = &self[id];

        let mut metainformation = node.metadata.to_dict();
        if !node.additional_page_ids.is_empty() {
            metainformation.insert(
                "additional_page_ids".to_string(),
                serde_json::json!(node.additional_page_ids),
            );
        }

        let mut child_headers = headers.to_vec();
        if id != self.root() && !node.heading().is_empty() {
            child_headers.push(node.heading());
        }
        let subparagraphs: Vec<_> = node
            .children
            .iter()
            .map(|&child| self.node_to_dict(child, &child_headers))
            .collect();

        serde_json::json!({
            "id": node.node_id,
            "header": headers.join(" / "),
            "text": node.text,
            "annotations": node.annotations.iter().map(Annotation::to_dict).collect::<Vec<_>>(),
            "metainformation": metainformation,
            "subparagraphs": subparagraphs,
        })
    }
}

impl Index<NodeId> for DocumentTree {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }
}
