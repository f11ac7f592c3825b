use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub usize);

/// One logical GEDCOM line with its continuation lines folded into `value`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TreeNode {
    pub level: u32,
    pub xref: Option<String>,
    pub tag: String,
    pub value: Option<String>,
    /// 1-based physical line the node was opened on.
    pub line: usize,
    /// Navigation only; the arena owns every node.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena holding the generic line tree as an ordered forest of level-0 nodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StringTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
}

impl StringTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node under `parent` (or as a new root) and returns its id.
    ///
    /// The level is derived from the parent, so the tree always satisfies
    /// `child.level == parent.level + 1`.
    pub fn push(
        &mut self,
        parent: Option<NodeId>,
        xref: Option<String>,
        tag: impl Into<String>,
        value: Option<String>,
        line: usize,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let level = match parent {
            Some(parent_id) => self.nodes[parent_id.0].level + 1,
            None => 0,
        };
        self.nodes.push(TreeNode {
            level,
            xref,
            tag: tag.into(),
            value,
            line,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Appends `text` to a node's value, inserting `separator` only when the node
    /// already has a value.
    pub fn append_value(&mut self, id: NodeId, separator: &str, text: &str) {
        let node = &mut self.nodes[id.0];
        match node.value.as_mut() {
            Some(existing) => {
                existing.push_str(separator);
                existing.push_str(text);
            }
            None if separator.is_empty() => node.value = Some(text.to_string()),
            None => node.value = Some(format!("{separator}{text}")),
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// First direct child carrying `tag`.
    #[must_use]
    pub fn child_with_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.nodes[child.0].tag == tag)
    }

    /// Number of direct children carrying `tag`.
    #[must_use]
    pub fn count_children_with_tag(&self, id: NodeId, tag: &str) -> usize {
        self.children(id)
            .iter()
            .filter(|child| self.nodes[child.0].tag == tag)
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in file order (pre-order over the forest).
    #[must_use]
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Tag path from the root down to `id`, e.g. `INDI > BIRT > DATE`.
    #[must_use]
    pub fn tag_path(&self, id: NodeId) -> String {
        let mut tags = vec![self.nodes[id.0].tag.as_str()];
        let mut cursor = self.nodes[id.0].parent;
        while let Some(parent) = cursor {
            tags.push(self.nodes[parent.0].tag.as_str());
            cursor = self.nodes[parent.0].parent;
        }
        tags.reverse();
        tags.join(" > ")
    }

    /// Checks the parent/child level invariant over the whole arena.
    #[must_use]
    pub fn levels_are_consistent(&self) -> bool {
        self.nodes.iter().all(|node| match node.parent {
            Some(parent) => node.level == self.nodes[parent.0].level + 1,
            None => node.level == 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::StringTree;

    #[test]
    fn push_derives_levels_from_parent() {
        let mut tree = StringTree::new();
        let root = tree.push(None, Some("@I1@".to_string()), "INDI", None, 1);
        let birth = tree.push(Some(root), None, "BIRT", None, 2);
        let date = tree.push(Some(birth), None, "DATE", Some("1900".to_string()), 3);

        assert_eq!(tree.node(root).level, 0);
        assert_eq!(tree.node(birth).level, 1);
        assert_eq!(tree.node(date).level, 2);
        assert_eq!(tree.parent(date), Some(birth));
        assert_eq!(tree.roots(), &[root]);
        assert!(tree.levels_are_consistent());
        assert_eq!(tree.tag_path(date), "INDI > BIRT > DATE");
    }

    #[test]
    fn append_value_respects_separator() {
        let mut tree = StringTree::new();
        let note = tree.push(None, None, "NOTE", Some("first".to_string()), 1);
        tree.append_value(note, "\n", "second");
        tree.append_value(note, "", " half");
        assert_eq!(tree.node(note).value.as_deref(), Some("first\nsecond half"));

        let empty = tree.push(None, None, "NOTE", None, 4);
        tree.append_value(empty, "\n", "line");
        assert_eq!(tree.node(empty).value.as_deref(), Some("\nline"));
    }

    #[test]
    fn preorder_follows_file_order() {
        let mut tree = StringTree::new();
        let head = tree.push(None, None, "HEAD", None, 1);
        let sour = tree.push(Some(head), None, "SOUR", None, 2);
        let indi = tree.push(None, None, "INDI", None, 3);
        let name = tree.push(Some(indi), None, "NAME", None, 4);
        assert_eq!(tree.preorder(), vec![head, sour, indi, name]);
        assert_eq!(tree.child_with_tag(indi, "NAME"), Some(name));
        assert_eq!(tree.count_children_with_tag(indi, "SEX"), 0);
    }
}
