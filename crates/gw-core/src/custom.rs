use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, StringTree};

/// A tag the mapper does not understand, kept verbatim with its whole subtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CustomFact {
    pub tag: String,
    pub xref: Option<String>,
    pub value: Option<String>,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CustomFact>,
}

impl CustomFact {
    /// Copies `id` and everything below it out of the tree.
    #[must_use]
    pub fn from_tree(tree: &StringTree, id: NodeId) -> Self {
        let node = tree.node(id);
        Self {
            tag: node.tag.clone(),
            xref: node.xref.clone(),
            value: node.value.clone(),
            line: node.line,
            children: node
                .children
                .iter()
                .map(|child| Self::from_tree(tree, *child))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_user_defined(&self) -> bool {
        self.tag.starts_with('_')
    }

    #[must_use]
    pub fn child(&self, tag: &str) -> Option<&CustomFact> {
        self.children.iter().find(|child| child.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::CustomFact;
    use crate::StringTree;

    #[test]
    fn copies_whole_subtree() {
        let mut tree = StringTree::new();
        let indi = tree.push(None, Some("@I1@".to_string()), "INDI", None, 1);
        let milt = tree.push(Some(indi), None, "_MILT", Some("Army".to_string()), 2);
        tree.push(Some(milt), None, "DATE", Some("1917".to_string()), 3);

        let fact = CustomFact::from_tree(&tree, milt);
        assert_eq!(fact.tag, "_MILT");
        assert_eq!(fact.value.as_deref(), Some("Army"));
        assert!(fact.is_user_defined());
        assert_eq!(fact.line, 2);
        let date = fact.child("DATE").expect("date child kept");
        assert_eq!(date.value.as_deref(), Some("1917"));
        assert_eq!(date.line, 3);
    }
}
