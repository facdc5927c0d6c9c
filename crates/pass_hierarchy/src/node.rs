use std::collections::BTreeMap;

use serde::Serialize;

/// Depth of a node in the pass hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HierarchyLevel {
    /// Top level, e.g. `bty`
    Type,
    /// Second level, e.g. `char`
    Category,
    /// A concrete pass instance, e.g. `bty_char_01`
    Instance,
}

impl HierarchyLevel {
    /// The level of this node's children, `None` for instances.
    #[inline]
    #[must_use]
    pub fn child_level(self) -> Option<Self> {
        match self {
            Self::Type => Some(Self::Category),
            Self::Category => Some(Self::Instance),
            Self::Instance => None,
        }
    }
}

/// A node of the three-level pass tree.
///
/// # Hierarchy
///
/// - Type and Category nodes own their children, sorted by name
/// - Instance nodes are terminal and carry the `enabled` flag
///
/// Nodes are only created and mutated through [`HierarchyStore`](crate::HierarchyStore),
/// which keeps sibling names unique and removes nodes that become childless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    pub(crate) name: String,
    pub(crate) level: HierarchyLevel,
    pub(crate) children: BTreeMap<String, HierarchyNode>,
    pub(crate) enabled: bool,
}

impl HierarchyNode {
    pub(crate) fn branch(name: &str, level: HierarchyLevel) -> Self {
        debug_assert!(level != HierarchyLevel::Instance);
        Self {
            name: name.to_owned(),
            level,
            children: BTreeMap::new(),
            enabled: true,
        }
    }

    pub(crate) fn leaf(name: &str, enabled: bool) -> Self {
        Self {
            name: name.to_owned(),
            level: HierarchyLevel::Instance,
            children: BTreeMap::new(),
            enabled,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn level(&self) -> HierarchyLevel {
        self.level
    }

    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.level == HierarchyLevel::Instance
    }

    /// Toggle state. Always `true` on Type and Category nodes.
    #[inline]
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.children.values()
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.get(name)
    }

    #[inline]
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Number of Instance nodes in this subtree (1 for a leaf).
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.values().map(HierarchyNode::leaf_count).sum()
        }
    }
}
