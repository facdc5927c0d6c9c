//! Pass 层级存储
//!
//! [`HierarchyStore`] 持有 `Type → Category → Instance` 树，是唯一可以修改它的地方。
//!
//! # 不变量
//!
//! 每次操作之后（无论成功与否）：
//! - 每个叶子名都能解析为 [`Identifier`]，其 type / category 与所在的
//!   Type、Category 节点名一致
//! - 叶子名是规范形式（`Identifier` 的 Display 结果），并在整个 Store 内唯一，
//!   而不仅是在兄弟节点之间
//! - 不存在没有子节点的 Type 或 Category
//!
//! 失败的操作在修改树之前就会返回，Store 始终保持在最后一个合法状态。
//!
//! # 线程模型
//!
//! 所有操作都是同步、不可重入的。Store 不支持外部并发调用：多线程宿主必须
//! 把所有调用汇集到单一写者，例如 [`CommandQueue`](crate::CommandQueue)。

use std::collections::{BTreeMap, BTreeSet};

use pass_core::{ChangeTracker, Identifier, PassError, Result};
use serde::Serialize;

use crate::node::{HierarchyLevel, HierarchyNode};
use crate::path::LeafPath;

/// A flattened view of one leaf, handed to presentation and network code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassEntry {
    pub path: LeafPath,
    pub enabled: bool,
}

impl PassEntry {
    /// Parses the leaf name. Cannot fail for entries produced by a store.
    pub fn identifier(&self) -> Result<Identifier> {
        Identifier::parse(&self.path.leaf)
    }
}

/// Owner of the pass tree.
#[derive(Debug, Clone, Default)]
pub struct HierarchyStore {
    roots: BTreeMap<String, HierarchyNode>,
    tracker: ChangeTracker,
}

impl HierarchyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Inserts a leaf, creating its Type and Category nodes on first use.
    ///
    /// `leaf_name` must parse and belong to `pass_type/category`. The leaf is
    /// stored under its canonical name (`bty_char_1` becomes `bty_char_01`),
    /// which must not exist anywhere in the store.
    pub fn add(
        &mut self,
        pass_type: &str,
        category: &str,
        leaf_name: &str,
        enabled: bool,
    ) -> Result<LeafPath> {
        let id = Identifier::parse(leaf_name)?;
        if !id.belongs_to(pass_type, category) {
            return Err(PassError::TypeOrCategoryMismatch {
                name: leaf_name.to_owned(),
                expected_type: pass_type.to_owned(),
                expected_category: category.to_owned(),
            });
        }
        let path = LeafPath::from(&id);
        if self.contains_leaf(&path.leaf) {
            return Err(PassError::DuplicateLeaf(path.leaf));
        }

        self.insert_leaf(path.clone(), enabled);
        log::debug!("Added pass '{}'", path.leaf);
        Ok(path)
    }

    /// Changes the name of a leaf without moving it.
    ///
    /// The new name must keep the leaf's type and category; only the trailing
    /// identity may change. Renaming a leaf to its current name succeeds
    /// without recording a change.
    pub fn rename(&mut self, path: &LeafPath, new_name: &str) -> Result<LeafPath> {
        if self.get(path).is_none() {
            return Err(PassError::NotFound(path.to_string()));
        }

        let id = Identifier::parse(new_name)?;
        if !id.belongs_to(&path.pass_type, &path.category) {
            return Err(PassError::TypeOrCategoryMismatch {
                name: new_name.to_owned(),
                expected_type: path.pass_type.clone(),
                expected_category: path.category.clone(),
            });
        }
        let new_name = id.to_string();
        if new_name == path.leaf {
            return Ok(path.clone());
        }
        if self.contains_leaf(&new_name) {
            return Err(PassError::DuplicateLeaf(new_name));
        }

        let category = self
            .category_node_mut(&path.pass_type, &path.category)
            .ok_or_else(|| PassError::NotFound(path.to_string()))?;
        let mut node = category
            .children
            .remove(&path.leaf)
            .ok_or_else(|| PassError::NotFound(path.to_string()))?;
        node.name.clone_from(&new_name);
        category.children.insert(new_name.clone(), node);

        self.commit();
        log::debug!("Renamed pass '{}' -> '{new_name}'", path.leaf);
        Ok(LeafPath::new(&path.pass_type, &path.category, &new_name))
    }

    /// Removes a leaf, then its Category if now empty, then its Type if now
    /// empty. The cascade completes within this call.
    pub fn delete(&mut self, path: &LeafPath) -> Result<()> {
        let not_found = || PassError::NotFound(path.to_string());

        let root = self.roots.get_mut(&path.pass_type).ok_or_else(not_found)?;
        let category = root.children.get_mut(&path.category).ok_or_else(not_found)?;
        if category.children.remove(&path.leaf).is_none() {
            return Err(not_found());
        }

        if category.children.is_empty() {
            root.children.remove(&path.category);
            log::debug!("Removed empty category '{}/{}'", path.pass_type, path.category);
        }
        if root.children.is_empty() {
            self.roots.remove(&path.pass_type);
            log::debug!("Removed empty type '{}'", path.pass_type);
        }

        self.commit();
        log::debug!("Deleted pass '{}'", path.leaf);
        Ok(())
    }

    /// Creates a copy of a leaf with the next free iteration.
    ///
    /// The new iteration is the smallest value above the source's own that no
    /// leaf under the same type and category uses, so gaps left by earlier
    /// deletes are filled before the range is extended. The copy inherits the
    /// source's `enabled` flag.
    pub fn duplicate(&mut self, path: &LeafPath) -> Result<Identifier> {
        let category = self
            .category_node(&path.pass_type, &path.category)
            .ok_or_else(|| PassError::NotFound(path.to_string()))?;
        let source = category
            .children
            .get(&path.leaf)
            .ok_or_else(|| PassError::NotFound(path.to_string()))?;

        let source_id = Identifier::parse(source.name())?;
        let enabled = source.enabled;
        let used: BTreeSet<u32> = category
            .children
            .keys()
            .filter_map(|name| Identifier::parse(name).ok())
            .map(|id| id.iteration())
            .collect();

        let overflow = || PassError::BadIteration(path.leaf.clone());
        let mut next = source_id.iteration().checked_add(1).ok_or_else(overflow)?;
        while used.contains(&next) {
            next = next.checked_add(1).ok_or_else(overflow)?;
        }

        let new_id = source_id.with_iteration(next);
        let new_name = new_id.to_string();
        if self.contains_leaf(&new_name) {
            log::error!("Duplicate of '{}' collides with '{new_name}'", path.leaf);
            return Err(PassError::DuplicateLeaf(new_name));
        }

        self.insert_leaf(LeafPath::from(&new_id), enabled);
        log::debug!("Duplicated pass '{}' -> '{new_name}'", path.leaf);
        Ok(new_id)
    }

    /// Sets the toggle of a leaf.
    pub fn set_enabled(&mut self, path: &LeafPath, enabled: bool) -> Result<()> {
        let leaf = self
            .category_node_mut(&path.pass_type, &path.category)
            .and_then(|c| c.children.get_mut(&path.leaf))
            .ok_or_else(|| PassError::NotFound(path.to_string()))?;

        if leaf.enabled != enabled {
            leaf.enabled = enabled;
            self.commit();
            log::debug!("Pass '{}' enabled = {enabled}", path.leaf);
        }
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Resolves a path to its leaf node.
    #[must_use]
    pub fn get(&self, path: &LeafPath) -> Option<&HierarchyNode> {
        self.category_node(&path.pass_type, &path.category)?
            .children
            .get(&path.leaf)
    }

    /// Type nodes in name order.
    pub fn roots(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.roots.values()
    }

    #[must_use]
    pub fn root(&self, pass_type: &str) -> Option<&HierarchyNode> {
        self.roots.get(pass_type)
    }

    /// Finds a leaf by name anywhere in the tree.
    ///
    /// Names compare by identity: `bty_char_1` finds the stored `bty_char_01`.
    #[must_use]
    pub fn find_leaf(&self, name: &str) -> Option<LeafPath> {
        let canonical = Identifier::parse(name).map_or_else(|_| name.to_owned(), |id| id.to_string());
        self.leaves().map(|entry| entry.path).find(|path| path.leaf == canonical)
    }

    #[must_use]
    pub fn contains_leaf(&self, name: &str) -> bool {
        self.find_leaf(name).is_some()
    }

    /// All leaves in tree order (type, then category, then name).
    pub fn leaves(&self) -> impl Iterator<Item = PassEntry> + '_ {
        self.roots.values().flat_map(|root| {
            root.children.values().flat_map(move |category| {
                category.children.values().map(move |leaf| PassEntry {
                    path: LeafPath::new(&root.name, &category.name, &leaf.name),
                    enabled: leaf.enabled,
                })
            })
        })
    }

    /// Leaves whose toggle is on, i.e. the set handed to the network builder.
    #[must_use]
    pub fn enabled_passes(&self) -> Vec<PassEntry> {
        self.leaves().filter(|entry| entry.enabled).collect()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.roots.values().map(HierarchyNode::leaf_count).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Revision bumped once per successful mutation.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.tracker.version()
    }

    /// Verifies every store invariant, reporting the first violation.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for root in self.roots.values() {
            let levels_ok = root.level == HierarchyLevel::Type
                && root.children.values().all(|category| {
                    Some(category.level) == root.level.child_level()
                        && category
                            .children
                            .values()
                            .all(|leaf| Some(leaf.level) == category.level.child_level())
                });
            if !levels_ok {
                return Err(PassError::MalformedName(format!("levels under type '{}'", root.name)));
            }
            if root.children.is_empty() {
                return Err(PassError::NotFound(format!("children of type '{}'", root.name)));
            }
            for category in root.children.values() {
                if category.children.is_empty() {
                    return Err(PassError::NotFound(format!(
                        "children of category '{}/{}'",
                        root.name, category.name
                    )));
                }
                for leaf in category.children.values() {
                    let id = Identifier::parse(&leaf.name)?;
                    if id.to_string() != leaf.name {
                        return Err(PassError::MalformedName(leaf.name.clone()));
                    }
                    if !id.belongs_to(&root.name, &category.name) {
                        return Err(PassError::TypeOrCategoryMismatch {
                            name: leaf.name.clone(),
                            expected_type: root.name.clone(),
                            expected_category: category.name.clone(),
                        });
                    }
                    if !seen.insert(leaf.name.as_str()) {
                        return Err(PassError::DuplicateLeaf(leaf.name.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn insert_leaf(&mut self, path: LeafPath, enabled: bool) {
        let root = self
            .roots
            .entry(path.pass_type.clone())
            .or_insert_with(|| HierarchyNode::branch(&path.pass_type, HierarchyLevel::Type));
        let category = root
            .children
            .entry(path.category.clone())
            .or_insert_with(|| HierarchyNode::branch(&path.category, HierarchyLevel::Category));
        category
            .children
            .insert(path.leaf.clone(), HierarchyNode::leaf(&path.leaf, enabled));
        self.commit();
    }

    fn category_node(&self, pass_type: &str, category: &str) -> Option<&HierarchyNode> {
        self.roots.get(pass_type)?.children.get(category)
    }

    fn category_node_mut(&mut self, pass_type: &str, category: &str) -> Option<&mut HierarchyNode> {
        self.roots.get_mut(pass_type)?.children.get_mut(category)
    }

    fn commit(&mut self) {
        self.tracker.changed();
        debug_assert!(self.check_invariants().is_ok(), "hierarchy invariant broken");
    }
}
