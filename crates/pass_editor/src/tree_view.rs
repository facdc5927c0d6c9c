//! 可视化树适配层
//!
//! 把 [`HierarchyStore`] 映射为界面树：
//! - 每个 HierarchyNode 对应且只对应一行 [`VisualRow`]
//! - Instance 行带有绑定到 `enabled` 的勾选框
//! - 新建的行默认展开；已有行保留用户的展开状态
//! - 被删除的行（以及级联删除的父行）不会留下孤儿行
//!
//! 数据流是单向的：勾选操作由编辑器转发给 Store，
//! Store 变化后再通过 [`VisualTree::reconcile`] 刷新界面。

use bitflags::bitflags;
use pass_hierarchy::{HierarchyLevel, HierarchyStore, LeafPath};
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct RowKey;
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RowFlags: u8 {
        const EXPANDED  = 1 << 0;
        const CHECKABLE = 1 << 1;
        const CHECKED   = 1 << 2;
    }
}

/// 行的稳定身份（跨 reconcile 保持不变）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowPath {
    Type(String),
    Category(String, String),
    Instance(LeafPath),
}

impl RowPath {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Type(name) | Self::Category(_, name) => name,
            Self::Instance(path) => &path.leaf,
        }
    }

    #[must_use]
    pub fn level(&self) -> HierarchyLevel {
        match self {
            Self::Type(_) => HierarchyLevel::Type,
            Self::Category(..) => HierarchyLevel::Category,
            Self::Instance(_) => HierarchyLevel::Instance,
        }
    }
}

/// 右键菜单项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Adopt,
    Separator,
    Rename,
    Delete,
    Duplicate,
}

#[derive(Debug, Clone)]
pub struct VisualRow {
    pub path: RowPath,
    pub flags: RowFlags,
    parent: Option<RowKey>,
    children: Vec<RowKey>,
}

impl VisualRow {
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.path.label()
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<RowKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[RowKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.flags.contains(RowFlags::EXPANDED)
    }

    /// 勾选状态；非 Instance 行返回 `None`
    #[inline]
    #[must_use]
    pub fn checked(&self) -> Option<bool> {
        self.flags
            .contains(RowFlags::CHECKABLE)
            .then(|| self.flags.contains(RowFlags::CHECKED))
    }
}

/// reconcile 的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
}

/// 界面树
#[derive(Debug, Default)]
pub struct VisualTree {
    rows: SlotMap<RowKey, VisualRow>,
    top_level: Vec<RowKey>,
    index: FxHashMap<RowPath, RowKey>,
    synced_revision: Option<u64>,
}

impl VisualTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 与 Store 对齐
    ///
    /// Store 的 revision 未变化时直接返回。
    pub fn reconcile(&mut self, store: &HierarchyStore) -> ReconcileStats {
        if self.synced_revision == Some(store.revision()) {
            return ReconcileStats::default();
        }
        let mut stats = ReconcileStats::default();

        // 1. 收集 Store 中应存在的所有行
        let mut desired = FxHashSet::default();
        for root in store.roots() {
            desired.insert(RowPath::Type(root.name().to_owned()));
            for category in root.children() {
                desired.insert(RowPath::Category(root.name().to_owned(), category.name().to_owned()));
                for leaf in category.children() {
                    desired.insert(RowPath::Instance(LeafPath::new(
                        root.name(),
                        category.name(),
                        leaf.name(),
                    )));
                }
            }
        }

        // 2. 移除多余的行（连同子树）
        let stale: Vec<RowKey> = self
            .index
            .iter()
            .filter(|(path, _)| !desired.contains(*path))
            .map(|(_, key)| *key)
            .collect();
        for key in stale {
            stats.removed += self.remove_row(key);
        }

        // 3. 补齐缺失的行，并按 Store 顺序重排兄弟节点
        let mut top_level = Vec::with_capacity(store.roots().count());
        for root in store.roots() {
            let root_key = self.ensure_row(None, RowPath::Type(root.name().to_owned()), &mut stats);
            top_level.push(root_key);

            let mut category_keys = Vec::with_capacity(root.child_count());
            for category in root.children() {
                let category_path = RowPath::Category(root.name().to_owned(), category.name().to_owned());
                let category_key = self.ensure_row(Some(root_key), category_path, &mut stats);
                category_keys.push(category_key);

                let mut leaf_keys = Vec::with_capacity(category.child_count());
                for leaf in category.children() {
                    let leaf_path = RowPath::Instance(LeafPath::new(root.name(), category.name(), leaf.name()));
                    let leaf_key = self.ensure_row(Some(category_key), leaf_path, &mut stats);
                    if let Some(row) = self.rows.get_mut(leaf_key) {
                        row.flags.set(RowFlags::CHECKED, leaf.enabled());
                    }
                    leaf_keys.push(leaf_key);
                }
                if let Some(row) = self.rows.get_mut(category_key) {
                    row.children = leaf_keys;
                }
            }
            if let Some(row) = self.rows.get_mut(root_key) {
                row.children = category_keys;
            }
        }
        self.top_level = top_level;

        self.synced_revision = Some(store.revision());
        if stats != ReconcileStats::default() {
            log::debug!("Tree reconciled: +{} -{}", stats.added, stats.removed);
        }
        stats
    }

    fn ensure_row(&mut self, parent: Option<RowKey>, path: RowPath, stats: &mut ReconcileStats) -> RowKey {
        if let Some(&key) = self.index.get(&path) {
            return key;
        }

        let mut flags = RowFlags::EXPANDED;
        if path.level() == HierarchyLevel::Instance {
            flags |= RowFlags::CHECKABLE;
        }
        let key = self.rows.insert(VisualRow {
            path: path.clone(),
            flags,
            parent,
            children: Vec::new(),
        });
        self.index.insert(path, key);
        stats.added += 1;
        key
    }

    /// 移除一行及其子树，返回移除的行数
    fn remove_row(&mut self, key: RowKey) -> usize {
        // 先取出 children，避免借用冲突
        let Some(row) = self.rows.remove(key) else {
            return 0;
        };
        self.index.remove(&row.path);

        let mut removed = 1;
        for child in row.children {
            removed += self.remove_row(child);
        }

        if let Some(parent) = row.parent.and_then(|p| self.rows.get_mut(p)) {
            parent.children.retain(|&c| c != key);
        } else {
            self.top_level.retain(|&c| c != key);
        }
        removed
    }

    // ========================================================================
    // 查询 API
    // ========================================================================

    #[must_use]
    pub fn row(&self, key: RowKey) -> Option<&VisualRow> {
        self.rows.get(key)
    }

    #[must_use]
    pub fn find(&self, path: &RowPath) -> Option<RowKey> {
        self.index.get(path).copied()
    }

    #[must_use]
    pub fn find_leaf(&self, path: &LeafPath) -> Option<RowKey> {
        self.find(&RowPath::Instance(path.clone()))
    }

    #[inline]
    #[must_use]
    pub fn top_level(&self) -> &[RowKey] {
        &self.top_level
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Instance 行对应的 LeafPath
    #[must_use]
    pub fn leaf_path(&self, key: RowKey) -> Option<&LeafPath> {
        match &self.rows.get(key)?.path {
            RowPath::Instance(path) => Some(path),
            _ => None,
        }
    }

    pub fn set_expanded(&mut self, key: RowKey, expanded: bool) {
        if let Some(row) = self.rows.get_mut(key) {
            row.flags.set(RowFlags::EXPANDED, expanded);
        }
    }

    /// 行的右键菜单
    ///
    /// `adopt_enabled` 由外部开关（Show Income Scene）控制。
    #[must_use]
    pub fn context_actions(&self, key: RowKey, adopt_enabled: bool) -> SmallVec<[RowAction; 5]> {
        let mut actions = SmallVec::new();
        let Some(row) = self.rows.get(key) else {
            return actions;
        };

        if adopt_enabled {
            actions.push(RowAction::Adopt);
            actions.push(RowAction::Separator);
        }
        if row.path.level() == HierarchyLevel::Instance {
            actions.extend([RowAction::Rename, RowAction::Delete, RowAction::Duplicate]);
        }
        actions
    }

    /// 深度优先遍历所有行，返回 `(深度, 行)`
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, RowKey)> {
        let mut out = Vec::with_capacity(self.rows.len());
        let mut stack: Vec<(usize, RowKey)> = self.top_level.iter().rev().map(|&k| (0, k)).collect();
        while let Some((depth, key)) = stack.pop() {
            out.push((depth, key));
            if let Some(row) = self.rows.get(key) {
                stack.extend(row.children.iter().rev().map(|&c| (depth + 1, c)));
            }
        }
        out
    }

    /// 文本形式的树，便于日志与测试
    #[must_use]
    pub fn outline(&self) -> Vec<String> {
        self.walk()
            .into_iter()
            .filter_map(|(depth, key)| {
                let row = self.rows.get(key)?;
                let indent = "  ".repeat(depth);
                Some(match row.checked() {
                    Some(true) => format!("{indent}[x] {}", row.label()),
                    Some(false) => format!("{indent}[ ] {}", row.label()),
                    None => format!("{indent}{}", row.label()),
                })
            })
            .collect()
    }
}
