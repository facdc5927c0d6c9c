//! 宿主协作接口
//!
//! Pass Manager 不直接访问宿主程序，所需的能力都在创建编辑器时注入：
//! - [`NetworkBuilder`]: 构建并更新程序化节点网络
//! - [`ParameterStore`]: 节点上持久化的键值参数
//! - [`HostActions`]: 宿主特有的行操作（Adopt for Editing）

use pass_core::Result;
use pass_hierarchy::PassEntry;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::network::NetworkTemplate;
use crate::tree_view::RowPath;

/// 构建 PassManager 节点的内部网络
pub trait NetworkBuilder {
    /// 按 `template` 创建默认网络
    fn build_default(&mut self, template: &NetworkTemplate) -> Result<()>;

    /// 使网络与当前启用的 Pass 集合保持一致
    fn sync_passes(&mut self, passes: &[PassEntry]) -> Result<()>;

    /// 迁移旧版本构建的网络
    ///
    /// 返回错误时必须保持网络不变。
    fn upgrade(&mut self, from_version: u32, to_version: u32) -> Result<()>;

    /// 被锁定的节点不会升级
    fn is_locked(&self) -> bool {
        false
    }
}

/// 宿主保存的参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    String(String),
}

impl ParamValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

/// PassManager 节点的持久化参数
pub trait ParameterStore {
    fn get(&self, key: &str) -> Option<ParamValue>;
    fn set(&mut self, key: &str, value: ParamValue);
}

/// 由宿主执行的行操作
pub trait HostActions {
    fn adopt_for_editing(&mut self, row: &RowPath);
}

/// 内存参数存储，供没有参数系统的宿主及测试使用
#[derive(Debug, Clone, Default)]
pub struct InMemoryParameterStore {
    values: FxHashMap<String, ParamValue>,
}

impl InMemoryParameterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterStore for InMemoryParameterStore {
    fn get(&self, key: &str) -> Option<ParamValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: ParamValue) {
        self.values.insert(key.to_owned(), value);
    }
}
