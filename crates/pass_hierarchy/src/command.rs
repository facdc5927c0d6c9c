//! Store 命令与单写者队列
//!
//! [`HierarchyStore`] 的每种修改都可以表示为一个 [`PassCommand`]。
//! 多线程宿主通过 [`CommandSender`] 提交命令，由持有 Store 的线程
//! 调用 [`CommandQueue::drain`] 依次执行，所有写操作因此串行化。

use pass_core::{Identifier, PassError, Result};

use crate::path::LeafPath;
use crate::store::HierarchyStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassCommand {
    Add {
        pass_type: String,
        category: String,
        name: String,
        enabled: bool,
    },
    Rename {
        path: LeafPath,
        new_name: String,
    },
    Delete {
        path: LeafPath,
    },
    Duplicate {
        path: LeafPath,
    },
    SetEnabled {
        path: LeafPath,
        enabled: bool,
    },
}

/// 命令成功执行后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Added(LeafPath),
    Renamed { from: LeafPath, to: LeafPath },
    Deleted(LeafPath),
    Duplicated { source: LeafPath, copy: Identifier },
    Toggled { path: LeafPath, enabled: bool },
}

impl HierarchyStore {
    /// 执行单条命令
    pub fn apply(&mut self, command: PassCommand) -> Result<CommandOutcome> {
        match command {
            PassCommand::Add { pass_type, category, name, enabled } => self
                .add(&pass_type, &category, &name, enabled)
                .map(CommandOutcome::Added),
            PassCommand::Rename { path, new_name } => {
                let to = self.rename(&path, &new_name)?;
                Ok(CommandOutcome::Renamed { from: path, to })
            }
            PassCommand::Delete { path } => {
                self.delete(&path)?;
                Ok(CommandOutcome::Deleted(path))
            }
            PassCommand::Duplicate { path } => {
                let copy = self.duplicate(&path)?;
                Ok(CommandOutcome::Duplicated { source: path, copy })
            }
            PassCommand::SetEnabled { path, enabled } => {
                self.set_enabled(&path, enabled)?;
                Ok(CommandOutcome::Toggled { path, enabled })
            }
        }
    }
}

/// 可克隆的提交端，任意线程可用
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: flume::Sender<PassCommand>,
}

impl CommandSender {
    pub fn submit(&self, command: PassCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| PassError::QueueClosed)
    }
}

/// 无界 FIFO 命令队列，由 Store 的持有者消费
#[derive(Debug)]
pub struct CommandQueue {
    tx: flume::Sender<PassCommand>,
    rx: flume::Receiver<PassCommand>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    #[must_use]
    pub fn sender(&self) -> CommandSender {
        CommandSender { tx: self.tx.clone() }
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// 按提交顺序执行所有排队的命令
    ///
    /// 失败的命令记录在返回列表中，不影响其后的命令。
    pub fn drain(&self, store: &mut HierarchyStore) -> Vec<Result<CommandOutcome>> {
        self.rx
            .try_iter()
            .map(|command| {
                let result = store.apply(command);
                if let Err(err) = &result {
                    log::warn!("Queued pass command failed: {err}");
                }
                result
            })
            .collect()
    }
}
