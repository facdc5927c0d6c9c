//! 网络升级
//!
//! 节点保存了构建内部网络时的版本号。用新版 Pass Manager 打开旧节点时，
//! 通过 [`NetworkBuilder::upgrade`] 迁移网络。
//!
//! - [`try_upgrade`]: 以 `Result` 返回失败
//! - [`upgrade`]: 编辑器使用的边界，失败只记录日志，网络与版本号保持不变

use pass_core::{PassError, Result};

use crate::collaborators::{NetworkBuilder, ParameterStore};
use crate::params::{read_version, write_version};

/// [`default_network`](crate::network::default_network) 构建的网络版本
pub const CURRENT_NETWORK_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    UpToDate,
    Upgraded { from: u32, to: u32 },
    SkippedLocked,
    Failed,
}

pub fn try_upgrade(
    network: &mut dyn NetworkBuilder,
    params: &mut dyn ParameterStore,
) -> Result<UpgradeOutcome> {
    let stored = read_version(params);
    if stored == CURRENT_NETWORK_VERSION {
        return Ok(UpgradeOutcome::UpToDate);
    }
    if stored > CURRENT_NETWORK_VERSION {
        return Err(PassError::NetworkError(format!(
            "network version {stored} is newer than supported version {CURRENT_NETWORK_VERSION}"
        )));
    }
    if network.is_locked() {
        log::warn!("Cannot upgrade locked PassManager node (version {stored}).");
        return Ok(UpgradeOutcome::SkippedLocked);
    }

    network.upgrade(stored, CURRENT_NETWORK_VERSION)?;
    write_version(params, CURRENT_NETWORK_VERSION);
    log::info!("Upgraded PassManager network {stored} -> {CURRENT_NETWORK_VERSION}");
    Ok(UpgradeOutcome::Upgraded {
        from: stored,
        to: CURRENT_NETWORK_VERSION,
    })
}

pub fn upgrade(network: &mut dyn NetworkBuilder, params: &mut dyn ParameterStore) -> UpgradeOutcome {
    try_upgrade(network, params).unwrap_or_else(|err| {
        log::error!("Error upgrading PassManager node: {err}");
        UpgradeOutcome::Failed
    })
}
