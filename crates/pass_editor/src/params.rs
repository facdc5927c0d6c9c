//! Parameter layout of the pass manager node.
//!
//! | Key       | Value                                               |
//! |-----------|-----------------------------------------------------|
//! | `version` | Number, version of the internal network             |
//! | `info`    | String shown in the parameter panel                 |
//! | `passes`  | String, JSON [`StoreSnapshot`] of the hierarchy     |

use pass_core::Result;
use pass_hierarchy::{HierarchyStore, StoreSnapshot};

use crate::collaborators::{ParamValue, ParameterStore};

pub const PARAM_VERSION: &str = "version";
pub const PARAM_INFO: &str = "info";
pub const PARAM_PASSES: &str = "passes";

pub const INFO_TEXT: &str = "Press 'Create Network' to build the setup.";

/// Stored network version. Nodes saved before versioning report 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn read_version(params: &dyn ParameterStore) -> u32 {
    params
        .get(PARAM_VERSION)
        .and_then(|v| v.as_number())
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map_or(0, |n| n as u32)
}

pub fn write_version(params: &mut dyn ParameterStore, version: u32) {
    params.set(PARAM_VERSION, ParamValue::Number(f64::from(version)));
}

/// Writes the current hierarchy into the `passes` parameter.
pub fn mirror_store(params: &mut dyn ParameterStore, store: &HierarchyStore) -> Result<()> {
    let json = store.snapshot().to_json()?;
    params.set(PARAM_PASSES, ParamValue::String(json));
    Ok(())
}

/// Rebuilds the hierarchy from the `passes` parameter. A missing or empty
/// parameter yields an empty store.
pub fn load_store(params: &dyn ParameterStore) -> Result<HierarchyStore> {
    match params.get(PARAM_PASSES) {
        Some(ParamValue::String(json)) if !json.trim().is_empty() => {
            HierarchyStore::from_snapshot(&StoreSnapshot::from_json(&json)?)
        }
        _ => Ok(HierarchyStore::new()),
    }
}
