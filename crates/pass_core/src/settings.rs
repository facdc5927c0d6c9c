//! Pass Manager Settings
//!
//! [`PassSettings`] holds the option sets offered by the Add Pass dialog and a
//! few editor defaults. It is consumed once when the editor is created.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pass_core::PassSettings;
//!
//! // Default: the stock type / category lists
//! let settings = PassSettings::default();
//!
//! // Studio-specific categories, everything else default
//! let settings = PassSettings {
//!     categories: vec!["hero".into(), "bg".into()],
//!     ..Default::default()
//! };
//!
//! // Loaded from a host-provided JSON blob
//! let settings = PassSettings::from_json(r#"{ "max_iteration": 5 }"#)?;
//! ```
//!
//! # Fields
//!
//! | 字段                | 说明                               | 默认值                             |
//! |---------------------|------------------------------------|------------------------------------|
//! | `pass_types`        | Add 对话框提供的类型               | `bty, rfl, shdw, util`             |
//! | `categories`        | Add 对话框提供的预设类别           | `char, crowd, env, fx, prop, vhcl` |
//! | `custom_label`      | 切换为自定义类别的选项             | `custom`                           |
//! | `max_iteration`     | Add 对话框提供的最大迭代号         | `9`                                |
//! | `new_pass_enabled`  | 新增 Pass 的初始勾选状态           | `true`                             |
//! | `show_income_scene` | Adopt 开关的初始状态               | `false`                            |

use serde::Deserialize;

use crate::errors::{PassError, Result};
use crate::identifier::SEPARATOR;

/// Editor-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PassSettings {
    pub pass_types: Vec<String>,
    pub categories: Vec<String>,
    pub custom_label: String,
    pub max_iteration: u32,
    pub new_pass_enabled: bool,
    pub show_income_scene: bool,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            pass_types: ["bty", "rfl", "shdw", "util"].map(String::from).to_vec(),
            categories: ["char", "crowd", "env", "fx", "prop", "vhcl"]
                .map(String::from)
                .to_vec(),
            custom_label: "custom".to_owned(),
            max_iteration: 9,
            new_pass_enabled: true,
            show_income_scene: false,
        }
    }
}

impl PassSettings {
    /// Parses settings from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::debug!(
            "Loaded pass settings: {} types, {} categories",
            settings.pass_types.len(),
            settings.categories.len()
        );
        Ok(settings)
    }

    /// 检查每个选项都能组成合法的 Pass 名称
    pub fn validate(&self) -> Result<()> {
        if self.pass_types.is_empty() {
            return Err(PassError::InvalidSettings("no pass types configured".into()));
        }
        if let Some(bad) = self
            .pass_types
            .iter()
            .find(|t| t.is_empty() || t.contains(SEPARATOR))
        {
            return Err(PassError::InvalidSettings(format!(
                "pass type '{bad}' must be non-empty and contain no '{SEPARATOR}'"
            )));
        }
        if let Some(bad) = self
            .categories
            .iter()
            .find(|c| c.is_empty() || c.split(SEPARATOR).any(str::is_empty))
        {
            return Err(PassError::InvalidSettings(format!("category '{bad}' is malformed")));
        }
        if self.categories.contains(&self.custom_label) {
            return Err(PassError::InvalidSettings(format!(
                "custom label '{}' collides with a preset category",
                self.custom_label
            )));
        }
        if self.max_iteration == 0 {
            return Err(PassError::InvalidSettings("max_iteration must be at least 1".into()));
        }
        Ok(())
    }

    /// Iterations offered by the Add dialog, already formatted (`01..=max`).
    #[must_use]
    pub fn iteration_options(&self) -> Vec<String> {
        (1..=self.max_iteration)
            .map(|i| format!("{i:0width$}", width = crate::identifier::ITERATION_WIDTH))
            .collect()
    }
}
