//! Pass Editor
//!
//! [`PassEditor`] ties the pieces together the way the host UI drives them:
//!
//! ```text
//! user action ─► dialog ─► PassCommand ─► HierarchyStore
//!                                              │
//!                    VisualTree ◄── reconcile ─┤
//!                NetworkBuilder ◄── sync ──────┤
//!                ParameterStore ◄── mirror ────┘
//! ```
//!
//! Failures never panic and never leave the UI in a half-updated state. A
//! rejected command leaves the store untouched and is reported as a
//! [`Notice`]; the host shows notices without blocking.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut editor = PassEditor::create(PassSettings::default(), network, params)?;
//!
//! let mut dialog = editor.add_dialog();
//! dialog.select_category("env")?;
//! editor.submit_add(&dialog);
//!
//! for notice in editor.take_notices() {
//!     host.show_status(&notice.message);
//! }
//! ```

use pass_core::{Identifier, PassSettings, Result};
use pass_hierarchy::{CommandOutcome, CommandQueue, HierarchyStore, LeafPath, PassCommand};
use smallvec::SmallVec;

use crate::collaborators::{HostActions, NetworkBuilder, ParamValue, ParameterStore};
use crate::dialogs::{AddPassDialog, RenameDialog};
use crate::network::default_network;
use crate::params::{INFO_TEXT, PARAM_INFO, load_store, mirror_store, write_version};
use crate::tree_view::{RowAction, RowKey, VisualTree};
use crate::upgrade::{CURRENT_NETWORK_VERSION, UpgradeOutcome, upgrade};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// What the host should do after a row action.
#[derive(Debug)]
pub enum ActionResponse {
    /// The action ran (or was rejected with a notice).
    Done,
    /// Show the rename dialog; submit it with [`PassEditor::submit_rename`].
    OpenRename(RenameDialog),
    /// The row or action does not apply.
    Ignored,
}

pub struct PassEditor {
    settings: PassSettings,
    store: HierarchyStore,
    tree: VisualTree,

    network: Box<dyn NetworkBuilder>,
    params: Box<dyn ParameterStore>,
    host: Option<Box<dyn HostActions>>,

    show_income_scene: bool,
    notices: Vec<Notice>,
}

impl PassEditor {
    /// Sets up a brand-new node: writes the initial parameters and builds the
    /// default network.
    pub fn create(
        settings: PassSettings,
        mut network: Box<dyn NetworkBuilder>,
        mut params: Box<dyn ParameterStore>,
    ) -> Result<Self> {
        settings.validate()?;

        // 网络构建失败时不写入任何参数
        network.build_default(&default_network())?;
        write_version(params.as_mut(), CURRENT_NETWORK_VERSION);
        params.set(PARAM_INFO, ParamValue::String(INFO_TEXT.to_owned()));

        let store = HierarchyStore::new();
        mirror_store(params.as_mut(), &store)?;
        log::info!("Created PassManager node (network v{CURRENT_NETWORK_VERSION})");

        Ok(Self::assemble(settings, store, network, params))
    }

    /// Opens an existing node: restores the hierarchy from its parameters
    /// and upgrades the network if it is out of date.
    pub fn open(
        settings: PassSettings,
        network: Box<dyn NetworkBuilder>,
        params: Box<dyn ParameterStore>,
    ) -> Result<Self> {
        settings.validate()?;

        let store = load_store(params.as_ref())?;
        let mut editor = Self::assemble(settings, store, network, params);
        editor.upgrade();
        editor.sync_network();
        log::info!("Opened PassManager node with {} passes", editor.store.leaf_count());
        Ok(editor)
    }

    fn assemble(
        settings: PassSettings,
        store: HierarchyStore,
        network: Box<dyn NetworkBuilder>,
        params: Box<dyn ParameterStore>,
    ) -> Self {
        let mut tree = VisualTree::new();
        tree.reconcile(&store);
        Self {
            show_income_scene: settings.show_income_scene,
            settings,
            store,
            tree,
            network,
            params,
            host: None,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_host_actions(mut self, host: Box<dyn HostActions>) -> Self {
        self.host = Some(host);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn store(&self) -> &HierarchyStore {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn tree(&self) -> &VisualTree {
        &self.tree
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PassSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &dyn ParameterStore {
        self.params.as_ref()
    }

    /// Drains the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Applies a command and propagates a successful result to the tree,
    /// the network and the parameters.
    pub fn execute(&mut self, command: PassCommand) -> Option<CommandOutcome> {
        match self.store.apply(command) {
            Ok(outcome) => {
                self.after_mutation();
                Some(outcome)
            }
            Err(err) => {
                log::warn!("Pass command rejected: {err}");
                self.notify(Severity::Warning, err.to_string());
                None
            }
        }
    }

    /// Applies every command waiting in `queue`.
    pub fn drain_queue(&mut self, queue: &CommandQueue) -> usize {
        let results = queue.drain(&mut self.store);
        let mut applied = 0;
        for result in results {
            match result {
                Ok(_) => applied += 1,
                Err(err) => self.notify(Severity::Warning, err.to_string()),
            }
        }
        if applied > 0 {
            self.after_mutation();
        }
        applied
    }

    /// A fresh Add Pass dialog using the editor's option sets.
    #[must_use]
    pub fn add_dialog(&self) -> AddPassDialog {
        AddPassDialog::new(&self.settings)
    }

    pub fn submit_add(&mut self, dialog: &AddPassDialog) -> Option<LeafPath> {
        let command = match dialog.submit() {
            Ok(command) => command,
            Err(err) => {
                self.notify(Severity::Warning, err.to_string());
                return None;
            }
        };
        match self.execute(command)? {
            CommandOutcome::Added(path) => Some(path),
            _ => None,
        }
    }

    pub fn submit_rename(&mut self, dialog: &RenameDialog) -> Option<LeafPath> {
        match self.execute(dialog.submit())? {
            CommandOutcome::Renamed { to, .. } => Some(to),
            _ => None,
        }
    }

    pub fn delete_pass(&mut self, path: &LeafPath) -> bool {
        self.execute(PassCommand::Delete { path: path.clone() }).is_some()
    }

    pub fn duplicate_pass(&mut self, path: &LeafPath) -> Option<Identifier> {
        match self.execute(PassCommand::Duplicate { path: path.clone() })? {
            CommandOutcome::Duplicated { copy, .. } => Some(copy),
            _ => None,
        }
    }

    /// Checkbox callback of a leaf row.
    pub fn toggle_row(&mut self, row: RowKey, enabled: bool) -> bool {
        let Some(path) = self.tree.leaf_path(row).cloned() else {
            return false;
        };
        self.execute(PassCommand::SetEnabled { path, enabled }).is_some()
    }

    // ========================================================================
    // Context menu
    // ========================================================================

    /// The "Show Income Scene" toggle controlling the Adopt action.
    pub fn set_show_income_scene(&mut self, checked: bool) {
        self.show_income_scene = checked;
        log::debug!("Show Income Scene = {checked}");
    }

    #[must_use]
    pub fn show_income_scene(&self) -> bool {
        self.show_income_scene
    }

    #[must_use]
    pub fn context_actions(&self, row: RowKey) -> SmallVec<[RowAction; 5]> {
        self.tree.context_actions(row, self.show_income_scene)
    }

    pub fn invoke(&mut self, row: RowKey, action: RowAction) -> ActionResponse {
        if !self.context_actions(row).contains(&action) {
            return ActionResponse::Ignored;
        }

        match action {
            RowAction::Adopt => {
                let Some(path) = self.tree.row(row).map(|r| r.path.clone()) else {
                    return ActionResponse::Ignored;
                };
                match self.host.as_mut() {
                    Some(host) => host.adopt_for_editing(&path),
                    None => self.notify(
                        Severity::Info,
                        format!("Adopt for Editing is not available for '{}'", path.label()),
                    ),
                }
                ActionResponse::Done
            }
            RowAction::Rename => match self.tree.leaf_path(row) {
                Some(path) => ActionResponse::OpenRename(RenameDialog::new(path.clone())),
                None => ActionResponse::Ignored,
            },
            RowAction::Delete => match self.tree.leaf_path(row).cloned() {
                Some(path) => {
                    self.delete_pass(&path);
                    ActionResponse::Done
                }
                None => ActionResponse::Ignored,
            },
            RowAction::Duplicate => match self.tree.leaf_path(row).cloned() {
                Some(path) => {
                    self.duplicate_pass(&path);
                    ActionResponse::Done
                }
                None => ActionResponse::Ignored,
            },
            RowAction::Separator => ActionResponse::Ignored,
        }
    }

    // ========================================================================
    // Network
    // ========================================================================

    /// Re-runs the network upgrade. Failures are logged, never returned.
    pub fn upgrade(&mut self) -> UpgradeOutcome {
        let outcome = upgrade(self.network.as_mut(), self.params.as_mut());
        if outcome == UpgradeOutcome::Failed {
            self.notify(Severity::Error, "Network upgrade failed, see log".to_owned());
        }
        outcome
    }

    fn after_mutation(&mut self) {
        self.tree.reconcile(&self.store);
        self.sync_network();
        if let Err(err) = mirror_store(self.params.as_mut(), &self.store) {
            log::error!("Failed to store passes: {err}");
            self.notify(Severity::Error, err.to_string());
        }
    }

    fn sync_network(&mut self) {
        let passes = self.store.enabled_passes();
        if let Err(err) = self.network.sync_passes(&passes) {
            log::error!("Network sync failed: {err}");
            self.notify(Severity::Error, err.to_string());
        }
    }

    fn notify(&mut self, severity: Severity, message: String) {
        self.notices.push(Notice { severity, message });
    }
}
