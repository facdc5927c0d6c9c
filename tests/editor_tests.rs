//! Editor Integration Tests
//!
//! Tests for:
//! - PassEditor::create / open against fake host collaborators
//! - Network upgrade: up to date, migrated, locked, failing
//! - Row actions, context menu and the Adopt toggle
//! - Parameter mirroring and command queue draining

use std::cell::RefCell;
use std::rc::Rc;

use pass_manager::editor::network::{LOCATION_CREATE_NODE, MERGE_NODE, OPSCRIPT_NODE};
use pass_manager::editor::params::{PARAM_INFO, PARAM_PASSES, PARAM_VERSION, read_version};
use pass_manager::editor::{CURRENT_NETWORK_VERSION, NetworkTemplate, UpgradeOutcome};
use pass_manager::prelude::*;

// ============================================================================
// Fake collaborators
// ============================================================================

#[derive(Debug, Default)]
struct NetworkLog {
    built: Vec<NetworkTemplate>,
    synced: Vec<Vec<String>>,
    upgrades: Vec<(u32, u32)>,
    locked: bool,
    fail_upgrade: bool,
    fail_build: bool,
}

#[derive(Clone, Default)]
struct FakeNetwork(Rc<RefCell<NetworkLog>>);

impl NetworkBuilder for FakeNetwork {
    fn build_default(&mut self, template: &NetworkTemplate) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_build {
            return Err(PassError::NetworkError("cannot create nodes".into()));
        }
        log.built.push(template.clone());
        Ok(())
    }

    fn sync_passes(&mut self, passes: &[PassEntry]) -> Result<()> {
        let names = passes.iter().map(|p| p.path.leaf.clone()).collect();
        self.0.borrow_mut().synced.push(names);
        Ok(())
    }

    fn upgrade(&mut self, from_version: u32, to_version: u32) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_upgrade {
            return Err(PassError::NetworkError("node graph is read-only".into()));
        }
        log.upgrades.push((from_version, to_version));
        Ok(())
    }

    fn is_locked(&self) -> bool {
        self.0.borrow().locked
    }
}

/// Parameter store whose contents outlive the editor, like a saved scene.
#[derive(Clone, Default)]
struct SharedParams(Rc<RefCell<InMemoryParameterStore>>);

impl ParameterStore for SharedParams {
    fn get(&self, key: &str) -> Option<ParamValue> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: ParamValue) {
        self.0.borrow_mut().set(key, value);
    }
}

#[derive(Clone, Default)]
struct FakeHost(Rc<RefCell<Vec<RowPath>>>);

impl HostActions for FakeHost {
    fn adopt_for_editing(&mut self, row: &RowPath) {
        self.0.borrow_mut().push(row.clone());
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn create_editor() -> (PassEditor, FakeNetwork, SharedParams) {
    init_logger();
    let network = FakeNetwork::default();
    let params = SharedParams::default();
    let editor = PassEditor::create(
        PassSettings::default(),
        Box::new(network.clone()),
        Box::new(params.clone()),
    )
    .expect("create editor");
    (editor, network, params)
}

fn add(editor: &mut PassEditor, pass_type: &str, category: &str, iteration: u32) -> LeafPath {
    let mut dialog = editor.add_dialog();
    dialog.select_type(pass_type).unwrap();
    dialog.select_category(category).unwrap();
    dialog.select_iteration(iteration).unwrap();
    editor.submit_add(&dialog).expect("pass added")
}

fn leaf_row(editor: &PassEditor, name: &str) -> RowKey {
    let path = editor.store().find_leaf(name).expect("leaf in store");
    editor.tree().find_leaf(&path).expect("leaf row")
}

// ============================================================================
// Create / Open
// ============================================================================

#[test]
fn create_builds_default_network_and_parameters() {
    let (editor, network, params) = create_editor();

    let log = network.0.borrow();
    assert_eq!(log.built.len(), 1);
    let template = &log.built[0];
    assert!(template.is_well_formed());
    for name in [MERGE_NODE, LOCATION_CREATE_NODE, OPSCRIPT_NODE] {
        assert!(template.node(name).is_some(), "missing node {name}");
    }

    assert_eq!(read_version(&params), CURRENT_NETWORK_VERSION);
    assert!(params.get(PARAM_INFO).is_some());
    assert!(params.get(PARAM_PASSES).is_some());
    assert!(editor.store().is_empty());
    assert!(editor.tree().is_empty());
}

#[test]
fn failed_build_leaves_parameters_untouched() {
    init_logger();
    let network = FakeNetwork::default();
    network.0.borrow_mut().fail_build = true;
    let params = SharedParams::default();

    let result = PassEditor::create(
        PassSettings::default(),
        Box::new(network.clone()),
        Box::new(params.clone()),
    );

    assert!(matches!(result, Err(PassError::NetworkError(_))));
    assert!(params.0.borrow().is_empty());
    assert!(network.0.borrow().built.is_empty());
}

#[test]
fn open_restores_saved_hierarchy() {
    let (mut editor, _, params) = create_editor();
    add(&mut editor, "bty", "char", 1);
    add(&mut editor, "rfl", "env", 2);
    let saved = editor.store().snapshot();
    drop(editor);

    let network = FakeNetwork::default();
    let reopened = PassEditor::open(
        PassSettings::default(),
        Box::new(network.clone()),
        Box::new(params.clone()),
    )
    .unwrap();

    assert_eq!(reopened.store().snapshot(), saved);
    assert_eq!(reopened.tree().len(), 6);
    assert!(network.0.borrow().upgrades.is_empty());
    assert_eq!(
        network.0.borrow().synced.last().unwrap(),
        &vec!["bty_char_01".to_owned(), "rfl_env_02".to_owned()]
    );
}

#[test]
fn open_rejects_invalid_settings() {
    init_logger();
    let settings = PassSettings {
        pass_types: Vec::new(),
        ..PassSettings::default()
    };
    let result = PassEditor::open(
        settings,
        Box::new(FakeNetwork::default()),
        Box::new(InMemoryParameterStore::new()),
    );
    assert!(matches!(result, Err(PassError::InvalidSettings(_))));
}

// ============================================================================
// Upgrade
// ============================================================================

fn open_with_version(version: Option<f64>, network: &FakeNetwork) -> (PassEditor, SharedParams) {
    init_logger();
    let mut params = SharedParams::default();
    if let Some(v) = version {
        params.set(PARAM_VERSION, ParamValue::Number(v));
    }
    let editor = PassEditor::open(
        PassSettings::default(),
        Box::new(network.clone()),
        Box::new(params.clone()),
    )
    .unwrap();
    (editor, params)
}

#[test]
fn open_upgrades_unversioned_network() {
    let network = FakeNetwork::default();
    let (mut editor, params) = open_with_version(None, &network);

    assert_eq!(network.0.borrow().upgrades, vec![(0, CURRENT_NETWORK_VERSION)]);
    assert_eq!(read_version(&params), CURRENT_NETWORK_VERSION);
    assert!(editor.take_notices().is_empty());
    assert_eq!(editor.upgrade(), UpgradeOutcome::UpToDate);
}

#[test]
fn locked_network_is_not_upgraded() {
    let network = FakeNetwork::default();
    network.0.borrow_mut().locked = true;
    let (mut editor, params) = open_with_version(Some(0.0), &network);

    assert!(network.0.borrow().upgrades.is_empty());
    assert_eq!(read_version(&params), 0);
    assert_eq!(editor.upgrade(), UpgradeOutcome::SkippedLocked);
}

#[test]
fn failed_upgrade_is_reported_not_propagated() {
    let network = FakeNetwork::default();
    network.0.borrow_mut().fail_upgrade = true;
    let (mut editor, params) = open_with_version(Some(0.0), &network);

    assert_eq!(read_version(&params), 0);
    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[test]
fn newer_network_version_fails_upgrade() {
    let network = FakeNetwork::default();
    let (mut editor, params) = open_with_version(Some(f64::from(CURRENT_NETWORK_VERSION + 1)), &network);

    assert!(network.0.borrow().upgrades.is_empty());
    assert_eq!(read_version(&params), CURRENT_NETWORK_VERSION + 1);
    assert_eq!(editor.upgrade(), UpgradeOutcome::Failed);
}

// ============================================================================
// Commands through the editor
// ============================================================================

#[test]
fn add_rename_delete_update_every_view() {
    let (mut editor, network, params) = create_editor();

    add(&mut editor, "bty", "char", 1);
    assert_eq!(editor.tree().outline(), vec!["bty", "  char", "    [x] bty_char_01"]);

    let row = leaf_row(&editor, "bty_char_01");
    let ActionResponse::OpenRename(mut dialog) = editor.invoke(row, RowAction::Rename) else {
        panic!("expected rename dialog");
    };
    dialog.set_text("bty_char_07");
    let renamed = editor.submit_rename(&dialog).unwrap();
    assert_eq!(renamed.leaf, "bty_char_07");
    assert_eq!(editor.tree().outline(), vec!["bty", "  char", "    [x] bty_char_07"]);

    let stored = params.get(PARAM_PASSES).unwrap();
    assert!(stored.as_str().unwrap().contains("bty_char_07"));

    assert!(editor.delete_pass(&renamed));
    assert!(editor.tree().is_empty());
    assert!(network.0.borrow().synced.last().unwrap().is_empty());
}

#[test]
fn rejected_command_becomes_warning_notice() {
    let (mut editor, _, _) = create_editor();
    add(&mut editor, "bty", "char", 1);

    let dialog = editor.add_dialog();
    assert!(editor.submit_add(&dialog).is_none());

    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warning);
    assert!(notices[0].message.contains("bty_char_01"));
    assert_eq!(editor.store().leaf_count(), 1);
}

#[test]
fn custom_category_dialog() {
    let (mut editor, _, _) = create_editor();
    let mut dialog = editor.add_dialog();
    dialog.select_category("custom").unwrap();
    assert!(dialog.is_custom());
    dialog.set_custom_name("  hair ");
    let path = editor.submit_add(&dialog).unwrap();
    assert_eq!(path, LeafPath::new("bty", "hair", "bty_hair_01"));
}

#[test]
fn toggle_row_disables_pass_in_network() {
    let (mut editor, network, _) = create_editor();
    add(&mut editor, "bty", "char", 1);
    add(&mut editor, "bty", "char", 2);

    let row = leaf_row(&editor, "bty_char_01");
    assert!(editor.toggle_row(row, false));

    assert_eq!(editor.tree().row(row).unwrap().checked(), Some(false));
    assert_eq!(network.0.borrow().synced.last().unwrap(), &vec!["bty_char_02".to_owned()]);

    let category = editor.tree().row(row).unwrap().parent().unwrap();
    assert!(!editor.toggle_row(category, false));
}

#[test]
fn duplicate_from_context_menu() {
    let (mut editor, _, _) = create_editor();
    add(&mut editor, "shdw", "env", 1);
    add(&mut editor, "shdw", "env", 2);

    let row = leaf_row(&editor, "shdw_env_01");
    assert!(matches!(editor.invoke(row, RowAction::Duplicate), ActionResponse::Done));
    assert!(editor.store().contains_leaf("shdw_env_03"));
}

// ============================================================================
// Context menu
// ============================================================================

#[test]
fn adopt_follows_show_income_scene_toggle() {
    let (editor, _, _) = create_editor();
    let host = FakeHost::default();
    let mut editor = editor.with_host_actions(Box::new(host.clone()));
    add(&mut editor, "util", "prop", 3);

    let leaf = leaf_row(&editor, "util_prop_03");
    let type_row = editor.tree().find(&RowPath::Type("util".into())).unwrap();

    assert_eq!(
        editor.context_actions(leaf).as_slice(),
        &[RowAction::Rename, RowAction::Delete, RowAction::Duplicate]
    );
    assert!(editor.context_actions(type_row).is_empty());
    assert!(matches!(editor.invoke(type_row, RowAction::Adopt), ActionResponse::Ignored));

    editor.set_show_income_scene(true);
    assert_eq!(editor.context_actions(leaf)[0], RowAction::Adopt);
    assert_eq!(
        editor.context_actions(type_row).as_slice(),
        &[RowAction::Adopt, RowAction::Separator]
    );

    assert!(matches!(editor.invoke(type_row, RowAction::Adopt), ActionResponse::Done));
    assert_eq!(host.0.borrow().as_slice(), &[RowPath::Type("util".into())]);
}

#[test]
fn adopt_without_host_emits_info() {
    let (mut editor, _, _) = create_editor();
    add(&mut editor, "bty", "char", 1);
    editor.set_show_income_scene(true);

    let row = leaf_row(&editor, "bty_char_01");
    assert!(matches!(editor.invoke(row, RowAction::Adopt), ActionResponse::Done));

    let notices = editor.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);
}

// ============================================================================
// Queue
// ============================================================================

#[test]
fn drain_queue_applies_commands_from_other_thread() {
    let (mut editor, _, params) = create_editor();
    let queue = CommandQueue::new();
    let sender = queue.sender();

    std::thread::spawn(move || {
        for category in ["char", "env", "char_hair"] {
            let name = format!("rfl_{category}_01");
            sender
                .submit(PassCommand::Add {
                    pass_type: "rfl".into(),
                    category: category.into(),
                    name,
                    enabled: true,
                })
                .unwrap();
        }
        sender
            .submit(PassCommand::Delete {
                path: LeafPath::new("rfl", "fx", "rfl_fx_01"),
            })
            .unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(editor.drain_queue(&queue), 3);
    assert_eq!(editor.take_notices().len(), 1);
    assert_eq!(editor.tree().outline().len(), 7);

    let reloaded = pass_manager::editor::params::load_store(&params).unwrap();
    assert_eq!(reloaded.snapshot(), editor.store().snapshot());
}
