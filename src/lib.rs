#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! # Pass Manager
//!
//! Organizes render passes as a `Type → Category → Instance` hierarchy and
//! keeps it in sync with a host node network.
//!
//! | Crate            | Re-exported as            | Contents                                 |
//! |------------------|---------------------------|------------------------------------------|
//! | `pass_core`      | [`base`]                  | naming scheme, errors, settings          |
//! | `pass_hierarchy` | [`hierarchy`]             | tree, store, commands, snapshots         |
//! | `pass_editor`    | [`editor`]                | tree adapter, dialogs, collaborators     |
//!
//! ```rust,ignore
//! use pass_manager::prelude::*;
//!
//! let mut store = HierarchyStore::new();
//! store.add("bty", "char", "bty_char_01", true)?;
//! let copy = store.duplicate(&"bty_char_01".parse()?)?;
//! assert_eq!(copy.to_string(), "bty_char_02");
//! ```

pub use pass_core as base;
pub use pass_editor as editor;
pub use pass_hierarchy as hierarchy;

pub use pass_core::{Identifier, PassError, PassSettings, Result};
pub use pass_editor::{PassEditor, VisualTree};
pub use pass_hierarchy::{HierarchyStore, LeafPath};

pub mod prelude {
    pub use pass_core::{Identifier, PassError, PassSettings, Result};
    pub use pass_editor::{
        ActionResponse, AddPassDialog, HostActions, InMemoryParameterStore, NetworkBuilder, Notice,
        ParamValue, ParameterStore, PassEditor, RenameDialog, RowAction, RowKey, RowPath, Severity,
        VisualTree,
    };
    pub use pass_hierarchy::{
        CommandOutcome, CommandQueue, HierarchyLevel, HierarchyNode, HierarchyStore, LeafPath,
        PassCommand, PassEntry, StoreSnapshot,
    };
}

/// Crate version, for host plugin registration.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
