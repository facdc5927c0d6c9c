//! Pass editor
//!
//! Everything between the hierarchy store and the host application:
//! - [`VisualTree`]: presentation adapter for the host's tree widget
//! - [`AddPassDialog`] / [`RenameDialog`]: dialog models
//! - [`NetworkBuilder`], [`ParameterStore`], [`HostActions`]: injected host collaborators
//! - [`default_network`]: the stock internal network
//! - [`upgrade`]: migration of networks built by older versions
//! - [`PassEditor`]: the facade driving all of the above

pub mod collaborators;
pub mod dialogs;
pub mod editor;
pub mod network;
pub mod params;
pub mod tree_view;
pub mod upgrade;

pub use collaborators::{HostActions, InMemoryParameterStore, NetworkBuilder, ParamValue, ParameterStore};
pub use dialogs::{AddPassDialog, CategoryChoice, RenameDialog};
pub use editor::{ActionResponse, Notice, PassEditor, Severity};
pub use network::{NetworkTemplate, default_network};
pub use tree_view::{ReconcileStats, RowAction, RowFlags, RowKey, RowPath, VisualRow, VisualTree};
pub use upgrade::{CURRENT_NETWORK_VERSION, UpgradeOutcome, upgrade};
