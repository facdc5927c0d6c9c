//! Core types shared by the pass manager crates:
//! - [`Identifier`]: the `type_category_NN` naming scheme
//! - [`PassError`] / [`Result`]: error handling
//! - [`PassSettings`]: dialog option sets and editor defaults
//! - [`ChangeTracker`]: revision counter for change detection

pub mod errors;
pub mod identifier;
pub mod settings;
pub mod version_tracker;

pub use errors::{PassError, Result};
pub use identifier::{ITERATION_WIDTH, Identifier, SEPARATOR};
pub use settings::PassSettings;
pub use version_tracker::ChangeTracker;
