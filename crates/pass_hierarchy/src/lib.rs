//! Pass hierarchy
//!
//! The `Type → Category → Instance` tree of render passes:
//! - [`HierarchyNode`]: one tree node, children sorted by name
//! - [`HierarchyStore`]: owner of the tree and its mutation rules
//! - [`LeafPath`]: address of a pass instance
//! - [`PassCommand`] / [`CommandQueue`]: serialized mutations for threaded hosts
//! - [`StoreSnapshot`]: flat save / restore form

pub mod command;
pub mod node;
pub mod path;
pub mod snapshot;
pub mod store;

pub use command::{CommandOutcome, CommandQueue, CommandSender, PassCommand};
pub use node::{HierarchyLevel, HierarchyNode};
pub use path::LeafPath;
pub use snapshot::{PassRecord, StoreSnapshot};
pub use store::{HierarchyStore, PassEntry};
