//! Store snapshots for session save / restore.
//!
//! A snapshot is the flat list of leaves with their toggle state. The tree
//! shape is implied by the names, so restoring only needs to replay `add`.

use pass_core::{Identifier, Result};
use serde::{Deserialize, Serialize};

use crate::store::HierarchyStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRecord {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub passes: Vec<PassRecord>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl HierarchyStore {
    /// Captures every leaf in tree order.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            passes: self
                .leaves()
                .map(|entry| PassRecord {
                    name: entry.path.leaf,
                    enabled: entry.enabled,
                })
                .collect(),
        }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// Each record goes through [`HierarchyStore::add`]; the first invalid
    /// record aborts the restore and no store is returned.
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Result<Self> {
        let mut store = Self::new();
        for record in &snapshot.passes {
            let id = Identifier::parse(&record.name)?;
            store.add(id.pass_type(), id.category(), &record.name, record.enabled)?;
        }
        log::info!("Restored {} passes", store.leaf_count());
        Ok(store)
    }
}
