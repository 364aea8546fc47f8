use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::chain::tree::ChainNode;
use crate::foundation::error::FxResult;

/// Owner kind of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainDomain {
    /// Effect chain of a cue cell.
    Cue,
    /// Per-projector effect chain.
    Projector,
    /// Per-zone effect chain.
    Zone,
    /// Preset chain of a cue cell.
    Preset,
}

/// Identifies one chain: the owner kind plus the owner's key (cue cell, projector id, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainKey {
    /// Owner kind.
    pub domain: ChainDomain,
    /// Owner key within the domain.
    pub entity: String,
}

impl ChainKey {
    /// Key for `entity` in `domain`.
    pub fn new(domain: ChainDomain, entity: impl Into<String>) -> Self {
        Self {
            domain,
            entity: entity.into(),
        }
    }
}

/// A chain as exchanged with editors and stored on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainDocument<L> {
    /// Owner of the chain.
    pub key: ChainKey,
    /// Top-level nodes.
    #[serde(default = "Vec::new")]
    pub nodes: Vec<ChainNode<L>>,
}

/// Immutable view of one chain.
pub type ChainSnapshot<L> = Arc<Vec<ChainNode<L>>>;

/// Copy-on-write chain storage shared between editors and the render loop.
///
/// Readers get an `Arc` snapshot that no later edit can change. Writers clone the current
/// chain, mutate the clone outside the map lock and publish it in one swap, so a render never
/// sees a half-applied edit and never waits on one.
#[derive(Debug)]
pub struct ChainStore<L> {
    chains: RwLock<HashMap<ChainKey, ChainSnapshot<L>>>,
    // Serializes writers; the map lock is only held to read or swap a pointer.
    writer: Mutex<()>,
}

impl<L> Default for ChainStore<L> {
    fn default() -> Self {
        Self {
            chains: RwLock::new(HashMap::new()),
            writer: Mutex::new(()),
        }
    }
}

impl<L: Clone> ChainStore<L> {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of the chain at `key`.
    pub fn snapshot(&self, key: &ChainKey) -> Option<ChainSnapshot<L>> {
        let chains = self.chains.read().unwrap_or_else(PoisonError::into_inner);
        chains.get(key).cloned()
    }

    /// Publish `nodes` as the chain at `key`, returning the new snapshot.
    pub fn replace(&self, key: ChainKey, nodes: Vec<ChainNode<L>>) -> ChainSnapshot<L> {
        let snapshot = Arc::new(nodes);
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
        chains.insert(key, Arc::clone(&snapshot));
        snapshot
    }

    /// Edit the chain at `key` (empty if absent).
    ///
    /// The edit runs on a private copy; it is published only when `edit` returns `Ok`.
    /// Concurrent writers are serialized. Readers keep getting the previous snapshot while
    /// `edit` runs.
    pub fn update<R>(
        &self,
        key: &ChainKey,
        edit: impl FnOnce(&mut Vec<ChainNode<L>>) -> FxResult<R>,
    ) -> FxResult<R> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut draft: Vec<ChainNode<L>> = self
            .snapshot(key)
            .map(|current| current.as_ref().clone())
            .unwrap_or_default();
        let out = edit(&mut draft)?;
        let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
        chains.insert(key.clone(), Arc::new(draft));
        Ok(out)
    }

    /// Drop the chain at `key`, returning its last snapshot.
    pub fn remove(&self, key: &ChainKey) -> Option<ChainSnapshot<L>> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut chains = self.chains.write().unwrap_or_else(PoisonError::into_inner);
        chains.remove(key)
    }

    /// Keys of every stored chain, sorted.
    pub fn keys(&self) -> Vec<ChainKey> {
        let chains = self.chains.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<ChainKey> = chains.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Publish a document's chain.
    pub fn load_document(&self, doc: ChainDocument<L>) -> ChainSnapshot<L> {
        self.replace(doc.key, doc.nodes)
    }

    /// Export the chain at `key` as a document.
    pub fn document(&self, key: &ChainKey) -> Option<ChainDocument<L>> {
        self.snapshot(key).map(|nodes| ChainDocument {
            key: key.clone(),
            nodes: nodes.as_ref().clone(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/store.rs"]
mod tests;
