//! Visited-state store for sliding-robot puzzle solvers
//!
//! Maps packed multi-robot placements to the best search depth seen for them,
//! using a compressed trie over chunked arenas. A small reference solver and
//! board parser are bundled to drive the store end to end.

pub mod arena;
pub mod config;
pub mod error;
pub mod fast;
pub mod geometry;
pub mod grid;
pub mod key;
pub mod slot;
pub mod solver;
pub mod trie;

#[cfg(test)]
mod proptests;

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use tracing::debug;

pub use config::StoreConfig;
pub use error::{SolveError, StoreError};
pub use fast::DirectIndexedTrie;
pub use geometry::BoardGeometry;
pub use key::{KeyLayout, KeyWidth, TrieKey};
pub use trie::{KeyDepthTrie, TrieStats};

/// Visited-state store contract consumed by a search driver.
///
/// Implementations erase which storage strategy backs the map, so the
/// driver holds a `Box<dyn KeyDepthMap<K>>` regardless of board size.
pub trait KeyDepthMap<K: TrieKey> {
    /// Stores `depth` for `key` unless an equal or greater depth is already
    /// stored. Returns whether the stored value changed.
    ///
    /// `key` must be canonical for the board the map was built for; this is
    /// only checked in debug builds.
    fn put_if_greater(&mut self, key: K, depth: u8) -> Result<bool, StoreError>;

    /// Depth stored for `key`, if any.
    fn get(&self, key: K) -> Option<u8>;

    /// Bytes currently reserved by the store's backing arrays.
    fn allocated_bytes(&self) -> u64;

    /// Number of distinct keys stored.
    fn len(&self) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash map implementation of [`KeyDepthMap`].
///
/// Used as the reference model in tests and the baseline in benches.
#[derive(Debug, Default)]
pub struct FxKeyDepthMap<K> {
    depths: FxHashMap<u64, u8>,
    _key: std::marker::PhantomData<K>,
}

impl<K: TrieKey> FxKeyDepthMap<K> {
    pub fn new() -> Self {
        Self {
            depths: FxHashMap::default(),
            _key: std::marker::PhantomData,
        }
    }
}

impl<K: TrieKey> KeyDepthMap<K> for FxKeyDepthMap<K> {
    fn put_if_greater(&mut self, key: K, depth: u8) -> Result<bool, StoreError> {
        match self.depths.entry(key.to_u64()) {
            Entry::Vacant(slot) => {
                slot.insert(depth);
                Ok(true)
            }
            Entry::Occupied(mut slot) if depth > *slot.get() => {
                slot.insert(depth);
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
        }
    }

    fn get(&self, key: K) -> Option<u8> {
        self.depths.get(&key.to_u64()).copied()
    }

    fn allocated_bytes(&self) -> u64 {
        (self.depths.capacity() * (std::mem::size_of::<(u64, u8)>() + 1)) as u64
    }

    fn len(&self) -> u32 {
        self.depths.len() as u32
    }
}

/// Builds the store variant that suits `geometry`.
///
/// The direct-indexed variant is chosen when `config` trades memory for
/// speed and the board has 8-bit coordinates with 4 or 5 robots; every other
/// board gets the generic trie.
pub fn new_key_depth_map<K: TrieKey>(
    geometry: &BoardGeometry,
    config: &StoreConfig,
) -> Result<Box<dyn KeyDepthMap<K>>, StoreError> {
    if config.trade_memory_for_speed && fast::supports(geometry) {
        debug!("using direct-indexed store");
        Ok(Box::new(DirectIndexedTrie::<K>::new(geometry, config)?))
    } else {
        debug!("using generic trie store");
        Ok(Box::new(KeyDepthTrie::<K>::new(geometry, config)?))
    }
}
