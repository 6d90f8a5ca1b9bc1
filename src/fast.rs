//! Direct-indexed variant for 16x16 boards with 4 or 5 robots.
//!
//! The lowest three key fields (24 bits) index one dense table instead of
//! walking the root and the first interior levels. Past the table, the walk is
//! the ordinary compressed trie: one interior level for 5 robots, none for 4,
//! then the split goal field.
//!
//! The table occupies the first `2^24` slots of the node address space
//! (allocated up front, 64 MiB), so table slots and node slots share one
//! encoding and one code path.

use std::marker::PhantomData;

use tracing::info;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::geometry::BoardGeometry;
use crate::key::TrieKey;
use crate::trie::{check_key_width, TrieCore, TrieStats};
use crate::KeyDepthMap;

/// Key fields resolved by the direct table.
pub const DIRECT_FIELDS: u32 = 3;
/// Coordinate width the direct table is built for.
pub const DIRECT_COORD_BITS: u32 = 8;
/// Number of slots in the direct table.
pub const DIRECT_TABLE_LEN: u32 = 1 << (DIRECT_FIELDS * DIRECT_COORD_BITS);

/// Whether the direct-indexed variant can serve this board.
pub fn supports(geometry: &BoardGeometry) -> bool {
    geometry.bits() == DIRECT_COORD_BITS && matches!(geometry.robot_count(), 4 | 5)
}

/// Key-depth trie with a direct lookup table over the first three robots.
#[derive(Debug)]
pub struct DirectIndexedTrie<K> {
    core: TrieCore,
    _key: PhantomData<K>,
}

impl<K: TrieKey> DirectIndexedTrie<K> {
    pub fn new(geometry: &BoardGeometry, config: &StoreConfig) -> Result<Self, StoreError> {
        if !supports(geometry) {
            return Err(StoreError::InvalidGeometry {
                reason: format!(
                    "direct table needs {DIRECT_COORD_BITS}-bit coordinates and 4 or 5 robots, \
                     got {} bits and {} robots",
                    geometry.bits(),
                    geometry.robot_count()
                ),
            });
        }
        check_key_width::<K>(geometry)?;
        let core = TrieCore::new(geometry, config, DIRECT_FIELDS, DIRECT_TABLE_LEN)?;
        info!(
            robots = geometry.robot_count(),
            table_bytes = core.allocated_bytes(),
            "direct-indexed store allocated"
        );
        Ok(Self {
            core,
            _key: PhantomData,
        })
    }

    pub fn stats(&self) -> TrieStats {
        self.core.stats()
    }
}

impl<K: TrieKey> KeyDepthMap<K> for DirectIndexedTrie<K> {
    #[inline]
    fn put_if_greater(&mut self, key: K, depth: u8) -> Result<bool, StoreError> {
        self.core.put_if_greater(key, depth)
    }

    fn get(&self, key: K) -> Option<u8> {
        self.core.get(key)
    }

    fn allocated_bytes(&self) -> u64 {
        self.core.allocated_bytes()
    }

    fn len(&self) -> u32 {
        self.core.len()
    }
}
