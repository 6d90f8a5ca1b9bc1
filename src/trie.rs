//! Compressed trie from packed robot placements to depth bytes.
//!
//! The walk consumes one key field per level:
//! - an entry table indexed by the raw lowest field(s): the root for the
//!   generic trie, a 24-bit direct table for the fast variant
//! - interior levels indexed by the compacted rank of the next interchangeable
//!   robot, in nodes sized by [`BoardGeometry::free_above`] of the previous one
//! - the goal field, split into a low half that picks a slot in a leaf node
//!   and a high half that picks a byte in a leaf block
//!
//! Every slot whose remaining key fits [`BRANCH_REST_BITS`] may instead hold a
//! compressed branch; a single-occupant path never allocates. When a second
//! key arrives at a branch, the branch is pushed one level down into a fresh
//! block and both walks continue there.

use std::marker::PhantomData;
use std::ops::ControlFlow;

use tracing::debug;

use crate::arena::{Addr, ChunkedArena, LeafArena};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::geometry::BoardGeometry;
use crate::key::TrieKey;
use crate::slot::{with_depth, Slot, BRANCH_REST_BITS};
use crate::KeyDepthMap;

const NODE_TABLE_CAPACITY: usize = 4;
const LEAF_TABLE_CAPACITY: usize = 16;

/// Storage counters for instrumentation and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Distinct keys stored.
    pub entries: u32,
    /// Node address space handed out, including the entry table.
    pub node_slots_used: u64,
    /// Chunks backing the node arena.
    pub node_chunks: usize,
    /// Leaf address space handed out, including the reserved null block.
    pub leaf_bytes_used: u64,
    /// Chunks backing the leaf bytes.
    pub leaf_chunks: usize,
}

/// Where the current slot sits, which decides how it expands.
#[derive(Clone, Copy, Debug)]
enum Tier {
    /// Slot selecting the next interchangeable robot above `prev`.
    Interior { prev: u32, compressible: bool },
    /// Slot selecting the low half of the goal field.
    LeafNode,
    /// Slot selecting the high half of the goal field.
    LeafBlock,
}

impl Tier {
    #[inline(always)]
    fn compressible(self) -> bool {
        match self {
            Tier::Interior { compressible, .. } => compressible,
            Tier::LeafNode | Tier::LeafBlock => true,
        }
    }
}

/// Trie state shared by the generic and the direct-indexed variant.
#[derive(Debug)]
pub(crate) struct TrieCore {
    geometry: BoardGeometry,
    nodes: ChunkedArena<i32>,
    leaves: LeafArena,
    /// Key fields consumed by the entry table.
    entry_fields: u32,
    leaf_node_shift: u32,
    leaf_node_len: u32,
    leaf_len: u32,
    entries: u32,
}

impl TrieCore {
    /// Builds an empty trie whose entry table covers the lowest
    /// `entry_fields` key fields with `entry_len` slots.
    pub(crate) fn new(
        geometry: &BoardGeometry,
        config: &StoreConfig,
        entry_fields: u32,
        entry_len: u32,
    ) -> Result<Self, StoreError> {
        config.check_shifts()?;
        let bits = geometry.bits();
        if bits > BRANCH_REST_BITS {
            return Err(StoreError::InvalidGeometry {
                reason: format!("{bits}-bit coordinates exceed the {BRANCH_REST_BITS}-bit branch"),
            });
        }
        let leaf_node_shift = bits / 2;
        let leaf_node_len = 1 << leaf_node_shift;
        let leaf_len = 1 << (bits - leaf_node_shift);

        let node_chunk = 1u32 << config.node_chunk_shift;
        let leaf_chunk = 1u32 << config.leaf_chunk_shift;
        let widest_node = geometry.max_node_len().max(leaf_node_len);
        if widest_node > node_chunk {
            return Err(StoreError::InvalidConfig {
                reason: format!("node of {widest_node} slots exceeds a {node_chunk}-slot chunk"),
            });
        }
        if leaf_len > leaf_chunk {
            return Err(StoreError::InvalidConfig {
                reason: format!("leaf of {leaf_len} bytes exceeds a {leaf_chunk}-byte chunk"),
            });
        }

        let nodes = ChunkedArena::new(
            "node arena",
            config.node_chunk_shift,
            NODE_TABLE_CAPACITY,
            entry_len,
        )?;
        let leaves = LeafArena::new(config.leaf_chunk_shift, LEAF_TABLE_CAPACITY, leaf_len)?;
        debug!(
            cells = geometry.cell_count(),
            robots = geometry.robot_count(),
            bits,
            entry_fields,
            entry_len,
            "trie created"
        );
        Ok(Self {
            geometry: geometry.clone(),
            nodes,
            leaves,
            entry_fields,
            leaf_node_shift,
            leaf_node_len,
            leaf_len,
            entries: 0,
        })
    }

    #[inline(always)]
    fn coord_mask(&self) -> u32 {
        (1 << self.geometry.bits()) - 1
    }

    #[inline(always)]
    fn leaf_node_mask(&self) -> u32 {
        self.leaf_node_len - 1
    }

    #[inline(always)]
    fn leaf_mask(&self) -> u32 {
        self.leaf_len - 1
    }

    /// Slot for robot `cur` inside the node that follows robot `prev`.
    #[inline(always)]
    fn interior_slot(&self, node: Addr, prev: u32, cur: u32) -> Addr {
        debug_assert!(cur > prev, "interchangeable robots must ascend");
        node.offset(self.geometry.rank(cur) - self.geometry.rank(prev) - 1)
    }

    /// Entry slot, the field that indexed it, and the unconsumed key.
    #[inline(always)]
    fn enter<K: TrieKey>(&self, key: K) -> (Addr, u32, K) {
        let bits = self.geometry.bits();
        let entry_bits = self.entry_fields * bits;
        let slot = Addr::new(key.low_bits(entry_bits));
        let prev = key.shr(entry_bits - bits).low_bits(bits);
        (slot, prev, key.shr(entry_bits))
    }

    #[inline]
    fn interior_tier(&self, level: u32, prev: u32) -> Tier {
        let remaining = (self.geometry.robot_count() - level) * self.geometry.bits();
        Tier::Interior {
            prev,
            compressible: remaining <= BRANCH_REST_BITS,
        }
    }

    pub(crate) fn put_if_greater<K: TrieKey>(
        &mut self,
        key: K,
        depth: u8,
    ) -> Result<bool, StoreError> {
        debug_assert!(
            self.geometry.is_canonical_key(key.to_u64()),
            "non-canonical key {key:?}"
        );
        let bits = self.geometry.bits();
        let (mut slot, mut prev, mut rest) = self.enter(key);

        for level in self.entry_fields..self.geometry.robot_count() - 1 {
            let tier = self.interior_tier(level, prev);
            let node = match self.step(slot, tier, rest.low_bits(BRANCH_REST_BITS), depth)? {
                ControlFlow::Break(changed) => return Ok(changed),
                ControlFlow::Continue(node) => node,
            };
            let cur = rest.low_bits(bits);
            slot = self.interior_slot(node, prev, cur);
            prev = cur;
            rest = rest.shr(bits);
        }

        let goal = rest.low_bits(bits);
        let node = match self.step(slot, Tier::LeafNode, goal, depth)? {
            ControlFlow::Break(changed) => return Ok(changed),
            ControlFlow::Continue(node) => node,
        };
        let slot = node.offset(goal & self.leaf_node_mask());
        let high = goal >> self.leaf_node_shift;
        let block = match self.step(slot, Tier::LeafBlock, high, depth)? {
            ControlFlow::Break(changed) => return Ok(changed),
            ControlFlow::Continue(block) => block,
        };
        let (changed, fresh) = self.leaves.merge(block.offset(high & self.leaf_mask()), depth);
        if fresh {
            self.entries += 1;
        }
        Ok(changed)
    }

    /// Handles one slot on the insert path.
    ///
    /// Breaks with the put result when the key ends in this slot, otherwise
    /// continues with the child block to descend into.
    #[inline]
    fn step(
        &mut self,
        slot: Addr,
        tier: Tier,
        rest: u32,
        depth: u8,
    ) -> Result<ControlFlow<bool, Addr>, StoreError> {
        let raw = self.nodes.get(slot);
        match Slot::unpack(raw) {
            Slot::Child(child) => Ok(ControlFlow::Continue(child)),
            Slot::Empty if !tier.compressible() => {
                self.expand(slot, tier).map(ControlFlow::Continue)
            }
            Slot::Empty => {
                self.nodes.set(slot, Slot::Branch { rest, depth }.pack());
                self.entries += 1;
                Ok(ControlFlow::Break(true))
            }
            Slot::Branch { rest: stored, depth: old } if stored == rest => {
                if depth > old {
                    self.nodes.set(slot, with_depth(raw, depth));
                    Ok(ControlFlow::Break(true))
                } else {
                    Ok(ControlFlow::Break(false))
                }
            }
            Slot::Branch { rest: stored, depth: old } => {
                let child = self.expand(slot, tier)?;
                self.push_down(child, tier, stored, old);
                Ok(ControlFlow::Continue(child))
            }
        }
    }

    /// Allocates the block below `slot` and links it in.
    fn expand(&mut self, slot: Addr, tier: Tier) -> Result<Addr, StoreError> {
        let child = match tier {
            Tier::Interior { prev, .. } => self.nodes.alloc(self.geometry.free_above(prev))?,
            Tier::LeafNode => self.nodes.alloc(self.leaf_node_len)?,
            Tier::LeafBlock => self.leaves.alloc(self.leaf_len)?,
        };
        self.nodes.set(slot, Slot::Child(child).pack());
        Ok(child)
    }

    /// Re-inserts a displaced branch one level further down, inside `child`.
    fn push_down(&mut self, child: Addr, tier: Tier, stored: u32, depth: u8) {
        match tier {
            Tier::Interior { prev, .. } => {
                let bits = self.geometry.bits();
                let slot = self.interior_slot(child, prev, stored & self.coord_mask());
                let rest = stored >> bits;
                self.nodes.set(slot, Slot::Branch { rest, depth }.pack());
            }
            Tier::LeafNode => {
                let slot = child.offset(stored & self.leaf_node_mask());
                let rest = stored >> self.leaf_node_shift;
                self.nodes.set(slot, Slot::Branch { rest, depth }.pack());
            }
            Tier::LeafBlock => {
                self.leaves
                    .store(child.offset(stored & self.leaf_mask()), depth);
            }
        }
    }

    pub(crate) fn get<K: TrieKey>(&self, key: K) -> Option<u8> {
        let bits = self.geometry.bits();
        let (mut slot, mut prev, mut rest) = self.enter(key);

        for _ in self.entry_fields..self.geometry.robot_count() - 1 {
            let node = match self.peek(slot, rest.low_bits(BRANCH_REST_BITS)) {
                ControlFlow::Break(found) => return found,
                ControlFlow::Continue(node) => node,
            };
            let cur = rest.low_bits(bits);
            slot = self.interior_slot(node, prev, cur);
            prev = cur;
            rest = rest.shr(bits);
        }

        let goal = rest.low_bits(bits);
        let node = match self.peek(slot, goal) {
            ControlFlow::Break(found) => return found,
            ControlFlow::Continue(node) => node,
        };
        let high = goal >> self.leaf_node_shift;
        let block = match self.peek(node.offset(goal & self.leaf_node_mask()), high) {
            ControlFlow::Break(found) => return found,
            ControlFlow::Continue(block) => block,
        };
        self.leaves.get(block.offset(high & self.leaf_mask()))
    }

    #[inline]
    fn peek(&self, slot: Addr, rest: u32) -> ControlFlow<Option<u8>, Addr> {
        match Slot::unpack(self.nodes.get(slot)) {
            Slot::Empty => ControlFlow::Break(None),
            Slot::Branch { rest: stored, depth } => {
                ControlFlow::Break((stored == rest).then_some(depth))
            }
            Slot::Child(child) => ControlFlow::Continue(child),
        }
    }

    pub(crate) fn len(&self) -> u32 {
        self.entries
    }

    pub(crate) fn allocated_bytes(&self) -> u64 {
        self.nodes.allocated_bytes() + self.leaves.allocated_bytes()
    }

    pub(crate) fn stats(&self) -> TrieStats {
        TrieStats {
            entries: self.entries,
            node_slots_used: self.nodes.used(),
            node_chunks: self.nodes.chunk_count(),
            leaf_bytes_used: self.leaves.used(),
            leaf_chunks: self.leaves.chunk_count(),
        }
    }

    pub(crate) fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }
}

/// Checks that `K` can hold every key of `geometry`.
pub(crate) fn check_key_width<K: TrieKey>(geometry: &BoardGeometry) -> Result<(), StoreError> {
    let required_bits = geometry.layout().key_bits();
    if required_bits > K::BITS {
        return Err(StoreError::KeyTooNarrow {
            required_bits,
            key_bits: K::BITS,
        });
    }
    Ok(())
}

/// The general-purpose key-depth trie.
///
/// Works for any board whose coordinates fit [`BRANCH_REST_BITS`]; the root
/// is indexed by the raw lowest key field.
#[derive(Debug)]
pub struct KeyDepthTrie<K> {
    core: TrieCore,
    _key: PhantomData<K>,
}

impl<K: TrieKey> KeyDepthTrie<K> {
    pub fn new(geometry: &BoardGeometry, config: &StoreConfig) -> Result<Self, StoreError> {
        check_key_width::<K>(geometry)?;
        let core = TrieCore::new(geometry, config, 1, geometry.cell_count())?;
        Ok(Self {
            core,
            _key: PhantomData,
        })
    }

    pub fn stats(&self) -> TrieStats {
        self.core.stats()
    }

    pub fn geometry(&self) -> &BoardGeometry {
        self.core.geometry()
    }
}

impl<K: TrieKey> KeyDepthMap<K> for KeyDepthTrie<K> {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> StoreConfig {
        StoreConfig {
            trade_memory_for_speed: false,
            node_chunk_shift: 5,
            leaf_chunk_shift: 4,
        }
    }

    fn open_board(cells: u32, robots: u32) -> BoardGeometry {
        BoardGeometry::new(cells, |_| false, robots).unwrap()
    }

    #[test]
    fn test_two_cell_single_robot_scenario() {
        let geometry = open_board(2, 1);
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &StoreConfig::default()).unwrap();

        assert_eq!(trie.put_if_greater(0, 3), Ok(true));
        assert_eq!(trie.put_if_greater(0, 2), Ok(false));
        assert_eq!(trie.get(0), Some(3));
        assert_eq!(trie.put_if_greater(0, 7), Ok(true));
        assert_eq!(trie.get(0), Some(7));
        assert_eq!(trie.put_if_greater(1, 1), Ok(true));
        assert_eq!(trie.get(1), Some(1));
        assert_eq!(trie.get(0), Some(7));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_non_increasing_values_only_first_wins() {
        let geometry = open_board(16, 3);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let key = layout.encode(7, &[12, 3]) as u32;

        assert_eq!(trie.put_if_greater(key, 9), Ok(true));
        for depth in [9, 8, 8, 2, 0] {
            assert_eq!(trie.put_if_greater(key, depth), Ok(false));
        }
        assert_eq!(trie.get(key), Some(9));
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_improvement_is_reported_and_kept() {
        let geometry = open_board(16, 3);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let key = layout.encode(0, &[4, 5]) as u32;

        assert_eq!(trie.put_if_greater(key, 5), Ok(true));
        assert_eq!(trie.put_if_greater(key, 9), Ok(true));
        assert_eq!(trie.get(key), Some(9));
        assert_eq!(trie.len(), 1, "improvement is not a new entry");
    }

    #[test]
    fn test_push_down_allocates_one_node_and_keeps_old_value() {
        let geometry = open_board(16, 3);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let a = layout.encode(5, &[0, 1]) as u32;
        let b = layout.encode(5, &[0, 2]) as u32;

        assert_eq!(trie.put_if_greater(a, 11), Ok(true));
        let before = trie.stats();
        assert_eq!(before.node_slots_used, 16, "a lone key only touches the root");

        assert_eq!(trie.put_if_greater(b, 4), Ok(true));
        let after = trie.stats();
        // one node for the robots above cell 0, sized free_above(0) = 15
        assert_eq!(after.node_slots_used - before.node_slots_used, 15);
        assert_eq!(after.leaf_bytes_used, before.leaf_bytes_used);
        assert_eq!(trie.get(a), Some(11));
        assert_eq!(trie.get(b), Some(4));
        assert_eq!(trie.len(), 2);
    }

    #[test]
    fn test_same_path_different_goal_reaches_leaf_block() {
        let geometry = open_board(16, 2);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        // goal cells 1 and 2 split at the leaf node; 1 and 5 share its slot
        // (low half 1) and only split at the leaf block
        let a = layout.encode(1, &[0]) as u32;
        let b = layout.encode(2, &[0]) as u32;
        let c = layout.encode(5, &[0]) as u32;

        assert_eq!(trie.put_if_greater(a, 0), Ok(true));
        assert_eq!(trie.put_if_greater(b, 0), Ok(true));
        assert_eq!(trie.stats().leaf_bytes_used, 4, "only the null block");
        assert_eq!(trie.put_if_greater(c, 0), Ok(true));
        assert_eq!(trie.stats().leaf_bytes_used, 8);
        for key in [a, b, c] {
            assert_eq!(trie.get(key), Some(0));
            assert_eq!(trie.put_if_greater(key, 0), Ok(false));
        }
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn test_absent_keys_are_not_found() {
        let geometry = open_board(16, 3);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        trie.put_if_greater(layout.encode(5, &[0, 1]) as u32, 1).unwrap();
        trie.put_if_greater(layout.encode(5, &[0, 2]) as u32, 1).unwrap();

        assert_eq!(trie.get(layout.encode(6, &[0, 1]) as u32), None);
        assert_eq!(trie.get(layout.encode(5, &[0, 3]) as u32), None);
        assert_eq!(trie.get(layout.encode(5, &[1, 2]) as u32), None);
    }

    #[test]
    fn test_every_key_of_a_small_board_survives_growth() {
        let obstacles = [3u32, 10];
        let geometry = BoardGeometry::new(16, |c| obstacles.contains(&c), 3).unwrap();
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let free: Vec<u32> = (0..16).filter(|c| !obstacles.contains(c)).collect();

        let mut keys = Vec::new();
        for (i, &low) in free.iter().enumerate() {
            for &high in &free[i + 1..] {
                for &goal in &free {
                    if goal != low && goal != high {
                        keys.push(layout.encode(goal, &[low, high]) as u32);
                    }
                }
            }
        }

        let mut allocated = trie.allocated_bytes();
        let mut grew = 0;
        for (n, &key) in keys.iter().enumerate() {
            assert_eq!(trie.put_if_greater(key, (n % 251) as u8), Ok(true));
            let now = trie.allocated_bytes();
            assert!(now >= allocated);
            if now > allocated {
                grew += 1;
            }
            allocated = now;
        }
        assert!(grew > 2, "expected several growth events, saw {grew}");
        assert!(trie.stats().node_chunks > 4, "chunk table must have doubled");
        for (n, &key) in keys.iter().enumerate() {
            assert_eq!(trie.get(key), Some((n % 251) as u8), "key {key:#x}");
        }
        assert_eq!(trie.len(), keys.len() as u32);
    }

    #[test]
    fn test_wide_keys_with_uncompressed_levels() {
        // 6 robots x 6 bits: the first two interior levels cannot hold branches
        let geometry = open_board(64, 6);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u64>::new(&geometry, &StoreConfig::default()).unwrap();
        let a = layout.encode(63, &[1, 2, 3, 4, 5]);
        let b = layout.encode(62, &[1, 2, 3, 4, 5]);
        let c = layout.encode(63, &[1, 2, 3, 4, 6]);

        assert_eq!(trie.put_if_greater(a, 1), Ok(true));
        assert_eq!(trie.put_if_greater(b, 2), Ok(true));
        assert_eq!(trie.put_if_greater(c, 3), Ok(true));
        assert_eq!(trie.put_if_greater(a, 1), Ok(false));
        assert_eq!(trie.get(a), Some(1));
        assert_eq!(trie.get(b), Some(2));
        assert_eq!(trie.get(c), Some(3));
    }

    #[test]
    fn test_rejects_narrow_key_type() {
        let geometry = open_board(256, 5);
        let err = KeyDepthTrie::<u32>::new(&geometry, &StoreConfig::default()).unwrap_err();
        assert_eq!(
            err,
            StoreError::KeyTooNarrow {
                required_bits: 40,
                key_bits: 32
            }
        );
    }

    #[test]
    fn test_failed_node_allocation_keeps_the_old_branch() {
        let geometry = open_board(16, 3);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let a = layout.encode(5, &[0, 1]) as u32;
        let b = layout.encode(5, &[0, 2]) as u32;
        assert_eq!(trie.put_if_greater(a, 11), Ok(true));

        trie.core.nodes.exhaust();
        assert!(matches!(
            trie.put_if_greater(b, 4),
            Err(StoreError::AddressSpaceExhausted { .. })
        ));
        assert_eq!(trie.get(a), Some(11));
        assert_eq!(trie.get(b), None);
        assert_eq!(trie.len(), 1);
        // the branch is still in place, so improving it needs no allocation
        assert_eq!(trie.put_if_greater(a, 12), Ok(true));
    }

    #[test]
    fn test_failed_leaf_allocation_keeps_the_old_branch() {
        let geometry = open_board(16, 2);
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let a = layout.encode(1, &[0]) as u32;
        let b = layout.encode(2, &[0]) as u32;
        // shares the leaf-node slot of `a`, so it needs a leaf block
        let c = layout.encode(5, &[0]) as u32;
        assert_eq!(trie.put_if_greater(a, 3), Ok(true));
        assert_eq!(trie.put_if_greater(b, 0), Ok(true));

        trie.core.leaves.exhaust();
        assert!(matches!(
            trie.put_if_greater(c, 9),
            Err(StoreError::AddressSpaceExhausted { .. })
        ));
        assert_eq!(trie.get(a), Some(3));
        assert_eq!(trie.get(b), Some(0));
        assert_eq!(trie.get(c), None);
        assert_eq!(trie.len(), 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-canonical key")]
    fn test_unsorted_helpers_are_rejected_in_debug_builds() {
        let geometry = open_board(16, 3);
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        // helpers 9 and 2 in descending order
        let _ = trie.put_if_greater(9 | 2 << 4 | 5 << 8, 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-canonical key")]
    fn test_robot_on_obstacle_is_rejected_in_debug_builds() {
        let geometry = BoardGeometry::new(16, |c| c == 3, 3).unwrap();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &small_config()).unwrap();
        let key = geometry.layout().encode(5, &[3, 7]) as u32;
        let _ = trie.put_if_greater(key, 1);
    }

    #[test]
    fn test_rejects_chunks_too_small_for_nodes() {
        let geometry = open_board(64, 2);
        let config = StoreConfig {
            node_chunk_shift: 4,
            ..StoreConfig::default()
        };
        assert!(matches!(
            KeyDepthTrie::<u32>::new(&geometry, &config),
            Err(StoreError::InvalidConfig { .. })
        ));
    }
}
