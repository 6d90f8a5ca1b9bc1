//! Differential tests of the trie against the hash map model.

use proptest::prelude::*;

use crate::config::StoreConfig;
use crate::geometry::BoardGeometry;
use crate::key::TrieKey;
use crate::trie::KeyDepthTrie;
use crate::{FxKeyDepthMap, KeyDepthMap};

/// Picks `robots` distinct free cells; the first one is the goal robot.
fn placement(free: Vec<u32>, robots: usize) -> impl Strategy<Value = (u32, Vec<u32>)> {
    proptest::sample::subsequence(free, robots)
        .prop_shuffle()
        .prop_map(|cells| (cells[0], cells[1..].to_vec()))
}

fn operations(
    geometry: &BoardGeometry,
    max_ops: usize,
) -> impl Strategy<Value = Vec<((u32, Vec<u32>), u8)>> {
    let free: Vec<u32> = (0..geometry.cell_count())
        .filter(|&c| geometry.is_free(c))
        .collect();
    let robots = geometry.robot_count() as usize;
    // small depth range so repeated keys hit both outcomes of the merge
    prop::collection::vec((placement(free, robots), 0u8..6), 1..max_ops)
}

fn run_against_model<K: TrieKey>(
    geometry: &BoardGeometry,
    config: &StoreConfig,
    ops: &[((u32, Vec<u32>), u8)],
) -> Result<(), TestCaseError> {
    let layout = geometry.layout();
    let mut trie = KeyDepthTrie::<K>::new(geometry, config).unwrap();
    let mut model = FxKeyDepthMap::<K>::new();
    let mut allocated = trie.allocated_bytes();

    for ((goal, others), depth) in ops {
        let key = K::from_u64(layout.encode(*goal, others));
        prop_assert_eq!(
            trie.put_if_greater(key, *depth),
            model.put_if_greater(key, *depth)
        );
        prop_assert!(trie.allocated_bytes() >= allocated);
        allocated = trie.allocated_bytes();
    }
    for ((goal, others), _) in ops {
        let key = K::from_u64(layout.encode(*goal, others));
        prop_assert_eq!(trie.get(key), model.get(key));
    }
    prop_assert_eq!(trie.len(), model.len());
    Ok(())
}

fn crowded_board() -> BoardGeometry {
    let obstacles = [2u32, 7, 11];
    BoardGeometry::new(16, |c| obstacles.contains(&c), 3).unwrap()
}

proptest! {
    #[test]
    fn test_narrow_trie_matches_model(ops in operations(&crowded_board(), 300)) {
        let config = StoreConfig {
            trade_memory_for_speed: false,
            node_chunk_shift: 5,
            leaf_chunk_shift: 4,
        };
        run_against_model::<u32>(&crowded_board(), &config, &ops)?;
    }

    #[test]
    fn test_wide_trie_matches_model(
        ops in operations(&BoardGeometry::new(64, |c| c % 9 == 4, 6).unwrap(), 200)
    ) {
        let geometry = BoardGeometry::new(64, |c| c % 9 == 4, 6).unwrap();
        run_against_model::<u64>(&geometry, &StoreConfig::default(), &ops)?;
    }

    #[test]
    fn test_permuted_helpers_share_one_entry(
        (goal, others) in placement((0..64).collect(), 4),
        depth in any::<u8>(),
    ) {
        let geometry = BoardGeometry::new(64, |_| false, 4).unwrap();
        let layout = geometry.layout();
        let mut trie = KeyDepthTrie::<u32>::new(&geometry, &StoreConfig::default()).unwrap();
        let mut reversed = others.clone();
        reversed.reverse();

        prop_assert_eq!(trie.put_if_greater(layout.encode(goal, &others) as u32, depth), Ok(true));
        prop_assert_eq!(trie.put_if_greater(layout.encode(goal, &reversed) as u32, depth), Ok(false));
        prop_assert_eq!(trie.len(), 1);
    }
}
