//! Per-board lookup tables that let each trie level use a tightly sized node.
//!
//! Interior trie levels are indexed by the next interchangeable robot, which
//! is always a free cell strictly above the previous one. Two tables turn
//! that into dense indices:
//! - `rank[cell]`: position of a free cell among all free cells
//! - `free_above[cell]`: number of free cells with a larger index, i.e. the
//!   node size needed below a slot that fixed `cell`

use crate::error::StoreError;
use crate::key::{KeyLayout, KeyWidth};

/// Marker stored for obstacle cells in both tables.
pub const UNUSABLE: u32 = u32::MAX;

/// Immutable board description consumed by the store.
#[derive(Clone, Debug)]
pub struct BoardGeometry {
    cell_count: u32,
    bits: u32,
    robot_count: u32,
    free_count: u32,
    rank: Box<[u32]>,
    free_above: Box<[u32]>,
}

/// Bits needed to address `cell_count` cells, at least one.
pub fn bits_for(cell_count: u32) -> u32 {
    (u32::BITS - (cell_count.max(2) - 1).leading_zeros()).max(1)
}

impl BoardGeometry {
    /// Builds the tables for a board of `cell_count` cells.
    ///
    /// Cells for which `is_obstacle` returns true can never hold a robot.
    pub fn new(
        cell_count: u32,
        is_obstacle: impl Fn(u32) -> bool,
        robot_count: u32,
    ) -> Result<Self, StoreError> {
        if cell_count < 2 {
            return Err(StoreError::InvalidGeometry {
                reason: format!("need at least 2 cells, got {cell_count}"),
            });
        }
        if robot_count == 0 {
            return Err(StoreError::InvalidGeometry {
                reason: "need at least one robot".to_string(),
            });
        }
        let bits = bits_for(cell_count);
        if bits * robot_count > u64::BITS {
            return Err(StoreError::InvalidGeometry {
                reason: format!(
                    "{robot_count} robots x {bits} bits do not fit into a 64-bit key"
                ),
            });
        }

        let mut rank = vec![UNUSABLE; cell_count as usize].into_boxed_slice();
        let mut free_count = 0;
        for cell in 0..cell_count {
            if !is_obstacle(cell) {
                rank[cell as usize] = free_count;
                free_count += 1;
            }
        }
        if free_count < robot_count {
            return Err(StoreError::InvalidGeometry {
                reason: format!("{robot_count} robots but only {free_count} free cells"),
            });
        }
        let free_above = rank
            .iter()
            .map(|&r| if r == UNUSABLE { UNUSABLE } else { free_count - r - 1 })
            .collect();

        Ok(Self {
            cell_count,
            bits,
            robot_count,
            free_count,
            rank,
            free_above,
        })
    }

    #[inline(always)]
    pub fn cell_count(&self) -> u32 {
        self.cell_count
    }

    /// Width of one coordinate field in a key.
    #[inline(always)]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline(always)]
    pub fn robot_count(&self) -> u32 {
        self.robot_count
    }

    pub fn free_count(&self) -> u32 {
        self.free_count
    }

    #[inline(always)]
    pub fn is_free(&self, cell: u32) -> bool {
        cell < self.cell_count && self.rank[cell as usize] != UNUSABLE
    }

    /// Dense index of a free cell among free cells; [`UNUSABLE`] for obstacles.
    #[inline(always)]
    pub fn rank(&self, cell: u32) -> u32 {
        self.rank[cell as usize]
    }

    /// Number of free cells above `cell`; [`UNUSABLE`] for obstacles.
    #[inline(always)]
    pub fn free_above(&self, cell: u32) -> u32 {
        self.free_above[cell as usize]
    }

    /// Largest node any interior level can need.
    pub fn max_node_len(&self) -> u32 {
        self.free_count.saturating_sub(1)
    }

    pub fn layout(&self) -> KeyLayout {
        KeyLayout {
            bits: self.bits,
            robot_count: self.robot_count,
        }
    }

    pub fn key_width(&self) -> KeyWidth {
        self.layout().width()
    }

    /// Checks the key invariants the trie relies on: every field is a free
    /// cell, the interchangeable fields ascend strictly, and the goal field
    /// differs from all of them.
    pub fn is_canonical_key(&self, key: u64) -> bool {
        let key_bits = self.bits * self.robot_count;
        if key_bits < u64::BITS && key >> key_bits != 0 {
            return false;
        }
        let mask = (1u64 << self.bits) - 1;
        let field = |index: u32| ((key >> (index * self.bits)) & mask) as u32;
        let goal = field(self.robot_count - 1);
        if !self.is_free(goal) {
            return false;
        }
        let mut prev = None;
        for index in 0..self.robot_count - 1 {
            let cell = field(index);
            if !self.is_free(cell) || cell == goal || prev.is_some_and(|p| p >= cell) {
                return false;
            }
            prev = Some(cell);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_three_with_center_wall() -> BoardGeometry {
        BoardGeometry::new(9, |cell| cell == 4, 2).unwrap()
    }

    #[test]
    fn test_bits_for_cell_counts() {
        assert_eq!(bits_for(2), 1);
        assert_eq!(bits_for(3), 2);
        assert_eq!(bits_for(16), 4);
        assert_eq!(bits_for(17), 5);
        assert_eq!(bits_for(256), 8);
        assert_eq!(bits_for(257), 9);
    }

    #[test]
    fn test_rank_skips_obstacles() {
        let geometry = three_by_three_with_center_wall();
        let ranks: Vec<u32> = (0..9).map(|c| geometry.rank(c)).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, UNUSABLE, 4, 5, 6, 7]);
    }

    #[test]
    fn test_free_above_counts_only_free_cells() {
        let geometry = three_by_three_with_center_wall();
        let sizes: Vec<u32> = (0..9).map(|c| geometry.free_above(c)).collect();
        assert_eq!(sizes, vec![7, 6, 5, 4, UNUSABLE, 3, 2, 1, 0]);
        assert_eq!(geometry.max_node_len(), 7);
    }

    #[test]
    fn test_tables_match_brute_force() {
        let obstacles = [0u32, 5, 6, 13, 31];
        let geometry = BoardGeometry::new(32, |c| obstacles.contains(&c), 3).unwrap();
        for cell in 0..32 {
            if obstacles.contains(&cell) {
                assert!(!geometry.is_free(cell));
                continue;
            }
            let below = (0..cell).filter(|c| !obstacles.contains(c)).count() as u32;
            let above = (cell + 1..32).filter(|c| !obstacles.contains(c)).count() as u32;
            assert_eq!(geometry.rank(cell), below, "rank of {cell}");
            assert_eq!(geometry.free_above(cell), above, "free_above of {cell}");
        }
    }

    #[test]
    fn test_rejects_unencodable_boards() {
        assert!(BoardGeometry::new(1, |_| false, 1).is_err());
        assert!(BoardGeometry::new(4, |c| c != 0, 2).is_err());
        assert!(BoardGeometry::new(256, |_| false, 9).is_err());
        assert!(BoardGeometry::new(256, |_| false, 8).is_ok());
    }

    #[test]
    fn test_canonical_key_check() {
        let geometry = three_by_three_with_center_wall();
        let layout = geometry.layout();
        assert!(geometry.is_canonical_key(layout.encode(8, &[0])));
        // robot on the wall
        assert!(!geometry.is_canonical_key(layout.encode(4, &[0])));
        // goal and helper share a cell
        assert!(!geometry.is_canonical_key(layout.encode(3, &[3])));

        let three = BoardGeometry::new(16, |_| false, 3).unwrap();
        let unsorted = 9 | 2 << 4 | 5 << 8;
        assert!(!three.is_canonical_key(unsorted));
        assert!(three.is_canonical_key(three.layout().encode(5, &[9, 2])));
        // duplicate helpers
        assert!(!three.is_canonical_key(4 | 4 << 4 | 5 << 8));
        // bits above the last field
        assert!(!three.is_canonical_key(three.layout().encode(5, &[9, 2]) | 1 << 12));

        let six = BoardGeometry::new(64, |c| c == 40, 6).unwrap();
        let key = six.layout().encode(63, &[5, 1, 4, 2, 3]);
        assert!(six.is_canonical_key(key));
        assert!(!six.is_canonical_key(key | 1 << 40));
        assert!(!six.is_canonical_key(six.layout().encode(40, &[1, 2, 3, 4, 5])));
    }
}
