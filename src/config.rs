//! Store construction knobs.

use crate::error::StoreError;

/// Smallest accepted chunk shift.
pub const MIN_CHUNK_SHIFT: u32 = 4;
/// Largest accepted chunk shift (64 Mi elements per chunk).
pub const MAX_CHUNK_SHIFT: u32 = 26;
/// Default chunk shift: 4 MiB node chunks, 1 MiB leaf chunks.
pub const DEFAULT_CHUNK_SHIFT: u32 = 20;

/// How a key-depth store is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Use the direct-indexed variant when the board allows it
    /// (8-bit coordinates with 4 or 5 robots), paying a fixed 64 MiB table.
    pub trade_memory_for_speed: bool,
    /// log2 of the number of `i32` slots per node chunk.
    pub node_chunk_shift: u32,
    /// log2 of the number of bytes per leaf chunk.
    pub leaf_chunk_shift: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            trade_memory_for_speed: false,
            node_chunk_shift: DEFAULT_CHUNK_SHIFT,
            leaf_chunk_shift: DEFAULT_CHUNK_SHIFT,
        }
    }
}

impl StoreConfig {
    pub fn fast() -> Self {
        Self {
            trade_memory_for_speed: true,
            ..Self::default()
        }
    }

    pub(crate) fn check_shifts(&self) -> Result<(), StoreError> {
        for (name, shift) in [
            ("node_chunk_shift", self.node_chunk_shift),
            ("leaf_chunk_shift", self.leaf_chunk_shift),
        ] {
            if !(MIN_CHUNK_SHIFT..=MAX_CHUNK_SHIFT).contains(&shift) {
                return Err(StoreError::InvalidConfig {
                    reason: format!(
                        "{name} = {shift} outside {MIN_CHUNK_SHIFT}..={MAX_CHUNK_SHIFT}"
                    ),
                });
            }
        }
        Ok(())
    }
}
