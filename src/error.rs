//! Error types for the visited-state store and the search driver.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures raised while building or growing a key-depth store.
///
/// None of these are retried internally; a failing store is fatal for the
/// solve that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A `try_reserve` for a chunk or the chunk table failed.
    AllocationFailed {
        structure: &'static str,
        bytes: usize,
    },
    /// The next allocation would produce an address that no longer fits in a
    /// positive `i32` slot.
    AddressSpaceExhausted { structure: &'static str },
    /// The board description cannot be encoded (too few cells, too many
    /// robots, no free cells, ...).
    InvalidGeometry { reason: String },
    /// The chunk configuration cannot hold the structures this board needs.
    InvalidConfig { reason: String },
    /// The chosen key type has fewer bits than one packed state needs.
    KeyTooNarrow { required_bits: u32, key_bits: u32 },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::AllocationFailed { structure, bytes } => {
                write!(f, "allocation of {bytes} bytes failed for {structure}")
            }
            StoreError::AddressSpaceExhausted { structure } => {
                write!(f, "address space exhausted for {structure}")
            }
            StoreError::InvalidGeometry { reason } => write!(f, "invalid board geometry: {reason}"),
            StoreError::InvalidConfig { reason } => write!(f, "invalid store config: {reason}"),
            StoreError::KeyTooNarrow {
                required_bits,
                key_bits,
            } => write!(
                f,
                "key needs {required_bits} bits but the key type only has {key_bits}"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

/// Failures of the reference search driver.
#[derive(Debug)]
pub enum SolveError {
    /// The board text could not be parsed; `line` is 1-based, 0 for the
    /// board as a whole.
    Board { line: usize, reason: String },
    /// The board file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The visited-state store failed (allocation or construction).
    Store(StoreError),
    /// The configured time limit ran out during the given search depth.
    TimedOut { depth: u8 },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Board { line: 0, reason } => write!(f, "board: {reason}"),
            SolveError::Board { line, reason } => write!(f, "board line {line}: {reason}"),
            SolveError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            SolveError::Store(e) => write!(f, "state store: {e}"),
            SolveError::TimedOut { depth } => write!(f, "time limit reached at depth {depth}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Io { source, .. } => Some(source),
            SolveError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for SolveError {
    fn from(e: StoreError) -> Self {
        SolveError::Store(e)
    }
}
