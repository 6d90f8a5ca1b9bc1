//! Packing of trie slots into a single `i32`.
//!
//! A slot is one of three states, tagged by sign:
//! - `0`: empty
//! - `> 0`: address of a child block (node block or leaf block)
//! - `< 0`: a compressed branch, `(!rest << 8) | depth`, holding the whole
//!   unconsumed key suffix of a single entry together with its depth
//!
//! All code that depends on the bit layout lives here.

use crate::arena::Addr;

/// Maximum number of key bits a compressed branch can hold.
///
/// `!rest << 8` stays negative only while `rest < 2^23`.
pub const BRANCH_REST_BITS: u32 = 23;

/// Decoded view of a trie slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Child(Addr),
    Branch { rest: u32, depth: u8 },
}

impl Slot {
    #[inline(always)]
    pub fn unpack(raw: i32) -> Self {
        if raw == 0 {
            Slot::Empty
        } else if raw > 0 {
            Slot::Child(Addr::new(raw as u32))
        } else {
            Slot::Branch {
                rest: ((!raw) >> 8) as u32,
                depth: raw as u8,
            }
        }
    }

    #[inline(always)]
    pub fn pack(self) -> i32 {
        match self {
            Slot::Empty => 0,
            Slot::Child(addr) => {
                debug_assert!(addr.get() > 0 && addr.get() <= i32::MAX as u32);
                addr.get() as i32
            }
            Slot::Branch { rest, depth } => {
                debug_assert!(rest < 1 << BRANCH_REST_BITS, "branch suffix too wide");
                ((!(rest as i32)) << 8) | depth as i32
            }
        }
    }
}

/// Raw branch with its depth replaced, keeping the stored suffix.
#[inline(always)]
pub fn with_depth(raw: i32, depth: u8) -> i32 {
    (raw & !0xff) | depth as i32
}
