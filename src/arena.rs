//! Chunked append-only arenas backing the trie.
//!
//! Storage grows one fixed-size chunk at a time instead of reallocating one
//! monolithic array. An address is a flat `u32` split into
//! `chunk = addr >> shift` and `offset = addr & mask`; blocks are never split
//! across chunks, so every block handed out is addressable from its start.

use tracing::debug;

use crate::error::StoreError;

/// Largest address a slot can hold as a positive `i32`.
const MAX_ADDRESS: u64 = i32::MAX as u64;

/// Flat address into a [`ChunkedArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr(u32);

impl Addr {
    #[inline(always)]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Address `delta` elements past this one.
    #[inline(always)]
    pub const fn offset(self, delta: u32) -> Self {
        Self(self.0 + delta)
    }
}

/// Allocates a zero-filled boxed slice, reporting failure instead of aborting.
fn try_zeroed_chunk<T: Copy + Default>(
    len: usize,
    structure: &'static str,
) -> Result<Box<[T]>, StoreError> {
    let mut chunk = Vec::new();
    chunk
        .try_reserve_exact(len)
        .map_err(|_| StoreError::AllocationFailed {
            structure,
            bytes: len * std::mem::size_of::<T>(),
        })?;
    chunk.resize(len, T::default());
    Ok(chunk.into_boxed_slice())
}

/// Doubles the capacity of a chunk table once it is full.
fn grow_chunk_table<C>(table: &mut Vec<C>, structure: &'static str) -> Result<(), StoreError> {
    if table.len() < table.capacity() {
        return Ok(());
    }
    let extra = table.capacity().max(1);
    table
        .try_reserve_exact(extra)
        .map_err(|_| StoreError::AllocationFailed {
            structure,
            bytes: extra * std::mem::size_of::<C>(),
        })?;
    debug!(structure, capacity = table.capacity(), "chunk table doubled");
    Ok(())
}

/// An append-only array of `T` made of `1 << shift`-element chunks.
///
/// Blocks are bump-allocated; when a block would cross the end of the last
/// chunk a new chunk is appended and the bump pointer moves to its start.
#[derive(Debug)]
pub struct ChunkedArena<T> {
    chunks: Vec<Box<[T]>>,
    shift: u32,
    mask: u32,
    /// Next free address.
    next: u64,
    /// One past the last address backed by a chunk.
    end: u64,
    structure: &'static str,
}

impl<T: Copy + Default> ChunkedArena<T> {
    /// Creates an arena whose first `prefix` addresses are reserved.
    ///
    /// Chunks covering the prefix are allocated eagerly (the trie keeps its
    /// root or direct table there); everything else is allocated on demand.
    /// A prefix of zero still leaves address 0 usable, so callers that need
    /// 0 as a null value must reserve at least one block.
    pub fn new(
        structure: &'static str,
        shift: u32,
        table_capacity: usize,
        prefix: u32,
    ) -> Result<Self, StoreError> {
        let mut chunks = Vec::new();
        chunks
            .try_reserve_exact(table_capacity.max(1))
            .map_err(|_| StoreError::AllocationFailed {
                structure,
                bytes: table_capacity * std::mem::size_of::<Box<[T]>>(),
            })?;
        let mut arena = Self {
            chunks,
            shift,
            mask: (1u32 << shift) - 1,
            next: prefix as u64,
            end: 0,
            structure,
        };
        while arena.end < prefix as u64 {
            arena.push_chunk()?;
        }
        Ok(arena)
    }

    /// Number of elements per chunk.
    #[inline(always)]
    pub fn chunk_len(&self) -> u32 {
        1 << self.shift
    }

    /// Appends one zeroed chunk, doubling the chunk table when full.
    fn push_chunk(&mut self) -> Result<(), StoreError> {
        if self.end + self.chunk_len() as u64 > MAX_ADDRESS + 1 {
            return Err(StoreError::AddressSpaceExhausted {
                structure: self.structure,
            });
        }
        grow_chunk_table(&mut self.chunks, self.structure)?;
        let chunk = try_zeroed_chunk::<T>(self.chunk_len() as usize, self.structure)?;
        self.chunks.push(chunk);
        self.end += self.chunk_len() as u64;
        debug!(
            structure = self.structure,
            chunks = self.chunks.len(),
            "arena chunk allocated"
        );
        Ok(())
    }

    /// Reserves a contiguous block of `len` elements and returns its address.
    ///
    /// `len` must not exceed the chunk length; the trie validates this once
    /// at construction.
    pub fn alloc(&mut self, len: u32) -> Result<Addr, StoreError> {
        debug_assert!(len <= self.chunk_len(), "block larger than a chunk");
        while self.next + len as u64 > self.end {
            let old_end = self.end;
            self.push_chunk()?;
            self.next = self.next.max(old_end);
        }
        let addr = self.next;
        self.next += len as u64;
        Ok(Addr(addr as u32))
    }

    #[inline(always)]
    pub fn get(&self, addr: Addr) -> T {
        self.chunks[(addr.0 >> self.shift) as usize][(addr.0 & self.mask) as usize]
    }

    #[inline(always)]
    pub fn set(&mut self, addr: Addr, value: T) {
        self.chunks[(addr.0 >> self.shift) as usize][(addr.0 & self.mask) as usize] = value;
    }

    /// Addresses handed out so far (including the reserved prefix and any
    /// tail skipped when a block moved to a fresh chunk).
    pub fn used(&self) -> u64 {
        self.next
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Moves the bump pointer to the end of the address space so the next
    /// allocation fails.
    #[cfg(test)]
    pub(crate) fn exhaust(&mut self) {
        self.end = MAX_ADDRESS + 1;
        self.next = self.end;
    }

    /// Bytes held by chunks plus the chunk table itself.
    pub fn allocated_bytes(&self) -> u64 {
        let table = self.chunks.capacity() * std::mem::size_of::<Box<[T]>>();
        let data = self.chunks.len() * self.chunk_len() as usize * std::mem::size_of::<T>();
        (table + data) as u64
    }
}

/// Byte storage for fully materialized leaves.
///
/// Each leaf byte has a matching occupancy bit, so a stored depth of 0 is not
/// mistaken for an empty cell.
#[derive(Debug)]
pub struct LeafArena {
    depths: ChunkedArena<u8>,
    occupied: Vec<Box<[u64]>>,
}

impl LeafArena {
    /// Creates an empty leaf arena whose first block (address 0) is never
    /// handed out, keeping 0 free to mean "empty slot".
    pub fn new(shift: u32, table_capacity: usize, block_len: u32) -> Result<Self, StoreError> {
        let mut depths = ChunkedArena::new("leaf arena", shift, table_capacity, 0)?;
        // the first alloc creates chunk 0; the block at 0 is discarded
        depths.next = block_len as u64;
        let mut occupied = Vec::new();
        occupied
            .try_reserve_exact(table_capacity.max(1))
            .map_err(|_| StoreError::AllocationFailed {
                structure: "leaf occupancy",
                bytes: table_capacity * std::mem::size_of::<Box<[u64]>>(),
            })?;
        Ok(Self { depths, occupied })
    }

    fn words_per_chunk(&self) -> usize {
        (self.depths.chunk_len() as usize).div_ceil(64)
    }

    /// Reserves a block of `len` leaf bytes.
    pub fn alloc(&mut self, len: u32) -> Result<Addr, StoreError> {
        let addr = self.depths.alloc(len)?;
        while self.occupied.len() < self.depths.chunk_count() {
            grow_chunk_table(&mut self.occupied, "leaf occupancy")?;
            let words = self.words_per_chunk();
            self.occupied
                .push(try_zeroed_chunk::<u64>(words, "leaf occupancy")?);
        }
        Ok(addr)
    }

    #[inline(always)]
    fn bit(&self, addr: Addr) -> (usize, usize, u64) {
        let offset = addr.0 & self.depths.mask;
        let chunk = (addr.0 >> self.depths.shift) as usize;
        (chunk, (offset >> 6) as usize, 1u64 << (offset & 63))
    }

    /// Stored depth at `addr`, or `None` if nothing was written there.
    #[inline]
    pub fn get(&self, addr: Addr) -> Option<u8> {
        let (chunk, word, bit) = self.bit(addr);
        (self.occupied[chunk][word] & bit != 0).then(|| self.depths.get(addr))
    }

    /// Writes `depth` unconditionally and marks the cell occupied.
    #[inline]
    pub fn store(&mut self, addr: Addr, depth: u8) {
        let (chunk, word, bit) = self.bit(addr);
        self.occupied[chunk][word] |= bit;
        self.depths.set(addr, depth);
    }

    /// Max-merges `depth` into the cell.
    ///
    /// Returns `(changed, fresh)`: whether the stored depth changed and
    /// whether the cell was empty before.
    #[inline]
    pub fn merge(&mut self, addr: Addr, depth: u8) -> (bool, bool) {
        match self.get(addr) {
            None => {
                self.store(addr, depth);
                (true, true)
            }
            Some(old) if depth > old => {
                self.depths.set(addr, depth);
                (true, false)
            }
            Some(_) => (false, false),
        }
    }

    pub fn used(&self) -> u64 {
        self.depths.used()
    }

    pub fn chunk_count(&self) -> usize {
        self.depths.chunk_count()
    }

    #[cfg(test)]
    pub(crate) fn exhaust(&mut self) {
        self.depths.exhaust();
    }

    pub fn allocated_bytes(&self) -> u64 {
        let table = self.occupied.capacity() * std::mem::size_of::<Box<[u64]>>();
        let bits = self.occupied.len() * self.words_per_chunk() * std::mem::size_of::<u64>();
        self.depths.allocated_bytes() + (table + bits) as u64
    }
}
