//! Fixed-size circular staging region with in-band record prefixes.
//!
//! The ring owns a single contiguous allocation. Each live record occupies
//! `varint(capacity) + capacity` bytes; the prefix makes the region
//! self-describing, so a reader holding only the region and the ring cursors
//! can recover every record boundary. Bookkeeping for live records sits in a
//! bounded index ordered oldest to newest.
//!
//! Layout states: the live run either sits in one piece (linear) or leaves
//! the physical end and continues at offset 0 (wrapped). `wrap_off` marks
//! where the run abandons the tail of the region; bytes past it are dead
//! until the head moves through them. `head == tail` with a non-empty index
//! marks a completely full ring.

use std::{alloc, collections::VecDeque, ptr::NonNull, slice};

use crate::{
    block::{BlockMeta, BlockView, ALIGNMENT},
    error::{Result, StagebufError},
    manager::Limit,
    varint,
};

/// Bytes a record of `capacity` payload bytes occupies in the ring
pub fn footprint(capacity: usize) -> usize {
    varint::encoded_len(capacity as u64) + capacity
}

/// One record recovered by walking the in-band prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingRecord {
    /// Offset of the record (its varint prefix) in the region
    pub offset: usize,
    /// Payload capacity decoded from the prefix
    pub capacity: usize,
}

/// Bookkeeping for one live record
#[derive(Debug, Clone, Copy)]
struct RingBlock {
    offset: usize,
    meta: BlockMeta,
}

impl RingBlock {
    fn payload_off(&self) -> usize {
        self.offset + varint::encoded_len(self.meta.capacity as u64)
    }

    fn end(&self) -> usize {
        self.offset + footprint(self.meta.capacity)
    }
}

/// Circular staging region with a bounded record index
#[derive(Debug)]
pub struct StaticRing {
    /// Backing region
    base: NonNull<u8>,
    /// Region size in bytes
    size: usize,
    /// Maximum number of live records
    max_blocks: usize,
    /// Offset of the oldest live record
    head: usize,
    /// Offset one past the newest live record
    tail: usize,
    /// Offset where the live run wraps to 0; `size` when linear
    wrap_off: usize,
    /// Live records, oldest first
    index: VecDeque<RingBlock>,
}

impl StaticRing {
    /// Allocate a ring of `size` bytes holding up to `max_blocks` records
    pub fn new(size: usize, max_blocks: usize) -> Result<Self> {
        if size == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "ring size cannot be zero",
            ));
        }
        if max_blocks == 0 {
            return Err(StagebufError::invalid_parameter(
                "max_blocks",
                "ring needs room for at least one record",
            ));
        }

        let layout = alloc::Layout::from_size_align(size, ALIGNMENT)
            .map_err(|_| StagebufError::invalid_parameter("size", "layout overflow"))?;
        let base = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(base).ok_or_else(|| StagebufError::out_of_memory(size))?;

        Ok(Self {
            base,
            size,
            max_blocks,
            head: 0,
            tail: 0,
            wrap_off: size,
            index: VecDeque::with_capacity(max_blocks),
        })
    }

    /// Region size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of live records
    pub fn block_count(&self) -> usize {
        self.index.len()
    }

    /// True when no records are live
    pub fn empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Offset of the oldest live record
    pub fn head(&self) -> usize {
        self.head
    }

    /// Offset one past the newest live record
    pub fn tail(&self) -> usize {
        self.tail
    }

    fn region_mut(&mut self) -> &mut [u8] {
        // SAFETY: the ring exclusively owns `size` bytes at `base`
        unsafe { slice::from_raw_parts_mut(self.base.as_ptr(), self.size) }
    }

    fn region(&self) -> &[u8] {
        // SAFETY: as above
        unsafe { slice::from_raw_parts(self.base.as_ptr(), self.size) }
    }

    fn payload_ptr(&self, block: &RingBlock) -> NonNull<u8> {
        // SAFETY: payload_off < size by placement
        unsafe { NonNull::new_unchecked(self.base.as_ptr().add(block.payload_off())) }
    }

    fn write_prefix(&mut self, offset: usize, capacity: usize) {
        let end = offset + varint::encoded_len(capacity as u64);
        varint::encode(capacity as u64, &mut self.region_mut()[offset..end])
            .expect("prefix space reserved by placement");
    }

    /// Largest contiguous free run, for error reporting
    fn free_run(&self) -> usize {
        if self.index.is_empty() {
            self.size
        } else if self.head == self.tail {
            0
        } else if self.head < self.tail {
            (self.size - self.tail).max(self.head)
        } else {
            self.head - self.tail
        }
    }

    fn check_request(&self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "push size cannot be zero",
            ));
        }
        if self.index.len() >= self.max_blocks {
            return Err(StagebufError::buffer_full(n, self.free_run()));
        }
        Ok(())
    }

    /// Reserve a record of `n` payload bytes at the tail
    pub fn push_back(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        self.check_request(n)?;
        let fs = footprint(n);

        // Placement: straight at the tail, else wrapped to offset 0
        let (offset, new_tail, new_wrap) = if self.index.is_empty() {
            if fs > self.size {
                return Err(StagebufError::buffer_full(n, self.size));
            }
            (0, fs, self.size)
        } else if self.head == self.tail {
            return Err(StagebufError::buffer_full(n, 0));
        } else if self.head < self.tail {
            if self.size - self.tail >= fs {
                (self.tail, self.tail + fs, self.wrap_off)
            } else if self.head >= fs {
                // Bytes at [tail, size) go dead until the head passes them
                (0, fs, self.tail)
            } else {
                return Err(StagebufError::buffer_full(n, self.free_run()));
            }
        } else if self.head - self.tail >= fs {
            (self.tail, self.tail + fs, self.wrap_off)
        } else {
            return Err(StagebufError::buffer_full(n, self.free_run()));
        };

        limit.charge(1, n)?;

        if self.index.is_empty() {
            self.head = 0;
        }
        self.tail = new_tail;
        self.wrap_off = new_wrap;
        self.write_prefix(offset, n);

        let block = RingBlock {
            offset,
            meta: BlockMeta::reserved(n),
        };
        let ptr = self.payload_ptr(&block);
        self.index.push_back(block);
        Ok(ptr)
    }

    /// Reserve a record of `n` payload bytes at the head
    pub fn push_front(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        self.check_request(n)?;
        let fs = footprint(n);

        let (offset, new_head, new_tail) = if self.index.is_empty() {
            if fs > self.size {
                return Err(StagebufError::buffer_full(n, self.size));
            }
            (0, 0, fs)
        } else if self.head == self.tail {
            return Err(StagebufError::buffer_full(n, 0));
        } else if self.head < self.tail {
            if self.head >= fs {
                (self.head - fs, self.head - fs, self.tail)
            } else if self.head == 0 && self.size - self.tail >= fs {
                // Wrap backward: the run now starts just before the physical
                // end and continues at 0
                (self.size - fs, self.size - fs, self.tail)
            } else {
                return Err(StagebufError::buffer_full(n, self.free_run()));
            }
        } else if self.head - self.tail >= fs {
            (self.head - fs, self.head - fs, self.tail)
        } else {
            return Err(StagebufError::buffer_full(n, self.free_run()));
        };

        limit.charge(1, n)?;

        self.head = new_head;
        self.tail = new_tail;
        self.write_prefix(offset, n);

        let block = RingBlock {
            offset,
            meta: BlockMeta::reserved(n),
        };
        let ptr = self.payload_ptr(&block);
        self.index.push_front(block);
        Ok(ptr)
    }

    /// Consume up to `n` bytes from the front record, releasing it when
    /// drained. Returns the bytes actually dropped.
    pub fn pop_front(
        &mut self,
        n: usize,
        free_unwritable: bool,
        limit: &mut Limit,
    ) -> Result<usize> {
        let front = self
            .index
            .front_mut()
            .ok_or_else(|| StagebufError::buffer_empty("pop_front"))?;

        let dropped = front.meta.advance(n);
        if front.meta.releasable(free_unwritable) {
            let released = self.index.pop_front().expect("front exists");
            limit.release(1, released.meta.capacity);

            if self.index.is_empty() {
                self.head = 0;
                self.tail = 0;
                self.wrap_off = self.size;
            } else {
                let next = self.index.front().expect("non-empty").offset;
                if next < released.offset {
                    // Head crossed the wrap point; the run is linear again
                    self.wrap_off = self.size;
                }
                self.head = next;
            }
        }
        Ok(dropped)
    }

    /// Retract up to `n` staged bytes from the back record, releasing it
    /// when drained. Returns the bytes actually dropped.
    pub fn pop_back(
        &mut self,
        n: usize,
        free_unwritable: bool,
        limit: &mut Limit,
    ) -> Result<usize> {
        let back = self
            .index
            .back_mut()
            .ok_or_else(|| StagebufError::buffer_empty("pop_back"))?;

        let dropped = back.meta.retract(n);
        if back.meta.releasable(free_unwritable) {
            let released = self.index.pop_back().expect("back exists");
            limit.release(1, released.meta.capacity);

            if self.index.is_empty() {
                self.head = 0;
                self.tail = 0;
                self.wrap_off = self.size;
            } else {
                // tail == 0 with live records means the low side just
                // emptied; dropping a high-side record makes the run linear
                if self.tail == 0 {
                    self.wrap_off = self.size;
                }
                self.tail = released.offset;
            }
        }
        Ok(dropped)
    }

    /// Extend the back record by `n` bytes in place when the layout allows,
    /// otherwise reserve a fresh record.
    pub fn merge_back(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "merge size cannot be zero",
            ));
        }
        let Some(back) = self.index.back().copied() else {
            return self.push_back(n, limit);
        };

        let old_capacity = back.meta.capacity;
        let new_capacity = old_capacity + n;
        // Growing the prefix would shift the payload; spill instead
        let prefix_stable = varint::encoded_len(new_capacity as u64)
            == varint::encoded_len(old_capacity as u64);

        let extension = if !prefix_stable || self.head == self.tail {
            None
        } else if self.tail == 0 {
            // High-side run with an empty low side: grow into the dead tail
            (self.wrap_off + n <= self.size).then(|| {
                (back.end() + n, self.size)
            })
        } else if self.head < self.tail {
            (self.tail + n <= self.size).then(|| (self.tail + n, self.wrap_off))
        } else {
            (self.tail + n <= self.head).then(|| (self.tail + n, self.wrap_off))
        };

        let Some((new_tail, new_wrap)) = extension else {
            return self.push_back(n, limit);
        };

        limit.charge(0, n)?;

        let block = self.index.back_mut().expect("back exists");
        block.meta.capacity = new_capacity;
        block.meta.used += n;
        let offset = block.offset;
        self.tail = new_tail;
        self.wrap_off = new_wrap;
        self.write_prefix(offset, new_capacity);

        // SAFETY: the extension region sits inside the ring
        Ok(unsafe {
            NonNull::new_unchecked(
                self.base
                    .as_ptr()
                    .add(offset + varint::encoded_len(new_capacity as u64) + old_capacity),
            )
        })
    }

    /// Extend the front record backward by `n` bytes when the layout allows,
    /// otherwise reserve a fresh record at the head.
    ///
    /// In-place extension needs an unconsumed front record; the new bytes
    /// become the first readable bytes of the record.
    pub fn merge_front(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "merge size cannot be zero",
            ));
        }
        let Some(front) = self.index.front().copied() else {
            return self.push_front(n, limit);
        };

        let old_capacity = front.meta.capacity;
        let new_capacity = old_capacity + n;
        let old_prefix = varint::encoded_len(old_capacity as u64);
        let new_prefix = varint::encoded_len(new_capacity as u64);
        // The record start moves back so the payload gains `n` front bytes
        let delta = n + (new_prefix - old_prefix);

        let fits = front.meta.read_off == 0
            && self.head != self.tail
            && if self.head < self.tail {
                delta <= self.head
            } else {
                self.head - self.tail >= delta
            };

        if !fits {
            return self.push_front(n, limit);
        }

        limit.charge(0, n)?;

        let new_offset = self.head - delta;
        let block = self.index.front_mut().expect("front exists");
        block.offset = new_offset;
        block.meta.capacity = new_capacity;
        block.meta.used += n;
        self.head = new_offset;
        self.write_prefix(new_offset, new_capacity);

        // SAFETY: the prepended region sits inside the ring
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(new_offset + new_prefix)) })
    }

    /// Snapshot of the oldest record
    pub fn front(&self) -> Result<BlockView> {
        let block = self
            .index
            .front()
            .ok_or_else(|| StagebufError::buffer_empty("front"))?;
        Ok(BlockView::new(self.payload_ptr(block), block.meta))
    }

    /// Snapshot of the newest record
    pub fn back(&self) -> Result<BlockView> {
        let block = self
            .index
            .back()
            .ok_or_else(|| StagebufError::buffer_empty("back"))?;
        Ok(BlockView::new(self.payload_ptr(block), block.meta))
    }

    /// Drop every record and rewind the cursors; the region stays allocated
    pub fn reset(&mut self) {
        self.index.clear();
        self.head = 0;
        self.tail = 0;
        self.wrap_off = self.size;
    }

    /// Recover the live records by decoding the in-band prefixes.
    ///
    /// Starts at `head`, steps by each record's footprint, wraps at
    /// `wrap_off`, and stops at `tail`. A reader of an externally shared
    /// region can do the same given the three cursors. Fails with
    /// `Malformed` when the prefixes do not describe the live run.
    pub fn walk(&self) -> Result<Vec<RingRecord>> {
        let mut records = Vec::with_capacity(self.index.len());
        if self.index.is_empty() {
            return Ok(records);
        }

        let region = self.region();
        let mut off = self.head;
        loop {
            if records.len() > self.index.len() {
                return Err(StagebufError::malformed("ring walk does not terminate"));
            }

            let prefix_end = (off + varint::MAX_LEN).min(self.size);
            let (value, _) = varint::decode(&region[off..prefix_end])?;
            let capacity = value as usize;
            if capacity == 0 || off + footprint(capacity) > self.size {
                return Err(StagebufError::malformed("record prefix out of bounds"));
            }

            records.push(RingRecord {
                offset: off,
                capacity,
            });

            off += footprint(capacity);
            if off == self.tail {
                break;
            }
            if off == self.wrap_off {
                off = 0;
                if off == self.tail {
                    break;
                }
            }
        }
        Ok(records)
    }
}

impl Drop for StaticRing {
    fn drop(&mut self) {
        let layout = alloc::Layout::from_size_align(self.size, ALIGNMENT)
            .expect("layout validated at allocation");
        unsafe {
            alloc::dealloc(self.base.as_ptr(), layout);
        }
    }
}

unsafe impl Send for StaticRing {}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(ptr: NonNull<u8>, bytes: &[u8]) {
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
        }
    }

    fn read(view: &BlockView) -> Vec<u8> {
        unsafe { slice::from_raw_parts(view.data().as_ptr(), view.size()).to_vec() }
    }

    #[test]
    fn test_push_pop_linear() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 8).unwrap();

        let a = ring.push_back(4, &mut limit).unwrap();
        write(a, b"ABCD");
        let b = ring.push_back(2, &mut limit).unwrap();
        write(b, b"EF");

        assert_eq!(ring.block_count(), 2);
        assert_eq!(read(&ring.front().unwrap()), b"ABCD");
        assert_eq!(read(&ring.back().unwrap()), b"EF");

        assert_eq!(ring.pop_front(4, true, &mut limit).unwrap(), 4);
        assert_eq!(read(&ring.front().unwrap()), b"EF");
        assert_eq!(ring.pop_front(2, true, &mut limit).unwrap(), 2);
        assert!(ring.empty());
        assert_eq!((ring.head(), ring.tail()), (0, 0));
    }

    #[test]
    fn test_wrap_around_placement() {
        let mut limit = Limit::default();
        // footprint(10) == 11: two records fill 22 of 32 bytes
        let mut ring = StaticRing::new(32, 4).unwrap();

        ring.push_back(10, &mut limit).unwrap();
        ring.push_back(10, &mut limit).unwrap();
        assert_eq!(ring.pop_front(10, true, &mut limit).unwrap(), 10);

        // 10 bytes remain past the tail; the third record must wrap
        let ptr = ring.push_back(10, &mut limit).unwrap();
        write(ptr, b"0123456789");

        assert_eq!(ring.block_count(), 2);
        assert_eq!(ring.back().unwrap().raw_size(), 10);

        let records = ring.walk().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RingRecord { offset: 11, capacity: 10 });
        assert_eq!(records[1], RingRecord { offset: 0, capacity: 10 });
        assert_eq!(records.iter().map(|r| r.capacity).sum::<usize>(), 20);
    }

    #[test]
    fn test_walk_matches_index_through_churn() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(128, 16).unwrap();

        // Interleave pushes and pops to force several wraps
        for round in 0..40 {
            let n = 5 + (round % 7);
            if ring.push_back(n, &mut limit).is_err() {
                ring.pop_front(64, true, &mut limit).unwrap();
                continue;
            }
            if round % 3 == 0 {
                let front = ring.front().unwrap().size();
                ring.pop_front(front, true, &mut limit).unwrap();
            }

            let records = ring.walk().unwrap();
            assert_eq!(records.len(), ring.block_count());
            if !ring.empty() {
                assert_eq!(records[0].capacity, ring.front().unwrap().raw_size());
                assert_eq!(records[0].offset, ring.head());
            }
        }
    }

    #[test]
    fn test_push_front_then_wrap_backward() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(32, 4).unwrap();

        let body = ring.push_back(6, &mut limit).unwrap();
        write(body, b"BODY..");

        // Run starts at 0, so the head record wraps to the physical end
        let hdr = ring.push_front(4, &mut limit).unwrap();
        write(hdr, b"HDR!");

        assert_eq!(ring.head(), 32 - footprint(4));
        let records = ring.walk().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].capacity, 4);
        assert_eq!(records[1].capacity, 6);
        assert_eq!(read(&ring.front().unwrap()), b"HDR!");
    }

    #[test]
    fn test_merge_back_in_place() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 8).unwrap();

        let ptr = ring.push_back(4, &mut limit).unwrap();
        write(ptr, b"WXYZ");

        let ext = ring.merge_back(3, &mut limit).unwrap();
        assert_eq!(ext.as_ptr() as usize, ptr.as_ptr() as usize + 4);
        write(ext, b"!!!");

        assert_eq!(ring.block_count(), 1);
        let front = ring.front().unwrap();
        assert_eq!(front.size(), 7);
        assert_eq!(read(&front), b"WXYZ!!!");
        assert_eq!(limit.cost_bytes, 7);
    }

    #[test]
    fn test_merge_back_spills_to_new_record() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 8).unwrap();

        ring.push_back(40, &mut limit).unwrap();
        ring.push_back(10, &mut limit).unwrap();
        assert_eq!(ring.pop_front(40, true, &mut limit).unwrap(), 40);

        // 12 bytes remain past the tail: a 20-byte extension cannot fit in
        // place, but a wrapped record can
        ring.merge_back(20, &mut limit).unwrap();
        assert_eq!(ring.block_count(), 2);
        assert_eq!(ring.back().unwrap().raw_size(), 20);
        assert_eq!(limit.cost_count, 2);
    }

    #[test]
    fn test_merge_back_after_retraction_preserves_window() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 4).unwrap();

        ring.push_back(10, &mut limit).unwrap();
        assert_eq!(ring.pop_back(4, false, &mut limit).unwrap(), 4);

        // The retracted gap must not re-enter the readable window
        ring.merge_back(5, &mut limit).unwrap();
        assert_eq!(ring.block_count(), 1);
        let back = ring.back().unwrap();
        assert_eq!(back.raw_size(), 15);
        assert_eq!((back.size(), back.writable()), (11, 4));
        assert_eq!(limit.cost_bytes, 15);
    }

    #[test]
    fn test_merge_front_in_place() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 8).unwrap();

        // Leave room before the head record by draining an older one
        ring.push_back(8, &mut limit).unwrap();
        let body = ring.push_back(6, &mut limit).unwrap();
        write(body, b"BODY..");
        let body_addr = body.as_ptr() as usize;
        ring.pop_front(8, true, &mut limit).unwrap();

        let hdr = ring.merge_front(4, &mut limit).unwrap();
        write(hdr, b"HDR!");

        assert_eq!(ring.block_count(), 1);
        let front = ring.front().unwrap();
        assert_eq!(front.size(), 10);
        assert_eq!(read(&front), b"HDR!BODY..");
        // The staged payload did not move
        assert_eq!(front.data().as_ptr() as usize + 4, body_addr);
    }

    #[test]
    fn test_merge_front_consumed_block_spills() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 8).unwrap();

        ring.push_back(8, &mut limit).unwrap();
        ring.pop_front(8, true, &mut limit).unwrap();
        ring.push_back(6, &mut limit).unwrap();
        ring.pop_front(2, true, &mut limit).unwrap();

        // A partially consumed record cannot grow at the front
        ring.merge_front(4, &mut limit).unwrap();
        assert_eq!(ring.block_count(), 2);
        assert_eq!(ring.front().unwrap().raw_size(), 4);
    }

    #[test]
    fn test_full_ring_rejects_push() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(22, 4).unwrap();

        ring.push_back(10, &mut limit).unwrap();
        ring.push_back(10, &mut limit).unwrap();
        assert_eq!((ring.head(), ring.tail()), (0, 22));

        let err = ring.push_back(1, &mut limit).unwrap_err();
        assert!(matches!(err, StagebufError::BufferFull { .. }));
    }

    #[test]
    fn test_block_index_bound() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 2).unwrap();

        ring.push_back(4, &mut limit).unwrap();
        ring.push_back(4, &mut limit).unwrap();
        let err = ring.push_back(4, &mut limit).unwrap_err();
        assert!(matches!(err, StagebufError::BufferFull { .. }));
    }

    #[test]
    fn test_zero_push_rejected() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 4).unwrap();
        assert!(matches!(
            ring.push_back(0, &mut limit),
            Err(StagebufError::InvalidParameter { .. })
        ));
        assert!(matches!(
            ring.push_front(0, &mut limit),
            Err(StagebufError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_pop_back_retraction_keeps_reservation() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 4).unwrap();

        ring.push_back(10, &mut limit).unwrap();
        assert_eq!(ring.pop_back(10, false, &mut limit).unwrap(), 10);

        // Drained but never filled: the reservation survives
        assert_eq!(ring.block_count(), 1);
        let back = ring.back().unwrap();
        assert_eq!((back.size(), back.writable()), (0, 10));

        // The same pop with free_unwritable releases it
        assert_eq!(ring.pop_back(0, true, &mut limit).unwrap(), 0);
        assert!(ring.empty());
    }

    #[test]
    fn test_dead_tail_reclaimed_after_wrap() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(30, 8).unwrap();

        ring.push_back(12, &mut limit).unwrap(); // [0, 13)
        ring.push_back(12, &mut limit).unwrap(); // [13, 26)
        ring.pop_front(12, true, &mut limit).unwrap();
        ring.push_back(12, &mut limit).unwrap(); // wraps to [0, 13)

        // Drain the high-side record; the head must cross the dead tail
        ring.pop_front(12, true, &mut limit).unwrap();
        assert_eq!(ring.head(), 0);

        let records = ring.walk().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].offset, 0);

        ring.pop_front(12, true, &mut limit).unwrap();
        assert!(ring.empty());
        assert_eq!(limit.cost_bytes, 0);
    }

    #[test]
    fn test_reset_rewinds_cursors() {
        let mut limit = Limit::default();
        let mut ring = StaticRing::new(64, 4).unwrap();

        ring.push_back(10, &mut limit).unwrap();
        ring.push_back(10, &mut limit).unwrap();
        ring.reset();

        assert!(ring.empty());
        assert_eq!((ring.head(), ring.tail()), (0, 0));
        assert!(ring.walk().unwrap().is_empty());
    }
}
