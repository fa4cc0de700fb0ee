//! On-demand heap staging: an ordered sequence of owned blocks.
//!
//! There is no wrap-around and no in-band length prefix here; the sequence
//! order carries the record boundaries. Merges reallocate the end block, so
//! pointers published for that end go stale across a merge.

use std::{collections::VecDeque, ptr::NonNull};

use crate::{
    block::{BlockView, OwnedBlock},
    error::{Result, StagebufError},
    manager::Limit,
};

/// Ordered sequence of heap-allocated staging blocks
#[derive(Debug, Default)]
pub struct DynamicList {
    blocks: VecDeque<OwnedBlock>,
}

impl DynamicList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// True when no blocks are live
    pub fn empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn check_request(n: usize) -> Result<()> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "push size cannot be zero",
            ));
        }
        Ok(())
    }

    /// Allocate a block of `n` payload bytes at the back
    pub fn push_back(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        Self::check_request(n)?;
        limit.charge(1, n)?;

        let block = match OwnedBlock::new(n) {
            Ok(block) => block,
            Err(err) => {
                limit.release(1, n);
                return Err(err);
            }
        };
        let ptr = block.raw_data();
        self.blocks.push_back(block);
        Ok(ptr)
    }

    /// Allocate a block of `n` payload bytes at the front
    pub fn push_front(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        Self::check_request(n)?;
        limit.charge(1, n)?;

        let block = match OwnedBlock::new(n) {
            Ok(block) => block,
            Err(err) => {
                limit.release(1, n);
                return Err(err);
            }
        };
        let ptr = block.raw_data();
        self.blocks.push_front(block);
        Ok(ptr)
    }

    /// Consume up to `n` bytes from the front block, freeing it when
    /// drained. Returns the bytes actually dropped.
    pub fn pop_front(
        &mut self,
        n: usize,
        free_unwritable: bool,
        limit: &mut Limit,
    ) -> Result<usize> {
        let front = self
            .blocks
            .front_mut()
            .ok_or_else(|| StagebufError::buffer_empty("pop_front"))?;

        let dropped = front.meta_mut().advance(n);
        if front.meta().releasable(free_unwritable) {
            let released = self.blocks.pop_front().expect("front exists");
            limit.release(1, released.raw_size());
        }
        Ok(dropped)
    }

    /// Retract up to `n` staged bytes from the back block, freeing it when
    /// drained. Returns the bytes actually dropped.
    pub fn pop_back(
        &mut self,
        n: usize,
        free_unwritable: bool,
        limit: &mut Limit,
    ) -> Result<usize> {
        let back = self
            .blocks
            .back_mut()
            .ok_or_else(|| StagebufError::buffer_empty("pop_back"))?;

        let dropped = back.meta_mut().retract(n);
        if back.meta().releasable(free_unwritable) {
            let released = self.blocks.pop_back().expect("back exists");
            limit.release(1, released.raw_size());
        }
        Ok(dropped)
    }

    /// Grow the back block by `n` bytes, or allocate one when the list is
    /// empty. The back payload may move; pointers to it go stale.
    pub fn merge_back(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "merge size cannot be zero",
            ));
        }
        if self.blocks.is_empty() {
            return self.push_back(n, limit);
        }

        limit.charge(0, n)?;
        let back = self.blocks.back_mut().expect("non-empty");
        match back.grow_back(n) {
            Ok(ptr) => Ok(ptr),
            Err(err) => {
                limit.release(0, n);
                Err(err)
            }
        }
    }

    /// Grow the front block by `n` bytes so the new bytes occupy the front,
    /// or allocate a block when the list is empty. A partially consumed
    /// front block cannot be grown and receives a fresh block instead. The
    /// front payload may move; pointers to it go stale.
    pub fn merge_front(&mut self, n: usize, limit: &mut Limit) -> Result<NonNull<u8>> {
        if n == 0 {
            return Err(StagebufError::invalid_parameter(
                "size",
                "merge size cannot be zero",
            ));
        }
        let mergeable = self
            .blocks
            .front()
            .is_some_and(|front| front.meta().read_off == 0);
        if !mergeable {
            return self.push_front(n, limit);
        }

        limit.charge(0, n)?;
        let front = self.blocks.front_mut().expect("non-empty");
        match front.grow_front(n) {
            Ok(ptr) => Ok(ptr),
            Err(err) => {
                limit.release(0, n);
                Err(err)
            }
        }
    }

    /// Snapshot of the oldest block
    pub fn front(&self) -> Result<BlockView> {
        self.blocks
            .front()
            .map(OwnedBlock::view)
            .ok_or_else(|| StagebufError::buffer_empty("front"))
    }

    /// Snapshot of the newest block
    pub fn back(&self) -> Result<BlockView> {
        self.blocks
            .back()
            .map(OwnedBlock::view)
            .ok_or_else(|| StagebufError::buffer_empty("back"))
    }

    /// Free every block
    pub fn reset(&mut self) {
        self.blocks.clear();
    }
}
