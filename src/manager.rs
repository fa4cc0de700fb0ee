//! Manager façade over the two storage backends.
//!
//! The mode is chosen at configuration time: a positive ring size selects
//! the static ring, zero selects the dynamic list. Every public operation
//! dispatches to the active backend and shares one reservation-cost account.
//! The manager is single-threaded; callers needing concurrency serialize
//! access externally.

use std::ptr::NonNull;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    block::BlockView,
    config::ManagerConfig,
    dynamic::DynamicList,
    error::{Result, StagebufError},
    ring::StaticRing,
};

/// Reservation cost accounting and caps.
///
/// `cost_count` tracks live blocks, `cost_bytes` the sum of their
/// capacities. A zero limit means unlimited on that axis. Lowering a limit
/// below the current cost is accepted; further growth is rejected until the
/// cost falls back under the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limit {
    /// Number of live blocks
    pub cost_count: usize,
    /// Sum of live block capacities
    pub cost_bytes: usize,
    /// Cap on live blocks, 0 = unlimited
    pub limit_count: usize,
    /// Cap on reserved bytes, 0 = unlimited
    pub limit_bytes: usize,
}

impl Limit {
    /// Account for `blocks` new blocks and `bytes` new reserved bytes,
    /// failing without side effects when a cap would be crossed
    pub(crate) fn charge(&mut self, blocks: usize, bytes: usize) -> Result<()> {
        if blocks > 0 && self.limit_count != 0 && self.cost_count + blocks > self.limit_count {
            return Err(StagebufError::limit_exceeded(
                "count",
                self.limit_count,
                self.cost_count,
                blocks,
            ));
        }
        if bytes > 0 && self.limit_bytes != 0 && self.cost_bytes + bytes > self.limit_bytes {
            return Err(StagebufError::limit_exceeded(
                "bytes",
                self.limit_bytes,
                self.cost_bytes,
                bytes,
            ));
        }
        self.cost_count += blocks;
        self.cost_bytes += bytes;
        Ok(())
    }

    /// Return `blocks` blocks and `bytes` reserved bytes to the account
    pub(crate) fn release(&mut self, blocks: usize, bytes: usize) {
        debug_assert!(self.cost_count >= blocks && self.cost_bytes >= bytes);
        self.cost_count -= blocks;
        self.cost_bytes -= bytes;
    }

    fn clear_costs(&mut self) {
        self.cost_count = 0;
        self.cost_bytes = 0;
    }
}

/// Active storage backend; the set of modes is closed
#[derive(Debug)]
enum Backend {
    Static(StaticRing),
    Dynamic(DynamicList),
}

/// Dual-mode staging buffer manager
#[derive(Debug)]
pub struct BufferManager {
    backend: Backend,
    limit: Limit,
}

impl BufferManager {
    /// Create a manager in dynamic mode with no limits
    pub fn new() -> Self {
        Self {
            backend: Backend::Dynamic(DynamicList::new()),
            limit: Limit::default(),
        }
    }

    /// Create a manager with the given mode selection, as in [`set_mode`]
    ///
    /// [`set_mode`]: Self::set_mode
    pub fn with_mode(ring_size: usize, max_blocks: usize) -> Result<Self> {
        let mut manager = Self::new();
        manager.set_mode(ring_size, max_blocks)?;
        Ok(manager)
    }

    /// Create a manager from a validated configuration
    pub fn with_config(config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        let mut manager = Self::with_mode(config.ring_size, config.max_blocks)?;
        manager.set_limit(config.limit_bytes, config.limit_count);
        Ok(manager)
    }

    /// Select the storage mode, discarding all live blocks.
    ///
    /// `ring_size > 0` allocates a static ring holding up to `max_blocks`
    /// records; `ring_size == 0` selects dynamic mode. When the ring
    /// allocation fails the manager is left empty in dynamic mode.
    pub fn set_mode(&mut self, ring_size: usize, max_blocks: usize) -> Result<()> {
        if ring_size > 0 && max_blocks == 0 {
            return Err(StagebufError::invalid_parameter(
                "max_blocks",
                "static mode needs room for at least one record",
            ));
        }

        // Release the old backing store before allocating the new one
        self.backend = Backend::Dynamic(DynamicList::new());
        self.limit.clear_costs();

        if ring_size > 0 {
            self.backend = Backend::Static(StaticRing::new(ring_size, max_blocks)?);
            debug!(
                "static mode: ring_size={} max_blocks={}",
                ring_size, max_blocks
            );
        } else {
            debug!("dynamic mode");
        }
        Ok(())
    }

    /// True when backed by the static ring
    pub fn is_static_mode(&self) -> bool {
        matches!(self.backend, Backend::Static(_))
    }

    /// True when backed by the dynamic list
    pub fn is_dynamic_mode(&self) -> bool {
        matches!(self.backend, Backend::Dynamic(_))
    }

    /// Update the cost caps; 0 means unlimited on that axis
    pub fn set_limit(&mut self, max_bytes: usize, max_count: usize) {
        self.limit.limit_bytes = max_bytes;
        self.limit.limit_count = max_count;
        debug!("limits: bytes={} count={}", max_bytes, max_count);
    }

    /// Snapshot of the cost account
    pub fn limit(&self) -> Limit {
        self.limit
    }

    /// Reserve `n` writable bytes at the back
    pub fn push_back(&mut self, n: usize) -> Result<NonNull<u8>> {
        match &mut self.backend {
            Backend::Static(ring) => ring.push_back(n, &mut self.limit),
            Backend::Dynamic(list) => list.push_back(n, &mut self.limit),
        }
    }

    /// Reserve `n` writable bytes at the front
    pub fn push_front(&mut self, n: usize) -> Result<NonNull<u8>> {
        match &mut self.backend {
            Backend::Static(ring) => ring.push_front(n, &mut self.limit),
            Backend::Dynamic(list) => list.push_front(n, &mut self.limit),
        }
    }

    /// Consume up to `n` bytes from the front block; returns the bytes
    /// actually dropped
    pub fn pop_front(&mut self, n: usize, free_unwritable: bool) -> Result<usize> {
        match &mut self.backend {
            Backend::Static(ring) => ring.pop_front(n, free_unwritable, &mut self.limit),
            Backend::Dynamic(list) => list.pop_front(n, free_unwritable, &mut self.limit),
        }
    }

    /// Retract up to `n` staged bytes from the back block; returns the
    /// bytes actually dropped
    pub fn pop_back(&mut self, n: usize, free_unwritable: bool) -> Result<usize> {
        match &mut self.backend {
            Backend::Static(ring) => ring.pop_back(n, free_unwritable, &mut self.limit),
            Backend::Dynamic(list) => list.pop_back(n, free_unwritable, &mut self.limit),
        }
    }

    /// Extend the back block by `n` bytes when the backing layout allows,
    /// otherwise reserve a fresh back block.
    ///
    /// In dynamic mode the back payload may move; pointers published for
    /// the back block go stale across this call.
    pub fn merge_back(&mut self, n: usize) -> Result<NonNull<u8>> {
        match &mut self.backend {
            Backend::Static(ring) => ring.merge_back(n, &mut self.limit),
            Backend::Dynamic(list) => list.merge_back(n, &mut self.limit),
        }
    }

    /// Extend the front block by `n` bytes so they become its first
    /// readable bytes, when the backing layout allows; otherwise reserve a
    /// fresh front block.
    ///
    /// In dynamic mode the front payload may move; pointers published for
    /// the front block go stale across this call.
    pub fn merge_front(&mut self, n: usize) -> Result<NonNull<u8>> {
        match &mut self.backend {
            Backend::Static(ring) => ring.merge_front(n, &mut self.limit),
            Backend::Dynamic(list) => list.merge_front(n, &mut self.limit),
        }
    }

    /// Snapshot of the oldest block
    pub fn front(&self) -> Result<BlockView> {
        match &self.backend {
            Backend::Static(ring) => ring.front(),
            Backend::Dynamic(list) => list.front(),
        }
    }

    /// Snapshot of the newest block
    pub fn back(&self) -> Result<BlockView> {
        match &self.backend {
            Backend::Static(ring) => ring.back(),
            Backend::Dynamic(list) => list.back(),
        }
    }

    /// True when no blocks are live
    pub fn empty(&self) -> bool {
        match &self.backend {
            Backend::Static(ring) => ring.empty(),
            Backend::Dynamic(list) => list.empty(),
        }
    }

    /// Drop every live block; static mode keeps its region allocated
    pub fn reset(&mut self) {
        match &mut self.backend {
            Backend::Static(ring) => ring.reset(),
            Backend::Dynamic(list) => list.reset(),
        }
        self.limit.clear_costs();
        debug!("reset");
    }

    /// Access the static ring, for record-walk consumers
    pub fn static_ring(&self) -> Option<&StaticRing> {
        match &self.backend {
            Backend::Static(ring) => Some(ring),
            Backend::Dynamic(_) => None,
        }
    }
}

impl Default for BufferManager {
    fn default() -> Self {
        Self::new()
    }
}
