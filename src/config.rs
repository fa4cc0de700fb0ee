//! Manager configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, StagebufError};

/// Default ring size for static mode (64KB)
pub const DEFAULT_RING_SIZE: usize = 64 * 1024;

/// Default bound on live records in static mode
pub const DEFAULT_MAX_BLOCKS: usize = 64;

/// Configuration for a buffer manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Static ring size in bytes; 0 selects dynamic mode
    pub ring_size: usize,
    /// Maximum live records in static mode
    pub max_blocks: usize,
    /// Cap on reserved bytes, 0 = unlimited
    pub limit_bytes: usize,
    /// Cap on live blocks, 0 = unlimited
    pub limit_count: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            ring_size: 0,
            max_blocks: DEFAULT_MAX_BLOCKS,
            limit_bytes: 0,
            limit_count: 0,
        }
    }
}

impl ManagerConfig {
    /// Dynamic-mode configuration with no limits
    pub fn dynamic() -> Self {
        Self::default()
    }

    /// Static-mode configuration over a ring of `ring_size` bytes
    pub fn fixed(ring_size: usize) -> Self {
        Self {
            ring_size,
            ..Default::default()
        }
    }

    /// Set the static ring size
    pub fn with_ring_size(mut self, size: usize) -> Self {
        self.ring_size = size;
        self
    }

    /// Set the static record bound
    pub fn with_max_blocks(mut self, count: usize) -> Self {
        self.max_blocks = count;
        self
    }

    /// Set the reserved-byte cap
    pub fn with_limit_bytes(mut self, bytes: usize) -> Self {
        self.limit_bytes = bytes;
        self
    }

    /// Set the live-block cap
    pub fn with_limit_count(mut self, count: usize) -> Self {
        self.limit_count = count;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.ring_size > 0 && self.max_blocks == 0 {
            return Err(StagebufError::invalid_parameter(
                "max_blocks",
                "static mode needs room for at least one record",
            ));
        }

        if self.ring_size > 0 && self.limit_bytes > 0 && self.limit_bytes > self.ring_size {
            return Err(StagebufError::invalid_parameter(
                "limit_bytes",
                "byte cap exceeds the ring size",
            ));
        }

        Ok(())
    }
}
