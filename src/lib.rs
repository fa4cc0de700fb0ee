//! # Stagebuf - Dual-Mode Byte-Buffer Staging Layer
//!
//! Stagebuf is the send/receive staging layer of a message-bus transport:
//! callers obtain writable regions to stage outbound frames and readable
//! regions to drain inbound ones, without caring whether storage comes from
//! a single pre-allocated circular region (static mode) or from on-demand
//! heap blocks (dynamic mode).
//!
//! ## Features
//!
//! - **Two storage modes, one contract**: identical push/pop/merge surface
//!   over a static ring or a dynamic block list
//! - **Self-describing static ring**: every record carries a varint length
//!   prefix, so external readers of the region can recover boundaries
//! - **Double-ended staging**: reserve, extend, and retract at both ends
//! - **Deterministic cost accounting**: block and byte caps enforced on
//!   every reservation
//! - **Zero-copy hand-off**: callers write and read through published
//!   pointers bounded by each block's capacity
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 BufferManager                   │
//! │        limits · mode dispatch · accessors       │
//! ├────────────────────────┬────────────────────────┤
//! │      StaticRing        │      DynamicList       │
//! │  circular region with  │  ordered heap blocks,  │
//! │  varint record prefix  │  realloc-based merges  │
//! └────────────────────────┴────────────────────────┘
//!              │                       │
//!              ▼                       ▼
//!     varint codec (in-band)    OwnedBlock (alloc)
//! ```
//!
//! The manager is single-threaded by design; callers that need concurrency
//! serialize access externally.

pub mod block;
pub mod config;
pub mod dynamic;
pub mod error;
pub mod manager;
pub mod ring;
pub mod varint;

// Main API re-exports
pub use block::{BlockMeta, BlockView, OwnedBlock, ALIGNMENT};
pub use config::{ManagerConfig, DEFAULT_MAX_BLOCKS, DEFAULT_RING_SIZE};
pub use dynamic::DynamicList;
pub use error::{Result, StagebufError};
pub use manager::{BufferManager, Limit};
pub use ring::{RingRecord, StaticRing};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 3;
pub const VERSION_PATCH: u32 = 0;
