//! Error types and handling for stagebuf

/// Result type alias for stagebuf operations
pub type Result<T> = std::result::Result<T, StagebufError>;

/// Error types for the buffer staging layer
#[derive(Debug, thiserror::Error)]
pub enum StagebufError {
    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Static ring cannot place the request (space or block index)
    #[error("Buffer full: requested {requested}, available {available}")]
    BufferFull { requested: usize, available: usize },

    /// A configured cost limit would be crossed
    #[error("Limit exceeded: {axis} limit {limit}, in use {current}, requested {requested}")]
    LimitExceeded {
        axis: &'static str,
        limit: usize,
        current: usize,
        requested: usize,
    },

    /// The host allocator refused an allocation
    #[error("Out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Pop or end accessor on an empty manager
    #[error("Buffer empty: {operation}")]
    BufferEmpty { operation: &'static str },

    /// Malformed in-band data (varint overflow or truncation)
    #[error("Malformed data: {message}")]
    Malformed { message: String },
}

impl StagebufError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a buffer full error
    pub fn buffer_full(requested: usize, available: usize) -> Self {
        Self::BufferFull {
            requested,
            available,
        }
    }

    /// Create a limit exceeded error
    pub fn limit_exceeded(
        axis: &'static str,
        limit: usize,
        current: usize,
        requested: usize,
    ) -> Self {
        Self::LimitExceeded {
            axis,
            limit,
            current,
            requested,
        }
    }

    /// Create an out of memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create a buffer empty error
    pub fn buffer_empty(operation: &'static str) -> Self {
        Self::BufferEmpty { operation }
    }

    /// Create a malformed data error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
