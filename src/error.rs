//! Error types: allocation failures from the fallible vector core and
//! invalid dictionary configuration.

use std::alloc::Layout;
use thiserror::Error;

/// Failure to obtain backing memory for a [`Vector`](crate::Vector).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The requested capacity does not fit in `isize::MAX` bytes.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The global allocator returned null.
    #[error("memory allocation of {size} bytes (align {align}) failed")]
    OutOfMemory {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment.
        align: usize,
    },
}

impl AllocError {
    pub(crate) fn out_of_memory(layout: Layout) -> Self {
        AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Terminate on an allocation failure reported by the fallible core.
    ///
    /// Out-of-memory goes through `handle_alloc_error` so the process aborts
    /// the same way `std` collections do; overflow panics.
    #[cold]
    pub(crate) fn fatal(self) -> ! {
        log::error!("{}", self);
        match self {
            AllocError::CapacityOverflow => panic!("capacity overflow"),
            AllocError::OutOfMemory { size, align } => match Layout::from_size_align(size, align) {
                Ok(layout) => std::alloc::handle_alloc_error(layout),
                Err(_) => panic!("memory allocation of {} bytes failed", size),
            },
        }
    }
}

/// Rejected [`DictConfig`](crate::DictConfig).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("initial bucket capacity must be non-zero")]
    ZeroBucketCapacity,

    #[error("initial bucket capacity must be a power of two, got {0}")]
    BucketCapacityNotPowerOfTwo(usize),

    #[error("initial entry capacity must be non-zero")]
    ZeroEntryCapacity,
}
