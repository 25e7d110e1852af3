//! Trait interfaces for signal-generation capabilities.
//!
//! Radar-specific capabilities (window lookup, integration, synthesis) live
//! next to their kernels in [`crate::radar::traits`].

use crate::kernel::{ExecInvariantViolation, Write1D};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Window generation capability.
pub trait WindowGenerate<T> {
    /// Run window generation into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Run window generation and allocate output samples.
    #[cfg(feature = "alloc")]
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}
