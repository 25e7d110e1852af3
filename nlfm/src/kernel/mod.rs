//! Shared trait-first kernel substrate.
//!
//! Every stage of the chirp-design pipeline is a kernel: a plain config
//! struct validated once by [`KernelLifecycle::try_new`], then executed
//! through slice adapters ([`Read1D`], [`Write1D`]) that accept slices,
//! vectors and ndarray buffers alike.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
