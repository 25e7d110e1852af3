//! Signal generation capabilities: target spectral windows and the
//! capability traits implemented by the chirp-design kernels.

pub mod traits;
#[cfg(feature = "alloc")]
pub mod windows;
