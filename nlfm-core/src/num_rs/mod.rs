//! Functions analogous to numpy's numeric routines.

mod gradient;
mod integrate;

pub use gradient::*;
pub use integrate::*;
