use super::ConfigError;
use nalgebra::RealField;
use num_traits::FromPrimitive;

/// Constructor validation lifecycle shared by kernel structs.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

/// Reject NaN and infinite scalars.
pub fn require_finite<F>(arg: &'static str, value: F) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { arg })
    }
}

/// Reject non-finite, zero and negative scalars.
pub fn require_positive<F>(arg: &'static str, value: F) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    let value = require_finite(arg, value)?;
    if value <= F::zero() {
        return Err(ConfigError::InvalidArgument {
            arg,
            reason: "value must be > 0",
        });
    }
    Ok(value)
}

/// Convert an `f64` constant into the kernel scalar type.
pub fn scalar<F>(arg: &'static str, value: f64) -> Result<F, ConfigError>
where
    F: FromPrimitive,
{
    F::from_f64(value).ok_or(ConfigError::InvalidArgument {
        arg,
        reason: "scalar conversion failed",
    })
}
