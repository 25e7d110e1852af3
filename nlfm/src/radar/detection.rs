//! Required-SNR estimates for non-coherent pulse integration.
//!
//! Both formulas come from Richards, Scheer and Holm, *Principles of Modern
//! Radar* (2010). Albersheim is accurate to about 0.2 dB for
//! `1e-7 < Pfa < 1e-3`, `0.1 < Pd < 0.9` and `1 <= N < 8096`; Shnidman to
//! about 1 dB for `0.1 <= Pd <= 0.99` and `1 <= N < 100`.

use crate::kernel::{scalar, ConfigError};
use nalgebra::RealField;

/// Target fluctuation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwerlingCase {
    /// Non-fluctuating target (Swerling 0 / 5).
    NonFluctuating,
    /// Scan-to-scan Rayleigh fluctuation.
    One,
    /// Pulse-to-pulse Rayleigh fluctuation.
    Two,
    /// Scan-to-scan chi-square (4 DOF) fluctuation.
    Three,
    /// Pulse-to-pulse chi-square (4 DOF) fluctuation.
    Four,
}

fn probability<F>(arg: &'static str, value: F) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { arg });
    }
    if value <= F::zero() || value >= F::one() {
        return Err(ConfigError::InvalidArgument {
            arg,
            reason: "probability must lie strictly between 0 and 1",
        });
    }
    Ok(value)
}

fn pulse_count<F>(pulses: usize) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    if pulses == 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "pulses",
            reason: "at least one pulse is required",
        });
    }
    F::from_usize(pulses).ok_or(ConfigError::InvalidArgument {
        arg: "pulses",
        reason: "pulse count is not representable",
    })
}

/// Albersheim's required single-pulse SNR in dB for `pulses` non-coherently
/// integrated pulses.
pub fn albersheim<F>(pfa: F, pd: F, pulses: usize) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    let pfa = probability("pfa", pfa)?;
    let pd = probability("pd", pd)?;
    let n = pulse_count::<F>(pulses)?;
    let k = |v: f64| scalar::<F>("albersheim", v);

    let a = (k(0.62)? / pfa).ln();
    let b = (pd / (F::one() - pd)).ln();
    let gain = k(6.2)? + k(4.54)? / (n + k(0.44)?).sqrt();
    Ok(-k(5.0)? * n.log10() + gain * (a + k(0.12)? * a * b + k(1.7)? * b).log10())
}

/// Shnidman's required single-pulse SNR in dB for `pulses` non-coherently
/// integrated pulses and a Swerling target model.
pub fn shnidman<F>(pfa: F, pd: F, pulses: usize, case: SwerlingCase) -> Result<F, ConfigError>
where
    F: RealField + Copy,
{
    let pfa = probability("pfa", pfa)?;
    let pd = probability("pd", pd)?;
    let n = pulse_count::<F>(pulses)?;
    let k = |v: f64| scalar::<F>("shnidman", v);

    let alpha = if pulses < 40 { F::zero() } else { k(0.25)? };
    let (four, gain) = (k(4.0)?, k(0.8)?);
    let spread = |p: F| (-gain * (four * p * (F::one() - p)).ln()).sqrt();
    let sign = if pd < k(0.5)? { -F::one() } else { F::one() };
    let eta = spread(pfa) + sign * spread(pd);
    let x_inf = eta * (eta + k(2.0)? * (n / k(2.0)? + (alpha - k(0.25)?)).sqrt());

    let fluctuation = match case {
        SwerlingCase::NonFluctuating => None,
        SwerlingCase::One => Some(F::one()),
        SwerlingCase::Two => Some(n),
        SwerlingCase::Three => Some(k(2.0)?),
        SwerlingCase::Four => Some(k(2.0)? * n),
    };
    let loss = match fluctuation {
        None => F::one(),
        Some(order) => {
            let c1 = (((k(17.7006)? * pd - k(18.4496)?) * pd + k(14.5339)?) * pd - k(3.525)?)
                / order;
            let c2 = ((k(27.31)? * pd - k(25.14)?).exp()
                + (pd - k(0.8)?)
                    * (k(0.7)? * (k(1e-5)? / pfa).ln() + (k(2.0)? * n - k(20.0)?) / k(80.0)?))
                / order;
            let c_db = if pd <= k(0.872)? { c1 } else { c1 + c2 };
            k(10.0)?.powf(c_db / k(10.0)?)
        }
    };

    Ok(k(10.0)? * (loss * x_inf / n).log10())
}
