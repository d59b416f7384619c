//! Class-C conduction-angle model of tetrode anode dissipation.
//!
//! The tube conducts during the fraction of the RF cycle where the grid
//! drive overcomes the cutoff bias. The conduction half-angle is
//! `t = arccos(CUTOFF_BIAS / ug1)`; the pulse shape coefficients
//! `a0 = sin t - t cos t` and `a1 = t - sin t cos t` relate the DC and
//! fundamental components of the anode current pulse. The fundamental
//! `i1 = (ic - iscr) a1 / a0` times half the RF anode voltage amplitude
//! is the power delivered to the load; anode dissipation is the DC
//! input power `ea * ia` minus that.
//!
//! The model has two hard edges which must degrade, not crash: drive
//! magnitudes below the cutoff bias put the arccosine argument out of
//! `[-1, 1]`, and `ug1` exactly at the bias gives `t = 0`, `a0 = 0` and
//! a division by zero.

use serde::{Deserialize, Serialize};

use crate::channel::Channel;

/// Grid cutoff bias of the tube, in the unit of the scaled `ug1`
/// reading. `t = arccos(CUTOFF_BIAS / ug1)`.
pub const CUTOFF_BIAS: f64 = -77.0;

/// Sentinel reported in both power fields of an invalid estimate.
pub const INVALID_POWER: f64 = -1.0;

/// One set of scaled instrumentation samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Samples {
    /// Anode current
    pub ia: f64,
    /// Anode supply voltage
    pub ea: f64,
    /// Anode RF voltage amplitude
    pub ua: f64,
    /// Cathode current
    pub ic: f64,
    /// Screen grid current
    pub iscr: f64,
    /// Control grid drive voltage
    pub ug1: f64,
}

impl Samples {
    pub fn get(&self, ch: Channel) -> f64 {
        match ch {
            Channel::Ia => self.ia,
            Channel::Ea => self.ea,
            Channel::Ua => self.ua,
            Channel::Ic => self.ic,
            Channel::Iscr => self.iscr,
            Channel::Ug1 => self.ug1,
        }
    }

    pub fn set(&mut self, ch: Channel, value: f64) {
        match ch {
            Channel::Ia => self.ia = value,
            Channel::Ea => self.ea = value,
            Channel::Ua => self.ua = value,
            Channel::Ic => self.ic = value,
            Channel::Iscr => self.iscr = value,
            Channel::Ug1 => self.ug1 = value,
        }
    }
}

/// Validity tag attached to a computed reading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Valid,
    #[default]
    Invalid,
}

/// Result of one estimation cycle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct PowerEstimate {
    /// RF power delivered to the load, kW.
    pub rf_power: f64,
    /// Power dissipated in the anode, kW.
    pub anode_power: f64,
    pub quality: Quality,
}

impl PowerEstimate {
    /// The well-formed invalid reading: sentinel powers, `Invalid` tag.
    pub const INVALID: Self = Self {
        rf_power: INVALID_POWER,
        anode_power: INVALID_POWER,
        quality: Quality::Invalid,
    };
}

impl Default for PowerEstimate {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Numeric failures of the model, distinct from sample fetch failures.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum ComputeError {
    /// The arccosine argument left `[-1, 1]`: `|ug1| < |CUTOFF_BIAS|`.
    #[error("conduction angle argument {0} out of [-1, 1]")]
    Domain(f64),
    /// Zero conduction angle (`ug1 == CUTOFF_BIAS` exactly): `a0 = 0`.
    #[error("zero conduction angle singularity (a0 = 0)")]
    Singularity,
    /// The model produced a non-finite power.
    #[error("non-finite power result")]
    NonFinite,
}

/// Conduction half-angle of the tube for a given grid drive reading.
pub fn conduction_half_angle(ug1: f64) -> Result<f64, ComputeError> {
    let x = CUTOFF_BIAS / ug1;
    // Also rejects NaN (ug1 = NaN) and infinities (ug1 = 0).
    if !(-1.0..=1.0).contains(&x) {
        return Err(ComputeError::Domain(x));
    }
    Ok(x.acos())
}

/// Estimate RF and anode power from one set of scaled samples.
///
/// Always returns either a `Valid` estimate with finite powers or a
/// [`ComputeError`] naming the edge that was hit; callers degrade the
/// error to [`PowerEstimate::INVALID`].
pub fn estimate(s: &Samples) -> Result<PowerEstimate, ComputeError> {
    let t = conduction_half_angle(s.ug1)?;
    let a0 = t.sin() - t * t.cos();
    let a1 = t - t.sin() * t.cos();
    if a0 == 0.0 {
        return Err(ComputeError::Singularity);
    }
    let i1 = (s.ic - s.iscr) * a1 / a0;
    let prf = i1 * s.ua / 2.0;
    let ptot = s.ea * s.ia;
    let pa = ptot - prf;
    if !prf.is_finite() || !pa.is_finite() {
        return Err(ComputeError::NonFinite);
    }
    Ok(PowerEstimate {
        rf_power: prf,
        anode_power: pa,
        quality: Quality::Valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::isclose;

    fn nominal() -> Samples {
        Samples {
            ia: 2.0,
            ea: 5000.0,
            ua: 3000.0,
            ic: 1.2,
            iscr: 0.1,
            ug1: -100.0,
        }
    }

    #[test]
    fn nominal_drive() {
        let s = nominal();
        let est = estimate(&s).unwrap();
        assert_eq!(est.quality, Quality::Valid);
        assert!(est.rf_power.is_finite());
        assert!(est.anode_power.is_finite());
        // pa + prf == ptot by construction of the model.
        assert!(isclose(
            est.anode_power + est.rf_power,
            s.ea * s.ia,
            1e-9,
            0.0
        ));
        // Against the closed form.
        let t = (CUTOFF_BIAS / s.ug1).acos();
        let a0 = t.sin() - t * t.cos();
        let a1 = t - t.sin() * t.cos();
        let pa = s.ea * s.ia - (s.ic - s.iscr) * a1 / a0 * s.ua / 2.0;
        assert!(isclose(est.anode_power, pa, 1e-12, 0.0));
    }

    #[test]
    fn positive_drive_boundary() {
        // ug1 = +77: argument exactly -1, t = pi, a0 = pi. Well defined.
        let s = Samples {
            ug1: 77.0,
            ..nominal()
        };
        let est = estimate(&s).unwrap();
        assert_eq!(est.quality, Quality::Valid);
        assert!(est.anode_power.is_finite());
    }

    #[test]
    fn drive_below_cutoff() {
        for ug1 in [-50.0, 50.0, -76.999, 0.0, f64::NAN] {
            let s = Samples { ug1, ..nominal() };
            assert!(matches!(estimate(&s), Err(ComputeError::Domain(_))), "ug1 = {ug1}");
        }
    }

    #[test]
    fn cutoff_singularity() {
        // Exactly at the bias: t = 0, a0 = 0. Tagged as the
        // singularity, not as a domain error.
        let s = Samples {
            ug1: CUTOFF_BIAS,
            ..nominal()
        };
        assert_eq!(estimate(&s).unwrap_err(), ComputeError::Singularity);
    }

    #[test]
    fn non_finite_inputs() {
        let s = Samples {
            ea: f64::INFINITY,
            ..nominal()
        };
        assert_eq!(estimate(&s).unwrap_err(), ComputeError::NonFinite);
    }

    #[test]
    fn invalid_sentinel() {
        let est = PowerEstimate::INVALID;
        assert_eq!(est.quality, Quality::Invalid);
        assert_eq!(est.rf_power, INVALID_POWER);
        assert_eq!(est.anode_power, INVALID_POWER);
        assert_eq!(PowerEstimate::default(), est);
    }

    #[test]
    fn half_angle_monotonic_in_drive() {
        // Stronger drive conducts longer.
        let t1 = conduction_half_angle(-80.0).unwrap();
        let t2 = conduction_half_angle(-200.0).unwrap();
        assert!(t2 > t1);
        assert!(t1 > 0.0 && t2 < core::f64::consts::PI);
    }
}
