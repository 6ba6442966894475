//! Ephemeris provider interface and observer-relative state queries.
//!
//! Trajectory data comes from an external provider behind the
//! [`EphemerisSource`] trait: one call returning the barycentric state of a
//! body at an instant, interpolated from whatever kernel files the provider
//! has loaded. The provider is the single hard numerical dependency of this
//! crate and is never reimplemented here.
//!
//! On top of that oracle, the query layer composes the observer-relative
//! lookup: geometric differencing, light-time solution by fixed-point
//! iteration, and stellar aberration, i.e. the `"NONE"` / `"LT"` / `"LT+S"`
//! correction modes of the kernel toolkits.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector3;

use crate::almanac_errors::AlmanacError;
use crate::bodies::Body;
use crate::constants::{Kilometer, KilometerPerSecond, LightTimeSeconds, VLIGHT};
use crate::ref_system::{correct_aberration, Frame};
use crate::time::Instant;

/// Aberration correction applied to an observer-relative query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Correction {
    /// Geometric state, no correction.
    None,
    /// Light-time only: the target is evaluated at the photon emission time.
    LightTime,
    /// Light-time plus stellar aberration from the observer's velocity.
    #[default]
    LightTimeStellar,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Correction::None => "NONE",
            Correction::LightTime => "LT",
            Correction::LightTimeStellar => "LT+S",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Correction {
    type Err = AlmanacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Correction::None),
            "LT" => Ok(Correction::LightTime),
            "LT+S" => Ok(Correction::LightTimeStellar),
            other => Err(AlmanacError::UnknownCorrection(other.to_string())),
        }
    }
}

/// Position and velocity of a target relative to an observer, tagged with the
/// reference frame it is expressed in.
///
/// Recomputed per query; never stored across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub target: Body,
    pub observer: Body,
    pub frame: Frame,
    /// Position components [km].
    pub position: Vector3<f64>,
    /// Velocity components [km/s].
    pub velocity: Vector3<f64>,
}

impl StateVector {
    /// Euclidean distance from observer to target [km].
    pub fn distance(&self) -> Kilometer {
        self.position.norm()
    }

    /// Magnitude of the relative velocity [km/s].
    pub fn speed(&self) -> KilometerPerSecond {
        self.velocity.norm()
    }
}

/// External provider of interpolated trajectory data.
///
/// Implementations hold their kernel tables as immutable state loaded before
/// the first query, so a single handle can serve concurrent readers.
///
/// The one required capability: the state of `body` relative to the
/// solar-system barycenter, expressed in the equatorial mean J2000 frame, in
/// kilometers and kilometers per second. A provider with no loaded segment
/// covering `(body, at)` fails with [`AlmanacError::EphemerisUnavailable`].
pub trait EphemerisSource: fmt::Debug + Send + Sync {
    fn barycentric_state(
        &self,
        body: Body,
        at: &Instant,
    ) -> Result<(Vector3<f64>, Vector3<f64>), AlmanacError>;
}

/// Iteration cap for the light-time fixed point.
const MAX_LIGHT_TIME_ITER: usize = 10;

/// Convergence threshold on successive light-time estimates [s].
const LIGHT_TIME_TOL: f64 = 1e-9;

/// Observer-relative state in the equatorial mean J2000 frame.
///
/// Arguments
/// ---------
/// * `source`: the trajectory provider.
/// * `target`: body being observed.
/// * `observer`: body the query is centered on.
/// * `at`: observation (reception) instant.
/// * `correction`: aberration correction mode.
///
/// Return
/// ------
/// * `(position, velocity, light_time)` of the target relative to the
///   observer, in km, km/s and seconds.
///
/// Remarks
/// -------
/// * Under light-time correction the target is evaluated at the retarded
///   instant `at − lt`, with `lt` solved by fixed-point iteration on
///   `lt = ‖target(at − lt) − observer(at)‖ / c`; the loop converges in a few
///   steps for solar-system geometries and fails with
///   [`AlmanacError::LightTimeDivergence`] if the cap is hit.
/// * Stellar aberration displaces the apparent position only; the returned
///   velocity is light-time corrected but not aberration corrected.
pub(crate) fn relative_state(
    source: &dyn EphemerisSource,
    target: Body,
    observer: Body,
    at: &Instant,
    correction: Correction,
) -> Result<(Vector3<f64>, Vector3<f64>, LightTimeSeconds), AlmanacError> {
    let (observer_pos, observer_vel) = source.barycentric_state(observer, at)?;

    match correction {
        Correction::None => {
            let (target_pos, target_vel) = source.barycentric_state(target, at)?;
            let rel_pos = target_pos - observer_pos;
            let light_time = rel_pos.norm() / VLIGHT;
            Ok((rel_pos, target_vel - observer_vel, light_time))
        }
        Correction::LightTime | Correction::LightTimeStellar => {
            let mut light_time = 0.0;
            let mut rel_pos = Vector3::zeros();
            let mut rel_vel = Vector3::zeros();
            let mut converged = false;

            for _ in 0..MAX_LIGHT_TIME_ITER {
                let emission = at.offset_seconds(-light_time);
                let (target_pos, target_vel) = source.barycentric_state(target, &emission)?;
                rel_pos = target_pos - observer_pos;
                rel_vel = target_vel - observer_vel;

                let next = rel_pos.norm() / VLIGHT;
                if (next - light_time).abs() < LIGHT_TIME_TOL {
                    light_time = next;
                    converged = true;
                    break;
                }
                light_time = next;
            }

            if !converged {
                return Err(AlmanacError::LightTimeDivergence(MAX_LIGHT_TIME_ITER));
            }

            if correction == Correction::LightTimeStellar {
                rel_pos = correct_aberration(rel_pos, observer_vel);
            }
            Ok((rel_pos, rel_vel, light_time))
        }
    }
}
