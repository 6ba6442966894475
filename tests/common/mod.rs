#![allow(dead_code)]

use nalgebra::{Matrix3, Vector3};

use almanac::almanac_errors::AlmanacError;
use almanac::bodies::Body;
use almanac::constants::{AU, GM_SUN};
use almanac::ephemeris::EphemerisSource;
use almanac::ref_system::{frame_rotation, Frame, RefEpoch};
use almanac::time::Instant;

/// Analytic stand-in for a planetary kernel: coplanar circular orbits in the
/// ecliptic plane, rotated into the equatorial J2000 frame the provider
/// contract requires. All bodies sit on the +x axis at ET 0.
///
/// Mirrors the de432s coverage gaps: body centers for Mercury and Mars are
/// not modeled, only their barycenters.
#[derive(Debug)]
pub struct ToyKernel {
    coverage_start_et: f64,
    coverage_end_et: f64,
    rot_eclm_to_equm: Matrix3<f64>,
}

impl ToyKernel {
    pub fn new() -> Self {
        let start = Instant::from_utc_str("1990-01-01T00:00:00").unwrap();
        let end = Instant::from_utc_str("2050-01-01T00:00:00").unwrap();
        Self::with_coverage(&start, &end)
    }

    pub fn with_coverage(start: &Instant, end: &Instant) -> Self {
        ToyKernel {
            coverage_start_et: start.et_seconds(),
            coverage_end_et: end.et_seconds(),
            rot_eclm_to_equm: frame_rotation(
                &Frame::Eclm(RefEpoch::J2000),
                &Frame::Equm(RefEpoch::J2000),
                start,
            ),
        }
    }

    /// Heliocentric circular orbit of radius `radius_au`, phase zero at ET 0.
    fn orbit(&self, radius_au: f64, et: f64) -> (Vector3<f64>, Vector3<f64>) {
        let radius = radius_au * AU;
        let rate = (GM_SUN / radius.powi(3)).sqrt();
        let (sin, cos) = (rate * et).sin_cos();
        let position = Vector3::new(radius * cos, radius * sin, 0.0);
        let velocity = Vector3::new(-radius * rate * sin, radius * rate * cos, 0.0);
        (position, velocity)
    }

    /// Epicycle around the Earth-Moon barycenter at the sidereal lunar rate:
    /// the Moon rides 384 400 km out, the Earth counterbalances 4 671 km on
    /// the opposite side.
    fn emb_epicycle(&self, radius: f64, et: f64) -> (Vector3<f64>, Vector3<f64>) {
        const LUNAR_RATE: f64 = 2.0 * std::f64::consts::PI / (27.32 * 86_400.0);

        let (emb_pos, emb_vel) = self.orbit(1.0, et);
        let (sin, cos) = (LUNAR_RATE * et).sin_cos();
        let position = emb_pos + Vector3::new(radius * cos, radius * sin, 0.0);
        let velocity = emb_vel
            + Vector3::new(-radius * LUNAR_RATE * sin, radius * LUNAR_RATE * cos, 0.0);
        (position, velocity)
    }
}

const MOON_EMB_DISTANCE: f64 = 384_400.0;
const EARTH_EMB_DISTANCE: f64 = 4_671.0;

impl EphemerisSource for ToyKernel {
    fn barycentric_state(
        &self,
        body: Body,
        at: &Instant,
    ) -> Result<(Vector3<f64>, Vector3<f64>), AlmanacError> {
        let et = at.et_seconds();
        if et < self.coverage_start_et || et > self.coverage_end_et {
            return Err(AlmanacError::EphemerisUnavailable {
                body,
                et_seconds: et,
            });
        }

        let (position, velocity) = match body {
            Body::SolarSystemBarycenter | Body::Sun => (Vector3::zeros(), Vector3::zeros()),
            Body::MercuryBarycenter => self.orbit(0.387, et),
            Body::VenusBarycenter | Body::Venus => self.orbit(0.723, et),
            Body::EarthMoonBarycenter => self.orbit(1.0, et),
            Body::Earth => self.emb_epicycle(-EARTH_EMB_DISTANCE, et),
            Body::Moon => self.emb_epicycle(MOON_EMB_DISTANCE, et),
            Body::MarsBarycenter => self.orbit(1.524, et),
            Body::JupiterBarycenter => self.orbit(5.203, et),
            Body::SaturnBarycenter => self.orbit(9.537, et),
            Body::UranusBarycenter => self.orbit(19.19, et),
            Body::NeptuneBarycenter => self.orbit(30.07, et),
            Body::PlutoBarycenter => self.orbit(39.48, et),
            // No body-center trajectory loaded for these
            Body::Mercury | Body::Mars => {
                return Err(AlmanacError::EphemerisUnavailable {
                    body,
                    et_seconds: et,
                })
            }
        };
        let rot = self.rot_eclm_to_equm;
        Ok((rot * position, rot * velocity))
    }
}
