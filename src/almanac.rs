//! # Almanac: session state and query façade
//!
//! This module defines the [`Almanac`](crate::almanac::Almanac) struct, the central façade that wires together:
//!
//! 1. **Ephemerides access** — a shared handle on an external
//!    [`EphemerisSource`](crate::ephemeris::EphemerisSource) whose kernel tables are loaded once
//!    and immutable afterwards.
//! 2. **Frame rotations** — the equatorial↔ecliptic J2000 matrices, precomputed
//!    at construction since they never change.
//! 3. **The query pipeline** — observer-relative states with aberration
//!    corrections, spherical sky positions, phase angles, and the
//!    [`SeriesBuilder`](crate::series::SeriesBuilder) entry point.
//!
//! There is no global state: every query goes through an explicitly owned
//! `Almanac`, constructed once at startup and dropped at process exit.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use std::sync::Arc;
//!
//! use almanac::almanac::Almanac;
//! use almanac::bodies::Body;
//! use almanac::time::Instant;
//!
//! # fn kernel_source() -> Arc<dyn almanac::ephemeris::EphemerisSource> { unimplemented!() }
//! // Wrap a loaded kernel provider in a session
//! let almanac = Almanac::new(kernel_source());
//!
//! // Where was the Earth relative to the Sun this morning?
//! let at = Instant::from_utc_str("2024-10-01T00:00:00").unwrap();
//! let (state, light_time) = almanac
//!     .state(
//!         Body::Earth,
//!         Body::Sun,
//!         &at,
//!         &"ECLIPJ2000".parse().unwrap(),
//!         Default::default(),
//!     )
//!     .unwrap();
//! println!("distance: {} km, light time: {} s", state.distance(), light_time);
//! ```

use std::sync::Arc;

use nalgebra::Matrix3;

use crate::almanac_errors::AlmanacError;
use crate::bodies::Body;
use crate::constants::{LightTimeSeconds, Radian};
use crate::ephemeris::{relative_state, Correction, EphemerisSource, StateVector};
use crate::geometry::angular_separation;
use crate::ref_system::{frame_rotation, Frame, RefEpoch, SphericalCoord};
use crate::series::{BodyPosition, SeriesBuilder};
use crate::time::Instant;

#[derive(Debug, Clone)]
pub struct Almanac {
    source: Arc<dyn EphemerisSource>,
    rot_equmj2000_to_eclmj2000: Matrix3<f64>,
    rot_eclmj2000_to_equmj2000: Matrix3<f64>,
}

impl Almanac {
    /// Construct a new [`Almanac`] session around a loaded ephemeris provider.
    ///
    /// The two J2000 equatorial↔ecliptic rotations are evaluated here, once,
    /// and reused by every query for the lifetime of the session.
    ///
    /// Arguments
    /// -----------------
    /// * `source`: shared handle on the trajectory provider; its kernel data
    ///   must already be loaded.
    pub fn new(source: Arc<dyn EphemerisSource>) -> Self {
        // Any instant works: both frames are inertial
        let at = Instant::from_et_seconds(0.0);
        let rot1 = frame_rotation(
            &Frame::Equm(RefEpoch::J2000),
            &Frame::Eclm(RefEpoch::J2000),
            &at,
        );
        let rot2 = frame_rotation(
            &Frame::Eclm(RefEpoch::J2000),
            &Frame::Equm(RefEpoch::J2000),
            &at,
        );

        Almanac {
            source,
            rot_equmj2000_to_eclmj2000: rot1,
            rot_eclmj2000_to_equmj2000: rot2,
        }
    }

    /// Get the rotation matrix from equatorial J2000 to ecliptic J2000.
    pub fn get_rot_equmj2000_to_eclmj2000(&self) -> &Matrix3<f64> {
        &self.rot_equmj2000_to_eclmj2000
    }

    /// Get the rotation matrix from ecliptic J2000 to equatorial J2000.
    pub fn get_rot_eclmj2000_to_equmj2000(&self) -> &Matrix3<f64> {
        &self.rot_eclmj2000_to_equmj2000
    }

    /// State of `target` relative to `observer`, expressed in `frame`.
    ///
    /// Arguments
    /// -----------------
    /// * `target`: body being observed.
    /// * `observer`: body the query is centered on.
    /// * `at`: observation instant.
    /// * `frame`: reference frame of the returned components.
    /// * `correction`: aberration correction mode.
    ///
    /// Return
    /// ----------
    /// * The tagged [`StateVector`] and the one-way light time in seconds, or
    ///   the provider's error when coverage is missing.
    ///
    /// Under `LT+S` the position is apparent (light-time and stellar
    /// aberration corrected) while the velocity carries the light-time
    /// correction only.
    pub fn state(
        &self,
        target: Body,
        observer: Body,
        at: &Instant,
        frame: &Frame,
        correction: Correction,
    ) -> Result<(StateVector, LightTimeSeconds), AlmanacError> {
        let (rel_pos, rel_vel, light_time) =
            relative_state(self.source.as_ref(), target, observer, at, correction)?;
        let rotation = self.rotation_from_equm_j2000(frame, at);
        let state = StateVector {
            target,
            observer,
            frame: *frame,
            position: rotation * rel_pos,
            velocity: rotation * rel_vel,
        };
        Ok((state, light_time))
    }

    /// Full sky position of `target` as seen from `observer`: state vector,
    /// light time, spherical decomposition and sky-map longitude.
    pub fn position(
        &self,
        target: Body,
        observer: Body,
        at: &Instant,
        frame: &Frame,
        correction: Correction,
    ) -> Result<BodyPosition, AlmanacError> {
        self.observe(target, observer, at, frame, correction, None)
    }

    /// Phase angle at `target` between `illuminator` and `observer`.
    ///
    /// Arguments
    /// -----------------
    /// * `target`: vertex body of the angle.
    /// * `illuminator`: light source (usually the Sun).
    /// * `observer`: observing body.
    /// * `at`: observation instant.
    /// * `correction`: aberration correction applied to both legs.
    ///
    /// Return
    /// ----------
    /// * The angle in radians, in [0, π].
    pub fn phase_angle(
        &self,
        target: Body,
        illuminator: Body,
        observer: Body,
        at: &Instant,
        correction: Correction,
    ) -> Result<Radian, AlmanacError> {
        let (to_illuminator, _, _) =
            relative_state(self.source.as_ref(), illuminator, target, at, correction)?;
        let (to_observer, _, _) =
            relative_state(self.source.as_ref(), observer, target, at, correction)?;
        angular_separation(&to_illuminator, &to_observer)
    }

    /// Start a [`SeriesBuilder`] centered on `observer`.
    pub fn series(&self, observer: Body) -> SeriesBuilder<'_> {
        SeriesBuilder::new(self, observer)
    }

    /// Rotation from the provider's equatorial mean J2000 frame into `frame`,
    /// going through the precomputed matrices for the J2000 targets.
    pub(crate) fn rotation_from_equm_j2000(&self, frame: &Frame, at: &Instant) -> Matrix3<f64> {
        match frame {
            Frame::Equm(RefEpoch::J2000) => Matrix3::identity(),
            Frame::Eclm(RefEpoch::J2000) => self.rot_equmj2000_to_eclmj2000,
            other => frame_rotation(&Frame::Equm(RefEpoch::J2000), other, at),
        }
    }

    /// Shared pipeline behind [`position`](Almanac::position) and the series
    /// builder; `rotation` carries a precomputed inertial-frame matrix, or
    /// `None` to derive one from `at`.
    pub(crate) fn observe(
        &self,
        target: Body,
        observer: Body,
        at: &Instant,
        frame: &Frame,
        correction: Correction,
        rotation: Option<&Matrix3<f64>>,
    ) -> Result<BodyPosition, AlmanacError> {
        let (rel_pos, rel_vel, light_time) =
            relative_state(self.source.as_ref(), target, observer, at, correction)?;
        let rotation = match rotation {
            Some(matrix) => *matrix,
            None => self.rotation_from_equm_j2000(frame, at),
        };
        let position = rotation * rel_pos;
        let spherical = SphericalCoord::from_cartesian(&position)?;
        Ok(BodyPosition {
            state: StateVector {
                target,
                observer,
                frame: *frame,
                position,
                velocity: rotation * rel_vel,
            },
            light_time,
            spherical,
            plot_longitude: spherical.plot_longitude(),
        })
    }
}
