//! Series builder: ordered sky-position records over a body list and a time
//! grid.
//!
//! For each `(instant, body)` pair the builder runs the full query pipeline
//! (provider lookup with the configured correction, rotation into the
//! configured frame, spherical decomposition, sky-map longitude) and
//! assembles [`SeriesRecord`]s in time-major, body-minor order matching the
//! input enumeration.
//!
//! The default failure policy is fail-fast: the first provider error aborts
//! the whole run and no partial record for the failing pair is produced.
//! [`SeriesBuilder::skip_missing`] switches to recording a `None` entry for
//! pairs without ephemeris coverage while the rest of the series completes.

use serde::Serialize;
use smallvec::SmallVec;

use crate::almanac::Almanac;
use crate::almanac_errors::AlmanacError;
use crate::bodies::Body;
use crate::constants::{LightTimeSeconds, Radian};
use crate::ephemeris::{Correction, StateVector};
use crate::ref_system::{Frame, RefEpoch, SphericalCoord};
use crate::time::Instant;

/// What to do when the provider has no coverage for one `(body, time)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole series on the first error.
    #[default]
    FailFast,
    /// Record a missing-marker entry for the pair and continue.
    SkipMissing,
}

/// Fully resolved sky position of one body at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPosition {
    pub state: StateVector,
    pub light_time: LightTimeSeconds,
    pub spherical: SphericalCoord,
    pub plot_longitude: Radian,
}

/// One body's slot in a [`SeriesRecord`].
///
/// `position` is `None` only under [`FailurePolicy::SkipMissing`], marking a
/// pair the provider had no coverage for.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyEntry {
    pub body: Body,
    pub position: Option<BodyPosition>,
}

/// All configured bodies observed at one instant, in configured body order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub epoch: Instant,
    pub entries: SmallVec<[BodyEntry; 11]>,
}

impl SeriesRecord {
    /// The entry for `body`, if it is part of this series.
    pub fn entry(&self, body: Body) -> Option<&BodyEntry> {
        self.entries.iter().find(|entry| entry.body == body)
    }
}

/// Flat per-body columns handed to a plotting collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyTrack {
    pub body: Body,
    pub et_seconds: Vec<f64>,
    pub range_km: Vec<f64>,
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    pub plot_longitude: Vec<f64>,
}

impl SkyTrack {
    /// Collect one body's track from a record slice, dropping missing samples.
    pub fn extract(records: &[SeriesRecord], body: Body) -> Self {
        let mut track = SkyTrack {
            body,
            et_seconds: Vec::new(),
            range_km: Vec::new(),
            longitude: Vec::new(),
            latitude: Vec::new(),
            plot_longitude: Vec::new(),
        };
        for record in records {
            let Some(position) = record.entry(body).and_then(|entry| entry.position.as_ref())
            else {
                continue;
            };
            track.et_seconds.push(record.epoch.et_seconds());
            track.range_km.push(position.spherical.range);
            track.longitude.push(position.spherical.longitude);
            track.latitude.push(position.spherical.latitude);
            track.plot_longitude.push(position.plot_longitude);
        }
        track
    }
}

/// Configurable query loop over a body list and a time grid.
///
/// Built through [`Almanac::series`]; defaults to the ecliptic J2000 frame,
/// `LT+S` correction and fail-fast error handling, matching the sky-map use
/// case.
#[derive(Debug, Clone)]
pub struct SeriesBuilder<'a> {
    almanac: &'a Almanac,
    observer: Body,
    bodies: Vec<Body>,
    frame: Frame,
    correction: Correction,
    policy: FailurePolicy,
}

impl<'a> SeriesBuilder<'a> {
    pub(crate) fn new(almanac: &'a Almanac, observer: Body) -> Self {
        SeriesBuilder {
            almanac,
            observer,
            bodies: Vec::new(),
            frame: Frame::Eclm(RefEpoch::J2000),
            correction: Correction::LightTimeStellar,
            policy: FailurePolicy::FailFast,
        }
    }

    /// Append one target body to the enumeration order.
    pub fn body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }

    /// Append several target bodies, preserving slice order.
    pub fn bodies(mut self, bodies: &[Body]) -> Self {
        self.bodies.extend_from_slice(bodies);
        self
    }

    /// Express results in `frame` instead of the ecliptic J2000 default.
    pub fn frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Use `correction` instead of the `LT+S` default.
    pub fn correction(mut self, correction: Correction) -> Self {
        self.correction = correction;
        self
    }

    /// Record missing-coverage pairs as `None` entries instead of aborting.
    pub fn skip_missing(mut self) -> Self {
        self.policy = FailurePolicy::SkipMissing;
        self
    }

    /// Observe all configured bodies at a single instant.
    pub fn at(&self, at: &Instant) -> Result<SeriesRecord, AlmanacError> {
        let rotation = self.inertial_rotation(at);
        self.record(at, rotation.as_ref())
    }

    /// Observe all configured bodies over an ordered time grid.
    ///
    /// Return
    /// ------
    /// * One record per instant, in input order, each holding the configured
    ///   bodies in input order: exactly `times.len() × bodies.len()` entries.
    pub fn over(&self, times: &[Instant]) -> Result<Vec<SeriesRecord>, AlmanacError> {
        // For an inertial frame the rotation is shared by the whole grid
        let rotation = times.first().and_then(|at| self.inertial_rotation(at));
        times
            .iter()
            .map(|at| self.record(at, rotation.as_ref()))
            .collect()
    }

    /// Precompute the frame rotation when it cannot vary across the grid.
    fn inertial_rotation(&self, at: &Instant) -> Option<nalgebra::Matrix3<f64>> {
        self.frame
            .is_inertial()
            .then(|| self.almanac.rotation_from_equm_j2000(&self.frame, at))
    }

    fn record(
        &self,
        at: &Instant,
        rotation: Option<&nalgebra::Matrix3<f64>>,
    ) -> Result<SeriesRecord, AlmanacError> {
        let mut entries = SmallVec::new();
        for &body in &self.bodies {
            let observed = self.almanac.observe(
                body,
                self.observer,
                at,
                &self.frame,
                self.correction,
                rotation,
            );
            match observed {
                Ok(position) => entries.push(BodyEntry {
                    body,
                    position: Some(position),
                }),
                Err(AlmanacError::EphemerisUnavailable { .. })
                    if self.policy == FailurePolicy::SkipMissing =>
                {
                    entries.push(BodyEntry {
                        body,
                        position: None,
                    })
                }
                Err(err) => return Err(err),
            }
        }
        Ok(SeriesRecord {
            epoch: *at,
            entries,
        })
    }
}
