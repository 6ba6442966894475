//! Celestial reference frames and coordinate transforms.
//!
//! This module carries everything between a raw Cartesian state and a
//! plottable sky position:
//!
//! - [`Frame`] identifies the supported reference frames (mean equator or mean
//!   ecliptic, at J2000 or of date) and [`frame_rotation`] builds the rotation
//!   matrix between any two of them,
//! - [`SphericalCoord`] is the range/longitude/latitude decomposition of a
//!   position vector,
//! - [`plot_longitude`] remaps a [0, 2π) longitude into the (−π, π] sky-map
//!   convention,
//! - [`correct_aberration`] applies the first-order stellar aberration shift.
//!
//! Rotations between two J2000 frames do not depend on the query instant, so
//! callers iterating over a time grid should build the matrix once and reuse
//! it; only of-date frames need a rotation per sample.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;
use crate::constants::{Kilometer, Radian, DPI, MJD, RADEG, RADSEC, T2000, VLIGHT};
use crate::time::Instant;

/// Epoch a reference frame is pinned to.
///
/// `J2000` frames are inertial: their orientation never changes, so any
/// transform between two of them is time-invariant. `OfDate` frames take their
/// epoch from the query instant and must be re-evaluated per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefEpoch {
    J2000,
    OfDate,
}

/// A celestial reference frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// Equatorial coordinates based on the mean equator and equinox
    /// (corrected for precession but not for nutation).
    Equm(RefEpoch),
    /// Ecliptic coordinates based on the mean ecliptic and equinox.
    Eclm(RefEpoch),
}

impl Frame {
    pub fn epoch(&self) -> RefEpoch {
        match *self {
            Frame::Equm(e) => e,
            Frame::Eclm(e) => e,
        }
    }

    /// Whether this frame's orientation is independent of the query instant.
    pub fn is_inertial(&self) -> bool {
        self.epoch() == RefEpoch::J2000
    }

    /// Rotation taking coordinates in this frame to equatorial mean J2000.
    ///
    /// `mjd_tt` resolves the epoch of `OfDate` frames and is ignored for
    /// J2000 frames.
    fn to_equm_j2000(&self, mjd_tt: MJD) -> Matrix3<f64> {
        match self {
            Frame::Equm(RefEpoch::J2000) => Matrix3::identity(),
            Frame::Equm(RefEpoch::OfDate) => prec(mjd_tt).transpose(),
            Frame::Eclm(RefEpoch::J2000) => rotmt(obleq(T2000), 0),
            Frame::Eclm(RefEpoch::OfDate) => prec(mjd_tt).transpose() * rotmt(obleq(mjd_tt), 0),
        }
    }
}

impl FromStr for Frame {
    type Err = AlmanacError;

    /// Resolve a frame identifier as used by the kernel toolkits.
    ///
    /// Only `"J2000"` and `"ECLIPJ2000"` are recognized; anything else fails
    /// with [`AlmanacError::FrameTransformUnsupported`]. Of-date frames have
    /// no string identifier and are built through the enum directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "J2000" => Ok(Frame::Equm(RefEpoch::J2000)),
            "ECLIPJ2000" => Ok(Frame::Eclm(RefEpoch::J2000)),
            other => Err(AlmanacError::FrameTransformUnsupported(other.to_string())),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frame::Equm(RefEpoch::J2000) => "J2000",
            Frame::Eclm(RefEpoch::J2000) => "ECLIPJ2000",
            Frame::Equm(RefEpoch::OfDate) => "EQUM-OF-DATE",
            Frame::Eclm(RefEpoch::OfDate) => "ECLM-OF-DATE",
        };
        write!(f, "{s}")
    }
}

/// Compute the rotation matrix between two celestial reference frames.
///
/// The rotation is assembled by chaining the elementary transformations
/// (obliquity rotation and IAU 1976 precession) through the equatorial mean
/// J2000 pivot frame.
///
/// Arguments
/// ---------
/// * `from`: source reference frame.
/// * `to`: target reference frame.
/// * `at`: query instant; resolves the epoch of `OfDate` frames. For a pair of
///   J2000 frames the result does not depend on it.
///
/// Return
/// ------
/// * The rotation matrix `rot` such that `x_to = rot · x_from`.
///
/// Remarks
/// -------
/// * The matrix is orthonormal: the inverse transform is its transpose.
/// * Precession uses the IAU 1976 model ([`prec`]), obliquity the IAU 1976
///   polynomial ([`obleq`]).
pub fn frame_rotation(from: &Frame, to: &Frame, at: &Instant) -> Matrix3<f64> {
    let mjd_tt = at.mjd_tt();
    to.to_equm_j2000(mjd_tt).transpose() * from.to_equm_j2000(mjd_tt)
}

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date (TT scale).
///
/// Return
/// ------
/// * Mean obliquity of the ecliptic in radians.
///
/// The obliquity is a cubic polynomial in Julian centuries since J2000,
/// evaluated with Horner's method; coefficients are in arcseconds and
/// converted to radians through [`RADSEC`].
pub fn obleq(tjm: MJD) -> Radian {
    // Obliquity coefficients
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / 36525.0;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// Builds an **active rotation** of a 3D vector by an angle `alpha` around the
/// chosen axis, counter-clockwise when looking along the axis toward the
/// origin.
///
/// Arguments
/// ---------
/// * `alpha`: rotation angle in radians.
/// * `k`: axis index, `0` → X, `1` → Y, `2` → Z.
///
/// Return
/// ------
/// * The rotation matrix `R` such that the rotated vector is `x' = R · x`.
/// * The matrix is orthonormal and satisfies `R.transpose() == R.inverse()`.
///
/// Panics
/// ------
/// * If `k > 2`, as only axes 0–2 are valid.
pub fn rotmt(alpha: Radian, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("**** ROTMT: invalid axis index {k} (must be 0,1,2) ****"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Compute the IAU 1976 precession matrix from J2000 to the mean equator and
/// equinox of date.
///
/// Arguments
/// ---------
/// * `tjm`: Modified Julian Date in TT scale (epoch of the target frame).
///
/// Return
/// ------
/// * The matrix `P` such that `x_mean(tjm) = P · x_J2000`.
///
/// Method
/// ------
/// Three successive rotations around the Z, Y, and Z axes by the precession
/// angles ζ, θ, z, which are time-dependent polynomials in Julian centuries
/// `T = (tjm - T2000) / 36525` (Astronomical Almanac 1987, section B18):
///
/// ```text
/// ζ(T) = (0.6406161 + 0.0000839·T + 0.0000050·T²) · T  [deg]
/// θ(T) = (0.5567530 - 0.0001185·T - 0.0000116·T²) · T  [deg]
/// z(T) = (0.6406161 + 0.0003041·T + 0.0000051·T²) · T  [deg]
/// ```
fn prec(tjm: MJD) -> Matrix3<f64> {
    // Precession polynomial coefficients (in radians)
    let zed = 0.6406161 * RADEG;
    let zd = 0.6406161 * RADEG;
    let thd = 0.5567530 * RADEG;

    let zedd = 0.0000839 * RADEG;
    let zdd = 0.0003041 * RADEG;
    let thdd = -0.0001185 * RADEG;

    let zeddd = 0.0000050 * RADEG;
    let zddd = 0.0000051 * RADEG;
    let thddd = -0.0000116 * RADEG;

    // Compute Julian centuries since J2000
    let t = (tjm - T2000) / 36525.0;

    // Compute precession angles (in radians)
    let zeta = ((zeddd * t + zedd) * t + zed) * t;
    let z = ((zddd * t + zdd) * t + zd) * t;
    let theta = ((thddd * t + thdd) * t + thd) * t;

    // P = R3(−z) · R2(θ) · R3(−ζ), with passive Ri(φ) = rotmt(−φ, axis)
    let r1 = rotmt(zeta, 2);
    let r2 = rotmt(-theta, 1);
    let r3 = rotmt(z, 2);

    r3 * (r2 * r1)
}

/// Apply stellar aberration correction to a relative position vector.
///
/// Computes the apparent position of a target by applying the first-order
/// correction for the observer's velocity, in the classical limit (v ≪ c):
/// the apparent direction is displaced toward the observer's direction of
/// motion.
///
/// Arguments
/// ---------
/// * `xrel`: relative position vector from observer to target [km].
/// * `v_observer`: velocity of the observer relative to the barycenter [km/s].
///
/// Return
/// ------
/// * Corrected position vector (same units as `xrel`):
///
/// ```text
/// x_corr = xrel + (‖xrel‖ / c) · v_observer
/// ```
///
/// The output is not normalized.
pub(crate) fn correct_aberration(xrel: Vector3<f64>, v_observer: Vector3<f64>) -> Vector3<f64> {
    let dt = xrel.norm() / VLIGHT;
    xrel + dt * v_observer
}

/// Range, longitude, latitude decomposition of a position vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalCoord {
    /// Euclidean norm of the vector [km].
    pub range: Kilometer,
    /// Longitude in radians, in the range [0, 2π).
    pub longitude: Radian,
    /// Latitude in radians, in the range [−π/2, +π/2].
    pub latitude: Radian,
}

impl SphericalCoord {
    /// Convert a 3D Cartesian position vector to spherical coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `position`: 3D position vector in Cartesian coordinates [km].
    ///
    /// Return
    /// ------
    /// * The [`SphericalCoord`] decomposition, or
    ///   [`AlmanacError::DegenerateVector`] when the vector has zero norm and
    ///   its direction is undefined.
    ///
    /// The longitude computation uses `atan2` to preserve quadrant
    /// information; latitude/longitude do not change when the vector is scaled
    /// by any positive factor.
    pub fn from_cartesian(position: &Vector3<f64>) -> Result<Self, AlmanacError> {
        let range = position.norm();
        if range == 0.0 {
            return Err(AlmanacError::DegenerateVector);
        }

        let latitude = (position.z / range).asin();

        let mut longitude = position.y.atan2(position.x);
        if longitude < 0.0 {
            longitude += DPI;
        }
        // atan2 results just below zero can round up to 2π after the shift
        if longitude >= DPI {
            longitude = 0.0;
        }

        Ok(SphericalCoord {
            range,
            longitude,
            latitude,
        })
    }

    /// Unit vector pointing along this coordinate's direction.
    pub fn direction(&self) -> Vector3<f64> {
        let (sin_lat, cos_lat) = self.latitude.sin_cos();
        let (sin_lon, cos_lon) = self.longitude.sin_cos();
        Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Sky-map longitude of this coordinate, see [`plot_longitude`].
    pub fn plot_longitude(&self) -> Radian {
        plot_longitude(self.longitude)
    }
}

/// Remap a [0, 2π) longitude into the (−π, π] sky-map convention.
///
/// Sky maps count longitude leftward from the origin, so the value is negated;
/// longitudes beyond π wrap onto the positive side:
///
/// ```text
/// lon > π  →  −(lon mod π − π)
/// lon ≤ π  →  −lon
/// ```
///
/// The branch condition is strictly `> π`: an input of exactly π maps to −π.
pub fn plot_longitude(longitude: Radian) -> Radian {
    use std::f64::consts::PI;
    if longitude > PI {
        -((longitude % PI) - PI)
    } else {
        -longitude
    }
}
