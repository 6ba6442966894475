//! Derived geometric quantities: separation angles and orbital speeds.

use nalgebra::Vector3;

use crate::almanac_errors::AlmanacError;
use crate::constants::{Kilometer, KilometerPerSecond, Radian};

/// Angle between two directions.
///
/// Arguments
/// ---------
/// * `a`, `b`: position vectors; only their directions matter.
///
/// Return
/// ------
/// * The separation angle in radians, in [0, π], or
///   [`AlmanacError::DegenerateVector`] when either vector has zero norm.
pub fn angular_separation(a: &Vector3<f64>, b: &Vector3<f64>) -> Result<Radian, AlmanacError> {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(AlmanacError::DegenerateVector);
    }
    // Clamp against rounding outside [-1, 1] before acos
    let cos_angle = (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0);
    Ok(cos_angle.acos())
}

/// Circular orbital speed at distance `radius` around a body of gravitational
/// parameter `gm`: `v = sqrt(GM / r)`.
///
/// Arguments
/// ---------
/// * `gm`: gravitational parameter [km³/s²].
/// * `radius`: orbital distance [km].
pub fn circular_velocity(gm: f64, radius: Kilometer) -> KilometerPerSecond {
    (gm / radius).sqrt()
}

#[cfg(test)]
mod geometry_test {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    use crate::constants::{AU, GM_SUN};

    #[test]
    fn test_angular_separation() {
        let x = Vector3::new(2.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 0.5, 0.0);
        assert_relative_eq!(angular_separation(&x, &y).unwrap(), PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(angular_separation(&x, &(-x)).unwrap(), PI, epsilon = 1e-12);
        assert_relative_eq!(angular_separation(&x, &(3.0 * x)).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_angular_separation_degenerate() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(
            angular_separation(&x, &Vector3::zeros()),
            Err(AlmanacError::DegenerateVector)
        );
    }

    #[test]
    fn test_circular_velocity_of_earth() {
        // Earth's orbital speed around the Sun is close to 30 km/s
        let speed = circular_velocity(GM_SUN, AU);
        assert_relative_eq!(speed, 29.78, epsilon = 0.05);
    }
}
