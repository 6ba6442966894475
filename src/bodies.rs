//! Solar-system body identifiers.
//!
//! Bodies are named by their NAIF integer codes: planetary barycenters use the
//! single-digit codes 0–9, the Sun is 10, and body centers use the `x99`/`301`
//! codes. The DE-series planetary kernels only carry barycenter trajectories
//! for the outer planets, so the catalog used by sky-map queries points at the
//! barycenter where no body-center trajectory is loaded (e.g. `"MARS"` → 4).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::almanac_errors::AlmanacError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    SolarSystemBarycenter,
    MercuryBarycenter,
    VenusBarycenter,
    EarthMoonBarycenter,
    MarsBarycenter,
    JupiterBarycenter,
    SaturnBarycenter,
    UranusBarycenter,
    NeptuneBarycenter,
    PlutoBarycenter,
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
}

/// Name → body mapping used by the sky-map catalog.
///
/// Mercury and the outer planets resolve to their barycenters because the
/// de432s-class kernels carry no body-center trajectory for them.
static CATALOG: Lazy<HashMap<&'static str, Body>> = Lazy::new(|| {
    HashMap::from([
        ("SUN", Body::Sun),
        ("MERCURY", Body::MercuryBarycenter),
        ("VENUS", Body::Venus),
        ("EARTH", Body::EarthMoonBarycenter),
        ("MOON", Body::Moon),
        ("MARS", Body::MarsBarycenter),
        ("JUPITER", Body::JupiterBarycenter),
        ("SATURN", Body::SaturnBarycenter),
        ("URANUS", Body::UranusBarycenter),
        ("NEPTUNE", Body::NeptuneBarycenter),
        ("PLUTO", Body::PlutoBarycenter),
    ])
});

impl Body {
    pub fn from_id(id: i32) -> Result<Self, AlmanacError> {
        match id {
            0 => Ok(Body::SolarSystemBarycenter),
            1 => Ok(Body::MercuryBarycenter),
            2 => Ok(Body::VenusBarycenter),
            3 => Ok(Body::EarthMoonBarycenter),
            4 => Ok(Body::MarsBarycenter),
            5 => Ok(Body::JupiterBarycenter),
            6 => Ok(Body::SaturnBarycenter),
            7 => Ok(Body::UranusBarycenter),
            8 => Ok(Body::NeptuneBarycenter),
            9 => Ok(Body::PlutoBarycenter),
            10 => Ok(Body::Sun),
            199 => Ok(Body::Mercury),
            299 => Ok(Body::Venus),
            301 => Ok(Body::Moon),
            399 => Ok(Body::Earth),
            499 => Ok(Body::Mars),
            _ => Err(AlmanacError::UnknownBodyId(id)),
        }
    }

    pub fn to_id(&self) -> i32 {
        match self {
            Body::SolarSystemBarycenter => 0,
            Body::MercuryBarycenter => 1,
            Body::VenusBarycenter => 2,
            Body::EarthMoonBarycenter => 3,
            Body::MarsBarycenter => 4,
            Body::JupiterBarycenter => 5,
            Body::SaturnBarycenter => 6,
            Body::UranusBarycenter => 7,
            Body::NeptuneBarycenter => 8,
            Body::PlutoBarycenter => 9,
            Body::Sun => 10,
            Body::Mercury => 199,
            Body::Venus => 299,
            Body::Moon => 301,
            Body::Earth => 399,
            Body::Mars => 499,
        }
    }

    /// Resolve a catalog name (`"SUN"`, `"MARS"`, …) to its configured body.
    pub fn from_catalog_name(name: &str) -> Result<Self, AlmanacError> {
        CATALOG
            .get(name)
            .copied()
            .ok_or_else(|| AlmanacError::UnknownBodyName(name.to_string()))
    }

    /// Catalog enumeration order, matching the sky-map body list.
    pub fn catalog() -> [Body; 11] {
        [
            Body::Sun,
            Body::MercuryBarycenter,
            Body::Venus,
            Body::EarthMoonBarycenter,
            Body::Moon,
            Body::MarsBarycenter,
            Body::JupiterBarycenter,
            Body::SaturnBarycenter,
            Body::UranusBarycenter,
            Body::NeptuneBarycenter,
            Body::PlutoBarycenter,
        ]
    }
}

impl From<Body> for i32 {
    fn from(body: Body) -> Self {
        body.to_id()
    }
}

impl TryFrom<i32> for Body {
    type Error = AlmanacError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Body::from_id(id)
    }
}

impl FromStr for Body {
    type Err = AlmanacError;

    /// Parse a body from a catalog name or a bare NAIF id (`"EARTH"` or `"399"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<i32>() {
            return Body::from_id(id);
        }
        Body::from_catalog_name(s)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Body::SolarSystemBarycenter => "Solar System Barycenter",
            Body::MercuryBarycenter => "Mercury Barycenter",
            Body::VenusBarycenter => "Venus Barycenter",
            Body::EarthMoonBarycenter => "Earth-Moon Barycenter",
            Body::MarsBarycenter => "Mars Barycenter",
            Body::JupiterBarycenter => "Jupiter Barycenter",
            Body::SaturnBarycenter => "Saturn Barycenter",
            Body::UranusBarycenter => "Uranus Barycenter",
            Body::NeptuneBarycenter => "Neptune Barycenter",
            Body::PlutoBarycenter => "Pluto Barycenter",
            Body::Sun => "Sun",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Moon => "Moon",
            Body::Earth => "Earth",
            Body::Mars => "Mars",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test_bodies {
    use super::*;

    #[test]
    fn test_body_from_id() {
        assert_eq!(Body::from_id(0).unwrap(), Body::SolarSystemBarycenter);
        assert_eq!(Body::from_id(3).unwrap(), Body::EarthMoonBarycenter);
        assert_eq!(Body::from_id(10).unwrap(), Body::Sun);
        assert_eq!(Body::from_id(299).unwrap(), Body::Venus);
        assert_eq!(Body::from_id(301).unwrap(), Body::Moon);
        assert_eq!(Body::from_id(399).unwrap(), Body::Earth);
        assert_eq!(Body::from_id(499).unwrap(), Body::Mars);
        assert_eq!(
            Body::from_id(100),
            Err(AlmanacError::UnknownBodyId(100))
        );
    }

    #[test]
    fn test_body_to_id_round_trip() {
        for body in Body::catalog() {
            assert_eq!(Body::from_id(body.to_id()).unwrap(), body);
        }
        assert_eq!(Body::Earth.to_id(), 399);
        assert_eq!(Body::Mars.to_id(), 499);
    }

    #[test]
    fn test_catalog_names() {
        assert_eq!(Body::from_catalog_name("SUN").unwrap(), Body::Sun);
        assert_eq!(
            Body::from_catalog_name("EARTH").unwrap(),
            Body::EarthMoonBarycenter
        );
        assert_eq!(
            Body::from_catalog_name("MARS").unwrap(),
            Body::MarsBarycenter
        );
        assert_eq!(
            Body::from_catalog_name("VULCAN"),
            Err(AlmanacError::UnknownBodyName("VULCAN".to_string()))
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("399".parse::<Body>().unwrap(), Body::Earth);
        assert_eq!("MOON".parse::<Body>().unwrap(), Body::Moon);
        assert!("PHOBOS".parse::<Body>().is_err());
    }

    #[test]
    fn test_catalog_order() {
        let catalog = Body::catalog();
        assert_eq!(catalog.len(), 11);
        assert_eq!(catalog[0], Body::Sun);
        assert_eq!(catalog[10], Body::PlutoBarycenter);
    }
}
