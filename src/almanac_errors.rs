use thiserror::Error;

use crate::bodies::Body;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlmanacError {
    #[error("Invalid civil timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("No ephemeris coverage for {body} at ET {et_seconds} s")]
    EphemerisUnavailable { body: Body, et_seconds: f64 },

    #[error("Zero-length position vector has no direction")]
    DegenerateVector,

    #[error("Unsupported reference frame: {0}")]
    FrameTransformUnsupported(String),

    #[error("Unknown body name: {0}")]
    UnknownBodyName(String),

    #[error("Unknown NAIF body id: {0}")]
    UnknownBodyId(i32),

    #[error("Unknown aberration correction: {0}")]
    UnknownCorrection(String),

    #[error("Light-time iteration did not converge after {0} steps")]
    LightTimeDivergence(usize),
}
