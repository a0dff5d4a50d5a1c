//! Biometrics derived from the squat's deepest frame.

use crate::geometry::angle_at_vertex;
use crate::keypoint::{KeypointIndex, LandmarkSet};
use crate::Result;
use std::fmt;

/// Binary squat depth classification relative to parallel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthStatus {
    /// Hip crease dropped below the knee
    BelowParallel,
    /// Hip stayed above the knee
    AboveParallel,
}

impl fmt::Display for DepthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BelowParallel => write!(f, "Below Parallel"),
            Self::AboveParallel => write!(f, "Above Parallel"),
        }
    }
}

/// Measurements taken at the deepest frame of the squat
#[derive(Debug, Clone, PartialEq)]
pub struct Biometrics {
    /// Knee angle in degrees, measured at the left knee
    pub knee_angle: f64,
    /// Depth classification at the same frame
    pub depth_status: DepthStatus,
}

impl Biometrics {
    /// Derive biometrics from one frame's landmarks.
    ///
    /// The knee angle is the included angle of the hip-knee-ankle chain on
    /// the left side of the body. Depth compares hip and knee height in
    /// image space: y grows downward, so a hip y greater than the knee y
    /// means the hip sits below the knee.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DegenerateGeometry`] if the hip or ankle
    /// landmark coincides with the knee.
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Result<Self> {
        let hip = landmarks.get(KeypointIndex::LeftHip);
        let knee = landmarks.get(KeypointIndex::LeftKnee);
        let ankle = landmarks.get(KeypointIndex::LeftAnkle);

        let knee_angle = angle_at_vertex(
            (f64::from(hip.x), f64::from(hip.y)),
            (f64::from(knee.x), f64::from(knee.y)),
            (f64::from(ankle.x), f64::from(ankle.y)),
        )?;

        let depth_status = if hip.y > knee.y {
            DepthStatus::BelowParallel
        } else {
            DepthStatus::AboveParallel
        };

        Ok(Self {
            knee_angle,
            depth_status,
        })
    }
}
