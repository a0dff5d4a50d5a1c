//! COCO-convention pose keypoints produced by the pose detector.

use crate::constants::NUM_KEYPOINTS;

/// Joint indices of the 17-point COCO pose convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = NUM_KEYPOINTS;
}

/// A single detected joint location, in source-frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Detection confidence (0.0-1.0)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, confidence }
    }
}

/// One person's full set of landmarks for a single frame
#[derive(Debug, Clone)]
pub struct LandmarkSet {
    keypoints: [Keypoint; NUM_KEYPOINTS],
}

impl LandmarkSet {
    pub fn new(keypoints: [Keypoint; NUM_KEYPOINTS]) -> Self {
        Self { keypoints }
    }

    /// Get the keypoint for a joint
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    /// Average vertical pixel coordinate of the two hip landmarks.
    ///
    /// Image y grows downward, so a larger value means the hips sit
    /// physically lower in the frame.
    pub fn hip_depth(&self) -> f32 {
        let left = self.get(KeypointIndex::LeftHip);
        let right = self.get(KeypointIndex::RightHip);
        (left.y + right.y) / 2.0
    }
}
