//! Integration tests for the frame scanner driven by a scripted detector

use opencv::core::{Mat, CV_8UC3};
use opencv::prelude::*;
use squat_critic::biometrics::DepthStatus;
use squat_critic::constants::NUM_KEYPOINTS;
use squat_critic::detector::PoseDetector;
use squat_critic::keypoint::{Keypoint, KeypointIndex, LandmarkSet};
use squat_critic::scanner::{FrameScanner, ScanOutcome};
use squat_critic::{Error, Result};

/// Detector that replays a fixed per-frame script instead of running a model
struct ScriptedDetector {
    responses: Vec<Option<LandmarkSet>>,
    cursor: usize,
}

impl ScriptedDetector {
    fn new(responses: Vec<Option<LandmarkSet>>) -> Self {
        Self {
            responses,
            cursor: 0,
        }
    }
}

impl PoseDetector for ScriptedDetector {
    fn detect(&mut self, _frame: &Mat) -> Result<Option<LandmarkSet>> {
        let response = self.responses.get(self.cursor).cloned().flatten();
        self.cursor += 1;
        Ok(response)
    }
}

fn test_frame() -> Mat {
    Mat::zeros(64, 64, CV_8UC3)
        .expect("failed to build test frame")
        .to_mat()
        .expect("failed to materialize test frame")
}

fn landmark_set(hip: (f32, f32), knee: (f32, f32), ankle: (f32, f32)) -> LandmarkSet {
    let mut keypoints = [Keypoint::default(); NUM_KEYPOINTS];
    keypoints[KeypointIndex::LeftHip as usize] = Keypoint::new(hip.0, hip.1, 0.9);
    keypoints[KeypointIndex::RightHip as usize] = Keypoint::new(hip.0 + 20.0, hip.1, 0.9);
    keypoints[KeypointIndex::LeftKnee as usize] = Keypoint::new(knee.0, knee.1, 0.9);
    keypoints[KeypointIndex::LeftAnkle as usize] = Keypoint::new(ankle.0, ankle.1, 0.9);
    LandmarkSet::new(keypoints)
}

fn run_scan(responses: Vec<Option<LandmarkSet>>) -> Result<ScanOutcome> {
    let frame_count = responses.len();
    let mut detector = ScriptedDetector::new(responses);
    let mut scanner = FrameScanner::new(&mut detector);
    let frame = test_frame();
    for _ in 0..frame_count {
        scanner.observe_frame(&frame)?;
    }
    scanner.finish()
}

#[test]
fn test_three_frame_squat_selects_bottom_frame() {
    // Frame 2 is the bottom: hips lowest (largest y), thigh vertical and
    // shin horizontal so the knee angle is exactly 90°. The surrounding
    // frames keep the leg near-straight, so only the bottom frame can
    // produce the right angle.
    let descending = landmark_set((100.0, 150.0), (100.0, 300.0), (100.0, 450.0));
    let bottom = landmark_set((100.0, 200.0), (100.0, 300.0), (200.0, 300.0));
    let rising = landmark_set((100.0, 160.0), (100.0, 300.0), (100.0, 440.0));

    let outcome = run_scan(vec![Some(descending), Some(bottom), Some(rising)])
        .expect("scan should succeed");

    assert!(
        (outcome.biometrics.knee_angle - 90.0).abs() < 1e-4,
        "expected a 90° knee at the bottom frame, got {}",
        outcome.biometrics.knee_angle
    );
    // At the bottom frame the hip (y=200) is above the knee (y=300)
    assert_eq!(outcome.biometrics.depth_status, DepthStatus::AboveParallel);
}

#[test]
fn test_below_parallel_bottom_frame() {
    let shallow = landmark_set((100.0, 250.0), (100.0, 300.0), (200.0, 300.0));
    let deep = landmark_set((100.0, 320.0), (100.0, 300.0), (200.0, 300.0));

    let outcome = run_scan(vec![Some(shallow), Some(deep)]).expect("scan should succeed");
    assert_eq!(outcome.biometrics.depth_status, DepthStatus::BelowParallel);
}

#[test]
fn test_global_maximum_wins_over_later_frames() {
    // Hip depth rises to 310 at index 3 and falls again; each frame gets a
    // distinct ankle placement so its knee angle identifies it
    let hips: [f32; 7] = [100.0, 150.0, 220.0, 310.0, 280.0, 200.0, 120.0];
    let responses: Vec<_> = hips
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let ankle_x = 100.0 + 20.0 * i as f32;
            Some(landmark_set((100.0, y), (100.0, y + 60.0), (ankle_x, y + 120.0)))
        })
        .collect();

    let outcome = run_scan(responses).expect("scan should succeed");
    // Winning frame is index 3: ankle 60px out and 60px down from the
    // knee, a 135° included angle against the vertical thigh
    let winner = landmark_set((100.0, 310.0), (100.0, 370.0), (160.0, 430.0));
    let expected = squat_critic::biometrics::Biometrics::from_landmarks(&winner)
        .expect("valid winner geometry");
    assert!(
        (outcome.biometrics.knee_angle - expected.knee_angle).abs() < 1e-6,
        "expected frame 3's knee angle {}, got {}",
        expected.knee_angle,
        outcome.biometrics.knee_angle
    );
    assert_eq!(outcome.biometrics.depth_status, DepthStatus::AboveParallel);
}

#[test]
fn test_equal_depth_keeps_first_frame() {
    // Identical hip depth but different knee geometry: the first frame's
    // right-angle knee must survive
    let first = landmark_set((100.0, 300.0), (100.0, 400.0), (200.0, 400.0));
    let second = landmark_set((100.0, 300.0), (100.0, 400.0), (100.0, 500.0));

    let outcome = run_scan(vec![Some(first), Some(second)]).expect("scan should succeed");
    assert!(
        (outcome.biometrics.knee_angle - 90.0).abs() < 1e-4,
        "tie must keep the earliest frame's biometrics, got {}",
        outcome.biometrics.knee_angle
    );
}

#[test]
fn test_personless_video_reports_no_detection() {
    let result = run_scan(vec![None, None, None, None]);
    assert!(matches!(result, Err(Error::NoDetection)));
}

#[test]
fn test_missing_video_file_reports_input_error() {
    let mut detector = ScriptedDetector::new(Vec::new());
    let scanner = FrameScanner::new(&mut detector);
    let result = scanner.scan("no/such/upload.mp4");
    assert!(matches!(result, Err(Error::Input(_))));
}
