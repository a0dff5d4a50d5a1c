//! Frame scanning: locate the deepest point of a squat and its biometrics.

use crate::biometrics::Biometrics;
use crate::detector::PoseDetector;
use crate::{Error, Result};
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;

/// Result of a completed scan: the deepest frame and its measurements
pub struct ScanOutcome {
    /// The frame judged to be the bottom of the squat
    pub frame: Mat,
    /// Measurements taken at that frame
    pub biometrics: Biometrics,
}

/// The current best frame candidate and the depth that won it
struct BestCandidate {
    image: Mat,
    hip_depth: f32,
    biometrics: Biometrics,
}

/// Scans video frames for the deepest point of a single squat rep.
///
/// Owns the best-candidate state for exactly one scan; create a fresh
/// scanner per video. The pose detector is an injected capability, so
/// tests can drive the scanner with scripted landmarks instead of a
/// real model.
pub struct FrameScanner<'a> {
    detector: &'a mut dyn PoseDetector,
    best: Option<BestCandidate>,
}

impl<'a> FrameScanner<'a> {
    pub fn new(detector: &'a mut dyn PoseDetector) -> Self {
        Self {
            detector,
            best: None,
        }
    }

    /// Scan a video file and return its deepest frame with biometrics.
    ///
    /// Frames are read sequentially until the stream is exhausted; no
    /// assumptions are made about frame count, rate, or duration.
    ///
    /// # Errors
    ///
    /// - [`Error::Input`] if the file cannot be opened
    /// - [`Error::NoDetection`] if no frame contained a detected person
    /// - detector and decoding failures are propagated unchanged
    pub fn scan<P: AsRef<Path>>(mut self, path: P) -> Result<ScanOutcome> {
        let path = path.as_ref();
        let mut capture = VideoCapture::from_file(&path.to_string_lossy(), videoio::CAP_ANY)
            .map_err(|e| Error::Input(format!("Failed to open video file {}: {e}", path.display())))?;
        if !capture.is_opened()? {
            return Err(Error::Input(format!(
                "Failed to open video file: {}",
                path.display()
            )));
        }

        let mut frame = Mat::default();
        let mut frame_count = 0u64;
        loop {
            if !capture.read(&mut frame)? || frame.empty() {
                break;
            }
            frame_count += 1;
            self.observe_frame(&frame)?;
        }
        log::info!("Scanned {} frames from {}", frame_count, path.display());

        self.finish()
    }

    /// Feed one decoded frame to the scanner.
    ///
    /// Replaces the retained candidate when this frame's hip depth strictly
    /// exceeds the current best's, recomputing biometrics at the new frame.
    /// Ties keep the earliest frame. A frame without a detected person
    /// contributes nothing.
    ///
    /// # Errors
    ///
    /// Propagates detector failures and degenerate-geometry failures from
    /// the biometric computation.
    pub fn observe_frame(&mut self, frame: &Mat) -> Result<()> {
        let Some(landmarks) = self.detector.detect(frame)? else {
            return Ok(());
        };

        let hip_depth = landmarks.hip_depth();
        let deeper = self
            .best
            .as_ref()
            .map_or(true, |best| hip_depth > best.hip_depth);
        if deeper {
            let biometrics = Biometrics::from_landmarks(&landmarks)?;
            self.best = Some(BestCandidate {
                image: frame.try_clone()?,
                hip_depth,
                biometrics,
            });
        }

        Ok(())
    }

    /// Complete the scan, handing over the retained frame and biometrics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDetection`] if no observed frame ever produced a
    /// landmark set; an absent best frame is never passed downstream.
    pub fn finish(self) -> Result<ScanOutcome> {
        let best = self.best.ok_or(Error::NoDetection)?;
        Ok(ScanOutcome {
            frame: best.image,
            biometrics: best.biometrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_KEYPOINTS;
    use crate::keypoint::{Keypoint, KeypointIndex, LandmarkSet};
    use opencv::core::CV_8UC3;

    /// Detector that replays a fixed sequence of landmark sets
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
        Mat::zeros(64, 64, CV_8UC3).unwrap().to_mat().unwrap()
    }

    fn landmark_set(hip: (f32, f32), knee: (f32, f32), ankle: (f32, f32)) -> LandmarkSet {
        let mut keypoints = [Keypoint::default(); NUM_KEYPOINTS];
        keypoints[KeypointIndex::LeftHip as usize] = Keypoint::new(hip.0, hip.1, 0.9);
        keypoints[KeypointIndex::RightHip as usize] = Keypoint::new(hip.0 + 20.0, hip.1, 0.9);
        keypoints[KeypointIndex::LeftKnee as usize] = Keypoint::new(knee.0, knee.1, 0.9);
        keypoints[KeypointIndex::LeftAnkle as usize] = Keypoint::new(ankle.0, ankle.1, 0.9);
        LandmarkSet::new(keypoints)
    }

    /// Right-angle knee at the given hip depth
    fn square_knee_at(hip_y: f32) -> LandmarkSet {
        landmark_set(
            (100.0, hip_y),
            (100.0, hip_y + 100.0),
            (200.0, hip_y + 100.0),
        )
    }

    /// Fully extended (collinear, 180°) leg at the given hip depth
    fn straight_leg_at(hip_y: f32) -> LandmarkSet {
        landmark_set(
            (100.0, hip_y),
            (100.0, hip_y + 100.0),
            (100.0, hip_y + 200.0),
        )
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
    fn test_selects_global_maximum_not_last_frame() {
        // Hip descends, bottoms out at the only right-angle frame, rises
        let responses = vec![
            Some(straight_leg_at(100.0)),
            Some(straight_leg_at(180.0)),
            Some(square_knee_at(320.0)),
            Some(straight_leg_at(250.0)),
            Some(straight_leg_at(150.0)),
        ];

        let outcome = run_scan(responses).unwrap();
        assert!(
            (outcome.biometrics.knee_angle - 90.0).abs() < 1e-4,
            "expected the deepest frame's 90° knee, got {}",
            outcome.biometrics.knee_angle
        );
    }

    #[test]
    fn test_tie_break_keeps_first_frame() {
        // Same hip depth, distinguishable knee geometry
        let first = square_knee_at(300.0);
        let second = straight_leg_at(300.0);

        let outcome = run_scan(vec![Some(first.clone()), Some(second)]).unwrap();
        let expected = Biometrics::from_landmarks(&first).unwrap();
        assert_eq!(outcome.biometrics, expected);
    }

    #[test]
    fn test_frames_without_person_are_skipped() {
        let responses = vec![
            None,
            Some(square_knee_at(200.0)),
            None,
            Some(straight_leg_at(150.0)),
        ];

        let outcome = run_scan(responses).unwrap();
        let expected = Biometrics::from_landmarks(&square_knee_at(200.0)).unwrap();
        assert_eq!(outcome.biometrics, expected);
    }

    #[test]
    fn test_no_detection_across_whole_video() {
        let result = run_scan(vec![None, None, None]);
        assert!(matches!(result, Err(Error::NoDetection)));
    }

    #[test]
    fn test_empty_stream_is_no_detection() {
        let result = run_scan(Vec::new());
        assert!(matches!(result, Err(Error::NoDetection)));
    }

    #[test]
    fn test_negative_hip_coordinates_still_win() {
        // A baseline of zero would silently drop frames with y <= 0;
        // -40 is deeper (larger) than -80 and must be retained
        let responses = vec![Some(square_knee_at(-40.0)), Some(straight_leg_at(-80.0))];

        let outcome = run_scan(responses).unwrap();
        let expected = Biometrics::from_landmarks(&square_knee_at(-40.0)).unwrap();
        assert_eq!(outcome.biometrics, expected);
    }

    #[test]
    fn test_unopenable_video_is_input_error() {
        let mut detector = ScriptedDetector::new(Vec::new());
        let scanner = FrameScanner::new(&mut detector);
        let result = scanner.scan("definitely/not/a/real/video.mp4");
        assert!(matches!(result, Err(Error::Input(_))));
    }
}
