//! Pose detection: the capability interface and its ONNX-backed implementation.

use crate::constants::{
    DEFAULT_POSE_INPUT_SIZE, NUM_KEYPOINTS, POSE_OUTPUT_VALUES,
};
use crate::keypoint::{Keypoint, LandmarkSet};
use crate::{Error, Result};
use ndarray::Array4;
use opencv::{
    core::{Mat, Size, Vec3f, CV_32FC3},
    imgproc,
    prelude::*,
};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;

/// Capability interface for per-frame pose inference.
///
/// One method: frame in, at most one person's landmarks out. `Ok(None)`
/// means no person was found in the frame — an expected, frequent outcome
/// that callers skip over rather than treat as a failure.
pub trait PoseDetector {
    /// Detect the most confident person in a BGR frame.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or model inference fails.
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>>;
}

/// YOLO pose detector using ONNX Runtime.
///
/// The session is loaded once at construction and owned by the caller for
/// its whole lifetime; scans borrow it without reinitializing.
pub struct YoloPoseDetector {
    session: Session,
    input_size: i32,
    confidence_threshold: f32,
}

impl YoloPoseDetector {
    /// Load a YOLO pose ONNX model (e.g. `yolo11n-pose.onnx`).
    ///
    /// # Errors
    ///
    /// Returns an error if the model file cannot be loaded by ONNX Runtime.
    pub fn new<P: AsRef<Path>>(model_path: P, confidence_threshold: f32) -> Result<Self> {
        log::info!("Loading pose model: {}", model_path.as_ref().display());
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path.as_ref())?;

        Ok(Self {
            session,
            input_size: DEFAULT_POSE_INPUT_SIZE,
            confidence_threshold,
        })
    }

    /// BGR Mat → NCHW [1, 3, input_size, input_size] tensor, scaled to [0, 1]
    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size;

        let mut rgb = Mat::default();
        imgproc::cvt_color_def(frame, &mut rgb, imgproc::COLOR_BGR2RGB)?;

        let mut resized = Mat::default();
        imgproc::resize(
            &rgb,
            &mut resized,
            Size::new(size, size),
            0.0,
            0.0,
            imgproc::INTER_LINEAR,
        )?;

        let mut float_mat = Mat::default();
        resized.convert_to(&mut float_mat, CV_32FC3, 1.0, 0.0)?;

        let s = size as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, s, s));
        for y in 0..size {
            for x in 0..size {
                let pixel = float_mat.at_2d::<Vec3f>(y, x)?;
                for c in 0..3 {
                    tensor[[0, c, y as usize, x as usize]] = pixel[c] / 255.0;
                }
            }
        }

        Ok(tensor)
    }
}

impl PoseDetector for YoloPoseDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkSet>> {
        let frame_w = frame.cols();
        let frame_h = frame.rows();
        let input = self.preprocess(frame)?;

        let input_tensor = Tensor::from_array(input)?;
        let outputs = self.session.run(ort::inputs!["images" => input_tensor])?;

        // Output layout: [1, 56, N] — cx, cy, w, h, score, then 17 × (x, y, conf)
        let output: ndarray::ArrayViewD<f32> = outputs["output0"].try_extract_array()?;
        if output.ndim() != 3 || output.shape()[1] != POSE_OUTPUT_VALUES {
            return Err(Error::Collaborator(format!(
                "unexpected pose model output shape {:?}",
                output.shape()
            )));
        }

        // Keep the highest-scoring detection; this pipeline tracks one person
        let detections = output.shape()[2];
        let mut best_score = 0.0f32;
        let mut best_idx: Option<usize> = None;
        for i in 0..detections {
            let score = output[[0, 4, i]];
            if score > best_score && score >= self.confidence_threshold {
                best_score = score;
                best_idx = Some(i);
            }
        }
        let Some(idx) = best_idx else {
            return Ok(None);
        };

        // Remap from model input coordinates to source-frame pixels
        let scale_x = frame_w as f32 / self.input_size as f32;
        let scale_y = frame_h as f32 / self.input_size as f32;

        let mut keypoints = [Keypoint::default(); NUM_KEYPOINTS];
        for (k, keypoint) in keypoints.iter_mut().enumerate() {
            let x = output[[0, 5 + k * 3, idx]];
            let y = output[[0, 6 + k * 3, idx]];
            let confidence = output[[0, 7 + k * 3, idx]];
            *keypoint = Keypoint::new(x * scale_x, y * scale_y, confidence);
        }

        Ok(Some(LandmarkSet::new(keypoints)))
    }
}
