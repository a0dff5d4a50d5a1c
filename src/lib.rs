//! Squat form critique library.
//!
//! This library analyzes a video of a single squat rep and produces a
//! vision-language critique of the lifter's form, using:
//! - `OpenCV` for video decoding and image handling
//! - ONNX Runtime for YOLO pose inference
//! - An Ollama-compatible vision model for the free-text critique
//!
//! The pipeline consists of:
//! 1. Frame scanning to find the deepest point of the squat (largest mean
//!    hip y in image coordinates)
//! 2. Biometric extraction at that frame: knee angle of the hip-knee-ankle
//!    chain and a below/above-parallel depth classification
//! 3. A critique request carrying the selected frame and the measurements
//!
//! # Examples
//!
//! ## Scanning a video
//!
//! ```no_run
//! use squat_critic::{detector::YoloPoseDetector, scanner::FrameScanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut detector = YoloPoseDetector::new("models/yolo11n-pose.onnx", 0.25)?;
//! let outcome = FrameScanner::new(&mut detector).scan("squat.mp4")?;
//!
//! println!("Knee angle at the bottom: {:.1}°", outcome.biometrics.knee_angle);
//! println!("Depth: {}", outcome.biometrics.depth_status);
//! # Ok(())
//! # }
//! ```
//!
//! ## Full analysis with critique
//!
//! ```no_run
//! use squat_critic::{
//!     analysis::analyze_video,
//!     critique::OllamaCritic,
//!     detector::{PoseDetector, YoloPoseDetector},
//! };
//! use std::path::Path;
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let detector: Arc<Mutex<dyn PoseDetector + Send>> =
//!     Arc::new(Mutex::new(YoloPoseDetector::new("models/yolo11n-pose.onnx", 0.25)?));
//! let critic = OllamaCritic::new(
//!     "http://127.0.0.1:11434",
//!     "llama3.2-vision",
//!     Duration::from_secs(120),
//! )?;
//!
//! let critique = analyze_video(detector, &critic, Path::new("squat.mp4")).await?;
//! println!("{critique}");
//! # Ok(())
//! # }
//! ```

/// End-to-end analysis glue: scan, encode, critique
pub mod analysis;

/// Biometrics derived at the squat's deepest frame
pub mod biometrics;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Vision-language critique collaborator
pub mod critique;

/// Pose detection capability and its ONNX implementation
pub mod detector;

/// Error types and result handling
pub mod error;

/// Planar angle computation
pub mod geometry;

/// COCO-convention keypoints and landmark sets
pub mod keypoint;

/// Frame scanning for the deepest point of the squat
pub mod scanner;

/// HTTP upload and critique serving layer
pub mod server;

pub use error::{Error, Result};
