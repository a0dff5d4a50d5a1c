//! Constants used throughout the application

/// Number of keypoints in the COCO pose convention
pub const NUM_KEYPOINTS: usize = 17;

/// Values per detection column in YOLO pose output (4 box + 1 score + 17 × 3 keypoints)
pub const POSE_OUTPUT_VALUES: usize = 4 + 1 + NUM_KEYPOINTS * 3;

/// Default square input size for the YOLO pose model
pub const DEFAULT_POSE_INPUT_SIZE: i32 = 640;

/// Default confidence threshold for accepting a person detection
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;

/// Vectors shorter than this are degenerate in angle computation
pub const GEOMETRY_EPSILON: f64 = 1e-10;

/// Video file extensions accepted by the upload endpoint
pub const ALLOWED_VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mov", "avi"];

/// Default Ollama-compatible endpoint for the critique service
pub const DEFAULT_CRITIQUE_ENDPOINT: &str = "http://127.0.0.1:11434";

/// Default vision model asked for the critique
pub const DEFAULT_CRITIQUE_MODEL: &str = "llama3.2-vision";

/// Default request timeout toward the critique service, in seconds
pub const DEFAULT_CRITIQUE_TIMEOUT_SECS: u64 = 120;
