//! End-to-end analysis: scan the video, then ask the critique collaborator.

use crate::critique::{build_prompt, CritiqueService};
use crate::detector::PoseDetector;
use crate::scanner::{FrameScanner, ScanOutcome};
use crate::{Error, Result};
use opencv::{
    core::{Mat, Vector},
    imgcodecs,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Encode a frame as an in-memory JPEG for the critique service.
///
/// # Errors
///
/// Returns an error if the frame cannot be encoded.
pub fn encode_frame_jpeg(frame: &Mat) -> Result<Vec<u8>> {
    let mut buffer = Vector::<u8>::new();
    imgcodecs::imencode(".jpg", frame, &mut buffer, &Vector::new())?;
    Ok(buffer.to_vec())
}

/// Run the blocking scan on a worker thread.
///
/// The scan is synchronous frame-by-frame work; running it through
/// `spawn_blocking` keeps request-handling threads free, so concurrent
/// uploads are not serialized behind one video's decoding.
///
/// # Errors
///
/// Propagates scan failures; a worker that dies before delivering a result
/// is reported as [`Error::Collaborator`].
pub async fn scan_on_worker(
    detector: Arc<Mutex<dyn PoseDetector + Send>>,
    path: PathBuf,
) -> Result<ScanOutcome> {
    tokio::task::spawn_blocking(move || {
        // A poisoned lock only means a previous scan panicked; the detector
        // holds no per-scan state, so it is still usable.
        let mut detector = match detector.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        FrameScanner::new(&mut *detector).scan(&path)
    })
    .await
    .map_err(|e| Error::Collaborator(format!("Scan worker failed: {e}")))?
}

/// Analyze a squat video and return the model's critique text.
///
/// Either a complete critique comes back or an error does; no partial
/// results are ever returned.
///
/// # Errors
///
/// Propagates every stage's failure: input/decoding, detection, geometry,
/// and the critique collaborator.
pub async fn analyze_video(
    detector: Arc<Mutex<dyn PoseDetector + Send>>,
    critic: &dyn CritiqueService,
    path: &Path,
) -> Result<String> {
    let outcome = scan_on_worker(detector, path.to_path_buf()).await?;
    log::info!(
        "Deepest frame selected: knee angle {:.1}°, {}",
        outcome.biometrics.knee_angle,
        outcome.biometrics.depth_status
    );

    let image = encode_frame_jpeg(&outcome.frame)?;
    let prompt = build_prompt(&outcome.biometrics);
    critic.critique(&image, &prompt).await
}
