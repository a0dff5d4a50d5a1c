//! HTTP upload and critique serving layer.

use crate::analysis;
use crate::constants::ALLOWED_VIDEO_EXTENSIONS;
use crate::critique::CritiqueService;
use crate::detector::PoseDetector;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Uploads larger than this are rejected outright (bytes)
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Squat Critic</title></head>
<body>
  <h1>Squat Critic</h1>
  <p>Upload a video of a single squat rep (mp4, mov or avi).</p>
  <form action="/upload-and-critique" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".mp4,.mov,.avi" required>
    <button type="submit">Critique my form</button>
  </form>
</body>
</html>
"#;

/// Shared state handed to every request handler
pub struct AppState {
    /// Pose model, loaded once at startup
    pub detector: Arc<Mutex<dyn PoseDetector + Send>>,
    /// Vision critique collaborator
    pub critic: Arc<dyn CritiqueService>,
    /// Directory where uploads live until analysis completes
    pub upload_dir: PathBuf,
}

/// Check an uploaded filename against the video extension allow-list.
pub fn is_allowed_video(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ALLOWED_VIDEO_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Collision-free storage name for an upload.
pub fn unique_upload_name(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), filename)
}

/// Deletes the stored upload when the request finishes, success or failure.
struct UploadGuard(PathBuf);

impl Drop for UploadGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            warn!("Failed to delete upload {}: {}", self.0.display(), e);
        }
    }
}

enum UploadFailure {
    BadRequest(String),
    Internal(crate::Error),
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload-and-critique", post(upload_and_critique))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, listen_addr: &str) -> crate::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("Listening on http://{listen_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn upload_and_critique(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> impl IntoResponse {
    match handle_upload(state, multipart).await {
        Ok(critique) => (StatusCode::OK, Json(json!({ "critique": critique }))),
        Err(UploadFailure::BadRequest(message)) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        Err(UploadFailure::Internal(e)) => {
            // Full failure detail stays in the log; the client gets a
            // generic message and never a partial result
            error!("Analysis failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Analysis failed" })),
            )
        }
    }
}

async fn handle_upload(
    state: Arc<AppState>,
    mut multipart: Multipart,
) -> std::result::Result<String, UploadFailure> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| UploadFailure::BadRequest(format!("Malformed upload: {e}")))?
        .ok_or_else(|| UploadFailure::BadRequest("Missing file field".to_string()))?;

    let filename = field
        .file_name()
        .ok_or_else(|| UploadFailure::BadRequest("Upload has no filename".to_string()))?
        .to_string();

    if !is_allowed_video(&filename) {
        return Err(UploadFailure::BadRequest("Invalid video format.".to_string()));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| UploadFailure::BadRequest(format!("Malformed upload: {e}")))?;

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| UploadFailure::Internal(e.into()))?;
    let path = state.upload_dir.join(unique_upload_name(&filename));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| UploadFailure::Internal(e.into()))?;
    info!("Stored upload {} ({} bytes)", path.display(), bytes.len());

    // Held across the analysis so the file is removed on every exit path
    let _guard = UploadGuard(path.clone());

    analysis::analyze_video(state.detector.clone(), state.critic.as_ref(), &path)
        .await
        .map_err(UploadFailure::Internal)
}
