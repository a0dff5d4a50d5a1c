//! Configuration management for the squat critique service

use crate::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_CRITIQUE_ENDPOINT, DEFAULT_CRITIQUE_MODEL,
    DEFAULT_CRITIQUE_TIMEOUT_SECS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Pose detection configuration
    pub detection: DetectionConfig,

    /// Critique service configuration
    pub critique: CritiqueConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the YOLO pose ONNX model
    pub pose_model: PathBuf,
}

/// Pose detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Confidence threshold for accepting a person detection (0.0-1.0)
    pub confidence_threshold: f32,
}

/// Critique collaborator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueConfig {
    /// Base URL of the Ollama-compatible API
    pub endpoint: String,

    /// Vision model name asked for the critique
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Upload server parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen_addr: String,

    /// Directory where uploads are stored until analysis completes
    pub upload_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            detection: DetectionConfig::default(),
            critique: CritiqueConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_model: PathBuf::from("models/yolo11n-pose.onnx"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl Default for CritiqueConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CRITIQUE_ENDPOINT.to_string(),
            model: DEFAULT_CRITIQUE_MODEL.to_string(),
            timeout_secs: DEFAULT_CRITIQUE_TIMEOUT_SECS,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            upload_dir: PathBuf::from("temp_uploads"),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
