//! Squat form critique: video in, vision-language feedback out.

use anyhow::Result;
use clap::Parser;
use log::info;
use squat_critic::{
    analysis,
    config::Config,
    critique::OllamaCritic,
    detector::{PoseDetector, YoloPoseDetector},
    server::{self, AppState},
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video file to analyze
    #[arg(short, long, conflicts_with = "serve")]
    video: Option<PathBuf>,

    /// Run the HTTP upload server
    #[arg(short, long)]
    serve: bool,

    /// Address to listen on in server mode (overrides the config file)
    #[arg(short, long)]
    listen: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Squat Critic starting");

    // Load configuration if provided
    let config = if let Some(path) = &args.config {
        info!("Loading configuration from: {}", path.display());
        Config::from_file(path)?
    } else {
        Config::default()
    };

    let detector = YoloPoseDetector::new(
        &config.models.pose_model,
        config.detection.confidence_threshold,
    )?;
    let detector: Arc<Mutex<dyn PoseDetector + Send>> = Arc::new(Mutex::new(detector));

    let critic = OllamaCritic::new(
        &config.critique.endpoint,
        &config.critique.model,
        Duration::from_secs(config.critique.timeout_secs),
    )?;

    if let Some(video) = args.video {
        let critique = analysis::analyze_video(detector, &critic, &video).await?;
        println!("{critique}");
        return Ok(());
    }

    if args.serve {
        let listen = args.listen.unwrap_or_else(|| config.server.listen_addr.clone());
        let state = Arc::new(AppState {
            detector,
            critic: Arc::new(critic),
            upload_dir: config.server.upload_dir.clone(),
        });
        server::serve(state, &listen).await?;
        return Ok(());
    }

    anyhow::bail!("Nothing to do: pass --video <path> or --serve")
}
