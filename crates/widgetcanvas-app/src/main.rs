//! Replay entry point.
//!
//! Usage: `widgetcanvas <scene.json> <session.json> [config.json]`
//!
//! Prints one JSON frame per session event to stdout.

use std::process::ExitCode;
use thiserror::Error;
use widgetcanvas_app::{Replay, ReplayError, SessionError, load_session};
use widgetcanvas_core::{ConfigError, EditorConfig, Scene, SceneError};

#[derive(Debug, Error)]
enum AppError {
    #[error("Usage: widgetcanvas <scene.json> <session.json> [config.json]")]
    Usage,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
    #[error("Failed to write frames: {0}")]
    Output(#[from] serde_json::Error),
}

fn run(args: &[String]) -> Result<(), AppError> {
    let (scene_path, session_path, config_path) = match args {
        [scene, session] => (scene, session, None),
        [scene, session, config] => (scene, session, Some(config)),
        _ => return Err(AppError::Usage),
    };

    let config = match config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let scene = Scene::load(scene_path)?;
    let events = load_session(session_path)?;

    let mut replay = Replay::new(&scene, &config);
    let frames = replay.run(&events)?;
    log::info!("Replayed {} events", frames.len());

    for frame in &frames {
        println!("{}", serde_json::to_string(frame)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting WidgetCanvas replay");

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
