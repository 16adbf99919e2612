//! VM Studio command line interface

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use vm_studio::config::{self, StudioConfig};
use vm_studio::engine::StudioEngine;
use vm_studio::error::StudioError;
use vm_studio::images;
use vm_studio::models::{BackgroundMode, Gender, ModelTier, SlotKey};
use vm_studio::poses;
use vm_studio::state::{AppState, MAX_SELECTED_POSES};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Parser)]
#[command(
    name = "vm-studio",
    version,
    about = "AI fashion styling photo generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate styled photos from a directory of reference images
    Generate {
        /// Directory with slot images named styling_ref.*, face_ref.*, top.*, ...
        #[arg(short, long)]
        dir: PathBuf,
        /// Model gender: female or male
        #[arg(long, default_value = "female")]
        gender: String,
        /// Background mode: white or keep_original
        #[arg(long, default_value = "white")]
        background: String,
        /// Model tier: pro or flash
        #[arg(long, default_value = "pro")]
        model: String,
        /// Pose ids to generate, up to three
        #[arg(short, long)]
        pose: Vec<String>,
    },
    /// List recorded sessions, newest first
    History,
    /// Show one session in detail
    Show { id: String },
    /// Delete one session and its output files
    Delete { id: String },
    /// Clear the whole session history
    Clear,
    /// List the pose catalog for a gender
    Poses {
        /// Model gender: female or male
        #[arg(long, default_value = "female")]
        gender: String,
    },
    /// Store studio settings like the API key
    Config {
        /// API key used when GEMINI_API_KEY is unset; pass "" to clear
        #[arg(long)]
        api_key: Option<String>,
        /// Service root URL
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), StudioError> {
    match cli.command {
        Command::Generate {
            dir,
            gender,
            background,
            model,
            pose,
        } => generate(&dir, &gender, &background, &model, &pose).await,
        Command::History => history(),
        Command::Show { id } => show(&id),
        Command::Delete { id } => delete(&id),
        Command::Clear => clear(),
        Command::Poses { gender } => list_poses(&gender),
        Command::Config { api_key, base_url } => configure(api_key, base_url),
    }
}

// ============ Commands ============

async fn generate(
    dir: &Path,
    gender: &str,
    background: &str,
    model: &str,
    pose_ids: &[String],
) -> Result<(), StudioError> {
    let gender = parse_gender(gender)?;
    let background = parse_background(background)?;
    let model = parse_model(model)?;

    let mut engine = open_engine()?;
    engine.state_mut().set_gender(gender);
    engine.state_mut().set_background_mode(background);
    engine.state_mut().set_model(model);
    apply_pose_selection(engine.state_mut(), pose_ids)?;
    load_slot_images(engine.state_mut(), dir).await?;

    println!(
        "Generating {} photo(s) for poses {}...",
        engine.state().selected_pose_ids().len(),
        engine.state().selected_pose_ids().join(", ")
    );

    let session_id = engine.generate().await?;
    let elapsed = engine.progress_seconds();

    if let Some(session) = engine.store().load_session(&session_id) {
        println!("Session {} completed in {}s", session.id, elapsed);
        for (pose_id, output) in session.parameters.pose_ids.iter().zip(&session.outputs) {
            println!("  {} -> {}", pose_id, display_reference(output));
        }
        if let Some(thumbnail) = &session.thumbnail {
            println!("  thumbnail: {}", thumbnail);
        }
    }
    Ok(())
}

fn history() -> Result<(), StudioError> {
    let engine = open_engine()?;
    let entries = engine.store().history();
    if entries.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {}  {:<6} {:<13} {:<12} {} image(s)",
            entry.id,
            format_timestamp(entry.timestamp),
            entry.gender.as_str(),
            entry.background_mode.as_str(),
            entry.pose_ids.join("+"),
            entry.output_count
        );
    }
    Ok(())
}

fn show(id: &str) -> Result<(), StudioError> {
    let engine = open_engine()?;
    let Some(session) = engine.store().load_session(id) else {
        return Err(StudioError::Validation(format!("Session not found: {}", id)));
    };

    println!("Session {}", session.id);
    println!("  When:       {}", format_timestamp(session.timestamp));
    println!("  Gender:     {}", session.parameters.gender.as_str());
    println!("  Background: {}", session.parameters.background_mode.as_str());
    println!("  Model:      {}", session.parameters.model.model_name());
    println!("  Poses:      {}", session.parameters.pose_ids.join(", "));
    for (pose_id, output) in session.parameters.pose_ids.iter().zip(&session.outputs) {
        println!("    {} -> {}", pose_id, display_reference(output));
    }
    if let Some(thumbnail) = &session.thumbnail {
        println!("  Thumbnail:  {}", thumbnail);
    }
    Ok(())
}

fn delete(id: &str) -> Result<(), StudioError> {
    let mut engine = open_engine()?;
    if engine.delete_session(id)? {
        println!("Deleted session {}", id);
        Ok(())
    } else {
        Err(StudioError::Validation(format!("Session not found: {}", id)))
    }
}

fn clear() -> Result<(), StudioError> {
    let mut engine = open_engine()?;
    let removed = engine.clear_history()?;
    println!("Cleared {} session(s)", removed);
    Ok(())
}

fn list_poses(gender: &str) -> Result<(), StudioError> {
    let gender = parse_gender(gender)?;
    for pose in poses::poses_for(gender) {
        println!("{:<3} {:<20} {}", pose.id, pose.title, pose.description);
    }
    Ok(())
}

fn configure(api_key: Option<String>, base_url: Option<String>) -> Result<(), StudioError> {
    if api_key.is_none() && base_url.is_none() {
        let config = config::load_stored_config()?;
        println!(
            "API key:  {}",
            if config.api_key.is_some() { "set" } else { "unset" }
        );
        println!("Base URL: {}", config.base_url);
        return Ok(());
    }

    let mut config = config::load_stored_config()?;
    if let Some(api_key) = api_key {
        config.api_key = if api_key.is_empty() { None } else { Some(api_key) };
    }
    if let Some(base_url) = base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    config::save_studio_config(&config)?;
    println!("Configuration saved.");
    Ok(())
}

// ============ Helpers ============

fn open_engine() -> Result<StudioEngine, StudioError> {
    let config: StudioConfig = config::load_studio_config()?.with_default_storage()?;
    StudioEngine::with_gemini(config)
}

fn parse_gender(value: &str) -> Result<Gender, StudioError> {
    Gender::parse(value).ok_or_else(|| {
        StudioError::Validation(format!(
            "Unknown gender: {} (expected female or male)",
            value
        ))
    })
}

fn parse_background(value: &str) -> Result<BackgroundMode, StudioError> {
    BackgroundMode::parse(value).ok_or_else(|| {
        StudioError::Validation(format!(
            "Unknown background mode: {} (expected white or keep_original)",
            value
        ))
    })
}

fn parse_model(value: &str) -> Result<ModelTier, StudioError> {
    ModelTier::parse(value).ok_or_else(|| {
        StudioError::Validation(format!("Unknown model: {} (expected pro or flash)", value))
    })
}

/// Drives the selection to the requested pose set through the same toggle
/// rules the interactive surface uses. Two rounds let an add that was
/// blocked by the cap land after removals free a slot.
fn apply_pose_selection(state: &mut AppState, requested: &[String]) -> Result<(), StudioError> {
    if requested.is_empty() {
        return Ok(());
    }
    if requested.len() > MAX_SELECTED_POSES {
        return Err(StudioError::Validation(format!(
            "At most {} poses per batch.",
            MAX_SELECTED_POSES
        )));
    }
    for pose_id in requested {
        if !poses::is_valid_pose(state.gender(), pose_id) {
            let valid: Vec<&str> = poses::poses_for(state.gender())
                .iter()
                .map(|p| p.id)
                .collect();
            return Err(StudioError::Validation(format!(
                "Unknown pose id {} for {} (valid: {})",
                pose_id,
                state.gender().as_str(),
                valid.join(", ")
            )));
        }
    }

    for _ in 0..2 {
        for pose_id in requested {
            if !state.selected_pose_ids().contains(pose_id) {
                state.toggle_pose(pose_id);
            }
        }
        let current: Vec<String> = state.selected_pose_ids().to_vec();
        for pose_id in &current {
            if !requested.contains(pose_id) {
                state.toggle_pose(pose_id);
            }
        }
    }
    Ok(())
}

async fn load_slot_images(state: &mut AppState, dir: &Path) -> Result<(), StudioError> {
    if !dir.is_dir() {
        return Err(StudioError::Validation(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut found = 0usize;
    for slot in SlotKey::ALL {
        let Some(path) = find_slot_file(dir, slot) else {
            continue;
        };
        let bytes = tokio::fs::read(&path).await?;
        let mime = mime_guess::from_path(&path).first_or_octet_stream().to_string();
        let image = images::ingest(bytes, &mime)?;
        info!("[load_slot_images] {} <- {}", slot.as_str(), path.display());
        state.set_slot(slot, image);
        found += 1;
    }

    if found == 0 {
        return Err(StudioError::Validation(format!(
            "No slot images found in {} (expected files like styling_ref.png)",
            dir.display()
        )));
    }
    Ok(())
}

fn find_slot_file(dir: &Path, slot: SlotKey) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", slot.as_str(), ext)))
        .find(|path| path.exists())
}

fn display_reference(reference: &str) -> String {
    if reference.starts_with("data:") {
        let prefix: String = reference.chars().take(32).collect();
        format!("{}... ({} chars inline)", prefix, reference.len())
    } else {
        reference.to_string()
    }
}

fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| millis.to_string())
}
