//! Timeline Replay
//!
//! Feeds a JSON array of wire-format actions through a `TimelineSession` and
//! reports what happened: events, errors, and the final timeline.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nle_app_state::TimelineSession;
use nle_common::EditorConfig;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay an action log against an empty timeline
#[derive(Parser, Debug)]
#[command(name = "timeline-replay")]
#[command(about = "Replay timeline edit actions and print the resulting state")]
#[command(version)]
struct Args {
    /// JSON file holding an array of actions
    actions: PathBuf,

    /// Editor config file (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final state as JSON instead of a summary
    #[arg(long)]
    print_state: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    let raw = std::fs::read_to_string(&args.actions)
        .with_context(|| format!("Failed to read {}", args.actions.display()))?;
    let actions: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("Action log must be a JSON array")?;
    info!(count = actions.len(), "Replaying actions");

    let mut session = TimelineSession::new(config);
    info!(
        max_history = session.config().max_history_entries,
        min_clip = session.config().min_clip_duration,
        "Session ready"
    );
    let events = session.subscribe();
    let mut failures = 0usize;

    for (step, action) in actions.into_iter().enumerate() {
        let state = session.dispatch_json(action);
        for event in events.try_iter() {
            info!(step, event = event.name(), "Event");
        }
        if let Some(error) = &state.error {
            warn!(step, %error, "Action failed");
            failures += 1;
        }
    }

    let state = session.state();
    if args.print_state {
        println!("{}", serde_json::to_string_pretty(&*state)?);
        return Ok(());
    }

    println!(
        "tracks: {}  clips: {}  markers: {}  content end: {:.3}s",
        state.tracks.len(),
        state.clip_count(),
        state.markers.len(),
        state.content_end()
    );
    for track in &state.tracks {
        println!(
            "  {} [{}]{} {} clip(s), {} transition(s)",
            track.id,
            track.kind,
            if track.is_locked { " locked" } else { "" },
            track.clips.len(),
            track.transitions.len()
        );
    }
    println!(
        "history: {} entr{} at {:?}  undo: {}  redo: {}  failed actions: {}",
        state.history.len(),
        if state.history.len() == 1 { "y" } else { "ies" },
        state.history.current_index(),
        state.history.undo_label().unwrap_or("-"),
        state.history.redo_label().unwrap_or("-"),
        failures
    );
    Ok(())
}
