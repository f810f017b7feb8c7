//! Main app runner for recorder commands

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::ConfigStore;
use crate::application::{CaptureError, Deck};
use crate::domain::config::AppConfig;
use crate::domain::error::PermissionError;
use crate::domain::playback::PlaybackState;
use crate::domain::recording::format_elapsed;
use crate::infrastructure::{
    CpalCaptureEngine, HostMicrophone, JsonCatalogStore, RodioPlaybackEngine, TokioFileStore,
    XdgConfigStore,
};

use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Deck wired with the real adapters
pub type HostDeck =
    Deck<CpalCaptureEngine, RodioPlaybackEngine, HostMicrophone, TokioFileStore, JsonCatalogStore>;

/// Load the config file, falling back to an empty config on error
pub async fn load_config(presenter: &Presenter) -> AppConfig {
    let store = XdgConfigStore::new();
    match store.load().await {
        Ok(config) => config,
        Err(e) => {
            presenter.warn(&format!("Ignoring config: {}", e));
            AppConfig::empty()
        }
    }
}

/// Open a deck with the real adapters
pub async fn open_deck(config: &AppConfig) -> HostDeck {
    Deck::open(
        Arc::new(CpalCaptureEngine::new()),
        Arc::new(RodioPlaybackEngine::new()),
        Arc::new(HostMicrophone::new()),
        Arc::new(TokioFileStore::new()),
        Arc::new(JsonCatalogStore::with_path(config.catalog_path())),
        config,
    )
    .await
}

/// Run the `record` command
pub async fn run_record(presenter: &Presenter) -> ExitCode {
    let config = load_config(presenter).await;
    let deck = open_deck(&config).await;

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    if let Err(e) = deck.start_recording().await {
        presenter.error(&e.to_string());
        if matches!(
            e,
            CaptureError::Permission(PermissionError::PermanentlyDenied)
        ) {
            presenter.info("Grant microphone access in your system settings, then try again");
        }
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.info("Recording... press Enter or Ctrl-C to stop");

    let mut timer = deck.timer();
    let timer_presenter = *presenter;
    let timer_task = tokio::spawn(async move {
        while timer.changed().await.is_ok() {
            let display = timer.borrow_and_update().clone();
            timer_presenter.timer(&display);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tokio::select! {
        _ = lines.next_line() => {}
        _ = shutdown.wait() => {}
    }

    timer_task.abort();
    presenter.end_line();

    match deck.stop_recording().await {
        Ok(Some(entry)) => {
            presenter.success(&format!("Saved {} ({})", entry.display_name, entry.id));
            presenter.output(&entry.file_path.display().to_string());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            presenter.warn("Nothing to save");
            ExitCode::SUCCESS
        }
        Err(e) => {
            presenter.error(&format!("Failed to save recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the `list` command
pub async fn run_list(presenter: &Presenter) -> ExitCode {
    let config = load_config(presenter).await;
    let deck = open_deck(&config).await;

    let entries = deck.entries().await;
    if entries.is_empty() {
        presenter.info("No recordings yet");
        return ExitCode::SUCCESS;
    }

    for entry in entries {
        let when = entry
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        presenter.output(&format!(
            "{}  {}  {}  {}",
            entry.id,
            entry.display_name,
            when,
            entry.file_path.display()
        ));
    }
    ExitCode::SUCCESS
}

/// Run the `play` command: play to completion or Ctrl-C
pub async fn run_play(id: &str, presenter: &Presenter) -> ExitCode {
    let config = load_config(presenter).await;
    let deck = open_deck(&config).await;

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    if let Err(e) = deck.play(id).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let mut state = deck.playback_state();
    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state.borrow_and_update().clone();
                match snapshot {
                    PlaybackState::Playing { position_ms, duration_ms, .. } => {
                        presenter.progress(
                            &format_elapsed(position_ms),
                            &format_elapsed(duration_ms),
                        );
                    }
                    PlaybackState::Idle => break,
                }
            }
            _ = shutdown.wait() => {
                if let Err(e) = deck.stop_playback().await {
                    presenter.error(&e.to_string());
                    return ExitCode::from(EXIT_ERROR);
                }
                break;
            }
        }
    }

    presenter.end_line();
    presenter.success("Done");
    ExitCode::SUCCESS
}

/// Run the `delete` command
pub async fn run_delete(id: &str, presenter: &Presenter) -> ExitCode {
    let config = load_config(presenter).await;
    let deck = open_deck(&config).await;

    match deck.delete(id).await {
        Ok(true) => {
            presenter.success(&format!("Deleted recording {}", id));
            ExitCode::SUCCESS
        }
        Ok(false) => {
            // deleting what is already gone is not a failure
            presenter.info(&format!("No recording with id {}", id));
            ExitCode::SUCCESS
        }
        Err(e) => {
            presenter.error(&format!("Failed to delete recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
