//! Config command handler

use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;

use super::args::ConfigAction;
use super::presenter::Presenter;

/// Keys accepted by `config get`/`config set`
pub const VALID_CONFIG_KEYS: &[&str] = &["recordings_dir", "cache_dir", "catalog_path"];

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Path => {
            presenter.output(&store.path().display().to_string());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    let config = store.load().await?;
    let value = match key {
        "recordings_dir" => config.recordings_dir,
        "cache_dir" => config.cache_dir,
        "catalog_path" => config.catalog_path,
        _ => return Err(unknown_key(key)),
    };

    match value {
        Some(path) => presenter.output(&path.display().to_string()),
        None => presenter.info(&format!("{} is not set (platform default applies)", key)),
    }
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let mut config = store.load().await?;
    let path = PathBuf::from(value);
    match key {
        "recordings_dir" => config.recordings_dir = Some(path),
        "cache_dir" => config.cache_dir = Some(path),
        "catalog_path" => config.catalog_path = Some(path),
        _ => return Err(unknown_key(key)),
    }

    store.save(&config).await?;
    presenter.success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    }
}
