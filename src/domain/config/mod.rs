//! Configuration value objects

mod app_config;

pub use app_config::{
    default_cache_dir, default_catalog_path, default_recordings_dir, AppConfig,
};
