//! Dictaphone - voice memo recorder
//!
//! This crate records audio from the microphone into a persisted,
//! self-healing catalog of recordings and plays them back.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Sessions, the save pipeline, the catalog, and port
//!   interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, rodio
//!   playback, filesystem, JSON catalog store, config)
//! - **CLI**: Command-line interface and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
