//! Recording value objects and entities

pub mod entry;
pub mod timer;

pub use entry::RecordingEntry;
pub use timer::{format_elapsed, IDLE_DISPLAY};
