//! Elapsed-time display formatting

/// Display string shown when no recording is in progress
pub const IDLE_DISPLAY: &str = "00:00";

/// Format elapsed milliseconds as a zero-padded `mm:ss` string.
/// Minutes are not wrapped at the hour mark, so a 65-minute capture
/// reads `65:00`.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
