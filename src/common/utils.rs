//! Utility functions for miniweed

/// Path on the master that hands out upload locations
pub const ASSIGN_PATH: &str = "dir/assign";

/// Compose `http://<addr>/<path>` by plain concatenation.
///
/// Neither part is escaped; fids issued by the master are already URL-safe.
pub fn node_url(addr: &str, path: &str) -> String {
    format!("http://{}/{}", addr, path)
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

/// Truncate a payload for inclusion in an error message
pub fn excerpt(payload: &[u8], max: usize) -> String {
    let text = String::from_utf8_lossy(payload);
    if text.chars().count() <= max {
        return text.into_owned();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}
