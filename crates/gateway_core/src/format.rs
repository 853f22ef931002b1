const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable size with at most two decimals, e.g. `1536 -> "1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit])
}

/// Whole minutes plus rounded remaining seconds.
pub fn format_processing_time(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0);
    let minutes = (total / 60.0).floor();
    let seconds = (total - minutes * 60.0).round();
    format!("{} minutes {} seconds", minutes as u64, seconds as u64)
}

pub fn format_step_duration(seconds: f64) -> String {
    format!("{:.1} seconds", seconds.max(0.0))
}
