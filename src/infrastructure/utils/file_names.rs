use chrono::Utc;

/// Last path component of a client supplied name. Both separators are
/// stripped since browsers on Windows may send the full path.
pub fn display_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim()
}

/// Everything from the last `.` on, or `""` when there is none.
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(idx) => &filename[idx..],
        None => "",
    }
}

/// `<nanosecond-timestamp>_<original-filename>`
pub fn stored_file_name(filename: &str) -> String {
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));
    format!("{}_{}", nanos, filename)
}
