/// Format seconds as `M:SS` (minutes unpadded, seconds zero-padded).
///
/// Returns `None` for `NaN`, infinite or negative input, so an unknown
/// duration renders as nothing rather than garbage.
pub fn format_time(seconds: f64) -> Option<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let whole = seconds.floor() as u64;
    Some(format!("{}:{:02}", whole / 60, whole % 60))
}
