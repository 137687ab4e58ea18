// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Human-readable durations, sizes and latencies.

const SECONDS_IN_DAY: i64 = 86_400;
const SECONDS_IN_HOUR: i64 = 3_600;
const SECONDS_IN_MINUTE: i64 = 60;
const INVALID_DURATION: &str = "00:00:00:00";

/// `90061` -> `"1d, 01:01:01"`. Negative input renders as `"00:00:00:00"`.
pub fn format_duration_secs(total_seconds: i64) -> String {
    if total_seconds < 0 {
        return INVALID_DURATION.to_string();
    }
    let days = total_seconds / SECONDS_IN_DAY;
    let hours = (total_seconds % SECONDS_IN_DAY) / SECONDS_IN_HOUR;
    let minutes = (total_seconds % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;
    let seconds = total_seconds % SECONDS_IN_MINUTE;
    format!("{}d, {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Timestamps above this are taken to be in milliseconds.
const MILLIS_CUTOFF: i64 = 1_000_000_000_000;
const NOT_AVAILABLE: &str = "N/A";
const IEC_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Coarse age of `timestamp` at `now`: `"2d 3h 5m"`, `"4h"`, `"12m"`, `"<1m"`.
///
/// Zero means "no timestamp" and renders as `N/A`. Millisecond timestamps
/// are accepted. A timestamp in the future counts as zero age.
pub fn format_time_since(timestamp: i64, now: i64) -> String {
    if timestamp == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let ts = if timestamp > MILLIS_CUTOFF { timestamp / 1000 } else { timestamp };
    let diff = now.saturating_sub(ts).max(0);

    let days = diff / SECONDS_IN_DAY;
    let hours = (diff % SECONDS_IN_DAY) / SECONDS_IN_HOUR;
    let minutes = (diff % SECONDS_IN_HOUR) / SECONDS_IN_MINUTE;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| format!("{}{}", n, unit))
        .collect();

    if parts.is_empty() {
        "<1m".to_string()
    } else {
        parts.join(" ")
    }
}

/// Binary-prefixed size with at most two decimals: `1536.0` -> `"1.5 KiB"`.
pub fn format_bytes(bytes: f64) -> String {
    if !bytes.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if bytes == 0.0 {
        return "0 B".to_string();
    }

    let mut value = bytes.abs();
    let mut unit = 0;
    while value >= 1024.0 && unit < IEC_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let sign = if bytes < 0.0 { "-" } else { "" };
    format!("{}{} {}", sign, trim_decimals(value, 2), IEC_UNITS[unit])
}

/// Ping in seconds. Sub-second values render in whole milliseconds.
pub fn format_ping(ping: Option<f64>) -> String {
    match ping {
        Some(p) if p.is_finite() && p > 0.0 => {
            if p < 1.0 {
                format!("{} ms", (p * 1000.0).round() as i64)
            } else {
                format!("{:.3} s", p)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Peer clock offset in seconds, one decimal. Missing reads as zero.
pub fn format_time_offset(offset: Option<f64>) -> String {
    format!("{:.1} s", offset.unwrap_or(0.0))
}

/// `value` rounded to `decimals` places with trailing zeros dropped.
fn trim_decimals(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_secs(0), "0d, 00:00:00");
        assert_eq!(format_duration_secs(59), "0d, 00:00:59");
        assert_eq!(format_duration_secs(3600), "0d, 01:00:00");
        assert_eq!(format_duration_secs(90061), "1d, 01:01:01");
        assert_eq!(format_duration_secs(-5), "00:00:00:00");
    }

    #[test]
    fn test_format_time_since() {
        let now = 1_700_000_000;
        assert_eq!(format_time_since(0, now), "N/A");
        assert_eq!(format_time_since(now - 30, now), "<1m");
        assert_eq!(format_time_since(now - 12 * 60, now), "12m");
        assert_eq!(format_time_since(now - 4 * 3600, now), "4h");
        assert_eq!(format_time_since(now - (3600 + 6 * 60 + 40), now), "1h 6m");
        assert_eq!(format_time_since(now - (2 * 86_400 + 5 * 60), now), "2d 5m");
        assert_eq!(format_time_since(now - (86_400 + 3 * 3600 + 60), now), "1d 3h 1m");
        assert_eq!(format_time_since(now + 500, now), "<1m");
        assert_eq!(format_time_since((now - 7200) * 1000, now), "2h");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0.0), "0 B");
        assert_eq!(format_bytes(500.0), "500 B");
        assert_eq!(format_bytes(1024.0), "1 KiB");
        assert_eq!(format_bytes(1536.0), "1.5 KiB");
        assert_eq!(format_bytes(5_368_709_120.0), "5 GiB");
        assert_eq!(format_bytes(1_234_567.0), "1.18 MiB");
        assert_eq!(format_bytes(f64::NAN), "N/A");
    }

    #[test]
    fn test_format_ping_and_offset() {
        assert_eq!(format_ping(None), "N/A");
        assert_eq!(format_ping(Some(0.0)), "N/A");
        assert_eq!(format_ping(Some(0.0421)), "42 ms");
        assert_eq!(format_ping(Some(1.5)), "1.500 s");

        assert_eq!(format_time_offset(None), "0.0 s");
        assert_eq!(format_time_offset(Some(-2.0)), "-2.0 s");
        assert_eq!(format_time_offset(Some(0.26)), "0.3 s");
    }
}
