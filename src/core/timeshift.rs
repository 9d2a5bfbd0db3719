use crate::utils::error::{HarvestError, Result};
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn component() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)h|(\d+)m|(\d+(?:\.\d+)?)s").expect("static pattern")
    })
}

fn timestamp() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+):(\d+):(\d+(?:\.\d+)?)").expect("static pattern"))
}

/// 解析 `1h2m3.1s`、`-1h2m3s` 這類調整量，開頭的正負號作用於整體
pub fn parse_time_adjustment(input: &str) -> Result<f64> {
    let trimmed = input.trim();
    let (sign, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut total = 0.0;
    let mut matched = false;
    for caps in component().captures_iter(body) {
        matched = true;
        if let Some(h) = caps.get(1) {
            total += h.as_str().parse::<f64>().unwrap_or(0.0) * 3600.0;
        } else if let Some(m) = caps.get(2) {
            total += m.as_str().parse::<f64>().unwrap_or(0.0) * 60.0;
        } else if let Some(s) = caps.get(3) {
            total += s.as_str().parse::<f64>().unwrap_or(0.0);
        }
    }

    if !matched {
        return Err(HarvestError::InputError {
            message: format!("Invalid time adjustment '{}', expected e.g. 1h2m3s", input),
        });
    }
    Ok(sign * total)
}

fn format_hms(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0).floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// 秒數轉為 `HH:MM:SS.mmm`，負值前加 `-`
pub fn format_seconds_hms(total_seconds: f64) -> String {
    let sign = if total_seconds < 0.0 { "-" } else { "" };
    let total_seconds = total_seconds.abs();
    let mut whole = total_seconds.floor() as u64;
    let mut millis = ((total_seconds - total_seconds.floor()) * 1000.0).round() as u64;
    if millis == 1000 {
        whole += 1;
        millis = 0;
    }
    format!(
        "{}{:02}:{:02}:{:02}.{:03}",
        sign,
        whole / 3600,
        (whole % 3600) / 60,
        whole % 60,
        millis
    )
}

/// 將文字中所有 `H:M:S` 時間戳平移，結果不小於零
pub fn shift_timestamps(text: &str, adjustment_seconds: f64) -> String {
    timestamp()
        .replace_all(text, |caps: &Captures| {
            let hours: f64 = caps[1].parse().unwrap_or(0.0);
            let minutes: f64 = caps[2].parse().unwrap_or(0.0);
            let seconds: f64 = caps[3].parse().unwrap_or(0.0);
            format_hms(hours * 3600.0 + minutes * 60.0 + seconds + adjustment_seconds)
        })
        .into_owned()
}
