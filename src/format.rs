use std::time::Duration;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_kb(kb: u64) -> String {
    const MB_IN_KB: u64 = 1024;
    const GB_IN_KB: u64 = 1024 * 1024;

    if kb >= GB_IN_KB {
        format!("{:.1} GB", kb as f64 / GB_IN_KB as f64)
    } else if kb >= MB_IN_KB {
        format!("{:.1} MB", kb as f64 / MB_IN_KB as f64)
    } else {
        format!("{kb} KB")
    }
}

/// Renders an uptime as `Nd HH:MM:SS`, dropping the day part under a day.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    if days > 0 {
        format!("{days}d {hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}
