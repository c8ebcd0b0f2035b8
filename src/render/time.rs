use regex::Regex;

/// Format seconds as `m:ss`, or `h:mm:ss` past the hour
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Parse a playback position into seconds
///
/// Accepts plain seconds (`83`, `83.5`), clock form (`1:23`, `1:02:03`) and
/// the unit form used in watch URLs (`83s`, `1m23s`, `1h2m3s`).
pub fn parse_timestamp(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(seconds) = input.parse::<f64>() {
        return (seconds.is_finite() && seconds >= 0.0).then_some(seconds);
    }

    if input.contains(':') {
        let parts: Vec<u64> = input
            .split(':')
            .map(|part| part.parse::<u64>())
            .collect::<Result<_, _>>()
            .ok()?;

        let total = match parts.as_slice() {
            [minutes, seconds] if *seconds < 60 => minutes.checked_mul(60)?.checked_add(*seconds),
            [hours, minutes, seconds] if *minutes < 60 && *seconds < 60 => hours
                .checked_mul(3600)?
                .checked_add(minutes * 60 + seconds),
            _ => None,
        };
        return total.map(|t| t as f64);
    }

    let re = Regex::new(r"^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+(?:\.\d+)?)s)?$").ok()?;
    let captures = re.captures(input)?;
    let field = |i: usize| -> f64 {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };

    Some(field(1) * 3600.0 + field(2) * 60.0 + field(3))
}
