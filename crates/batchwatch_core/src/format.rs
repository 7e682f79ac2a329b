use chrono::Duration;

const IEC_SUFFIXES: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Formats a byte count with binary prefixes: `"512 B"`, `"1.5 KiB"`, `"10 MiB"`.
///
/// Values below ten units keep one decimal; larger values are rounded to a
/// whole number.
pub fn format_iec_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < IEC_SUFFIXES.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }

    let unit = 1024f64.powi(exponent as i32);
    let value = (bytes as f64 / unit * 10.0 + 0.5).floor() / 10.0;
    let suffix = IEC_SUFFIXES[exponent];
    if value < 10.0 {
        format!("{value:.1} {suffix}")
    } else {
        format!("{value:.0} {suffix}")
    }
}

/// Compact duration: `"0s"`, `"250ms"`, `"42s"`, `"1m30.5s"`, `"2h0m0s"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let nanos = total_nanos(elapsed);
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let nanos = nanos.unsigned_abs();

    if nanos < 1_000 {
        return format!("{sign}{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{sign}{}µs", fractional(nanos, 1_000, 3));
    }
    if nanos < 1_000_000_000 {
        return format!("{sign}{}ms", fractional(nanos, 1_000_000, 6));
    }

    let whole_secs = nanos / 1_000_000_000;
    let sub_nanos = nanos % 1_000_000_000;
    let hours = whole_secs / 3600;
    let minutes = (whole_secs % 3600) / 60;
    let seconds = fractional((whole_secs % 60) * 1_000_000_000 + sub_nanos, 1_000_000_000, 9);

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

fn total_nanos(elapsed: Duration) -> i128 {
    match elapsed.num_nanoseconds() {
        Some(nanos) => i128::from(nanos),
        None => i128::from(elapsed.num_milliseconds()) * 1_000_000,
    }
}

/// Renders `value / unit` with trailing zeros of the fraction trimmed.
fn fractional(value: u128, unit: u128, digits: usize) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:0digits$}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
