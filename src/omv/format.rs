//! Size formatting helpers shared by the storage views.

const UNITS: [&str; 8] = ["", "Kb", "Mb", "Gb", "Tb", "Pb", "Eb", "Zb"];

/// Human readable size, e.g. `"1.5Kb"` or `"931.5Gb"`.
///
/// Anything under 512 bytes reads as `"0 Kb"` and anything under 1024 as
/// `"1 Kb"`; larger values are divided by 1024 until they drop below 1024.
pub fn bytes_to_readable(bytes: impl Into<i128>) -> String {
    let bytes = bytes.into();
    if bytes < 512 {
        return "0 Kb".to_string();
    } else if bytes < 1024 {
        return "1 Kb".to_string();
    }

    let mut num = bytes as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{:3.1}{}", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}{}", num, "Yb")
}

pub fn bytes_to_megabytes(bytes: i64) -> f64 {
    round1(bytes as f64 / 1024.0 / 1024.0)
}

pub fn bytes_to_gigabytes(bytes: i64) -> f64 {
    round1(bytes as f64 / 1024.0 / 1024.0 / 1024.0)
}

pub fn bytes_to_terabytes(bytes: i64) -> f64 {
    round1(bytes as f64 / 1024.0 / 1024.0 / 1024.0 / 1024.0)
}

/// Round to one decimal place, correctly rounded from the exact binary
/// value with exact ties going to the even digit (`0.25` → `0.2`,
/// `0.75` → `0.8`).
pub(crate) fn round1(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Percentage label such as `"3.5%"` or `"60.0%"`.
///
/// Whole numbers keep one decimal; anything else prints its shortest
/// representation.
pub fn percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}%", value)
    } else {
        format!("{}%", value)
    }
}
