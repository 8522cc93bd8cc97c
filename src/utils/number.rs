//! Lenient numeric parsing
//!
//! Reserved query values are read the way C's `atoi`/`atof` read them:
//! leading whitespace is skipped, the longest numeric prefix is taken and
//! anything after it is ignored. Text without a numeric prefix reads as zero.

/// Read the leading integer of `s`, saturating at the `i32` range
///
/// # Example
///
/// ```rust
/// use mediameta::utils::number::leading_int;
///
/// assert_eq!(leading_int(" 1920px"), 1920);
/// assert_eq!(leading_int("-7"), -7);
/// assert_eq!(leading_int("wide"), 0);
/// ```
pub fn leading_int(s: &str) -> i32 {
    let bytes = s.trim_start().as_bytes();
    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(bytes[pos] - b'0'));
        pos += 1;
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Read the leading decimal floating-point number of `s`
///
/// Only digits count, so `inf` and `nan` read as zero and the result is
/// always finite.
pub fn leading_float(s: &str) -> f64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut pos = 0;

    if pos < bytes.len() && matches!(bytes[pos], b'-' | b'+') {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let mut digits = pos - int_start;
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        digits += pos - frac_start;
    }
    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it
    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'-' | b'+') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            pos = exp;
        }
    }

    trimmed[..pos].parse().unwrap_or(0.0)
}
