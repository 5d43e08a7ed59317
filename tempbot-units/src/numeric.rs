//! Numeric constants, fuzzy comparison and display formatting

/// Number of decimal places shown to users
pub const PRECISION: usize = 3;

/// Half of the smallest displayed increment: `0.1^(PRECISION + 1) / 2`
pub const COMPARISON_EPSILON: f64 = 0.000_05;

/// Upper bound on results produced for a single scanned message
pub const MAX_CONVERSIONS: usize = 10;

/// Fuzzy equality used for de-duplicating detected values.
///
/// NaN and infinite inputs are never equal to anything, themselves included.
/// Not transitive: `a ~ b` and `b ~ c` do not imply `a ~ c`.
pub fn doubles_are_equal(a: f64, b: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= COMPARISON_EPSILON
}

/// Format a value for display: thousands grouping, at most `PRECISION`
/// fractional digits, no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let fixed = format!("{:.*}", PRECISION, value);
    let (negative, digits) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (digits, ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    // rounding can leave "-0"
    let is_zero = frac_part.is_empty() && int_part.bytes().all(|b| b == b'0');
    if negative && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
