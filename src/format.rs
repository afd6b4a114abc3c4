//! Currency and numeric input helpers.
//!
//! Allocation strings use a leading `$` and comma thousands separators. Raw
//! user input is reduced to its digits before formatting, so `"$10,000"`,
//! `"10000"` and `"10 000 USD"` all normalize to `"$10,000"`.

/// Format a whole-dollar amount, e.g. `10000` -> `"$10,000"`.
pub fn format_allocation(amount: u64) -> String {
    format!("${}", group_thousands(&amount.to_string()))
}

/// Parse an allocation string by keeping only its digits.
///
/// Empty input, or a digit run too large for `u64`, parses as `0`.
pub fn parse_allocation(value: &str) -> u64 {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(0)
}

/// Normalize raw allocation input to its canonical display form.
pub fn normalize_allocation(raw: &str) -> String {
    format_allocation(parse_allocation(raw))
}

/// Format a capital allocation for display, keeping up to two decimals.
pub fn format_capital(amount: f64) -> String {
    let cents = (amount.max(0.0) * 100.0).round() as u64;
    let whole = group_thousands(&(cents / 100).to_string());
    match cents % 100 {
        0 => format!("${}", whole),
        frac if frac % 10 == 0 => format!("${}.{}", whole, frac / 10),
        frac => format!("${}.{:02}", whole, frac),
    }
}

/// Coerce free-text quantity input to a non-negative integer.
///
/// Mirrors a lenient integer parse: the leading run of digits counts, anything
/// else (empty, signs, letters first) becomes `0`.
pub fn coerce_qty(raw: &str) -> u64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Coerce free-text amount input to a finite, non-negative number.
///
/// Same policy as [`coerce_qty`]: the leading numeric prefix (optional `+`,
/// digits, optional fraction) is kept and trailing text is ignored. No
/// prefix, a sign of `-`, or a non-finite value yields `0.0`.
pub fn coerce_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let whole = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    let mut end = whole;
    if trimmed[whole..].starts_with('.') {
        let fraction = trimmed[whole + 1..]
            .bytes()
            .take_while(u8::is_ascii_digit)
            .count();
        if whole + fraction > 0 {
            end = whole + 1 + fraction;
        }
    }
    match trimmed[..end].parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
