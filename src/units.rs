//! SI-prefixed scientific value parsing and formatting ("10mA" <-> 0.01).

use regex::Regex;
use std::sync::OnceLock;

use crate::types::format_number;

/// SI prefix table. `u` and `μ` both mean micro.
pub const SI_PREFIXES: [(&str, f64); 21] = [
    ("Y", 1e24),
    ("Z", 1e21),
    ("E", 1e18),
    ("P", 1e15),
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("h", 1e2),
    ("da", 1e1),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("μ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
    ("z", 1e-21),
    ("y", 1e-24),
];

/// Prefixes used when formatting values >= 1, largest first.
const LARGE_PREFIXES: [&str; 8] = ["Y", "Z", "E", "P", "T", "G", "M", "k"];
/// Prefixes used when formatting values < 1, largest first.
const SMALL_PREFIXES: [&str; 8] = ["m", "u", "n", "p", "f", "a", "z", "y"];

/// Smallest magnitude the prefix table can express.
const SMALLEST_FACTOR: f64 = 1e-24;

fn value_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?\d*\.?\d+(?:[eE][+-]?\d+)?)\s*(da|[YZEPTGMkhdcmuμnpfazy])?([a-zA-Z]*)$")
            .ok()
    })
    .as_ref()
}

/// Multiplier for a prefix symbol.
pub fn prefix_factor(prefix: &str) -> Option<f64> {
    SI_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, f)| *f)
}

/// Parse `"<number><prefix?><unit?>"` into a plain number.
///
/// Whitespace around the value and between number and prefix is allowed.
/// Strings that don't match fall back to parsing a leading number;
/// anything else is NaN.
pub fn parse_scientific_value(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    let Some(caps) = value_regex().and_then(|re| re.captures(trimmed)) else {
        return leading_float(trimmed);
    };
    let Some(num) = caps.get(1).and_then(|m| m.as_str().parse::<f64>().ok()) else {
        return f64::NAN;
    };
    match caps.get(2).and_then(|m| prefix_factor(m.as_str())) {
        Some(factor) => num * factor,
        None => num,
    }
}

/// Format a number with the closest engineering prefix (powers of 1000),
/// rounded to 3 decimals with trailing zeros trimmed.
///
/// Values in `[1, 1000)` carry no prefix. Non-finite values render as `-`,
/// magnitudes below `1e-24` in exponential notation.
pub fn format_scientific_value(value: f64, unit: &str) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value == 0.0 {
        return format!("0{unit}");
    }
    let abs = value.abs();
    if abs < SMALLEST_FACTOR {
        return format!("{value:.2e}{unit}");
    }

    let candidates: &[&str] = if abs >= 1.0 {
        &LARGE_PREFIXES
    } else {
        &SMALL_PREFIXES
    };
    let (prefix, factor) = candidates
        .iter()
        .filter_map(|p| prefix_factor(p).map(|f| (*p, f)))
        .find(|(_, f)| abs >= *f)
        .unwrap_or(("", 1.0));

    let rounded: f64 = format!("{:.3}", value / factor).parse().unwrap_or(0.0);
    // "-0.000" rounds to negative zero
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}{prefix}{unit}", format_number(rounded))
}

/// Parse the longest numeric prefix of `s`, or NaN.
fn leading_float(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut best = None;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut seen_dot = false;
    let mut seen_exp = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => {
                end += 1;
                if let Some(v) = s.get(..end).and_then(|p| p.parse::<f64>().ok()) {
                    best = Some(v);
                }
                continue;
            }
            b'.' if !seen_dot && !seen_exp => seen_dot = true,
            b'e' | b'E' if !seen_exp && best.is_some() => {
                seen_exp = true;
                if matches!(bytes.get(end + 1), Some(b'+' | b'-')) {
                    end += 1;
                }
            }
            _ => break,
        }
        end += 1;
    }
    best.unwrap_or(f64::NAN)
}
