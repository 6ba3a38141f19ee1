// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsers and bound checks used by wizard steps.
//!
//! Checks take `&String` because they plug into `Step<String, _>` as plain
//! function pointers.

#![allow(clippy::ptr_arg)]

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

/// One number, or two separated by `-`, `..`, `,`, `;` or whitespace.
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(?:(?:-|–|\.\.|,|;|\s)\s*(\d+(?:\.\d+)?))?\s*$")
        .expect("static regex")
});

/// Non-empty trimmed text.
pub fn parse_text(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_number<T: FromStr>(input: &str) -> Option<T> {
    input.trim().parse().ok()
}

/// Accepts both `7.5` and `7,5`.
pub fn parse_decimal(input: &str) -> Option<f32> {
    let value: f32 = input.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// A range as typed: `1990-2000`, `7..9`, `8 10`, or a single number for
/// an exact match.
pub fn parse_range(input: &str) -> Option<(f64, f64)> {
    let caps = RANGE.captures(input)?;
    let low: f64 = caps.get(1)?.as_str().parse().ok()?;
    let high: f64 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => low,
    };
    Some((low, high))
}

/// Character count within `[min, max]`.
pub fn length_within(value: &String, min: u32, max: u32) -> bool {
    let len = value.chars().count();
    len >= min as usize && len <= max as usize
}

pub fn within<T: PartialOrd>(value: &T, min: T, max: T) -> bool {
    *value >= min && *value <= max
}

/// Both ends inside the domain and in order. A `0` end means "not set"
/// and is always accepted.
pub fn range_within(value: &(f64, f64), min: f64, max: f64) -> bool {
    let (low, high) = *value;
    let bound_ok = |v: f64| v == 0.0 || (v >= min && v <= max);
    bound_ok(low) && bound_ok(high) && (low == 0.0 || high == 0.0 || low <= high)
}

/// Absolute `http`/`https` URL with a host.
pub fn http_url(value: &String, min: u32, max: u32) -> bool {
    if !length_within(value, min, max) {
        return false;
    }
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

pub fn email(value: &String, min: u32, max: u32) -> bool {
    length_within(value, min, max) && EMAIL.is_match(value)
}

pub fn any<T, N>(_: &T, _: N, _: N) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_required() {
        assert_eq!(parse_text("  Alien "), Some("Alien".to_string()));
        assert_eq!(parse_text("   "), None);
    }

    #[test]
    fn length_counts_characters() {
        assert!(length_within(&"Амели".to_string(), 1, 5));
        assert!(!length_within(&"Амели!".to_string(), 1, 5));
        assert!(!length_within(&String::new(), 1, 5));
    }

    #[test]
    fn decimals_accept_comma() {
        assert_eq!(parse_decimal("7,5"), Some(7.5));
        assert_eq!(parse_decimal("8"), Some(8.0));
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("eight"), None);
    }

    #[test]
    fn year_bounds_are_inclusive() {
        assert!(within(&1888, 1888, 2100));
        assert!(within(&2100, 1888, 2100));
        assert!(!within(&1887, 1888, 2100));
        assert_eq!(parse_number::<i32>("19x9"), None);
    }

    #[test]
    fn ranges_parse_with_any_delimiter() {
        assert_eq!(parse_range("1990-2000"), Some((1990.0, 2000.0)));
        assert_eq!(parse_range("7..9"), Some((7.0, 9.0)));
        assert_eq!(parse_range("7.5 - 9"), Some((7.5, 9.0)));
        assert_eq!(parse_range("8 10"), Some((8.0, 10.0)));
        assert_eq!(parse_range("2001"), Some((2001.0, 2001.0)));
        assert_eq!(parse_range("from 1990"), None);
        assert_eq!(parse_range("1-2-3"), None);
    }

    #[test]
    fn ranges_must_be_ordered_and_in_domain() {
        assert!(range_within(&(7.0, 9.0), 0.0, 10.0));
        assert!(!range_within(&(9.0, 7.0), 0.0, 10.0));
        assert!(!range_within(&(7.0, 11.0), 0.0, 10.0));
        assert!(range_within(&(0.0, 2000.0), 1888.0, 2100.0));
        assert!(range_within(&(1990.0, 0.0), 1888.0, 2100.0));
        assert!(!range_within(&(1700.0, 2000.0), 1888.0, 2100.0));
    }

    #[test]
    fn urls_need_http_and_host() {
        assert!(http_url(&"https://img.example.com/a.jpg".to_string(), 1, 2048));
        assert!(!http_url(&"ftp://example.com/a.jpg".to_string(), 1, 2048));
        assert!(!http_url(&"not a url".to_string(), 1, 2048));
    }

    #[test]
    fn emails_need_at_and_domain() {
        assert!(email(&"kim@example.org".to_string(), 3, 254));
        assert!(!email(&"kim@example".to_string(), 3, 254));
        assert!(!email(&"kim example.org".to_string(), 3, 254));
    }

    #[test]
    fn yes_no_answers() {
        assert_eq!(parse_yes_no("Yes"), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }
}
