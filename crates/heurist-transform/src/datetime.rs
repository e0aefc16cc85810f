//! Heurist partial and fuzzy date normalization.
//!
//! Heurist stores dates in several loosely-related encodings:
//!
//! - a bare year, as an integer or string (`1188`, `"1188"`)
//! - year and month (`"2024-03"`)
//! - a fractional year where the digits after the point are the month, or
//!   month and day (`1250.12`, `1250.1231`, `"1250.1231"`)
//! - a full ISO date, optionally with a time part (`"2024-03-19"`)
//!
//! Missing month or day information resolves to the first of the month or
//! year. Unparseable input never fails the caller: it is logged and yields
//! no date.

use chrono::NaiveDate;
use tracing::warn;

use heurist_model::{DateRange, PartialDate, RawDate};

/// Parse one partial date representation.
///
/// Returns `None` (after logging a warning) when no calendar date can be
/// derived.
pub fn parse_partial(representation: &PartialDate) -> Option<NaiveDate> {
    let parsed = match representation {
        PartialDate::Integer(year) => parse_integer(*year),
        PartialDate::Float(value) => parse_float(*value),
        PartialDate::Text(text) => parse_text(text),
    };
    if parsed.is_none() {
        warn!(representation = %representation, "unparseable date representation");
    }
    parsed
}

/// Parse both ends of a range and return them earliest first.
///
/// When only one side parses it is returned as `earliest` and `latest` is
/// `None`.
pub fn normalize_pair(first: Option<&PartialDate>, second: Option<&PartialDate>) -> DateRange {
    let first = first.and_then(parse_partial);
    let second = second.and_then(parse_partial);
    match (first, second) {
        (Some(a), Some(b)) => DateRange::new(Some(a.min(b)), Some(a.max(b))),
        (Some(date), None) | (None, Some(date)) => DateRange::new(Some(date), None),
        (None, None) => DateRange::default(),
    }
}

/// Earliest/latest pair of a raw date value.
///
/// - a scalar yields `(parse_partial(value), None)`
/// - a compound value yields its sorted `estMinDate` / `estMaxDate`
/// - a malformed value yields `None`: no date could be derived
pub fn normalize_range(value: &RawDate) -> Option<DateRange> {
    match value {
        RawDate::Partial(partial) => Some(DateRange::new(parse_partial(partial), None)),
        RawDate::Compound(compound) => Some(normalize_pair(
            compound.est_min_date.as_ref(),
            compound.est_max_date.as_ref(),
        )),
        RawDate::Malformed => None,
    }
}

fn parse_integer(value: i64) -> Option<NaiveDate> {
    if (0..=9999).contains(&value) {
        return ymd(value, 1, 1);
    }
    parse_text(&value.to_string())
}

fn parse_float(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let text = value.to_string();
    let Some((year, fraction)) = text.split_once('.') else {
        return parse_text(&text);
    };
    // 1250.10 arrives as 1250.1 and 1250.1230 as 1250.123
    let width = match fraction.len() {
        1 | 2 => 2,
        3 | 4 => 4,
        _ => return None,
    };
    parse_fractional(year, &format!("{fraction:0<width$}"))
}

fn parse_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let date_part = trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(date, _)| date);
    if date_part.is_empty() {
        return None;
    }

    if date_part.len() <= 4 && date_part.chars().all(|c| c.is_ascii_digit()) {
        return ymd(date_part.parse().ok()?, 1, 1);
    }

    if let Some((year, fraction)) = date_part.split_once('.') {
        return parse_fractional(year, fraction);
    }

    let parts: Vec<&str> = date_part.split('-').collect();
    match parts.as_slice() {
        [year, month] => ymd(parse_number(year)?, parse_number(month)?, 1),
        [year, month, day] => ymd(
            parse_number(year)?,
            parse_number(month)?,
            parse_number(day)?,
        ),
        [compact] if compact.len() == 8 => NaiveDate::parse_from_str(compact, "%Y%m%d").ok(),
        _ => None,
    }
}

/// `YYYY.MM` or `YYYY.MMDD`.
fn parse_fractional(year: &str, fraction: &str) -> Option<NaiveDate> {
    let year = parse_number(year)?;
    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match fraction.len() {
        2 => ymd(year, fraction.parse().ok()?, 1),
        4 => ymd(year, fraction[..2].parse().ok()?, fraction[2..].parse().ok()?),
        _ => None,
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn ymd(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}
