// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

use tagforge_core::TagField;

pub mod artwork;
pub mod lyrics;

/// A text value that does not fit the native representation of a field.
///
/// Never returned to callers. The field is skipped after logging.
#[derive(Debug, Error)]
#[error("cannot coerce value {value:?} of {field}")]
pub struct FieldCoercionError {
    pub field: TagField,
    pub value: String,
}

impl FieldCoercionError {
    #[must_use]
    pub fn new(field: TagField, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }

    pub(crate) fn log_skipped(&self) {
        log::warn!("Skipping field: {self}");
    }
}

pub type CoercionResult<T> = std::result::Result<T, FieldCoercionError>;

#[must_use]
pub fn trim_readable(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c.is_control())
}

/// Accepts `0`/`1`, `true`/`false` and `yes`/`no`.
#[must_use]
pub fn try_parse_boolean_flag(input: &str) -> Option<bool> {
    let input = input.trim();
    input
        .parse::<u8>()
        .ok()
        .and_then(|value| match value {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
        .or_else(|| match input.to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        })
}

pub fn coerce_boolean_flag(field: TagField, input: &str) -> CoercionResult<bool> {
    try_parse_boolean_flag(input).ok_or_else(|| FieldCoercionError::new(field, input))
}

/// Parse a decimal number and truncate it to an integer.
pub fn coerce_integer_tempo(field: TagField, input: &str) -> CoercionResult<i32> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() < f64::from(i32::MAX))
        .map(|value| value.trunc() as i32)
        .ok_or_else(|| FieldCoercionError::new(field, input))
}

/// Split an `"N/M"` pair into its number and an optional total.
///
/// Leading and trailing whitespace of both parts is ignored.
#[must_use]
pub fn split_number_and_total(input: &str) -> (&str, Option<&str>) {
    match input.split_once('/') {
        Some((number, total)) => (number.trim(), Some(total.trim())),
        None => (input.trim(), None),
    }
}

#[must_use]
pub fn join_number_and_total(number: &str, total: Option<&str>) -> String {
    match total {
        Some(total) => format!("{number}/{total}"),
        None => number.to_owned(),
    }
}

/// Parse an `"N"` or `"N/M"` position into numbers.
///
/// An explicit total takes precedence over `total_hint`. The
/// total defaults to 0 if unknown or invalid.
pub fn coerce_position(
    field: TagField,
    input: &str,
    total_hint: Option<&str>,
) -> CoercionResult<(u32, u32)> {
    let (number, total) = split_number_and_total(input);
    let number = number
        .parse::<u32>()
        .map_err(|_| FieldCoercionError::new(field, input))?;
    let total = total
        .or(total_hint)
        .and_then(|total| total.trim().parse::<u32>().ok())
        .unwrap_or(0);
    Ok((number, total))
}

#[must_use]
pub fn format_position(number: u32, total: Option<u32>) -> String {
    match total.filter(|total| *total > 0) {
        Some(total) => format!("{number}/{total}"),
        None => number.to_string(),
    }
}
