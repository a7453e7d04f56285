// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Direction`] value type and override normalization.

use core::fmt;
use core::str::FromStr;

/// Text directionality of a piece of UI content.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl Direction {
    /// The attribute value for this direction: `"ltr"` or `"rtl"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }

    /// The logical opposite (`Ltr` ↔ `Rtl`).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }

    /// Returns `true` for [`Direction::Rtl`].
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Direction`] from text that is not `ltr` or `rtl`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid text direction, expected `ltr` or `rtl`")]
pub struct ParseDirectionError;

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Strict parse: accepts `ltr` or `rtl` in any letter case, nothing else.
    ///
    /// Use [`normalize_override`] for lenient handling of user supplied values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ltr") {
            Ok(Self::Ltr)
        } else if s.eq_ignore_ascii_case("rtl") {
            Ok(Self::Rtl)
        } else {
            Err(ParseDirectionError)
        }
    }
}

/// Normalize a raw, caller supplied direction override.
///
/// Surrounding whitespace is trimmed, then a single matching pair of outer
/// `'` or `"` quotes is removed, and the remainder is compared without regard
/// to letter case. Anything other than `ltr` or `rtl` (including empty input)
/// yields `None`, which callers treat as "no override".
///
/// ```rust
/// use understory_direction::{Direction, normalize_override};
///
/// assert_eq!(normalize_override(Some("'rtl'")), Some(Direction::Rtl));
/// assert_eq!(normalize_override(Some("\"ltr\"")), Some(Direction::Ltr));
/// assert_eq!(normalize_override(Some("  LTR  ")), Some(Direction::Ltr));
/// assert_eq!(normalize_override(Some("invalid")), None);
/// assert_eq!(normalize_override(None), None);
/// ```
pub fn normalize_override(raw: Option<&str>) -> Option<Direction> {
    let value = strip_outer_quotes(raw?.trim());
    value.parse().ok()
}

fn strip_outer_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&open), Some(&close))
            if bytes.len() >= 2 && open == close && (open == b'\'' || open == b'"') =>
        {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}
