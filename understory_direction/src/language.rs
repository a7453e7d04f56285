// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Language code → [`Direction`] lookup.
//!
//! Only the primary subtag of a language code matters: the lower-cased text
//! before the first `-`. `he-IL`, `HE` and `he` all resolve the same way.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

use crate::Direction;

/// Primary subtags of the right-to-left languages recognized by default.
pub const DEFAULT_RTL_LANGUAGES: [&str; 7] = ["ar", "he", "fa", "dv", "ku", "ur", "ps"];

/// Extract the lower-cased primary subtag of a language code.
///
/// ```rust
/// use understory_direction::primary_subtag;
///
/// assert_eq!(primary_subtag("he-IL"), "he");
/// assert_eq!(primary_subtag("AR"), "ar");
/// assert_eq!(primary_subtag("-x"), "");
/// ```
pub fn primary_subtag(code: &str) -> String {
    let head = code.split('-').next().unwrap_or_default();
    head.to_lowercase()
}

/// An immutable set of right-to-left primary subtags.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(from = "Vec<String>"))]
pub struct RtlLanguages {
    codes: HashSet<Box<str>>,
}

impl RtlLanguages {
    /// Build a set from primary subtags. Entries are lower-cased; anything
    /// after a `-` is ignored, so `"ar-SA"` registers `ar`.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|code| primary_subtag(code.as_ref()))
            .filter(|code| !code.is_empty())
            .map(String::into_boxed_str)
            .collect();
        Self { codes }
    }

    /// Returns `true` if the primary subtag of `code` is in the set.
    pub fn is_rtl(&self, code: &str) -> bool {
        self.codes.contains(primary_subtag(code).as_str())
    }

    /// Resolve a language code to a direction.
    ///
    /// Absent or empty codes, and codes outside the set, resolve to
    /// [`Direction::Ltr`].
    pub fn resolve(&self, code: Option<&str>) -> Direction {
        match code {
            Some(code) if !code.is_empty() && self.is_rtl(code) => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }

    /// Number of subtags in the set.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no language is considered right-to-left.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for RtlLanguages {
    fn default() -> Self {
        Self::new(DEFAULT_RTL_LANGUAGES)
    }
}

impl From<Vec<String>> for RtlLanguages {
    fn from(codes: Vec<String>) -> Self {
        Self::new(codes)
    }
}

impl fmt::Debug for RtlLanguages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted so output is stable regardless of hash order.
        let mut codes: Vec<&str> = self.codes.iter().map(|c| &**c).collect();
        codes.sort_unstable();
        f.debug_set().entries(codes).finish()
    }
}
