// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction options for [`DirectionStore`](crate::DirectionStore).

use crate::{Direction, RtlLanguages};

/// Configuration for a [`DirectionStore`](crate::DirectionStore).
///
/// With the `serde` feature enabled this can be read from host configuration;
/// missing fields fall back to their defaults.
///
/// ```toml
/// initial = "rtl"
/// rtl_languages = ["ar", "he", "yi"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct StoreOptions {
    /// Direction held by the store before anything is set.
    pub initial: Direction,
    /// Primary subtags treated as right-to-left by
    /// [`DirectionStore::set_language`](crate::DirectionStore::set_language).
    pub rtl_languages: RtlLanguages,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_toml() {
        let options: StoreOptions = toml::from_str(
            r#"
            initial = "rtl"
            rtl_languages = ["AR", "yi-001"]
            "#,
        )
        .unwrap();
        assert_eq!(options.initial, Direction::Rtl);
        assert_eq!(options.rtl_languages, RtlLanguages::new(["ar", "yi"]));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options: StoreOptions = toml::from_str("").unwrap();
        assert_eq!(options, StoreOptions::default());
        assert_eq!(options.initial, Direction::Ltr);
        assert!(options.rtl_languages.is_rtl("fa"));
    }
}
