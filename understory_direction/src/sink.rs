// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attribute sinks: where directions end up.

/// Name of the attribute carrying a direction.
pub const DIR_ATTRIBUTE: &str = "dir";

/// Something that can receive a string attribute, such as a DOM element, a
/// document root, or a widget's property bag.
///
/// The store writes the document-level value through an optional sink; each
/// [`DirectionBinding`](crate::DirectionBinding) writes to the sink of its
/// host element. Values are always `"ltr"` or `"rtl"`.
///
/// Any `FnMut(&str, &str)` closure is a sink.
pub trait AttributeSink {
    /// Set attribute `name` to `value`.
    fn set_attribute(&mut self, name: &str, value: &str);
}

impl<F> AttributeSink for F
where
    F: FnMut(&str, &str),
{
    fn set_attribute(&mut self, name: &str, value: &str) {
        self(name, value);
    }
}
