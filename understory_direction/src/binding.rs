// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element direction binding.
//!
//! A [`DirectionBinding`] decides the `dir` attribute of one host element.
//! An explicit override always wins; without a valid one the binding tracks
//! the shared [`DirectionStore`]. At any time an attached binding is in exactly
//! one of two modes:
//!
//! - [`BindingMode::Explicit`]: uses the normalized override and holds no
//!   subscription, so store changes are ignored.
//! - [`BindingMode::Tracking`]: holds one subscription and applies every value
//!   the store emits.
//!
//! Host frameworks drive it with three lifecycle calls:
//! [`on_attach`](DirectionBinding::on_attach),
//! [`on_input_changed`](DirectionBinding::on_input_changed), and
//! [`on_detach`](DirectionBinding::on_detach).
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_direction::{Direction, DirectionBinding, DirectionStore};
//!
//! let store = DirectionStore::new();
//! let dir = Rc::new(RefCell::new(String::new()));
//! let element = {
//!     let dir = dir.clone();
//!     move |_: &str, value: &str| *dir.borrow_mut() = value.to_owned()
//! };
//!
//! let mut binding = DirectionBinding::new(store.clone(), element, None);
//! binding.on_attach();
//! assert_eq!(*dir.borrow(), "ltr");
//!
//! store.set_direction(Direction::Rtl);
//! assert_eq!(*dir.borrow(), "rtl");
//!
//! // An explicit override detaches the element from the store.
//! binding.on_input_changed(Some("'ltr'"));
//! store.set_direction(Direction::Ltr);
//! store.set_direction(Direction::Rtl);
//! assert_eq!(*dir.borrow(), "ltr");
//! assert_eq!(store.observer_count(), 0);
//! ```

use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use crate::{
    AttributeSink, DIR_ATTRIBUTE, Direction, DirectionStore, Subscription, normalize_override,
};

/// Which source currently drives a [`DirectionBinding`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingMode {
    /// Not attached; nothing is applied or observed.
    Detached,
    /// Using a valid override; the store is ignored.
    Explicit,
    /// Following the store through a live subscription.
    Tracking,
}

enum Source {
    Detached,
    Explicit(Direction),
    Tracking(Subscription),
}

struct Host<E> {
    element: E,
    applied: Option<Direction>,
}

impl<E: AttributeSink> Host<E> {
    fn apply(&mut self, dir: Direction) {
        if self.applied == Some(dir) {
            return;
        }
        self.applied = Some(dir);
        self.element.set_attribute(DIR_ATTRIBUTE, dir.as_str());
    }
}

/// Direction state for a single host element.
pub struct DirectionBinding<E> {
    store: DirectionStore,
    host: Rc<RefCell<Host<E>>>,
    input: Option<String>,
    source: Source,
}

impl<E: AttributeSink + 'static> DirectionBinding<E> {
    /// Create a detached binding for `element` with an optional raw override.
    ///
    /// Nothing is written to the element until [`on_attach`](Self::on_attach).
    pub fn new(store: DirectionStore, element: E, input: Option<&str>) -> Self {
        Self {
            store,
            host: Rc::new(RefCell::new(Host {
                element,
                applied: None,
            })),
            input: input.map(String::from),
            source: Source::Detached,
        }
    }

    /// The element was attached: resolve and apply its direction.
    ///
    /// Calling this on an attached binding does nothing.
    pub fn on_attach(&mut self) {
        if self.is_attached() {
            return;
        }
        self.evaluate();
    }

    /// The raw override changed.
    ///
    /// The new value is always recorded; it is resolved right away only when
    /// the binding is attached and the value actually differs.
    pub fn on_input_changed(&mut self, input: Option<&str>) {
        if self.input.as_deref() == input {
            return;
        }
        self.input = input.map(String::from);
        if self.is_attached() {
            self.evaluate();
        }
    }

    /// The element was detached: release any subscription.
    ///
    /// Safe to call in any mode, any number of times. The last applied
    /// direction stays on the element.
    pub fn on_detach(&mut self) {
        if self.is_attached() {
            tracing::trace!(mode = ?self.mode(), "direction binding detached");
        }
        self.source = Source::Detached;
    }

    fn evaluate(&mut self) {
        match normalize_override(self.input.as_deref()) {
            Some(dir) => {
                if !matches!(self.source, Source::Explicit(_)) {
                    tracing::debug!(direction = %dir, "direction binding uses explicit override");
                }
                // Assigning drops a tracking subscription before the override lands.
                self.source = Source::Explicit(dir);
                self.host.borrow_mut().apply(dir);
            }
            None => {
                if matches!(self.source, Source::Tracking(_)) {
                    return;
                }
                tracing::debug!(
                    input = self.input.as_deref().unwrap_or_default(),
                    "direction binding tracks the shared direction"
                );
                // Leave explicit mode before the replayed value arrives.
                self.source = Source::Detached;
                let host = Rc::downgrade(&self.host);
                let subscription = self.store.direction().subscribe(move |dir| {
                    let Some(host) = host.upgrade() else {
                        return;
                    };
                    match host.try_borrow_mut() {
                        Ok(mut host) => host.apply(dir),
                        Err(_) => tracing::warn!(
                            direction = %dir,
                            "host element is busy, dropping direction update"
                        ),
                    }
                });
                self.source = Source::Tracking(subscription);
            }
        }
    }
}

impl<E> DirectionBinding<E> {
    /// The direction currently applied to the element, if any was applied yet.
    pub fn applied(&self) -> Option<Direction> {
        self.host.borrow().applied
    }

    /// Which source drives the element right now.
    pub fn mode(&self) -> BindingMode {
        match self.source {
            Source::Detached => BindingMode::Detached,
            Source::Explicit(_) => BindingMode::Explicit,
            Source::Tracking(_) => BindingMode::Tracking,
        }
    }

    /// Returns `true` between [`on_attach`](Self::on_attach) and [`on_detach`](Self::on_detach).
    pub fn is_attached(&self) -> bool {
        !matches!(self.source, Source::Detached)
    }

    /// The raw override as last supplied.
    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    /// The store this binding follows in tracking mode.
    pub fn store(&self) -> &DirectionStore {
        &self.store
    }

    /// Inspect the host element.
    pub fn with_element<R>(&self, f: impl FnOnce(&E) -> R) -> R {
        f(&self.host.borrow().element)
    }
}

impl<E> fmt::Debug for DirectionBinding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionBinding")
            .field("mode", &self.mode())
            .field("applied", &self.applied())
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Element stand-in that records every `dir` write.
    #[derive(Default)]
    struct Element {
        writes: Vec<Direction>,
    }

    impl Element {
        fn dir(&self) -> Option<Direction> {
            self.writes.last().copied()
        }
    }

    impl AttributeSink for Element {
        fn set_attribute(&mut self, name: &str, value: &str) {
            assert_eq!(name, DIR_ATTRIBUTE, "only `dir` is ever written");
            self.writes.push(value.parse().expect("only ltr/rtl are ever written"));
        }
    }

    fn attached(store: &DirectionStore, input: Option<&str>) -> DirectionBinding<Element> {
        let mut binding = DirectionBinding::new(store.clone(), Element::default(), input);
        binding.on_attach();
        binding
    }

    fn dir(binding: &DirectionBinding<Element>) -> Option<Direction> {
        binding.with_element(Element::dir)
    }

    #[test]
    fn nothing_is_written_before_attach() {
        let store = DirectionStore::new();
        let binding = DirectionBinding::new(store.clone(), Element::default(), Some("rtl"));
        assert_eq!(binding.mode(), BindingMode::Detached);
        assert_eq!(binding.applied(), None);
        assert_eq!(dir(&binding), None);
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn no_override_tracks_store() {
        let store = DirectionStore::new();
        let binding = attached(&store, None);
        assert_eq!(binding.mode(), BindingMode::Tracking);
        assert_eq!(dir(&binding), Some(Direction::Ltr));

        store.set_direction(Direction::Rtl);
        assert_eq!(dir(&binding), Some(Direction::Rtl));
        store.set_direction(Direction::Ltr);
        assert_eq!(dir(&binding), Some(Direction::Ltr));
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn explicit_override_ignores_store() {
        let store = DirectionStore::new();
        let rtl = attached(&store, Some("rtl"));
        let ltr = attached(&store, Some("ltr"));
        assert_eq!(rtl.mode(), BindingMode::Explicit);
        assert_eq!(store.observer_count(), 0);

        store.set_direction(Direction::Rtl);
        store.set_direction(Direction::Ltr);
        assert_eq!(dir(&rtl), Some(Direction::Rtl));
        assert_eq!(dir(&ltr), Some(Direction::Ltr));
    }

    #[test]
    fn overrides_are_normalized() {
        let store = DirectionStore::new();
        for (input, expected) in [
            ("'rtl'", Direction::Rtl),
            ("\"rtl\"", Direction::Rtl),
            ("\"ltr\"", Direction::Ltr),
            ("  LTR  ", Direction::Ltr),
            ("RTL", Direction::Rtl),
            ("RtL", Direction::Rtl),
        ] {
            let binding = attached(&store, Some(input));
            assert_eq!(binding.mode(), BindingMode::Explicit, "{input}");
            assert_eq!(dir(&binding), Some(expected), "{input}");
        }
    }

    #[test]
    fn invalid_override_falls_back_to_tracking() {
        let store = DirectionStore::new();
        for input in ["invalid", "\"invalid\"", "", "   "] {
            let binding = attached(&store, Some(input));
            assert_eq!(binding.mode(), BindingMode::Tracking, "{input:?}");
            assert_eq!(dir(&binding), Some(Direction::Ltr), "{input:?}");
        }

        let binding = attached(&store, Some("invalid"));
        store.set_direction(Direction::Rtl);
        assert_eq!(dir(&binding), Some(Direction::Rtl));
    }

    #[test]
    fn explicit_to_explicit_keeps_zero_subscriptions() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, Some("rtl"));
        binding.on_input_changed(Some("ltr"));
        assert_eq!(dir(&binding), Some(Direction::Ltr));
        binding.on_input_changed(Some("rtl"));
        assert_eq!(dir(&binding), Some(Direction::Rtl));
        assert_eq!(store.observer_count(), 0);

        store.set_direction(Direction::Rtl);
        store.set_direction(Direction::Ltr);
        assert_eq!(dir(&binding), Some(Direction::Rtl));

        binding.on_detach();
        assert_eq!(binding.mode(), BindingMode::Detached);
    }

    #[test]
    fn tracking_to_explicit_releases_subscription() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, None);
        store.set_direction(Direction::Rtl);
        assert_eq!(dir(&binding), Some(Direction::Rtl));

        binding.on_input_changed(Some("ltr"));
        assert_eq!(binding.mode(), BindingMode::Explicit);
        assert_eq!(dir(&binding), Some(Direction::Ltr));
        assert_eq!(store.observer_count(), 0);

        store.set_direction(Direction::Ltr);
        store.set_direction(Direction::Rtl);
        assert_eq!(dir(&binding), Some(Direction::Ltr));
    }

    #[test]
    fn clearing_override_resumes_tracking() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, Some("rtl"));
        store.set_direction(Direction::Ltr);
        assert_eq!(dir(&binding), Some(Direction::Rtl));

        binding.on_input_changed(None);
        assert_eq!(binding.mode(), BindingMode::Tracking);
        assert_eq!(dir(&binding), Some(Direction::Ltr));

        store.set_direction(Direction::Rtl);
        assert_eq!(dir(&binding), Some(Direction::Rtl));

        // Clearing to an empty string behaves the same.
        binding.on_input_changed(Some("ltr"));
        binding.on_input_changed(Some(""));
        assert_eq!(binding.mode(), BindingMode::Tracking);
        assert_eq!(dir(&binding), Some(Direction::Rtl));
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn tracking_never_subscribes_twice() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, None);
        binding.on_input_changed(Some("bogus"));
        binding.on_input_changed(Some(""));
        binding.on_input_changed(None);
        binding.on_attach();
        assert_eq!(binding.mode(), BindingMode::Tracking);
        assert_eq!(store.observer_count(), 1);
    }

    #[test]
    fn unchanged_input_is_a_no_op() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, Some("rtl"));
        binding.on_input_changed(Some("rtl"));
        binding.on_attach();
        binding.with_element(|e| assert_eq!(e.writes, [Direction::Rtl]));

        // Different raw text with the same meaning does not rewrite the element.
        binding.on_input_changed(Some(" RTL "));
        binding.with_element(|e| assert_eq!(e.writes, [Direction::Rtl]));
        assert_eq!(binding.input(), Some(" RTL "));
    }

    #[test]
    fn input_changes_while_detached_apply_on_attach() {
        let store = DirectionStore::new();
        let mut binding = DirectionBinding::new(store.clone(), Element::default(), None);
        binding.on_input_changed(Some("rtl"));
        assert_eq!(dir(&binding), None);

        binding.on_attach();
        assert_eq!(binding.mode(), BindingMode::Explicit);
        assert_eq!(dir(&binding), Some(Direction::Rtl));
    }

    #[test]
    fn detach_without_subscription_is_safe() {
        let store = DirectionStore::new();
        let mut explicit = attached(&store, Some("rtl"));
        explicit.on_detach();
        explicit.on_detach();

        let mut never_attached = DirectionBinding::new(store, Element::default(), None);
        never_attached.on_detach();
        assert_eq!(never_attached.mode(), BindingMode::Detached);
    }

    #[test]
    fn detached_element_is_not_updated() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, None);
        store.set_direction(Direction::Rtl);
        binding.on_detach();
        assert_eq!(store.observer_count(), 0);

        store.set_direction(Direction::Ltr);
        assert_eq!(dir(&binding), Some(Direction::Rtl));
        assert_eq!(binding.applied(), Some(Direction::Rtl));
    }

    #[test]
    fn detached_binding_ignores_input_until_reattached() {
        let store = DirectionStore::new();
        let mut binding = attached(&store, None);
        binding.on_detach();
        binding.on_input_changed(Some("rtl"));
        assert_eq!(dir(&binding), Some(Direction::Ltr));

        binding.on_attach();
        assert_eq!(dir(&binding), Some(Direction::Rtl));
    }

    #[test]
    fn dropping_a_binding_releases_its_subscription() {
        let store = DirectionStore::new();
        let binding = attached(&store, None);
        assert_eq!(store.observer_count(), 1);
        drop(binding);
        assert_eq!(store.observer_count(), 0);
        store.set_direction(Direction::Rtl);
    }

    #[test]
    fn end_to_end_attach_track_detach() {
        let store = DirectionStore::new();
        let mut binding = DirectionBinding::new(store.clone(), Element::default(), None);
        binding.on_attach();
        assert_eq!(binding.applied(), Some(Direction::Ltr));

        store.set_direction(Direction::Rtl);
        assert_eq!(binding.applied(), Some(Direction::Rtl));

        binding.on_detach();
        store.set_direction(Direction::Ltr);
        assert_eq!(binding.applied(), Some(Direction::Rtl));
        binding.with_element(|e| assert_eq!(e.writes, [Direction::Ltr, Direction::Rtl]));
    }

    #[test]
    fn language_changes_reach_tracking_bindings() {
        let store = DirectionStore::new();
        let tracking = attached(&store, None);
        let pinned = attached(&store, Some("ltr"));

        store.set_language(Some("ar-EG"));
        assert_eq!(dir(&tracking), Some(Direction::Rtl));
        assert_eq!(dir(&pinned), Some(Direction::Ltr));

        store.set_language(Some("en-US"));
        assert_eq!(dir(&tracking), Some(Direction::Ltr));
    }
}
