// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared direction state and its observable streams.
//!
//! A [`DirectionStore`] is a cheap, cloneable handle; every clone refers to the
//! same state. Observers registered through [`DirectionStream::subscribe`]
//! receive the current value immediately, then every change, synchronously and
//! in subscription order.
//!
//! ## Re-entrancy
//!
//! Observers may call back into the store while being notified:
//!
//! - Dropping a [`Subscription`] mid-pass stops delivery to that observer at once.
//! - A nested [`DirectionStore::set_direction`] supersedes the running pass, so
//!   observers that were not reached yet only see the newer value.
//! - An observer is never entered twice; a nested delivery to an observer that
//!   is still running is skipped and reported with a `tracing` warning.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use core::cell::{Cell, RefCell};
use core::fmt;

use smallvec::SmallVec;

use crate::{AttributeSink, DIR_ATTRIBUTE, Direction, RtlLanguages, StoreOptions};

type Callback = Rc<RefCell<dyn FnMut(Direction)>>;

struct Observer {
    id: u64,
    callback: Callback,
}

struct Shared {
    current: Cell<Direction>,
    /// Bumped on every change; a notification pass stops once it is stale.
    generation: Cell<u64>,
    next_id: Cell<u64>,
    observers: RefCell<SmallVec<[Observer; 4]>>,
    root: RefCell<Option<Box<dyn AttributeSink>>>,
    languages: RtlLanguages,
}

impl Shared {
    fn is_registered(&self, id: u64) -> bool {
        self.observers.borrow().iter().any(|o| o.id == id)
    }

    fn release(&self, id: u64) {
        let removed = {
            let mut observers = self.observers.borrow_mut();
            let idx = observers.iter().position(|o| o.id == id);
            idx.map(|idx| observers.remove(idx))
        };
        // The callback may own further subscriptions; drop it outside the borrow.
        if removed.is_some() {
            tracing::trace!(observer = id, "direction observer released");
        }
        drop(removed);
    }
}

fn deliver(id: u64, callback: &Callback, dir: Direction) {
    match callback.try_borrow_mut() {
        Ok(mut f) => (&mut *f)(dir),
        Err(_) => tracing::warn!(
            observer = id,
            direction = %dir,
            "skipping re-entrant direction delivery"
        ),
    }
}

/// Shared, observable text direction.
///
/// Construct one per application and hand clones to whatever needs it; there
/// is no global instance.
///
/// ```rust
/// use understory_direction::{Direction, DirectionStore};
///
/// let store = DirectionStore::new();
/// assert_eq!(store.current(), Direction::Ltr);
///
/// store.set_language(Some("he-IL"));
/// assert_eq!(store.current(), Direction::Rtl);
///
/// store.set_language(None);
/// assert_eq!(store.current(), Direction::Ltr);
/// ```
#[derive(Clone)]
pub struct DirectionStore {
    shared: Rc<Shared>,
}

impl DirectionStore {
    /// Create a store holding [`Direction::Ltr`] with the default RTL languages.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    /// Create a store from explicit options.
    pub fn with_options(options: StoreOptions) -> Self {
        let StoreOptions {
            initial,
            rtl_languages,
        } = options;
        Self {
            shared: Rc::new(Shared {
                current: Cell::new(initial),
                generation: Cell::new(0),
                next_id: Cell::new(0),
                observers: RefCell::new(SmallVec::new()),
                root: RefCell::new(None),
                languages: rtl_languages,
            }),
        }
    }

    /// Install a root sink (for example the document element) and return the store.
    ///
    /// The sink only receives subsequent changes; it is not primed with the
    /// current value.
    #[must_use]
    pub fn with_root_sink(self, sink: impl AttributeSink + 'static) -> Self {
        self.set_root_sink(Some(Box::new(sink)));
        self
    }

    /// Replace or remove the root sink. Without one, root updates are skipped.
    pub fn set_root_sink(&self, sink: Option<Box<dyn AttributeSink>>) {
        match self.shared.root.try_borrow_mut() {
            Ok(mut root) => *root = sink,
            Err(_) => tracing::warn!("cannot replace the root sink while it is being written"),
        }
    }

    /// Returns `true` if a root sink is installed.
    pub fn has_root_sink(&self) -> bool {
        self.shared.root.try_borrow().map_or(true, |root| root.is_some())
    }

    /// The current direction.
    pub fn current(&self) -> Direction {
        self.shared.current.get()
    }

    /// The languages this store treats as right-to-left.
    pub fn rtl_languages(&self) -> &RtlLanguages {
        &self.shared.languages
    }

    /// Resolve a language code against this store's RTL set without changing state.
    pub fn resolve_language(&self, code: Option<&str>) -> Direction {
        self.shared.languages.resolve(code)
    }

    /// Derive the direction from a language code and apply it.
    ///
    /// Absent, empty, or unknown codes yield [`Direction::Ltr`]. Only the
    /// primary subtag is considered, without regard to case.
    pub fn set_language(&self, code: Option<&str>) {
        let dir = self.resolve_language(code);
        tracing::trace!(language = code.unwrap_or_default(), direction = %dir, "language set");
        self.set_direction(dir);
    }

    /// Apply a direction.
    ///
    /// Setting the current value again does nothing. Otherwise every observer
    /// is notified before this returns, and the root sink, if any, receives
    /// the new `dir` attribute.
    pub fn set_direction(&self, dir: Direction) {
        let shared = &self.shared;
        if shared.current.get() == dir {
            return;
        }
        shared.current.set(dir);
        let generation = shared.generation.get().wrapping_add(1);
        shared.generation.set(generation);
        tracing::debug!(direction = %dir, "text direction changed");

        self.notify(dir, generation);

        // A nested change already wrote a newer value.
        if shared.generation.get() == generation {
            self.write_root(dir);
        }
    }

    /// Stream of the current direction with replay-latest semantics.
    pub fn direction(&self) -> DirectionStream {
        DirectionStream {
            store: self.clone(),
            project: core::convert::identity,
        }
    }

    /// Stream of the opposite of the current direction.
    ///
    /// ```rust
    /// use understory_direction::{Direction, DirectionStore};
    ///
    /// let store = DirectionStore::new();
    /// let opposite = store.opposite_direction();
    /// assert_eq!(opposite.get(), Direction::Rtl);
    /// store.set_direction(Direction::Rtl);
    /// assert_eq!(opposite.get(), Direction::Ltr);
    /// ```
    pub fn opposite_direction(&self) -> DirectionStream {
        DirectionStream {
            store: self.clone(),
            project: Direction::opposite,
        }
    }

    /// Number of live subscriptions on this store.
    pub fn observer_count(&self) -> usize {
        self.shared.observers.borrow().len()
    }

    fn subscribe_with(
        &self,
        project: fn(Direction) -> Direction,
        mut f: impl FnMut(Direction) + 'static,
    ) -> Subscription {
        let shared = &self.shared;
        let id = shared.next_id.get();
        shared.next_id.set(id + 1);

        let callback: Callback = Rc::new(RefCell::new(move |dir: Direction| f(project(dir))));
        shared.observers.borrow_mut().push(Observer {
            id,
            callback: callback.clone(),
        });
        tracing::trace!(observer = id, "direction observer registered");

        let replayed = self.current();
        deliver(id, &callback, replayed);
        // The replay itself may have changed the direction; catch up once.
        let latest = self.current();
        if latest != replayed && shared.is_registered(id) {
            deliver(id, &callback, latest);
        }

        Subscription {
            store: Rc::downgrade(shared),
            id,
        }
    }

    fn notify(&self, dir: Direction, generation: u64) {
        let shared = &self.shared;
        let snapshot: SmallVec<[(u64, Callback); 4]> = shared
            .observers
            .borrow()
            .iter()
            .map(|o| (o.id, o.callback.clone()))
            .collect();

        for (id, callback) in &snapshot {
            if shared.generation.get() != generation {
                tracing::trace!(direction = %dir, "notification superseded by a newer direction");
                break;
            }
            if shared.is_registered(*id) {
                deliver(*id, callback, dir);
            }
        }
    }

    fn write_root(&self, dir: Direction) {
        match self.shared.root.try_borrow_mut() {
            Ok(mut root) => {
                if let Some(sink) = root.as_mut() {
                    sink.set_attribute(DIR_ATTRIBUTE, dir.as_str());
                }
            }
            Err(_) => tracing::warn!(direction = %dir, "root sink is busy, skipping update"),
        }
    }
}

impl Default for DirectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DirectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionStore")
            .field("current", &self.current())
            .field("observers", &self.observer_count())
            .field("has_root_sink", &self.has_root_sink())
            .field("rtl_languages", &self.shared.languages)
            .finish()
    }
}

/// A live view of a [`DirectionStore`], possibly projected.
///
/// Obtained from [`DirectionStore::direction`] or
/// [`DirectionStore::opposite_direction`]. Streams are cheap to clone and
/// never complete.
#[derive(Clone, Debug)]
pub struct DirectionStream {
    store: DirectionStore,
    project: fn(Direction) -> Direction,
}

impl DirectionStream {
    /// The value a new subscriber would receive right now.
    pub fn get(&self) -> Direction {
        (self.project)(self.store.current())
    }

    /// Observe this stream.
    ///
    /// `f` runs immediately with the current value, then once per change,
    /// until the returned [`Subscription`] is released or dropped.
    ///
    /// ```rust
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use understory_direction::{Direction, DirectionStore};
    ///
    /// let store = DirectionStore::new();
    /// let seen = Rc::new(RefCell::new(Vec::new()));
    /// let sub = store.direction().subscribe({
    ///     let seen = seen.clone();
    ///     move |dir| seen.borrow_mut().push(dir)
    /// });
    ///
    /// store.set_direction(Direction::Rtl);
    /// store.set_direction(Direction::Rtl);
    /// sub.unsubscribe();
    /// store.set_direction(Direction::Ltr);
    ///
    /// assert_eq!(*seen.borrow(), [Direction::Ltr, Direction::Rtl]);
    /// ```
    pub fn subscribe(&self, f: impl FnMut(Direction) + 'static) -> Subscription {
        self.store.subscribe_with(self.project, f)
    }
}

/// Handle to a registered observer.
///
/// Dropping the handle releases the observer, as does [`Subscription::unsubscribe`].
/// Releasing after the store is gone is a no-op.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    store: Weak<Shared>,
    id: u64,
}

impl Subscription {
    /// Release the observer now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Returns `true` while the observer still receives values.
    pub fn is_active(&self) -> bool {
        self.store
            .upgrade()
            .is_some_and(|shared| shared.is_registered(self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(shared) = self.store.upgrade() {
            shared.release(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
