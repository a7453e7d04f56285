// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_direction --heading-base-level=0

//! Understory Direction: shared text direction for UI content.
//!
//! This crate answers one question for every element of a UI: should its text
//! run left-to-right or right-to-left? It is split into two layers:
//!
//! - A [`DirectionStore`] owns the ambient [`Direction`]. Hosts set it directly
//!   or derive it from a language code ([`DirectionStore::set_language`]), and
//!   observe it through [`DirectionStream`]s with replay-latest semantics.
//!   When a root [`AttributeSink`] is installed (for example the document
//!   element), every change is mirrored onto it as a `dir` attribute.
//! - A [`DirectionBinding`] is attached per element. It applies an explicit
//!   override when one is given and valid, and otherwise tracks the store. It
//!   holds a subscription only while tracking.
//!
//! The crate has no UI framework dependency. Framework adapters forward their
//! attach, input-change and detach signals to the binding, and provide
//! [`AttributeSink`] implementations for their elements.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_direction::{Direction, DirectionBinding, DirectionStore};
//!
//! let root = Rc::new(RefCell::new(String::from("ltr")));
//! let store = DirectionStore::new().with_root_sink({
//!     let root = root.clone();
//!     move |_: &str, value: &str| *root.borrow_mut() = value.to_owned()
//! });
//!
//! let mut label = DirectionBinding::new(store.clone(), |_: &str, _: &str| {}, None);
//! label.on_attach();
//!
//! store.set_language(Some("ar-SA"));
//! assert_eq!(label.applied(), Some(Direction::Rtl));
//! assert_eq!(*root.borrow(), "rtl");
//! ```
//!
//! ## Language lookup
//!
//! Only the primary subtag of a language code is consulted, without regard to
//! case. By default `ar`, `he`, `fa`, `dv`, `ku`, `ur` and `ps` are
//! right-to-left; a different set can be configured through [`StoreOptions`].
//! Unknown, empty or absent codes resolve to [`Direction::Ltr`].
//!
//! ## Threading
//!
//! Everything here is single-threaded. Observers run synchronously inside
//! [`DirectionStore::set_direction`], in subscription order.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support in dependencies.
//! - `serde`: `Deserialize` for [`StoreOptions`] and [`RtlLanguages`], and
//!   serde support for [`Direction`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod binding;
mod direction;
mod language;
mod options;
mod sink;
mod store;

pub use binding::{BindingMode, DirectionBinding};
pub use direction::{Direction, ParseDirectionError, normalize_override};
pub use language::{DEFAULT_RTL_LANGUAGES, RtlLanguages, primary_subtag};
pub use options::StoreOptions;
pub use sink::{AttributeSink, DIR_ATTRIBUTE};
pub use store::{DirectionStore, DirectionStream, Subscription};
