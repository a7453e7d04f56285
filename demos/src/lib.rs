// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Understory crates.
//!
//! See the `examples/` directory of this package:
//! - `direction_bindings`: language switching with per-element direction bindings.
