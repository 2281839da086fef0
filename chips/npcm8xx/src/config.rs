// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Compile-time configuration options for the NPCM8xx chip crate.
//!
//! Options live in a typed `const` object rather than behind scattered
//! `#[cfg(feature = ...)]` attributes, so every code path is type-checked even
//! when it is disabled, and the compiler folds the disabled paths away.

/// Data structure holding compile-time configuration options.
pub(crate) struct Config {
    /// Whether the clock driver should trace every rate it resolves or
    /// programs to the `log` output.
    ///
    /// If enabled, each input frequency, divider and resulting output
    /// frequency is logged at `trace` level, and each `set_rate` at `debug`
    /// level. This is useful when bringing up a board whose bootloader left
    /// the clock tree in an unexpected state.
    pub(crate) trace_rates: bool,
}

/// The unique instance of `Config`. This is the only place in the crate where
/// `#[cfg(x)]`-style configuration based on Cargo features is permitted.
pub(crate) const CONFIG: Config = Config {
    trace_rates: cfg!(feature = "trace_rates"),
};
