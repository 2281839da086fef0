// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Interfaces the chip exposes to clock consumers.

use crate::clk::{ClockError, ClockId};

/// Rate control of the clocks of a clock controller.
///
/// Consumers identify clocks by the raw numbers of the device binding, and
/// must [request](ClockRate::request) a clock before querying or setting its
/// rate.
pub trait ClockRate {
    /// Validate a raw clock number from a device binding.
    ///
    /// Returns [ClockError::UnknownClockId] when `id` does not name a clock
    /// of this controller.
    fn request(&self, id: u32) -> Result<ClockId, ClockError>;

    /// Current rate of `id` in Hz.
    fn get_rate(&self, id: ClockId) -> Result<u32, ClockError>;

    /// Program `id` to run at `rate_hz`, or the closest rate the hardware
    /// can produce. Returns the rate actually set.
    fn set_rate(&self, id: ClockId, rate_hz: u32) -> Result<u32, ClockError>;
}
