// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Errors returned by the clock driver.

use core::fmt;

/// Errors returned by clock rate queries and clock rate programming.
///
/// No error is fatal: every query or set is independent, and a failure for
/// one clock leaves the register state of the other clocks untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum ClockError {
    /// The clock identifier is outside of the known range
    UnknownClockId = 0,
    /// A mux select field holds an encoding with no entry in the selector
    /// map, i.e. the hardware state does not match the modelled tree
    UnknownSelectorEncoding = 1,
    /// The clock has no programmable source and divider
    NotSettable = 2,
    /// The clock identifier is known but has no modelled behaviour
    NotImplemented = 3,
    /// The PLL control register holds a zero input or output divider
    DivisionByZero = 4,
    /// A rate of 0Hz was requested
    InvalidRate = 5,
    /// The computed rate does not fit in 32 bits
    RateOverflow = 6,
    /// The clock table is inconsistent (dangling parent, cycle, ...)
    InvalidTopology = 7,
    /// The register block is not mapped
    NoDevice = 8,
}

// errno values used by U-Boot style clock frameworks.
const EINVAL: i32 = 22;
const ENOENT: i32 = 2;
const ENOSYS: i32 = 38;
const EDOM: i32 = 33;
const ERANGE: i32 = 34;

impl ClockError {
    /// The negative errno a C clock framework would report for this error.
    pub fn errno(self) -> i32 {
        match self {
            ClockError::UnknownClockId
            | ClockError::UnknownSelectorEncoding
            | ClockError::InvalidRate
            | ClockError::InvalidTopology => -EINVAL,
            ClockError::NotSettable | ClockError::NotImplemented => -ENOSYS,
            ClockError::DivisionByZero => -EDOM,
            ClockError::RateOverflow => -ERANGE,
            ClockError::NoDevice => -ENOENT,
        }
    }
}

impl From<ClockError> for usize {
    fn from(err: ClockError) -> usize {
        err as usize
    }
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ClockError::UnknownClockId => "unknown clock id",
            ClockError::UnknownSelectorEncoding => "unknown mux selector encoding",
            ClockError::NotSettable => "clock rate is not settable",
            ClockError::NotImplemented => "clock has no modelled output",
            ClockError::DivisionByZero => "zero divider in PLL configuration",
            ClockError::InvalidRate => "invalid target rate",
            ClockError::RateOverflow => "clock rate overflows 32 bits",
            ClockError::InvalidTopology => "inconsistent clock table",
            ClockError::NoDevice => "clock controller not mapped",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::ClockError;
    use std::string::ToString;

    #[test]
    fn errno_mapping() {
        assert_eq!(ClockError::UnknownClockId.errno(), -22);
        assert_eq!(ClockError::NotImplemented.errno(), -38);
        assert_eq!(ClockError::NotSettable.errno(), -38);
        assert_eq!(ClockError::DivisionByZero.errno(), -33);
        assert_eq!(ClockError::NoDevice.errno(), -2);
    }

    #[test]
    fn display_and_code() {
        assert_eq!(
            ClockError::UnknownSelectorEncoding.to_string(),
            "unknown mux selector encoding"
        );
        assert_eq!(usize::from(ClockError::DivisionByZero), 4);
    }
}
