// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Peripheral implementations for the Nuvoton NPCM8xx BMC SoC family.
//!
//! Only the clock controller is implemented: rate queries for the PLLs, the
//! AHB/APB bus clocks and the UART/SDHC peripheral clocks, and rate
//! programming for the clocks that have a selectable source and a divider.
//!
//! ```rust,ignore
//! use npcm8xx::clk::{ClockId, ClockTree, Clocks, MmioClkRegisters};
//! use npcm8xx::hil::ClockRate;
//!
//! let registers = unsafe { MmioClkRegisters::new(0xF080_1000)? };
//! let clocks = Clocks::new(&registers, &ClockTree::NPCM845);
//! let uart = clocks.request(ClockId::Uart1 as u32)?;
//! let achieved = clocks.set_rate(uart, 24_000_000)?;
//! ```

#![no_std]

pub mod clk;
pub mod hil;
pub mod static_ref;

mod config;

// Host unit tests
#[cfg(test)]
#[macro_use]
extern crate std;
