// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! NPCM8xx clock controller driver.
//!
//! [Clocks] is the entry point for clock consumers. It routes each request to
//! the [Resolver] or the [Programmer] depending on what the tree models for
//! the clock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use npcm8xx::clk::{ClockId, ClockTree, Clocks, FakeClkRegisters};
//! use npcm8xx::hil::ClockRate;
//!
//! let registers = FakeClkRegisters::new();
//! let clocks = Clocks::new(&registers, &ClockTree::NPCM845);
//! let sdhc = clocks.request(ClockId::Sdhc as u32)?;
//! clocks.set_rate(sdhc, 50_000_000)?;
//! ```

use log::debug;

use super::error::ClockError;
use super::ids::ClockId;
use super::programmer::Programmer;
use super::registers::ClkRegisterAccess;
use super::resolver::Resolver;
use super::tree::ClockTree;
use crate::config::CONFIG;
use crate::hil::ClockRate;

/// Clock controller driver over a register accessor and a clock tree.
pub struct Clocks<'a, R: ClkRegisterAccess> {
    registers: &'a R,
    tree: &'a ClockTree,
}

impl<'a, R: ClkRegisterAccess> Clocks<'a, R> {
    pub const fn new(registers: &'a R, tree: &'a ClockTree) -> Self {
        Self { registers, tree }
    }

    /// Driver for the NPCM845 clock tree.
    pub const fn npcm845(registers: &'a R) -> Self {
        Self::new(registers, &ClockTree::NPCM845)
    }

    fn resolver(&self) -> Resolver<'a, R> {
        Resolver::new(self.tree, self.registers)
    }

    /// Clock currently feeding `id`.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::NotImplemented]\): the tree has no node for `id`.
    /// + [Err]\([ClockError::InvalidTopology]\): `id` is the reference
    /// oscillator.
    /// + [Err]\([ClockError::UnknownSelectorEncoding]\): the mux of `id`
    /// holds an unknown encoding.
    pub fn get_parent(&self, id: ClockId) -> Result<ClockId, ClockError> {
        let node = self.tree.node(id).ok_or(ClockError::NotImplemented)?;
        self.resolver().parent(node)
    }
}

impl<R: ClkRegisterAccess> ClockRate for Clocks<'_, R> {
    fn request(&self, id: u32) -> Result<ClockId, ClockError> {
        ClockId::try_from(id)
    }

    fn get_rate(&self, id: ClockId) -> Result<u32, ClockError> {
        if self.tree.node(id).is_none() {
            return Err(ClockError::NotImplemented);
        }
        self.resolver().output_frequency(id)
    }

    fn set_rate(&self, id: ClockId, rate_hz: u32) -> Result<u32, ClockError> {
        let node = self.tree.node(id).ok_or(ClockError::NotImplemented)?;
        if !node.is_settable() {
            return Err(ClockError::NotSettable);
        }
        if CONFIG.trace_rates {
            debug!("set rate of clk {:?} to {}", id, rate_hz);
        }
        Programmer::new(self.tree, self.registers).set_output_frequency(id, rate_hz)
    }
}
