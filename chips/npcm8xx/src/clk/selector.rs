// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Mapping between mux-select encodings and the clocks they select.
//!
//! The CPU mux (CPUCKSEL) uses its own encoding; every other mux in CLKSEL
//! shares a second one. Each clock node names the domain of its selector
//! explicitly.

use super::error::ClockError;
use super::ids::ClockId;
use super::registers::CLKSEL;

/// Encoding domain of a mux-select field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SelectorDomain {
    /// CPUCKSEL
    Cpu,
    /// SDCKSEL, UARTCKSEL and the other peripheral muxes
    Shared,
}

/// One mux input: the value written to the select field and the clock it
/// routes through.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SelectorEntry {
    pub encoding: u32,
    pub clock: ClockId,
}

/// Selector tables for both domains.
#[derive(Copy, Clone, Debug)]
pub struct SelectorMaps {
    pub cpu: &'static [SelectorEntry],
    pub shared: &'static [SelectorEntry],
}

const fn entry(encoding: u32, clock: ClockId) -> SelectorEntry {
    SelectorEntry { encoding, clock }
}

impl SelectorMaps {
    /// NPCM845 mux encodings.
    ///
    /// The reference clock encoding is absent from both domains: a mux left
    /// on the reference clock is not a configuration this table models, and
    /// decodes to [ClockError::UnknownSelectorEncoding].
    pub const NPCM845: SelectorMaps = SelectorMaps {
        cpu: &[
            entry(CLKSEL::CPUCKSEL::Value::Pll0 as u32, ClockId::Pll0),
            entry(CLKSEL::CPUCKSEL::Value::Pll1 as u32, ClockId::Pll1),
            entry(CLKSEL::CPUCKSEL::Value::Pll2 as u32, ClockId::Pll2),
        ],
        shared: &[
            entry(CLKSEL::UARTCKSEL::Value::Pll0 as u32, ClockId::Pll0),
            entry(CLKSEL::UARTCKSEL::Value::Pll1 as u32, ClockId::Pll1),
            entry(CLKSEL::UARTCKSEL::Value::Pll2Div2 as u32, ClockId::Pll2Div2),
        ],
    };

    /// Entries of `domain`.
    pub fn entries(&self, domain: SelectorDomain) -> &'static [SelectorEntry] {
        match domain {
            SelectorDomain::Cpu => self.cpu,
            SelectorDomain::Shared => self.shared,
        }
    }

    /// Clock selected by `encoding` in `domain`.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::UnknownSelectorEncoding]\): no entry of `domain`
    /// has this encoding.
    pub fn clock_for(&self, domain: SelectorDomain, encoding: u32) -> Result<ClockId, ClockError> {
        self.entries(domain)
            .iter()
            .find(|entry| entry.encoding == encoding)
            .map(|entry| entry.clock)
            .ok_or(ClockError::UnknownSelectorEncoding)
    }

    /// Encoding that routes `clock` through a mux of `domain`, if any.
    pub fn encoding_for(&self, domain: SelectorDomain, clock: ClockId) -> Option<u32> {
        self.entries(domain)
            .iter()
            .find(|entry| entry.clock == clock)
            .map(|entry| entry.encoding)
    }
}
