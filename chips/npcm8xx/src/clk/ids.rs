// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock identifiers of the NPCM845 clock binding.

use super::error::ClockError;

/// Clock identifiers, numbered as in the device-tree binding.
///
/// Not every identifier has a node in the clock table: the APB1/3/4 buses and
/// the SPI clocks exist in the binding but their output path is not modelled,
/// and rate requests for them fail with [ClockError::NotImplemented].
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum ClockId {
    RefClk = 0,
    Pll0 = 1,
    Pll1 = 2,
    Pll2 = 3,
    Pll2Div2 = 4,
    Ahb = 5,
    Apb1 = 6,
    Apb2 = 7,
    Apb3 = 8,
    Apb4 = 9,
    Apb5 = 10,
    Uart1 = 11,
    Uart2 = 12,
    Sdhc = 13,
    Spi0 = 14,
    Spi1 = 15,
    Spi3 = 16,
    Spix = 17,
}

/// Number of clock identifiers in the binding.
pub const CLK_COUNT: u32 = 18;

const ALL: [ClockId; CLK_COUNT as usize] = [
    ClockId::RefClk,
    ClockId::Pll0,
    ClockId::Pll1,
    ClockId::Pll2,
    ClockId::Pll2Div2,
    ClockId::Ahb,
    ClockId::Apb1,
    ClockId::Apb2,
    ClockId::Apb3,
    ClockId::Apb4,
    ClockId::Apb5,
    ClockId::Uart1,
    ClockId::Uart2,
    ClockId::Sdhc,
    ClockId::Spi0,
    ClockId::Spi1,
    ClockId::Spi3,
    ClockId::Spix,
];

impl TryFrom<u32> for ClockId {
    type Error = ClockError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        ALL.get(raw as usize)
            .copied()
            .ok_or(ClockError::UnknownClockId)
    }
}

impl From<ClockId> for u32 {
    fn from(id: ClockId) -> u32 {
        id as u32
    }
}
