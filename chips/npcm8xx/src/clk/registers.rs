// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock controller register block and register access.
//!
//! The rate logic never touches memory directly. It goes through
//! [ClkRegisterAccess], which is implemented for the memory-mapped block by
//! [MmioClkRegisters] and for host tests and simulation by
//! [FakeClkRegisters].

use core::cell::Cell;
use core::mem::offset_of;

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use super::error::ClockError;
use super::field::FieldMask;
use crate::static_ref::StaticRef;

register_structs! {
    ClkRegisters {
        (0x00 => _reserved0),
        /// Clock source select
        (0x04 => clksel: ReadWrite<u32, CLKSEL::Register>),
        /// Clock divider control 1
        (0x08 => clkdiv1: ReadWrite<u32, CLKDIV1::Register>),
        /// PLL0 control
        (0x0C => pllcon0: ReadWrite<u32, PLLCON::Register>),
        /// PLL1 control
        (0x10 => pllcon1: ReadWrite<u32, PLLCON::Register>),
        (0x14 => _reserved1),
        /// Clock divider control 2
        (0x2C => clkdiv2: ReadWrite<u32, CLKDIV2::Register>),
        (0x30 => _reserved2),
        /// PLL2 control
        (0x54 => pllcon2: ReadWrite<u32, PLLCON::Register>),
        /// Clock divider control 3
        (0x58 => clkdiv3: ReadWrite<u32, CLKDIV3::Register>),
        (0x5C => @END),
    }
}

register_bitfields![u32,
    pub CLKSEL [
        /// CPU/AHB clock source
        CPUCKSEL OFFSET(0) NUMBITS(3) [
            Pll0 = 0,
            Pll1 = 1,
            RefClk = 2,
            Pll2 = 7
        ],
        /// SDHC clock source
        SDCKSEL OFFSET(6) NUMBITS(2) [
            Pll0 = 0,
            Pll1 = 1,
            RefClk = 2,
            Pll2Div2 = 3
        ],
        /// UART clock source
        UARTCKSEL OFFSET(8) NUMBITS(2) [
            Pll0 = 0,
            Pll1 = 1,
            RefClk = 2,
            Pll2Div2 = 3
        ]
    ],
    pub CLKDIV1 [
        /// AHB clock divider, applied after a fixed divide-by-2
        CLK4DIV OFFSET(26) NUMBITS(2) [],
        /// UART1 clock divider
        UARTDIV1 OFFSET(16) NUMBITS(5) [],
        /// SDHC clock divider
        MMCCKDIV OFFSET(11) NUMBITS(5) []
    ],
    pub CLKDIV2 [
        /// APB2 clock divider (power of two)
        APB2CKDIV OFFSET(26) NUMBITS(2) [],
        /// APB5 clock divider (power of two)
        APB5CKDIV OFFSET(22) NUMBITS(2) []
    ],
    pub CLKDIV3 [
        /// UART2 clock divider
        UARTDIV2 OFFSET(11) NUMBITS(5) []
    ],
    pub PLLCON [
        /// Feedback divider
        FBDV OFFSET(16) NUMBITS(12) [],
        /// Output divider 2
        OTDV2 OFFSET(13) NUMBITS(3) [],
        /// Output divider 1
        OTDV1 OFFSET(8) NUMBITS(3) [],
        /// Input divider
        INDV OFFSET(0) NUMBITS(6) []
    ]
];

/// Registers of the clock controller used by the rate logic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClkRegister {
    Clksel,
    Clkdiv1,
    Pllcon0,
    Pllcon1,
    Clkdiv2,
    Pllcon2,
    Clkdiv3,
}

const NUM_REGISTERS: usize = 7;

// The register block and `ClkRegister::offset` must agree.
const _: () = {
    assert!(offset_of!(ClkRegisters, clksel) == ClkRegister::Clksel.offset());
    assert!(offset_of!(ClkRegisters, clkdiv1) == ClkRegister::Clkdiv1.offset());
    assert!(offset_of!(ClkRegisters, pllcon0) == ClkRegister::Pllcon0.offset());
    assert!(offset_of!(ClkRegisters, pllcon1) == ClkRegister::Pllcon1.offset());
    assert!(offset_of!(ClkRegisters, clkdiv2) == ClkRegister::Clkdiv2.offset());
    assert!(offset_of!(ClkRegisters, pllcon2) == ClkRegister::Pllcon2.offset());
    assert!(offset_of!(ClkRegisters, clkdiv3) == ClkRegister::Clkdiv3.offset());
};

impl ClkRegister {
    /// Byte offset of the register from the controller base address.
    pub const fn offset(self) -> usize {
        match self {
            ClkRegister::Clksel => 0x04,
            ClkRegister::Clkdiv1 => 0x08,
            ClkRegister::Pllcon0 => 0x0C,
            ClkRegister::Pllcon1 => 0x10,
            ClkRegister::Clkdiv2 => 0x2C,
            ClkRegister::Pllcon2 => 0x54,
            ClkRegister::Clkdiv3 => 0x58,
        }
    }
}

/// Word-wide access to the clock controller registers.
///
/// Callers serialize accesses externally: two clocks whose divider fields
/// share a register must not be programmed concurrently.
pub trait ClkRegisterAccess {
    fn read(&self, register: ClkRegister) -> u32;

    fn write(&self, register: ClkRegister, value: u32);

    /// Read-modify-write of a single field.
    fn modify(&self, register: ClkRegister, mask: FieldMask, value: u32) {
        let word = self.read(register);
        self.write(register, mask.insert(word, value));
    }
}

/// Device-tree compatible string of the clock controller.
pub const COMPATIBLE: &str = "nuvoton,npcm845-clk";

/// Memory-mapped clock controller.
pub struct MmioClkRegisters {
    registers: StaticRef<ClkRegisters>,
}

impl MmioClkRegisters {
    /// Bind to the clock controller at `base`.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::NoDevice]\): `base` is null, i.e. the device
    /// description carries no register address.
    ///
    /// # Safety
    ///
    /// `base` must be the address of the clock controller register block,
    /// mapped for the whole lifetime of the program.
    pub unsafe fn new(base: usize) -> Result<Self, ClockError> {
        if base == 0 {
            return Err(ClockError::NoDevice);
        }
        Ok(Self {
            registers: StaticRef::new(base as *const ClkRegisters),
        })
    }
}

impl ClkRegisterAccess for MmioClkRegisters {
    fn read(&self, register: ClkRegister) -> u32 {
        let regs = &*self.registers;
        match register {
            ClkRegister::Clksel => regs.clksel.get(),
            ClkRegister::Clkdiv1 => regs.clkdiv1.get(),
            ClkRegister::Pllcon0 => regs.pllcon0.get(),
            ClkRegister::Pllcon1 => regs.pllcon1.get(),
            ClkRegister::Clkdiv2 => regs.clkdiv2.get(),
            ClkRegister::Pllcon2 => regs.pllcon2.get(),
            ClkRegister::Clkdiv3 => regs.clkdiv3.get(),
        }
    }

    fn write(&self, register: ClkRegister, value: u32) {
        let regs = &*self.registers;
        match register {
            ClkRegister::Clksel => regs.clksel.set(value),
            ClkRegister::Clkdiv1 => regs.clkdiv1.set(value),
            ClkRegister::Pllcon0 => regs.pllcon0.set(value),
            ClkRegister::Pllcon1 => regs.pllcon1.set(value),
            ClkRegister::Clkdiv2 => regs.clkdiv2.set(value),
            ClkRegister::Pllcon2 => regs.pllcon2.set(value),
            ClkRegister::Clkdiv3 => regs.clkdiv3.set(value),
        }
    }
}

/// In-memory register file standing in for the clock controller.
pub struct FakeClkRegisters {
    words: [Cell<u32>; NUM_REGISTERS],
}

impl FakeClkRegisters {
    /// All registers zeroed.
    pub const fn new() -> Self {
        Self {
            words: [
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
                Cell::new(0),
            ],
        }
    }

    pub fn get(&self, register: ClkRegister) -> u32 {
        self.words[register as usize].get()
    }

    pub fn set(&self, register: ClkRegister, value: u32) {
        self.words[register as usize].set(value);
    }
}

impl Default for FakeClkRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl ClkRegisterAccess for FakeClkRegisters {
    fn read(&self, register: ClkRegister) -> u32 {
        self.get(register)
    }

    fn write(&self, register: ClkRegister, value: u32) {
        self.set(register, value);
    }
}
