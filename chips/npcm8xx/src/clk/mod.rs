// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock controller (CLK) of the NPCM8xx.

pub mod registers;
pub mod selector;
pub mod tree;

mod clocks;
mod error;
mod field;
mod ids;
mod programmer;
mod resolver;

pub use self::clocks::Clocks;
pub use self::error::ClockError;
pub use self::field::FieldMask;
pub use self::ids::{ClockId, CLK_COUNT};
pub use self::programmer::Programmer;
pub use self::registers::{
    ClkRegister, ClkRegisterAccess, FakeClkRegisters, MmioClkRegisters, COMPATIBLE,
};
pub use self::resolver::Resolver;
pub use self::selector::{SelectorDomain, SelectorEntry, SelectorMaps};
pub use self::tree::{
    ClockNode, ClockSource, ClockTree, DividerField, NodeKind, Selector, REFCLK_FREQUENCY_HZ,
};
