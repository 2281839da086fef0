// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Bit-field extraction and insertion on 32-bit register words.
//!
//! The clock table locates divider and mux-select fields by a contiguous bit
//! mask, the way the hardware manual does (`GENMASK(20, 16)`). The shift of a
//! field is the index of the lowest set bit of its mask. The actual bit
//! manipulation is delegated to `tock_registers` fields, so a mask built from a
//! `register_bitfields!` field and one built with [FieldMask::genmask] behave
//! identically.
//!
//! A zero mask describes no field at all. The codec does not guard against it;
//! the clock table never contains one and [crate::clk::ClockTree::validate]
//! rejects custom tables that do.

use tock_registers::fields::Field;
use tock_registers::RegisterLongName;

/// Contiguous bit mask locating a field inside a 32-bit register.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FieldMask(u32);

impl FieldMask {
    /// Mask from its raw value, already shifted into place.
    pub const fn new(mask: u32) -> Self {
        FieldMask(mask)
    }

    /// Mask covering bits `high` down to `low`, both inclusive.
    pub const fn genmask(high: u32, low: u32) -> Self {
        let width = high - low + 1;
        let bits = if width >= 32 {
            u32::MAX
        } else {
            (1 << width) - 1
        };
        FieldMask(bits << low)
    }

    /// Mask of a field declared with `register_bitfields!`.
    pub const fn of<R: RegisterLongName>(field: &Field<u32, R>) -> Self {
        FieldMask(field.mask << field.shift)
    }

    /// Raw mask value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Position of the lowest bit of the field.
    pub const fn shift(self) -> u32 {
        self.0.trailing_zeros()
    }

    /// Largest value the field can hold.
    pub const fn max_value(self) -> u32 {
        match self.0.checked_shr(self.shift()) {
            Some(value) => value,
            None => 0,
        }
    }

    pub(crate) const fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn field(self) -> Field<u32, ()> {
        Field::new(self.max_value(), self.shift() as usize)
    }

    /// Value of the field in `word`, shifted down to bit 0.
    pub fn extract(self, word: u32) -> u32 {
        self.field().read(word)
    }

    /// `word` with the field cleared and replaced by `value`. Bits of `value`
    /// that do not fit the field are dropped.
    pub fn insert(self, word: u32, value: u32) -> u32 {
        self.field().val(value).modify(word)
    }
}

#[cfg(test)]
mod tests {
    use super::FieldMask;
    use crate::clk::registers::{CLKDIV1, CLKSEL};

    #[test]
    fn genmask_matches_hardware_manual() {
        assert_eq!(0x0000_0007, FieldMask::genmask(2, 0).bits());
        assert_eq!(0x0c00_0000, FieldMask::genmask(27, 26).bits());
        assert_eq!(0x001f_0000, FieldMask::genmask(20, 16).bits());
        assert_eq!(0x0fff_0000, FieldMask::genmask(27, 16).bits());
        assert_eq!(u32::MAX, FieldMask::genmask(31, 0).bits());
    }

    #[test]
    fn bitfield_masks() {
        assert_eq!(FieldMask::genmask(9, 8), FieldMask::of(&CLKSEL::UARTCKSEL));
        assert_eq!(FieldMask::genmask(15, 11), FieldMask::of(&CLKDIV1::MMCCKDIV));
    }

    #[test]
    fn shift_and_width() {
        let mask = FieldMask::genmask(15, 11);
        assert_eq!(11, mask.shift());
        assert_eq!(0x1f, mask.max_value());
        assert!(!mask.is_empty());
        assert!(FieldMask::new(0).is_empty());
        assert_eq!(0, FieldMask::new(0).max_value());
    }

    #[test]
    fn extract() {
        let mask = FieldMask::genmask(20, 16);
        assert_eq!(0x15, mask.extract(0x0015_0000));
        assert_eq!(0x15, mask.extract(0xffd5_ffff));
        assert_eq!(0, mask.extract(0xffe0_ffff));
        assert_eq!(3, FieldMask::genmask(1, 0).extract(0xffff_ffff));
    }

    #[test]
    fn insert_preserves_other_bits() {
        let mask = FieldMask::genmask(9, 8);
        assert_eq!(0xffff_fdff, mask.insert(0xffff_ffff, 1));
        assert_eq!(0x0000_0300, mask.insert(0, 3));
        assert_eq!(0x1234_5078, FieldMask::genmask(11, 8).insert(0x1234_5678, 0));
    }

    #[test]
    fn insert_drops_oversized_values() {
        let mask = FieldMask::genmask(9, 8);
        assert_eq!(0x0000_0100, mask.insert(0, 0x5));
    }

    #[test]
    fn insert_then_extract() {
        let mask = FieldMask::genmask(27, 16);
        let word = mask.insert(0xa5a5_a5a5, 0x40);
        assert_eq!(0x40, mask.extract(word));
        assert_eq!(0xa5a5_a5a5 & !mask.bits(), word & !mask.bits());
    }
}
