// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Rate programming for clocks with a selectable source and a divider.
//!
//! Programming a clock first routes its mux to the node's programmed parent,
//! then picks the smallest divider whose output does not exceed the requested
//! rate, clamped to what the divider field can hold, and writes it. The rate
//! returned is the one the hardware ends up producing, which is what a later
//! rate query reads back.
//!
//! Power-of-two dividers round the divider down to a power of two, so their
//! output may be above the requested rate.

use log::{debug, warn};

use super::error::ClockError;
use super::field::FieldMask;
use super::ids::ClockId;
use super::registers::{ClkRegister, ClkRegisterAccess};
use super::resolver::Resolver;
use super::tree::{ClockSource, ClockTree, NodeKind};
use crate::config::CONFIG;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum DividerKind {
    Linear,
    PowerOfTwo,
}

/// Writes mux selections and divider fields of a clock tree.
pub struct Programmer<'a, R: ClkRegisterAccess> {
    tree: &'a ClockTree,
    registers: &'a R,
}

impl<'a, R: ClkRegisterAccess> Programmer<'a, R> {
    pub fn new(tree: &'a ClockTree, registers: &'a R) -> Self {
        Self { tree, registers }
    }

    /// Program clock `id` as close as possible to, and if possible no faster
    /// than, `target_hz`.
    ///
    /// Returns the output frequency of the clock after programming.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::UnknownClockId]\): the tree has no node for `id`.
    /// + [Err]\([ClockError::NotSettable]\): the node has no divider or no
    /// programmed parent.
    /// + [Err]\([ClockError::InvalidRate]\): `target_hz` is zero.
    /// + [Err]\([ClockError::InvalidTopology]\): the selector map has no
    /// encoding for the programmed parent.
    /// + Any error of [Resolver::input_frequency] for the new parent. The mux
    /// has already been switched when this happens; the divider is untouched.
    pub fn set_output_frequency(&self, id: ClockId, target_hz: u32) -> Result<u32, ClockError> {
        let node = self.tree.node(id).ok_or(ClockError::UnknownClockId)?;

        let (source, divider, pre_halve, kind) = match node.kind {
            NodeKind::LinearDivider {
                source,
                divider,
                pre_halve,
            } => (source, divider, pre_halve, DividerKind::Linear),
            NodeKind::PowerOfTwoDivider {
                source,
                divider,
                pre_halve,
            } => (source, divider, pre_halve, DividerKind::PowerOfTwo),
            _ => return Err(ClockError::NotSettable),
        };
        let (selector, program) = match source {
            ClockSource::Muxed(selector) => match selector.program {
                Some(program) => (selector, program),
                None => return Err(ClockError::NotSettable),
            },
            ClockSource::Fixed(_) => return Err(ClockError::NotSettable),
        };
        if target_hz == 0 {
            warn!("clk {:?}: refusing to program a rate of 0Hz", id);
            return Err(ClockError::InvalidRate);
        }
        let encoding = self
            .tree
            .selectors
            .encoding_for(selector.domain, program)
            .ok_or(ClockError::InvalidTopology)?;

        // The mux is written even when it already selects the parent.
        self.registers
            .modify(ClkRegister::Clksel, selector.field, encoding);

        let fin = Resolver::new(self.tree, self.registers).input_frequency(node)?;
        let fin = if pre_halve { fin / 2 } else { fin };

        let div = fin.div_ceil(target_hz).max(1);
        let (field, rate) = match kind {
            DividerKind::Linear => linear_divider(fin, div, divider.mask),
            DividerKind::PowerOfTwo => power_of_two_divider(fin, div, divider.mask),
        };
        self.registers.modify(divider.register, divider.mask, field);

        if CONFIG.trace_rates {
            debug!(
                "clk {:?}: parent {:?}, fin {}, target {}, field {} -> {}",
                id, program, fin, target_hz, field, rate
            );
        }
        Ok(rate)
    }
}

/// Field value and resulting rate for a `field + 1` divider.
fn linear_divider(fin: u32, div: u32, mask: FieldMask) -> (u32, u32) {
    let field = (div - 1).min(mask.max_value());
    let rate = (u64::from(fin) / (u64::from(field) + 1)) as u32;
    (field, rate)
}

/// Field value and resulting rate for a `2^field` divider.
fn power_of_two_divider(fin: u32, div: u32, mask: FieldMask) -> (u32, u32) {
    let field = div.ilog2().min(mask.max_value());
    (field, fin.checked_shr(field).unwrap_or(0))
}
