// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock rate computation from the current register state.
//!
//! Rates are resolved by walking from a node up to the reference oscillator:
//! the input frequency of a node is the output frequency of its fixed parent,
//! or of whichever clock its mux currently selects, and the output frequency
//! applies the node's transfer function to that input. Nothing is cached, so
//! a rate always reflects what the hardware is programmed to right now.

use log::{trace, warn};
use tock_registers::LocalRegisterCopy;

use super::error::ClockError;
use super::ids::ClockId;
use super::registers::{ClkRegister, ClkRegisterAccess, PLLCON};
use super::tree::{ClockNode, ClockSource, ClockTree, NodeKind};
use crate::config::CONFIG;

/// Read-only view of a clock tree over its registers.
pub struct Resolver<'a, R: ClkRegisterAccess> {
    tree: &'a ClockTree,
    registers: &'a R,
}

impl<'a, R: ClkRegisterAccess> Resolver<'a, R> {
    pub fn new(tree: &'a ClockTree, registers: &'a R) -> Self {
        Self { tree, registers }
    }

    /// Clock currently feeding `node`.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::UnknownSelectorEncoding]\): the mux field holds
    /// an encoding the selector map does not know.
    /// + [Err]\([ClockError::InvalidTopology]\): `node` is the reference
    /// oscillator, which has no parent.
    pub fn parent(&self, node: &ClockNode) -> Result<ClockId, ClockError> {
        match node.source() {
            None => Err(ClockError::InvalidTopology),
            Some(ClockSource::Fixed(parent)) => Ok(parent),
            Some(ClockSource::Muxed(selector)) => {
                let encoding = selector
                    .field
                    .extract(self.registers.read(ClkRegister::Clksel));
                self.tree
                    .selectors
                    .clock_for(selector.domain, encoding)
                    .inspect_err(|_| {
                        warn!(
                            "clk {:?}: mux encoding {} not in {:?} selector map",
                            node.id, encoding, selector.domain
                        )
                    })
            }
        }
    }

    /// Frequency entering `node`, in Hz.
    pub fn input_frequency(&self, node: &ClockNode) -> Result<u32, ClockError> {
        self.input_frequency_at(node, 0)
    }

    /// Frequency leaving clock `id`, in Hz.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::UnknownClockId]\): `id`, or one of its
    /// ancestors, has no node in the tree.
    /// + [Err]\([ClockError::UnknownSelectorEncoding]\): a mux on the path
    /// holds an unknown encoding.
    /// + [Err]\([ClockError::DivisionByZero]\): a PLL on the path has a zero
    /// input or output divider.
    /// + [Err]\([ClockError::RateOverflow]\): a PLL on the path runs faster
    /// than 2^32 Hz.
    pub fn output_frequency(&self, id: ClockId) -> Result<u32, ClockError> {
        self.output_frequency_at(id, 0)
    }

    fn input_frequency_at(&self, node: &ClockNode, depth: usize) -> Result<u32, ClockError> {
        let parent = self.parent(node)?;
        let rate = self.output_frequency_at(parent, depth + 1)?;
        if CONFIG.trace_rates {
            trace!("fin of clk {:?} = {}", node.id, rate);
        }
        Ok(rate)
    }

    fn output_frequency_at(&self, id: ClockId, depth: usize) -> Result<u32, ClockError> {
        // A well-formed tree never nests deeper than it has nodes.
        if depth > self.tree.nodes.len() {
            return Err(ClockError::InvalidTopology);
        }
        let node = self.tree.node(id).ok_or(ClockError::UnknownClockId)?;

        match node.kind {
            NodeKind::FixedReference { frequency_hz } => Ok(frequency_hz),
            NodeKind::PllChain {
                register,
                post_halve,
                ..
            } => {
                let fin = self.input_frequency_at(node, depth)?;
                self.pll_rate(node, fin, register, post_halve)
            }
            NodeKind::SelectablePassthrough { .. } => self.input_frequency_at(node, depth),
            NodeKind::LinearDivider {
                divider, pre_halve, ..
            } => {
                let fin = halved(self.input_frequency_at(node, depth)?, pre_halve);
                let div = u64::from(divider.mask.extract(self.registers.read(divider.register))) + 1;
                let rate = (u64::from(fin) / div) as u32;
                if CONFIG.trace_rates {
                    trace!("fout of clk {:?} = ({} / {})", id, fin, div);
                }
                Ok(rate)
            }
            NodeKind::PowerOfTwoDivider {
                divider, pre_halve, ..
            } => {
                let fin = halved(self.input_frequency_at(node, depth)?, pre_halve);
                let field = divider.mask.extract(self.registers.read(divider.register));
                let rate = fin.checked_shr(field).unwrap_or(0);
                if CONFIG.trace_rates {
                    trace!("fout of clk {:?} = ({} / 2^{})", id, fin, field);
                }
                Ok(rate)
            }
        }
    }

    fn pll_rate(
        &self,
        node: &ClockNode,
        fin: u32,
        register: ClkRegister,
        post_halve: bool,
    ) -> Result<u32, ClockError> {
        let pllcon: LocalRegisterCopy<u32, PLLCON::Register> =
            LocalRegisterCopy::new(self.registers.read(register));
        let indv = pllcon.read(PLLCON::INDV);
        let fbdv = pllcon.read(PLLCON::FBDV);
        let otdv1 = pllcon.read(PLLCON::OTDV1);
        let otdv2 = pllcon.read(PLLCON::OTDV2);

        let divisor = u64::from(indv * otdv1 * otdv2);
        if divisor == 0 {
            warn!(
                "clk {:?}: PLL dividers INDV={} OTDV1={} OTDV2={} include zero",
                node.id, indv, otdv1, otdv2
            );
            return Err(ClockError::DivisionByZero);
        }

        let mut rate = u64::from(fin) * u64::from(fbdv) / divisor;
        if post_halve {
            rate /= 2;
        }
        if CONFIG.trace_rates {
            trace!("fout of pll {:?} = {}", node.id, rate);
        }
        u32::try_from(rate).map_err(|_| ClockError::RateOverflow)
    }
}

// Halving the input before an integer divide by `div` gives the same result as
// dividing by `2 * div`.
fn halved(rate: u32, halve: bool) -> u32 {
    if halve {
        rate / 2
    } else {
        rate
    }
}
