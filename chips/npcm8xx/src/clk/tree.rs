// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock tree description.
//!
//! Every clock is one [ClockNode] whose [NodeKind] carries exactly the data
//! its transfer function needs:
//!
//! ```text
//!                        +-> PLL0 ---+---> CPU mux -> /2 -> /CLK4DIV = AHB -+-> /2^APB2CKDIV = APB2
//!                        +-> PLL1 ---+                                      +-> /2^APB5CKDIV = APB5
//! REFCLK (25MHz) --------+-> PLL2 ---+
//!                        +-> PLL2/2 -+---> UART mux -> /UARTDIV1 = UART1
//!                                    |            \--> /UARTDIV2 = UART2
//!                                    +---> SD mux   -> /MMCCKDIV = SDHC
//! ```
//!
//! The output frequency of a divider node is
//! `Fout = (Fin / pre-halve) / div`, where `div` is `field + 1` for linear
//! dividers and `2^field` for power-of-two dividers.

use super::error::ClockError;
use super::field::FieldMask;
use super::ids::ClockId;
use super::registers::{ClkRegister, CLKDIV1, CLKDIV2, CLKDIV3, CLKSEL};
use super::selector::{SelectorDomain, SelectorMaps};

/// Frequency of the reference oscillator.
pub const REFCLK_FREQUENCY_HZ: u32 = 25_000_000;

/// Location of a divider field.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DividerField {
    pub register: ClkRegister,
    pub mask: FieldMask,
}

/// Mux select field of a node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Selector {
    /// Encoding domain of the field
    pub domain: SelectorDomain,
    /// Mask of the field in CLKSEL
    pub field: FieldMask,
    /// Parent selected when the rate of the node is programmed. `None` for
    /// muxes that are only read.
    pub program: Option<ClockId>,
}

/// Where a node takes its input frequency from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClockSource {
    /// Hardwired parent
    Fixed(ClockId),
    /// Parent chosen by a mux select field
    Muxed(Selector),
}

/// Transfer function of a clock node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// Root oscillator of the tree.
    FixedReference { frequency_hz: u32 },
    /// PLL output: `Fin * FBDV / (INDV * OTDV1 * OTDV2)`, optionally halved.
    PllChain {
        parent: ClockId,
        register: ClkRegister,
        post_halve: bool,
    },
    /// Mux output without a divider.
    SelectablePassthrough { selector: Selector },
    /// `div = field + 1`
    LinearDivider {
        source: ClockSource,
        divider: DividerField,
        pre_halve: bool,
    },
    /// `div = 2^field`
    PowerOfTwoDivider {
        source: ClockSource,
        divider: DividerField,
        pre_halve: bool,
    },
}

/// One named clock of the tree.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClockNode {
    pub id: ClockId,
    pub kind: NodeKind,
}

impl ClockNode {
    /// Input source of the node. The reference oscillator has none.
    pub fn source(&self) -> Option<ClockSource> {
        match self.kind {
            NodeKind::FixedReference { .. } => None,
            NodeKind::PllChain { parent, .. } => Some(ClockSource::Fixed(parent)),
            NodeKind::SelectablePassthrough { selector } => Some(ClockSource::Muxed(selector)),
            NodeKind::LinearDivider { source, .. } | NodeKind::PowerOfTwoDivider { source, .. } => {
                Some(source)
            }
        }
    }

    /// Divider field, for divider nodes.
    pub fn divider(&self) -> Option<DividerField> {
        match self.kind {
            NodeKind::LinearDivider { divider, .. }
            | NodeKind::PowerOfTwoDivider { divider, .. } => Some(divider),
            _ => None,
        }
    }

    /// A node is settable when it has a divider and a mux with a programmed
    /// parent.
    pub fn is_settable(&self) -> bool {
        self.divider().is_some()
            && matches!(
                self.source(),
                Some(ClockSource::Muxed(Selector {
                    program: Some(_),
                    ..
                }))
            )
    }
}

/// A complete clock tree: node table plus mux encodings.
#[derive(Copy, Clone, Debug)]
pub struct ClockTree {
    pub nodes: &'static [ClockNode],
    pub selectors: SelectorMaps,
}

const fn fixed(parent: ClockId) -> ClockSource {
    ClockSource::Fixed(parent)
}

const fn muxed(domain: SelectorDomain, field: FieldMask, program: Option<ClockId>) -> ClockSource {
    ClockSource::Muxed(Selector {
        domain,
        field,
        program,
    })
}

const fn divider(register: ClkRegister, mask: FieldMask) -> DividerField {
    DividerField { register, mask }
}

const fn pll(id: ClockId, register: ClkRegister, post_halve: bool) -> ClockNode {
    ClockNode {
        id,
        kind: NodeKind::PllChain {
            parent: ClockId::RefClk,
            register,
            post_halve,
        },
    }
}

const NPCM845_CLOCKS: [ClockNode; 11] = [
    ClockNode {
        id: ClockId::RefClk,
        kind: NodeKind::FixedReference {
            frequency_hz: REFCLK_FREQUENCY_HZ,
        },
    },
    pll(ClockId::Pll0, ClkRegister::Pllcon0, false),
    pll(ClockId::Pll1, ClkRegister::Pllcon1, false),
    pll(ClockId::Pll2, ClkRegister::Pllcon2, false),
    pll(ClockId::Pll2Div2, ClkRegister::Pllcon2, true),
    ClockNode {
        id: ClockId::Ahb,
        kind: NodeKind::LinearDivider {
            source: muxed(
                SelectorDomain::Cpu,
                FieldMask::of(&CLKSEL::CPUCKSEL),
                None,
            ),
            divider: divider(ClkRegister::Clkdiv1, FieldMask::of(&CLKDIV1::CLK4DIV)),
            pre_halve: true,
        },
    },
    ClockNode {
        id: ClockId::Apb2,
        kind: NodeKind::PowerOfTwoDivider {
            source: fixed(ClockId::Ahb),
            divider: divider(ClkRegister::Clkdiv2, FieldMask::of(&CLKDIV2::APB2CKDIV)),
            pre_halve: false,
        },
    },
    ClockNode {
        id: ClockId::Apb5,
        kind: NodeKind::PowerOfTwoDivider {
            source: fixed(ClockId::Ahb),
            divider: divider(ClkRegister::Clkdiv2, FieldMask::of(&CLKDIV2::APB5CKDIV)),
            pre_halve: false,
        },
    },
    ClockNode {
        id: ClockId::Uart1,
        kind: NodeKind::LinearDivider {
            source: muxed(
                SelectorDomain::Shared,
                FieldMask::of(&CLKSEL::UARTCKSEL),
                Some(ClockId::Pll2Div2),
            ),
            divider: divider(ClkRegister::Clkdiv1, FieldMask::of(&CLKDIV1::UARTDIV1)),
            pre_halve: false,
        },
    },
    ClockNode {
        id: ClockId::Uart2,
        kind: NodeKind::LinearDivider {
            source: muxed(
                SelectorDomain::Shared,
                FieldMask::of(&CLKSEL::UARTCKSEL),
                Some(ClockId::Pll2Div2),
            ),
            divider: divider(ClkRegister::Clkdiv3, FieldMask::of(&CLKDIV3::UARTDIV2)),
            pre_halve: false,
        },
    },
    ClockNode {
        id: ClockId::Sdhc,
        kind: NodeKind::LinearDivider {
            source: muxed(
                SelectorDomain::Shared,
                FieldMask::of(&CLKSEL::SDCKSEL),
                Some(ClockId::Pll0),
            ),
            divider: divider(ClkRegister::Clkdiv1, FieldMask::of(&CLKDIV1::MMCCKDIV)),
            pre_halve: false,
        },
    },
];

impl ClockTree {
    /// The NPCM845 clock tree.
    pub const NPCM845: ClockTree = ClockTree {
        nodes: &NPCM845_CLOCKS,
        selectors: SelectorMaps::NPCM845,
    };

    /// Node of `id`, if the tree models it.
    pub fn node(&self, id: ClockId) -> Option<&'static ClockNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Check the table invariants the rate logic relies on.
    ///
    /// The NPCM845 table satisfies them; custom tables should be validated
    /// once before a [crate::clk::Clocks] is built on them.
    ///
    /// # Errors
    ///
    /// + [Err]\([ClockError::InvalidTopology]\): duplicate ids, not exactly
    /// one reference oscillator, an empty field mask, a parent or mux input
    /// missing from the table, a programmed parent the mux cannot select, or
    /// a cycle.
    pub fn validate(&self) -> Result<(), ClockError> {
        let references = self
            .nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::FixedReference { .. }))
            .count();
        if references != 1 {
            return Err(ClockError::InvalidTopology);
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if self.nodes[..index].iter().any(|other| other.id == node.id) {
                return Err(ClockError::InvalidTopology);
            }
            if let Some(divider) = node.divider() {
                if divider.mask.is_empty() {
                    return Err(ClockError::InvalidTopology);
                }
            }
            match node.source() {
                None => {}
                Some(ClockSource::Fixed(parent)) => {
                    self.node(parent).ok_or(ClockError::InvalidTopology)?;
                }
                Some(ClockSource::Muxed(selector)) => {
                    if selector.field.is_empty() {
                        return Err(ClockError::InvalidTopology);
                    }
                    for entry in self.selectors.entries(selector.domain) {
                        self.node(entry.clock).ok_or(ClockError::InvalidTopology)?;
                    }
                    if let Some(program) = selector.program {
                        self.selectors
                            .encoding_for(selector.domain, program)
                            .ok_or(ClockError::InvalidTopology)?;
                    }
                }
            }
        }

        for node in self.nodes {
            self.check_ancestry(node, 0)?;
        }
        Ok(())
    }

    // Every path from `node` must reach the reference within `nodes.len()`
    // steps, otherwise it loops.
    fn check_ancestry(&self, node: &ClockNode, depth: usize) -> Result<(), ClockError> {
        if depth >= self.nodes.len() {
            return Err(ClockError::InvalidTopology);
        }
        match node.source() {
            None => Ok(()),
            Some(ClockSource::Fixed(parent)) => {
                let parent = self.node(parent).ok_or(ClockError::InvalidTopology)?;
                self.check_ancestry(parent, depth + 1)
            }
            Some(ClockSource::Muxed(selector)) => {
                for entry in self.selectors.entries(selector.domain) {
                    let parent = self.node(entry.clock).ok_or(ClockError::InvalidTopology)?;
                    self.check_ancestry(parent, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ClockNode, ClockSource, ClockTree, DividerField, NodeKind, Selector, REFCLK_FREQUENCY_HZ,
    };
    use crate::clk::registers::ClkRegister;
    use crate::clk::selector::{SelectorDomain, SelectorEntry, SelectorMaps};
    use crate::clk::{ClockError, ClockId, FieldMask};

    const REFCLK: ClockNode = ClockNode {
        id: ClockId::RefClk,
        kind: NodeKind::FixedReference {
            frequency_hz: REFCLK_FREQUENCY_HZ,
        },
    };

    const UART_DIV: DividerField = DividerField {
        register: ClkRegister::Clkdiv1,
        mask: FieldMask::genmask(20, 16),
    };

    const SHARED_REF_ONLY: SelectorMaps = SelectorMaps {
        cpu: &[],
        shared: &[SelectorEntry {
            encoding: 2,
            clock: ClockId::RefClk,
        }],
    };

    #[test]
    fn npcm845_table_is_valid() {
        assert_eq!(Ok(()), ClockTree::NPCM845.validate());
    }

    #[test]
    fn npcm845_settable_nodes() {
        let tree = ClockTree::NPCM845;
        for id in [ClockId::Uart1, ClockId::Uart2, ClockId::Sdhc] {
            assert!(tree.node(id).unwrap().is_settable(), "{:?}", id);
        }
        for id in [
            ClockId::RefClk,
            ClockId::Pll0,
            ClockId::Pll2Div2,
            ClockId::Ahb,
            ClockId::Apb2,
            ClockId::Apb5,
        ] {
            assert!(!tree.node(id).unwrap().is_settable(), "{:?}", id);
        }
    }

    #[test]
    fn unmodelled_ids_have_no_node() {
        let tree = ClockTree::NPCM845;
        for id in [ClockId::Apb1, ClockId::Apb3, ClockId::Spi0, ClockId::Spix] {
            assert_eq!(None, tree.node(id));
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        const NODES: [ClockNode; 2] = [REFCLK, REFCLK];
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SelectorMaps::NPCM845,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }

    #[test]
    fn dangling_parent_is_rejected() {
        const NODES: [ClockNode; 2] = [
            REFCLK,
            ClockNode {
                id: ClockId::Uart1,
                kind: NodeKind::LinearDivider {
                    source: ClockSource::Fixed(ClockId::Pll2Div2),
                    divider: UART_DIV,
                    pre_halve: false,
                },
            },
        ];
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }

    #[test]
    fn cycle_is_rejected() {
        const NODES: [ClockNode; 3] = [
            REFCLK,
            ClockNode {
                id: ClockId::Apb2,
                kind: NodeKind::PowerOfTwoDivider {
                    source: ClockSource::Fixed(ClockId::Apb5),
                    divider: UART_DIV,
                    pre_halve: false,
                },
            },
            ClockNode {
                id: ClockId::Apb5,
                kind: NodeKind::PowerOfTwoDivider {
                    source: ClockSource::Fixed(ClockId::Apb2),
                    divider: UART_DIV,
                    pre_halve: false,
                },
            },
        ];
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }

    #[test]
    fn empty_mask_is_rejected() {
        const NODES: [ClockNode; 2] = [
            REFCLK,
            ClockNode {
                id: ClockId::Uart1,
                kind: NodeKind::LinearDivider {
                    source: ClockSource::Fixed(ClockId::RefClk),
                    divider: DividerField {
                        register: ClkRegister::Clkdiv1,
                        mask: FieldMask::new(0),
                    },
                    pre_halve: false,
                },
            },
        ];
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }

    #[test]
    fn dangling_selector_entry_is_rejected() {
        const NODES: [ClockNode; 2] = [
            REFCLK,
            ClockNode {
                id: ClockId::Uart1,
                kind: NodeKind::LinearDivider {
                    source: ClockSource::Muxed(Selector {
                        domain: SelectorDomain::Shared,
                        field: FieldMask::genmask(9, 8),
                        program: None,
                    }),
                    divider: UART_DIV,
                    pre_halve: false,
                },
            },
        ];
        // PLL0 is selectable but has no node
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SelectorMaps {
                cpu: &[],
                shared: &[
                    SelectorEntry {
                        encoding: 2,
                        clock: ClockId::RefClk,
                    },
                    SelectorEntry {
                        encoding: 0,
                        clock: ClockId::Pll0,
                    },
                ],
            },
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());

        let tree = ClockTree {
            nodes: &NODES,
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Ok(()), tree.validate());
    }

    #[test]
    fn unreachable_program_target_is_rejected() {
        const NODES: [ClockNode; 2] = [
            REFCLK,
            ClockNode {
                id: ClockId::Uart1,
                kind: NodeKind::LinearDivider {
                    source: ClockSource::Muxed(Selector {
                        domain: SelectorDomain::Shared,
                        field: FieldMask::genmask(9, 8),
                        program: Some(ClockId::Uart1),
                    }),
                    divider: UART_DIV,
                    pre_halve: false,
                },
            },
        ];
        let tree = ClockTree {
            nodes: &NODES,
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }

    #[test]
    fn missing_reference_is_rejected() {
        let tree = ClockTree {
            nodes: &[],
            selectors: SHARED_REF_ONLY,
        };
        assert_eq!(Err(ClockError::InvalidTopology), tree.validate());
    }
}
