//! Layout System for Trellis
//!
//! A container's [`Layout`] sizes and positions its children. Layouts address
//! children through the [`LayoutTree`] contract and read each child's
//! [`FlexData`].
//!
//! # Architecture
//!
//! ```text
//! sizes(hint) -> min/pref/max (no frames touched)
//! perform_layout() -> set_frame_rect() on every child
//! ```

pub mod data;
pub mod flex;
pub mod flow;
pub mod tree;

use serde::{Deserialize, Serialize};

use crate::primitives::{Size, Sizes};

// Re-export core types
pub use data::{Alignment, FlexData};
pub use flex::{apportion_extra, Flex, MAX_CONVERGENCE_PASSES};
pub use flow::Flow;
pub use tree::LayoutTree;

/// The layout a container uses for its children.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layout {
    /// Span-aware grid.
    Flex(Flex),
    /// Left-to-right wrapping.
    Flow(Flow),
}

impl Layout {
    /// Minimum, preferred and maximum sizes of `target` under this layout.
    pub fn sizes<T: LayoutTree>(&self, tree: &T, target: T::Id, hint: Size) -> Sizes {
        match self {
            Layout::Flex(flex) => flex.sizes(tree, target, hint),
            Layout::Flow(flow) => flow.sizes(tree, target, hint),
        }
    }

    /// Set the frame of every child of `target`.
    pub fn perform_layout<T: LayoutTree>(&self, tree: &mut T, target: T::Id) {
        match self {
            Layout::Flex(flex) => flex.perform_layout(tree, target),
            Layout::Flow(flow) => flow.perform_layout(tree, target),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Flex(Flex::default())
    }
}

impl From<Flex> for Layout {
    fn from(flex: Flex) -> Self {
        Layout::Flex(flex)
    }
}

impl From<Flow> for Layout {
    fn from(flow: Flow) -> Self {
        Layout::Flow(flow)
    }
}
