//! Per-child layout data and alignment.
//!
//! A [`FlexData`] is built with fluent setters and applied to a panel by
//! value; the stored record is a copy of the builder, never shared with it.

use serde::{Deserialize, Serialize};

use crate::primitives::Size;

/// Placement of a child within its cell, or of a grid within its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Align to the leading edge.
    #[default]
    Start,
    /// Center in the available space.
    Middle,
    /// Align to the trailing edge.
    End,
    /// Stretch to the full available space.
    Fill,
}

impl Alignment {
    /// Offset of an item of `size` placed in `available` space.
    ///
    /// `Fill` and `Start` never offset; oversized items are not shifted backwards.
    #[inline]
    pub fn offset(self, available: f32, size: f32) -> f32 {
        match self {
            Alignment::Start | Alignment::Fill => 0.0,
            Alignment::Middle => ((available - size) / 2.0).max(0.0),
            Alignment::End => (available - size).max(0.0),
        }
    }
}

/// Layout constraints attached to a child of a Flex container.
///
/// Zero components in `size_hint` / `min_size` mean "unset".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexData {
    /// Overrides the child's computed size on any axis where it is positive.
    pub size_hint: Size,
    /// Lower bound for the child's size on any axis where it is positive.
    pub min_size: Size,
    /// Number of columns occupied. Values below 1 are treated as 1.
    pub h_span: usize,
    /// Number of rows occupied. Values below 1 are treated as 1.
    pub v_span: usize,
    pub h_align: Alignment,
    pub v_align: Alignment,
    /// The child's column absorbs extra horizontal space.
    pub h_grab: bool,
    /// The child's row absorbs extra vertical space.
    pub v_grab: bool,
}

impl Default for FlexData {
    fn default() -> Self {
        Self {
            size_hint: Size::ZERO,
            min_size: Size::ZERO,
            h_span: 1,
            v_span: 1,
            h_align: Alignment::Start,
            v_align: Alignment::Middle,
            h_grab: false,
            v_grab: false,
        }
    }
}

impl FlexData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size_hint(mut self, size: Size) -> Self {
        self.size_hint = size;
        self
    }

    pub fn min_size(mut self, size: Size) -> Self {
        self.min_size = size;
        self
    }

    pub fn h_span(mut self, span: usize) -> Self {
        self.h_span = span;
        self
    }

    pub fn v_span(mut self, span: usize) -> Self {
        self.v_span = span;
        self
    }

    pub fn h_align(mut self, align: Alignment) -> Self {
        self.h_align = align;
        self
    }

    pub fn v_align(mut self, align: Alignment) -> Self {
        self.v_align = align;
        self
    }

    /// Set both alignments at once.
    pub fn align(mut self, h_align: Alignment, v_align: Alignment) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    pub fn h_grab(mut self, grab: bool) -> Self {
        self.h_grab = grab;
        self
    }

    pub fn v_grab(mut self, grab: bool) -> Self {
        self.v_grab = grab;
        self
    }

    /// Copy with spans raised to at least 1.
    pub fn normalized(mut self) -> Self {
        self.h_span = self.h_span.max(1);
        self.v_span = self.v_span.max(1);
        self
    }
}
