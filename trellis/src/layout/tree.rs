//! The contract between layouts and the tree of things they arrange.
//!
//! Layouts never own their children. They address them through a
//! [`LayoutTree`], which hands out copyable ids and answers sizing
//! questions. `set_frame_rect` is only ever called while performing a
//! layout, never while computing sizes.

use std::fmt::Debug;

use crate::primitives::{Insets, Rect, Size, Sizes};

use super::data::FlexData;

pub trait LayoutTree {
    /// Handle of a node in the tree.
    type Id: Copy + Eq + Debug;

    /// Minimum, preferred and maximum sizes of `id` for the given hint.
    ///
    /// Hint components `<= 0` mean "unconstrained".
    fn sizes(&self, id: Self::Id, hint: Size) -> Sizes;

    /// Insets reserved by the border of `id`.
    fn border(&self, id: Self::Id) -> Insets;

    /// Children of `id`, in placement order.
    fn children_for_layout(&self, id: Self::Id) -> Vec<Self::Id>;

    /// The layout data `id` carries for its parent's layout.
    fn layout_data(&self, id: Self::Id) -> FlexData;

    fn frame_rect(&self, id: Self::Id) -> Rect;

    fn set_frame_rect(&mut self, id: Self::Id, rect: Rect);
}
