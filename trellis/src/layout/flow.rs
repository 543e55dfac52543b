//! Flow layout: children placed left to right, wrapping to new lines.
//!
//! Each child is laid out at its preferred size. A child that would cross the
//! content width starts a new line, unless it is already first on its line.
//! A child wider than the content width is narrowed to it and asked for its
//! height at that width.

use serde::{Deserialize, Serialize};

use crate::primitives::{Point, Rect, Size, Sizes};

use super::tree::LayoutTree;

/// Wrapping layout settings for a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flow {
    /// Horizontal spacing between items.
    pub h_spacing: f32,
    /// Vertical spacing between lines.
    pub v_spacing: f32,
}

impl Default for Flow {
    fn default() -> Self {
        Self {
            h_spacing: 4.0,
            v_spacing: 2.0,
        }
    }
}

/// Result of flowing children into a given width.
#[derive(Debug)]
struct Flowed<Id> {
    /// Child frames relative to the content origin.
    frames: Vec<(Id, Rect)>,
    /// Bounding size of all frames.
    extent: Size,
    /// Component-wise largest child minimum.
    largest_min: Size,
}

impl Flow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn h_spacing(mut self, spacing: f32) -> Self {
        self.h_spacing = spacing;
        self
    }

    pub fn v_spacing(mut self, spacing: f32) -> Self {
        self.v_spacing = spacing;
        self
    }

    /// Minimum, preferred and maximum sizes of `target`.
    ///
    /// A hint width below 1 means the content may grow as wide as it likes.
    pub fn sizes<T: LayoutTree>(&self, tree: &T, target: T::Id, hint: Size) -> Sizes {
        let insets = tree.border(target);
        let width = if hint.width < 1.0 {
            f32::INFINITY
        } else {
            (hint.width - insets.width()).max(0.0)
        };

        let flowed = self.flow(tree, target, width);
        let min = flowed.largest_min + insets.size();
        let pref = flowed.extent + insets.size();
        Sizes::new(min, pref, pref.grown_to_default_max())
    }

    /// Position the children of `target` within its content area.
    pub fn perform_layout<T: LayoutTree>(&self, tree: &mut T, target: T::Id) {
        let insets = tree.border(target);
        let content = tree.frame_rect(target).inset(insets);
        let flowed = self.flow(&*tree, target, content.width);

        tracing::trace!(
            children = flowed.frames.len(),
            width = flowed.extent.width,
            height = flowed.extent.height,
            "flow layout"
        );

        let origin = Point::new(insets.left, insets.top);
        for (id, frame) in flowed.frames {
            let placed = Rect::from_origin_size(frame.origin() + origin, frame.size());
            tree.set_frame_rect(id, placed);
        }
    }

    fn flow<T: LayoutTree>(&self, tree: &T, target: T::Id, width: f32) -> Flowed<T::Id> {
        let h_spacing = self.h_spacing.max(0.0);
        let v_spacing = self.v_spacing.max(0.0);

        let mut frames = Vec::new();
        let mut extent = Size::ZERO;
        let mut largest_min = Size::ZERO;
        let mut x = 0.0f32;
        let mut y = 0.0f32;
        let mut line_height = 0.0f32;

        for child in tree.children_for_layout(target) {
            let sizes = tree.sizes(child, Size::ZERO);
            largest_min = largest_min.max(sizes.min);

            let mut size = sizes.pref;
            if size.width > width {
                let narrowed = tree.sizes(child, Size::new(width, 0.0));
                size = Size::new(width, narrowed.pref.height);
            }

            // Wrap to the next line
            if x > 0.0 && x + size.width > width {
                y += line_height + v_spacing;
                x = 0.0;
                line_height = 0.0;
            }

            frames.push((child, Rect::new(x, y, size.width, size.height)));
            extent.width = extent.width.max(x + size.width);
            extent.height = extent.height.max(y + size.height);

            x += size.width + h_spacing;
            line_height = line_height.max(size.height);
        }

        Flowed {
            frames,
            extent,
            largest_min,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
