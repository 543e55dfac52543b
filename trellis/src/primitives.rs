//! Core geometry types for Trellis.
//!
//! These types are used throughout the library for positions, sizes and
//! border insets. All components are `f32` logical pixels.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Largest size a layout reports as its maximum unless its preferred size is
/// bigger still.
pub const DEFAULT_MAX_SIZE: f32 = 10_000.0;

/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// A rectangle in the coordinate space of its parent panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Get the origin point of this rectangle.
    #[inline]
    pub fn origin(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    /// Get the size of this rectangle.
    #[inline]
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Get the right edge X coordinate.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the bottom edge Y coordinate.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink this rectangle by the given insets. Never produces a negative size.
    pub fn inset(&self, insets: Insets) -> Self {
        Self {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.width()).max(0.0),
            height: (self.height - insets.height()).max(0.0),
        }
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Size) -> Self {
        Self {
            width: self.width.min(other.width),
            height: self.height.min(other.height),
        }
    }

    /// Grow both components to at least [`DEFAULT_MAX_SIZE`].
    ///
    /// Layouts report this as their maximum so containers are free to stretch.
    #[inline]
    pub fn grown_to_default_max(self) -> Self {
        self.max(Size::new(DEFAULT_MAX_SIZE, DEFAULT_MAX_SIZE))
    }
}

impl From<(f32, f32)> for Size {
    fn from((width, height): (f32, f32)) -> Self {
        Self { width, height }
    }
}

impl Add for Size {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            width: self.width + rhs.width,
            height: self.height + rhs.height,
        }
    }
}

impl Sub for Size {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            width: self.width - rhs.width,
            height: self.height - rhs.height,
        }
    }
}

/// Space reserved around a panel's content by its border.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    /// Create insets with explicit values for each side.
    pub const fn new(top: f32, left: f32, bottom: f32, right: f32) -> Self {
        Self { top, left, bottom, right }
    }

    /// Uniform insets on all sides.
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            left: value,
            bottom: value,
            right: value,
        }
    }

    /// Symmetric insets (horizontal, vertical).
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self {
            top: vertical,
            left: horizontal,
            bottom: vertical,
            right: horizontal,
        }
    }

    /// Total horizontal inset.
    #[inline]
    pub fn width(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical inset.
    #[inline]
    pub fn height(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total inset as a size.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

/// The minimum, preferred and maximum sizes reported by a panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sizes {
    pub min: Size,
    pub pref: Size,
    pub max: Size,
}

impl Sizes {
    #[inline]
    pub const fn new(min: Size, pref: Size, max: Size) -> Self {
        Self { min, pref, max }
    }

    /// All three sizes equal to `size`.
    #[inline]
    pub const fn fixed(size: Size) -> Self {
        Self {
            min: size,
            pref: size,
            max: size,
        }
    }

    /// Clamp `pref` into `[min, max]`, growing `max` first if it is below `min`.
    pub fn normalized(self) -> Self {
        let max = self.max.max(self.min);
        let pref = self.pref.max(self.min).min(max);
        Self {
            min: self.min,
            pref,
            max,
        }
    }
}
