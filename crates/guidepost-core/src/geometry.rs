#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Coordinates follow the browser viewport convention: origin at the
//! top-left of the visible area, `x` growing right and `y` growing down.
//! Values are `f64` because `getBoundingClientRect()` reports fractional
//! pixels, and they may be negative for elements scrolled above or left of
//! the viewport.

use serde::{Deserialize, Serialize};

/// A rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal center.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check that every component is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Grow the rectangle by `amount` on every side.
    ///
    /// Negative amounts shrink it; width and height never drop below zero.
    pub fn outset(&self, amount: f64) -> Rect {
        Rect {
            x: self.x - amount,
            y: self.y - amount,
            width: (self.width + amount * 2.0).max(0.0),
            height: (self.height + amount * 2.0).max(0.0),
        }
    }

    /// Move the rectangle so it lies within `bounds` inset by `margin`.
    ///
    /// The minimum is applied first and the maximum second, so when the
    /// rectangle is larger than the available space the trailing edge wins
    /// and the result may start before `bounds + margin`.
    pub fn clamp_within(&self, bounds: Rect, margin: f64) -> Rect {
        let min_x = bounds.x + margin;
        let min_y = bounds.y + margin;
        let max_x = bounds.right() - self.width - margin;
        let max_y = bounds.bottom() - self.height - margin;
        Rect {
            x: self.x.max(min_x).min(max_x),
            y: self.y.max(min_y).min(max_y),
            width: self.width,
            height: self.height,
        }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
