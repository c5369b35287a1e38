//! Orientation mapping
//!
//! This module maps a window expressed in logical surface coordinates onto the
//! controller's column and row address ranges.
//!
//! The ST7789 addresses its frame memory through two registers, CASET (columns)
//! and RASET (rows). Depending on the selected [`Orientation`], logical X feeds
//! either the column or the row register, and the active [`Offsets`] are added
//! to compensate for panels smaller than controller memory.
//!
//! ## Orientation Modes
//!
//! - **Rotated**: logical X → columns (+Ox), logical Y → rows (+Oy)
//! - **Primary**: logical Y → columns (+Oy), logical X → rows (+Ox)
//!
//! ## Example
//!
//! ```
//! use st7789_panel::rotation::{map_window, Window};
//! use st7789_panel::{Offsets, Orientation};
//!
//! let window = Window::new(10, 20, 19, 29);
//!
//! let mapped = map_window(window, Orientation::Rotated, Offsets::new(0, 34));
//! assert_eq!(mapped.columns, (10, 19));
//! assert_eq!(mapped.rows, (54, 63));
//!
//! let mapped = map_window(window, Orientation::Primary, Offsets::new(34, 0));
//! assert_eq!(mapped.columns, (20, 29));
//! assert_eq!(mapped.rows, (44, 53));
//! ```

use crate::config::{Offsets, Orientation};

/// An inclusive window in logical surface coordinates
///
/// Invariant: `x1 <= x2` and `y1 <= y2`. The drawing layer never builds an
/// empty or inverted window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    /// Left column
    pub x1: u16,
    /// Top row
    pub y1: u16,
    /// Right column (inclusive)
    pub x2: u16,
    /// Bottom row (inclusive)
    pub y2: u16,
}

impl Window {
    /// Create a new window from inclusive corners
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// A single pixel
    pub const fn pixel(x: u16, y: u16) -> Self {
        Self::new(x, y, x, y)
    }

    /// Number of pixels covered
    pub fn area(&self) -> usize {
        let w = usize::from(self.x2 - self.x1) + 1;
        let h = usize::from(self.y2 - self.y1) + 1;
        w * h
    }
}

/// Controller address ranges for one window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressWindow {
    /// Inclusive column range written with CASET
    pub columns: (u16, u16),
    /// Inclusive row range written with RASET
    pub rows: (u16, u16),
}

impl AddressWindow {
    /// CASET payload: start then end, each high byte first
    pub fn column_bytes(&self) -> [u8; 4] {
        range_bytes(self.columns)
    }

    /// RASET payload: start then end, each high byte first
    pub fn row_bytes(&self) -> [u8; 4] {
        range_bytes(self.rows)
    }
}

fn range_bytes((start, end): (u16, u16)) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

/// Map a logical window onto controller address ranges
///
/// Offsets are added to every coordinate after the axis swap is resolved, so
/// both bytes of each coordinate come from `coordinate + offset`.
pub fn map_window(window: Window, orientation: Orientation, offsets: Offsets) -> AddressWindow {
    let xs = (
        window.x1.saturating_add(offsets.x),
        window.x2.saturating_add(offsets.x),
    );
    let ys = (
        window.y1.saturating_add(offsets.y),
        window.y2.saturating_add(offsets.y),
    );

    if orientation.swaps_axes() {
        AddressWindow {
            columns: ys,
            rows: xs,
        }
    } else {
        AddressWindow {
            columns: xs,
            rows: ys,
        }
    }
}
