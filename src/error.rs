//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//! - [`BacklightError`](crate::backlight::BacklightError) - PWM backlight errors
//!
//! Drawing before the display is initialized, and shapes that fall entirely
//! off the surface, are not errors: those calls return `Ok(())` and send
//! nothing.
//!
//! ## Example
//!
//! ```
//! use st7789_panel::{Builder, BuilderError, Dimensions};
//!
//! // Wider than controller memory
//! let result = Dimensions::new(400, 172);
//! assert!(matches!(result, Err(BuilderError::InvalidDimensions { .. })));
//!
//! // Offsets pushing the panel past controller memory
//! let result = Builder::new().rotated_offsets(0, 100).build();
//! assert!(matches!(result, Err(BuilderError::InvalidOffsets { .. })));
//! ```

use crate::interface::DisplayInterface;

/// Columns of controller memory addressable with the row/column exchange set
///
/// The ST7789 has 240x320 pixels of frame memory; both supported orientations
/// set MV, so columns run along the 320 side.
pub const MAX_COLUMNS: u16 = 320;

/// Rows of controller memory addressable with the row/column exchange set
pub const MAX_ROWS: u16 = 240;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    /// During bring-up this leaves the display not ready.
    Interface(I::Error),
    /// Backlight PWM channel error
    Backlight,
    /// Brightness above 100 percent
    BrightnessOutOfRange {
        /// The rejected value
        value: u8,
    },
    /// Bitmap slice holds fewer bits than `width * height`
    BitmapTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Backlight => write!(f, "Backlight error"),
            Self::BrightnessOutOfRange { value } => {
                write!(f, "Brightness {value} out of range 0..=100")
            }
            Self::BitmapTooSmall { required, provided } => {
                write!(
                    f,
                    "Bitmap too small: required {required} bytes, provided {provided}"
                )
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels requested
        width: u16,
        /// Height in pixels requested
        height: u16,
    },
    /// Offsets push the panel outside controller memory
    InvalidOffsets {
        /// X offset requested
        x: u16,
        /// Y offset requested
        y: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_COLUMNS}x{MAX_ROWS})"
            ),
            Self::InvalidOffsets { x, y } => write!(
                f,
                "Offsets ({x}, {y}) exceed controller memory {MAX_COLUMNS}x{MAX_ROWS}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
