//! ST7789 TFT Display Driver
//!
//! A driver and 2D drawing surface for small ST7789 RGB565 panels such as the
//! 1.47" 320x172 IPS module.
//!
//! ## Features
//!
//! - `no_std` compatible, no framebuffer and no allocation
//! - `embedded-hal` v1.0 support (SPI, GPIO, PWM backlight, delay)
//! - Two orientations with per-orientation memory offsets
//! - Shapes, bitmaps and scalable bitmap text rendered straight to the panel
//! - `embedded-graphics` integration (with `graphics` feature)
//!
//! ## Layers
//!
//! - [`Interface`] frames command and data bytes on the bus
//! - [`Panel`] runs bring-up, orientation and addressable windows
//! - [`GraphicDisplay`] clips and renders primitives and text
//! - [`Backlight`] drives the PWM brightness channel
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::pwm::SetDutyCycle;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use st7789_panel::{Backlight, Builder, Color, GraphicDisplay, Interface, Orientation, Panel};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockPwm;
//! # impl embedded_hal::pwm::ErrorType for MockPwm { type Error = Infallible; }
//! # impl SetDutyCycle for MockPwm {
//! #     fn max_duty_cycle(&self) -> u16 { 1023 }
//! #     fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let pwm = MockPwm;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst);
//! let config = match Builder::new().orientation(Orientation::Rotated).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = GraphicDisplay::new(Panel::new(interface, config), Backlight::new(pwm));
//! if display.begin(90, &mut delay).is_err() {
//!     return;
//! }
//! let _ = display.draw_centered_text(20, "HELLO", Color::WHITE, Color::BLACK, 2);
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate alloc;

/// PWM backlight control
pub mod backlight;
/// RGB565 color type
pub mod color;
/// ST7789 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Error types for the driver
pub mod error;
/// Bitmap fonts
pub mod font;
/// Clipped drawing primitives
pub mod graphics;
/// Hardware interface abstraction
pub mod interface;
/// Controller protocol layer
pub mod panel;
/// Orientation and offset mapping
pub mod rotation;
/// Bitmap text rendering
pub mod text;

#[cfg(test)]
mod mock;

pub use backlight::{Backlight, BacklightError};
pub use color::Color;
pub use config::{Builder, Config, Dimensions, MAX_COLUMNS, MAX_ROWS, Offsets, Orientation};
pub use error::{BuilderError, Error};
pub use font::{FONT_5X8, Font};
pub use graphics::GraphicDisplay;
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use panel::Panel;
pub use text::Alignment;
