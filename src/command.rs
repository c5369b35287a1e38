//! ST7789 command definitions
//!
//! This module defines the command bytes and fixed register payloads used to
//! bring up and drive the ST7789 TFT controller. Commands are sent over SPI
//! with the DC pin low; their parameters follow with DC high.
//!
//! ## Command Structure
//!
//! Every byte group is framed in its own SPI transaction:
//! 1. Assert CS (Chip Select)
//! 2. Set DC low (command mode) and send the command byte
//! 3. Deassert CS
//! 4. Assert CS, set DC high (data mode) and send the parameter bytes (if any)
//! 5. Deassert CS
//!
//! ## Example
//!
//! ```rust,no_run
//! use st7789_panel::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin);
//! // Select 16 bits per pixel
//! let _ = interface.send_command(command::PIXEL_FORMAT);
//! let _ = interface.send_data(&[command::PIXEL_FORMAT_16BPP]);
//! ```

// System control commands

/// Sleep out command (0x11)
///
/// Wakes the controller from sleep. The datasheet requires 120ms before the
/// next sleep-in/out and 5ms before any other command.
pub const SLEEP_OUT: u8 = 0x11;

/// Display inversion on command (0x21)
///
/// IPS panels built around the ST7789 are usually wired inverted and need this
/// for colors to come out right.
pub const INVERSION_ON: u8 = 0x21;

/// Display inversion off command (0x20)
pub const INVERSION_OFF: u8 = 0x20;

/// Display on command (0x29)
pub const DISPLAY_ON: u8 = 0x29;

// Addressing and memory commands

/// Column address set command (0x2A)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const COLUMN_ADDRESS_SET: u8 = 0x2A;

/// Row address set command (0x2B)
///
/// Requires 4 bytes: [start_MSB, start_LSB, end_MSB, end_LSB]
pub const ROW_ADDRESS_SET: u8 = 0x2B;

/// Memory write command (0x2C)
///
/// Primes the controller to accept a pixel stream into the current window.
/// The write pointer auto-increments in row-major order until another command
/// is sent.
pub const MEMORY_WRITE: u8 = 0x2C;

/// Memory access control command (0x36)
///
/// Sets the memory scan direction (MY/MX/MV/ML/RGB bits). Requires 1 byte.
pub const MEMORY_ACCESS_CONTROL: u8 = 0x36;

/// MADCTL payload for [`Orientation::Primary`](crate::Orientation::Primary) (MV)
pub const MADCTL_PRIMARY: u8 = 0x20;

/// MADCTL payload for [`Orientation::Rotated`](crate::Orientation::Rotated) (MY | MV)
pub const MADCTL_ROTATED: u8 = 0xA0;

/// Interface pixel format command (0x3A)
///
/// Requires 1 byte, see [`PIXEL_FORMAT_16BPP`].
pub const PIXEL_FORMAT: u8 = 0x3A;

/// COLMOD payload selecting 16 bits per pixel (RGB565)
pub const PIXEL_FORMAT_16BPP: u8 = 0x05;

// Panel, power and gamma registers

/// RAM control command (0xB0)
pub const RAM_CONTROL: u8 = 0xB0;

/// Porch setting command (0xB2)
pub const PORCH_CONTROL: u8 = 0xB2;

/// Gate control command (0xB7)
pub const GATE_CONTROL: u8 = 0xB7;

/// VCOM setting command (0xBB)
pub const VCOM_SETTING: u8 = 0xBB;

/// LCM control command (0xC0)
pub const LCM_CONTROL: u8 = 0xC0;

/// VDV and VRH command enable (0xC2)
pub const VDV_VRH_ENABLE: u8 = 0xC2;

/// VRH set command (0xC3)
pub const VRH_SET: u8 = 0xC3;

/// VDV set command (0xC4)
pub const VDV_SET: u8 = 0xC4;

/// Frame rate control in normal mode (0xC6)
pub const FRAME_RATE_CONTROL: u8 = 0xC6;

/// Power control 1 command (0xD0)
pub const POWER_CONTROL_1: u8 = 0xD0;

/// Gate output selection in sleep-in mode (0xD6)
pub const GATE_SLEEP_OUTPUT: u8 = 0xD6;

/// Positive voltage gamma control (0xE0)
pub const POSITIVE_GAMMA: u8 = 0xE0;

/// Negative voltage gamma control (0xE1)
pub const NEGATIVE_GAMMA: u8 = 0xE1;

/// Porch, timing, power and gamma register writes issued during bring-up
///
/// Issued in order after the pixel format is selected. The payloads are tuned
/// for the 1.47" 172x320 IPS module and are typical for ST7789 panels.
pub const PANEL_REGISTERS: &[(u8, &[u8])] = &[
    (RAM_CONTROL, &[0x00, 0xE8]),
    (PORCH_CONTROL, &[0x0C, 0x0C, 0x00, 0x33, 0x33]),
    (GATE_CONTROL, &[0x35]),
    (VCOM_SETTING, &[0x35]),
    (LCM_CONTROL, &[0x2C]),
    (VDV_VRH_ENABLE, &[0x01]),
    (VRH_SET, &[0x13]),
    (VDV_SET, &[0x20]),
    (FRAME_RATE_CONTROL, &[0x0F]),
    (POWER_CONTROL_1, &[0xA4, 0xA1]),
    (GATE_SLEEP_OUTPUT, &[0xA1]),
    (
        POSITIVE_GAMMA,
        &[
            0xF0, 0x00, 0x04, 0x04, 0x04, 0x05, 0x29, 0x33, 0x3E, 0x38, 0x12, 0x12, 0x28, 0x30,
        ],
    ),
    (
        NEGATIVE_GAMMA,
        &[
            0xF0, 0x07, 0x0A, 0x0D, 0x0B, 0x07, 0x28, 0x33, 0x3E, 0x36, 0x14, 0x14, 0x29, 0x32,
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamma_tables_have_fourteen_entries() {
        for (cmd, payload) in PANEL_REGISTERS {
            if *cmd == POSITIVE_GAMMA || *cmd == NEGATIVE_GAMMA {
                assert_eq!(payload.len(), 14);
            }
        }
    }

    #[test]
    fn test_panel_registers_in_bring_up_order() {
        let order: alloc::vec::Vec<u8> = PANEL_REGISTERS.iter().map(|(cmd, _)| *cmd).collect();
        assert_eq!(
            order,
            [
                0xB0, 0xB2, 0xB7, 0xBB, 0xC0, 0xC2, 0xC3, 0xC4, 0xC6, 0xD0, 0xD6, 0xE0, 0xE1
            ]
        );
    }
}
