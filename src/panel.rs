//! Panel protocol layer
//!
//! [`Panel`] owns the controller state (orientation and the active offset
//! pair), runs the bring-up sequence, and exposes the two operations every
//! drawing primitive is built on: select an addressable window, then stream
//! pixels into it.
//!
//! Pixel streams are encoded into a fixed stack chunk of [`CHUNK_PIXELS`]
//! pixels and sent chunk by chunk, so the size of a window never dictates
//! transient memory use.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::color::Color;
use crate::command::{
    COLUMN_ADDRESS_SET, DISPLAY_ON, INVERSION_OFF, INVERSION_ON, MEMORY_ACCESS_CONTROL,
    MEMORY_WRITE, PANEL_REGISTERS, PIXEL_FORMAT, PIXEL_FORMAT_16BPP, ROW_ADDRESS_SET, SLEEP_OUT,
};
use crate::config::{Config, Offsets, Orientation};
use crate::error::Error;
use crate::interface::DisplayInterface;
use crate::rotation::{Window, map_window};

type PanelResult<I> = core::result::Result<(), Error<I>>;

/// Pixels encoded per bus transaction while streaming
pub const CHUNK_PIXELS: usize = 64;

/// ST7789 protocol driver
///
/// This struct provides low-level operations for the ST7789 controller.
/// For shapes and text, use [`GraphicDisplay`](crate::GraphicDisplay).
///
/// `set_orientation`, `set_window` and the pixel writes assume [`init`](Self::init)
/// has run; before that the controller state is undefined.
pub struct Panel<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Current orientation
    orientation: Orientation,
    /// Offsets matching `orientation`
    offsets: Offsets,
}

impl<I> Panel<I>
where
    I: DisplayInterface,
{
    /// Create a new Panel instance
    ///
    /// No bus traffic happens until [`init`](Self::init).
    pub fn new(interface: I, config: Config) -> Self {
        let orientation = config.orientation;
        let offsets = config.offsets(orientation);
        Self {
            interface,
            config,
            orientation,
            offsets,
        }
    }

    /// Perform hardware reset and the full bring-up sequence
    ///
    /// Safe to call again: every call repeats the whole sequence and restores
    /// the current orientation.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> PanelResult<I> {
        self.interface
            .reset(delay, self.config.reset_delay_ms)
            .map_err(Error::Interface)?;

        self.send_command(SLEEP_OUT)?;
        delay.delay_ms(self.config.sleep_out_delay_ms);

        self.send_command(PIXEL_FORMAT)?;
        self.send_data(&[PIXEL_FORMAT_16BPP])?;

        for (command, payload) in PANEL_REGISTERS {
            self.send_command(*command)?;
            self.send_data(payload)?;
        }

        self.set_orientation(self.orientation)?;

        self.send_command(if self.config.inversion {
            INVERSION_ON
        } else {
            INVERSION_OFF
        })?;

        // Second sleep-out settles the analog block before the panel turns on
        self.send_command(SLEEP_OUT)?;
        delay.delay_ms(self.config.sleep_out_delay_ms);
        self.send_command(DISPLAY_ON)?;

        debug!("st7789: bring-up complete, orientation {:?}", self.orientation);
        Ok(())
    }

    /// Write the memory access control register and switch offset pairs
    ///
    /// The in-memory orientation and offsets only change once the register
    /// write went out.
    pub fn set_orientation(&mut self, orientation: Orientation) -> PanelResult<I> {
        self.send_command(MEMORY_ACCESS_CONTROL)?;
        self.send_data(&[orientation.madctl()])?;

        self.orientation = orientation;
        self.offsets = self.config.offsets(orientation);
        debug!(
            "st7789: orientation {:?}, offsets ({}, {})",
            orientation, self.offsets.x, self.offsets.y
        );
        Ok(())
    }

    /// Select the addressable window and prime the controller for a pixel stream
    ///
    /// Coordinates are logical and inclusive. They are axis-swapped for the
    /// current orientation and offset before being written to CASET/RASET,
    /// followed by RAMWR.
    pub fn set_window(&mut self, window: Window) -> PanelResult<I> {
        let mapped = map_window(window, self.orientation, self.offsets);

        self.send_command(COLUMN_ADDRESS_SET)?;
        self.send_data(&mapped.column_bytes())?;

        self.send_command(ROW_ADDRESS_SET)?;
        self.send_data(&mapped.row_bytes())?;

        self.send_command(MEMORY_WRITE)
    }

    /// Stream pixels into the window selected by the last [`set_window`](Self::set_window)
    ///
    /// The caller is responsible for sending exactly the window's area.
    pub fn write_pixels(&mut self, pixels: &[Color]) -> PanelResult<I> {
        self.write_pixels_iter(pixels.iter().copied())
    }

    /// Stream `count` copies of one color
    pub fn fill_pixels(&mut self, color: Color, count: usize) -> PanelResult<I> {
        self.write_pixels_iter(core::iter::repeat_n(color, count))
    }

    /// Stream pixels from an iterator in bounded chunks
    pub fn write_pixels_iter<It>(&mut self, pixels: It) -> PanelResult<I>
    where
        It: IntoIterator<Item = Color>,
    {
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut len = 0;

        for color in pixels {
            chunk[len..len + 2].copy_from_slice(&color.to_be_bytes());
            len += 2;
            if len == chunk.len() {
                self.send_data(&chunk)?;
                len = 0;
            }
        }
        if len > 0 {
            self.send_data(&chunk[..len])?;
        }
        Ok(())
    }

    /// Stream pre-encoded bytes (RGB565, high byte first) into the current window
    pub fn write_raw(&mut self, bytes: &[u8]) -> PanelResult<I> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.send_data(bytes)
    }

    /// Select a window and fill it with one color
    pub fn fill_window(&mut self, window: Window, color: Color) -> PanelResult<I> {
        self.set_window(window)?;
        self.fill_pixels(color, window.area())
    }

    /// Current orientation
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Active offset pair
    pub fn offsets(&self) -> Offsets {
        self.offsets
    }

    /// Logical (width, height) for the current orientation
    pub fn logical_size(&self) -> (u16, u16) {
        self.config.logical_size(self.orientation)
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Release the hardware interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Send a command to the display controller
    fn send_command(&mut self, cmd: u8) -> PanelResult<I> {
        self.interface.send_command(cmd).map_err(Error::Interface)
    }

    /// Send data to the display controller
    fn send_data(&mut self, data: &[u8]) -> PanelResult<I> {
        self.interface.send_data(data).map_err(Error::Interface)
    }

    #[cfg(test)]
    pub(crate) fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use crate::mock::{MockDelay, MockInterface, Op};
    use alloc::vec;
    use alloc::vec::Vec;

    fn test_panel() -> Panel<MockInterface> {
        Panel::new(MockInterface::new(), Builder::new().build().unwrap())
    }

    #[test]
    fn test_init_sequence_order() {
        let mut panel = test_panel();
        panel.init(&mut MockDelay).unwrap();

        let commands = panel.interface().commands();
        assert_eq!(
            commands,
            [
                0x11, 0x3A, 0xB0, 0xB2, 0xB7, 0xBB, 0xC0, 0xC2, 0xC3, 0xC4, 0xC6, 0xD0, 0xD6, 0xE0,
                0xE1, 0x36, 0x21, 0x11, 0x29
            ]
        );
        assert_eq!(panel.interface().ops.first(), Some(&Op::Reset(50)));
    }

    #[test]
    fn test_init_payloads() {
        let mut panel = test_panel();
        panel.init(&mut MockDelay).unwrap();

        let data = panel.interface().command_data();
        assert!(data.contains(&(0x3A, vec![0x05])));
        assert!(data.contains(&(0x36, vec![0xA0])));
        assert!(data.contains(&(0xB2, vec![0x0C, 0x0C, 0x00, 0x33, 0x33])));
        assert!(data.contains(&(0xD0, vec![0xA4, 0xA1])));
    }

    #[test]
    fn test_register_payloads_sent_whole() {
        let mut panel = test_panel();
        panel.init(&mut MockDelay).unwrap();

        // Each command is followed by exactly one data write carrying its payload
        let ops = &panel.interface().ops;
        for (command, payload) in PANEL_REGISTERS {
            let at = ops
                .iter()
                .position(|op| *op == Op::Command(*command))
                .unwrap();
            assert_eq!(ops[at + 1], Op::Data(payload.to_vec()));
            assert!(matches!(ops[at + 2], Op::Command(_)));
        }
    }

    #[test]
    fn test_init_without_inversion() {
        let config = Builder::new().inversion(false).build().unwrap();
        let mut panel = Panel::new(MockInterface::new(), config);
        panel.init(&mut MockDelay).unwrap();
        let commands = panel.interface().commands();
        assert!(commands.contains(&0x20));
        assert!(!commands.contains(&0x21));
    }

    #[test]
    fn test_init_reports_bus_failure() {
        let mut panel = Panel::new(
            MockInterface::failing_after(5),
            Builder::new().build().unwrap(),
        );
        let result = panel.init(&mut MockDelay);
        assert!(matches!(result, Err(Error::Interface(_))));
    }

    #[test]
    fn test_set_window_rotated_applies_y_offset() {
        let mut panel = test_panel();
        panel.set_window(Window::new(10, 20, 30, 40)).unwrap();

        let data = panel.interface().command_data();
        assert_eq!(
            data,
            [
                (0x2A, vec![0x00, 10, 0x00, 30]),
                (0x2B, vec![0x00, 54, 0x00, 74]),
                (0x2C, vec![]),
            ]
        );
    }

    #[test]
    fn test_set_window_primary_swaps_axes() {
        let mut panel = test_panel();
        panel.set_orientation(Orientation::Primary).unwrap();
        panel.interface_mut().clear();

        panel.set_window(Window::new(10, 300, 12, 310)).unwrap();

        let data = panel.interface().command_data();
        assert_eq!(data[0], (0x2A, vec![0x01, 0x2C, 0x01, 0x36]));
        assert_eq!(data[1], (0x2B, vec![0x00, 44, 0x00, 46]));
    }

    #[test]
    fn test_orientation_toggle_is_reversible() {
        let mut panel = test_panel();
        let start = (panel.orientation(), panel.offsets());

        panel.set_orientation(Orientation::Rotated).unwrap();
        panel.set_orientation(Orientation::Primary).unwrap();
        panel.set_orientation(Orientation::Rotated).unwrap();

        assert_eq!((panel.orientation(), panel.offsets()), start);
        let data = panel.interface().command_data();
        assert_eq!(
            data,
            [
                (0x36, vec![0xA0]),
                (0x36, vec![0x20]),
                (0x36, vec![0xA0])
            ]
        );
    }

    #[test]
    fn test_logical_size_follows_orientation() {
        let mut panel = test_panel();
        assert_eq!(panel.logical_size(), (320, 172));
        panel.set_orientation(Orientation::Primary).unwrap();
        assert_eq!(panel.logical_size(), (172, 320));
        assert_eq!(panel.offsets(), Offsets::new(34, 0));
    }

    #[test]
    fn test_pixels_stream_in_bounded_chunks() {
        let mut panel = test_panel();
        panel.fill_pixels(Color::RED, CHUNK_PIXELS * 2 + 3).unwrap();

        let sizes: Vec<usize> = panel
            .interface()
            .ops
            .iter()
            .map(|op| match op {
                Op::Data(bytes) => bytes.len(),
                _ => 0,
            })
            .collect();
        assert_eq!(sizes, [CHUNK_PIXELS * 2, CHUNK_PIXELS * 2, 6]);
    }

    #[test]
    fn test_write_pixels_big_endian() {
        let mut panel = test_panel();
        panel
            .write_pixels(&[Color::from_raw(0x1234), Color::from_raw(0xABCD)])
            .unwrap();
        assert_eq!(
            panel.interface().ops,
            [Op::Data(vec![0x12, 0x34, 0xAB, 0xCD])]
        );
    }

    #[test]
    fn test_empty_stream_sends_nothing() {
        let mut panel = test_panel();
        panel.write_pixels(&[]).unwrap();
        panel.write_raw(&[]).unwrap();
        assert!(panel.interface().ops.is_empty());
    }

    #[test]
    fn test_fill_window_sends_area() {
        let mut panel = test_panel();
        panel
            .fill_window(Window::new(0, 0, 9, 4), Color::GREEN)
            .unwrap();
        let writes = panel.interface().window_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].pixels.len(), 50);
        assert!(writes[0].pixels.iter().all(|p| *p == 0x07E0));
    }
}
