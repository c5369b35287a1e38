//! Recording test doubles shared by the unit tests

use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::command::{COLUMN_ADDRESS_SET, MEMORY_WRITE, ROW_ADDRESS_SET};
use crate::interface::DisplayInterface;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Command(u8),
    Data(Vec<u8>),
    Reset(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BusFault;

/// Interface that records every transaction
#[derive(Debug, Default)]
pub(crate) struct MockInterface {
    pub(crate) ops: Vec<Op>,
    /// Fail every transaction once this many have succeeded
    pub(crate) fail_after: Option<usize>,
}

/// One decoded window write: CASET, RASET, RAMWR and the pixels that followed
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowWrite {
    pub(crate) columns: (u16, u16),
    pub(crate) rows: (u16, u16),
    pub(crate) pixels: Vec<u16>,
}

impl WindowWrite {
    pub(crate) fn width(&self) -> u16 {
        self.columns.1 - self.columns.0 + 1
    }
}

impl MockInterface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_after(count: usize) -> Self {
        Self {
            ops: Vec::new(),
            fail_after: Some(count),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.ops.clear();
    }

    fn check(&self) -> Result<(), BusFault> {
        match self.fail_after {
            Some(limit) if self.ops.len() >= limit => Err(BusFault),
            _ => Ok(()),
        }
    }

    pub(crate) fn commands(&self) -> Vec<u8> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Each command with all data bytes sent before the next command
    pub(crate) fn command_data(&self) -> Vec<(u8, Vec<u8>)> {
        let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
        for op in &self.ops {
            match op {
                Op::Command(cmd) => out.push((*cmd, Vec::new())),
                Op::Data(bytes) => {
                    if let Some((_, data)) = out.last_mut() {
                        data.extend_from_slice(bytes);
                    }
                }
                Op::Reset(_) => {}
            }
        }
        out
    }

    /// Decode every CASET/RASET/RAMWR triple and the pixel stream after it
    pub(crate) fn window_writes(&self) -> Vec<WindowWrite> {
        let mut out = Vec::new();
        let mut columns = (0, 0);
        let mut rows = (0, 0);
        for (cmd, data) in self.command_data() {
            match cmd {
                COLUMN_ADDRESS_SET => columns = decode_range(&data),
                ROW_ADDRESS_SET => rows = decode_range(&data),
                MEMORY_WRITE => out.push(WindowWrite {
                    columns,
                    rows,
                    pixels: data
                        .chunks_exact(2)
                        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                        .collect(),
                }),
                _ => {}
            }
        }
        out
    }

    /// Every (x, y, color) written, in controller column/row space
    pub(crate) fn pixels(&self) -> Vec<(u16, u16, u16)> {
        let mut out = Vec::new();
        for write in self.window_writes() {
            let width = write.width();
            for (i, color) in write.pixels.iter().enumerate() {
                let i = i as u16;
                out.push((write.columns.0 + i % width, write.rows.0 + i / width, *color));
            }
        }
        out
    }
}

fn decode_range(data: &[u8]) -> (u16, u16) {
    (
        u16::from_be_bytes([data[0], data[1]]),
        u16::from_be_bytes([data[2], data[3]]),
    )
}

impl DisplayInterface for MockInterface {
    type Error = BusFault;

    fn send_command(&mut self, command: u8) -> Result<(), Self::Error> {
        self.check()?;
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        self.ops.push(Op::Data(data.to_vec()));
        Ok(())
    }

    fn reset<D: DelayNs>(&mut self, _delay: &mut D, settle_ms: u32) -> Result<(), Self::Error> {
        self.check()?;
        self.ops.push(Op::Reset(settle_ms));
        Ok(())
    }
}

pub(crate) struct MockDelay;

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay that totals requested time in microseconds
#[derive(Default)]
pub(crate) struct CountingDelay {
    pub(crate) total_us: u64,
    pub(crate) calls: usize,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_us += u64::from(ns / 1_000);
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.total_us += u64::from(us);
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_us += u64::from(ms) * 1_000;
        self.calls += 1;
    }
}
