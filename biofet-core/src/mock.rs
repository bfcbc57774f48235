//! Test doubles shared by the unit tests

use std::string::String;
use std::vec::Vec;

use biofet_hal::flash::{
    check_range, crosses_page, sector_base, FlashError, JedecId, NorFlash, ERASED_BYTE,
};
use biofet_hal::uart::UartTx;

use crate::traits::{AnalogOutput, OutputChannel};

/// W25Q32 size
pub const FULL_CAPACITY: u32 = 0x40_0000;

/// In-memory NOR flash with erase/program semantics
///
/// Programming ANDs data into the array like the real part; every bit
/// that would need a 0 → 1 transition is counted in `violations`.
pub struct MemFlash<const CAP: u32 = FULL_CAPACITY> {
    pub data: Vec<u8>,
    /// Every operation fails with `Timeout` while set
    pub stuck: bool,
    /// Page programs left before they start failing with `Timeout`
    pub pages_until_fault: Option<usize>,
    pub sector_erases: usize,
    pub chip_erases: usize,
    pub violations: usize,
}

impl MemFlash {
    /// Blank full-size device
    pub fn new() -> Self {
        MemFlash::blank()
    }
}

impl<const CAP: u32> MemFlash<CAP> {
    /// Blank device of `CAP` bytes
    pub fn blank() -> Self {
        Self {
            data: vec![ERASED_BYTE; CAP as usize],
            stuck: false,
            pages_until_fault: None,
            sector_erases: 0,
            chip_erases: 0,
            violations: 0,
        }
    }

    fn ready(&self) -> Result<(), FlashError> {
        if self.stuck {
            Err(FlashError::Timeout)
        } else {
            Ok(())
        }
    }
}

impl<const CAP: u32> NorFlash for MemFlash<CAP> {
    const CAPACITY: u32 = CAP;
    const SECTOR_SIZE: u32 = 4096;
    const PAGE_SIZE: u32 = 256;

    fn read_id(&mut self) -> Result<JedecId, FlashError> {
        self.ready()?;
        Ok(JedecId::from_bytes([0xEF, 0x40, 0x16]))
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        self.ready()?;
        check_range(addr, buf.len(), CAP)?;
        let start = addr as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }

    fn erase_sector(&mut self, addr: u32) -> Result<(), FlashError> {
        self.ready()?;
        check_range(addr, 1, CAP)?;
        let base = sector_base(addr, Self::SECTOR_SIZE) as usize;
        self.data[base..base + Self::SECTOR_SIZE as usize].fill(ERASED_BYTE);
        self.sector_erases += 1;
        Ok(())
    }

    fn erase_chip(&mut self) -> Result<(), FlashError> {
        self.ready()?;
        self.data.fill(ERASED_BYTE);
        self.chip_erases += 1;
        Ok(())
    }

    fn program_page(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashError> {
        self.ready()?;
        match self.pages_until_fault.as_mut() {
            Some(0) => return Err(FlashError::Timeout),
            Some(left) => *left -= 1,
            None => {}
        }
        check_range(addr, data.len(), CAP)?;
        if crosses_page(addr, data.len(), Self::PAGE_SIZE) {
            return Err(FlashError::PageBoundary);
        }
        for (cell, &byte) in self.data[addr as usize..].iter_mut().zip(data) {
            self.violations += (byte & !*cell).count_ones() as usize;
            *cell &= byte;
        }
        Ok(())
    }
}

/// Analog output that records every write
#[derive(Default)]
pub struct RecordingOutput {
    pub writes: Vec<(OutputChannel, f32)>,
}

impl RecordingOutput {
    /// Last voltage commanded on a channel
    pub fn last(&self, channel: OutputChannel) -> Option<f32> {
        self.writes
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
    }
}

impl AnalogOutput for RecordingOutput {
    fn set_voltage(&mut self, channel: OutputChannel, volts: f32) {
        self.writes.push((channel, volts));
    }
}

/// Serial link that captures everything written
#[derive(Default)]
pub struct RecordingUart {
    pub bytes: Vec<u8>,
    /// Writes fail while set
    pub broken: bool,
    /// Captured length at the last flush
    pub flushed: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDown;

impl RecordingUart {
    /// Captured output split into lines
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.bytes)
            .lines()
            .map(String::from)
            .collect()
    }

    /// Drop captured output
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl UartTx for RecordingUart {
    type Error = LinkDown;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.broken {
            return Err(LinkDown);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.broken {
            return Err(LinkDown);
        }
        self.flushed = Some(self.bytes.len());
        Ok(())
    }
}
