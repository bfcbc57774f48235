//! Winbond W25Q32 SPI NOR flash driver
//!
//! 4 MiB serial flash with 4 KiB erase sectors and 256-byte program pages.
//!
//! # SPI Protocol
//!
//! Every command is one chip-select framed transaction:
//! - Opcode byte
//! - 24-bit address, big-endian (read/program/erase only)
//! - Data phase (read or program only)
//!
//! Erase and program complete in the background. The device reports
//! progress in the BUSY bit of status register 1 and clears the write
//! enable latch when done, so every erase/program is bracketed as:
//!
//! 1. poll BUSY until clear
//! 2. WRITE ENABLE
//! 3. the erase/program command
//! 4. poll BUSY until clear
//!
//! Polling is bounded by per-operation timeouts from [`W25qConfig`] and
//! fails with [`FlashError::Timeout`] instead of blocking forever.

use biofet_hal::flash::{check_range, crosses_page, sector_base, FlashError, JedecId, NorFlash};
use biofet_hal::select::ChipSelect;
use biofet_hal::spi::SpiBus;
use embedded_hal::delay::DelayNs;

/// W25Q command opcodes
pub mod cmd {
    /// Set the write enable latch
    pub const WRITE_ENABLE: u8 = 0x06;
    /// Read status register 1
    pub const READ_STATUS_1: u8 = 0x05;
    /// Read data (up to 50 MHz)
    pub const READ_DATA: u8 = 0x03;
    /// Program up to one page
    pub const PAGE_PROGRAM: u8 = 0x02;
    /// Erase one 4 KiB sector
    pub const SECTOR_ERASE: u8 = 0x20;
    /// Erase the whole array
    pub const CHIP_ERASE: u8 = 0xC7;
    /// Read manufacturer / device id
    pub const JEDEC_ID: u8 = 0x9F;
}

/// Status register 1: erase or program in progress
pub const STATUS_BUSY: u8 = 0x01;

/// Status register 1: write enable latch
pub const STATUS_WEL: u8 = 0x02;

/// Timing limits for busy polling
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct W25qConfig {
    /// Wait for a previous operation before issuing a new command
    pub ready_timeout_ms: u32,
    /// Page program completion
    pub page_program_timeout_ms: u32,
    /// Sector erase completion
    pub sector_erase_timeout_ms: u32,
    /// Chip erase completion
    pub chip_erase_timeout_ms: u32,
    /// Delay between status reads
    pub poll_interval_us: u32,
}

impl Default for W25qConfig {
    fn default() -> Self {
        // Datasheet maximums: tPP 3 ms, tSE 400 ms, tCE 100 s
        Self {
            ready_timeout_ms: 10,
            page_program_timeout_ms: 10,
            sector_erase_timeout_ms: 500,
            chip_erase_timeout_ms: 120_000,
            poll_interval_us: 100,
        }
    }
}

impl W25qConfig {
    /// Number of status polls that fit in `timeout_ms`
    fn max_polls(&self, timeout_ms: u32) -> u32 {
        let interval = self.poll_interval_us.max(1);
        (timeout_ms.saturating_mul(1000) / interval).max(1)
    }
}

/// Build an opcode + 24-bit address header
fn command_with_address(opcode: u8, addr: u32) -> [u8; 4] {
    [opcode, (addr >> 16) as u8, (addr >> 8) as u8, addr as u8]
}

/// W25Q32 driver
pub struct W25q<SPI, CS, D> {
    spi: SPI,
    cs: CS,
    delay: D,
    config: W25qConfig,
}

impl<SPI, CS, D> W25q<SPI, CS, D>
where
    SPI: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    /// Create a new driver
    ///
    /// The select line should already be released.
    pub fn new(spi: SPI, cs: CS, delay: D, config: W25qConfig) -> Self {
        Self {
            spi,
            cs,
            delay,
            config,
        }
    }

    #[cfg(test)]
    fn release(self) -> (SPI, CS, D) {
        (self.spi, self.cs, self.delay)
    }

    /// Read status register 1
    fn read_status(&mut self) -> Result<u8, FlashError> {
        let mut status = [0u8; 1];
        self.transaction(|spi| {
            spi.write(&[cmd::READ_STATUS_1])?;
            spi.read(&mut status)
        })?;
        Ok(status[0])
    }

    /// Poll BUSY until it clears or `timeout_ms` passes
    fn wait_ready(&mut self, timeout_ms: u32) -> Result<(), FlashError> {
        for _ in 0..self.config.max_polls(timeout_ms) {
            if self.read_status()? & STATUS_BUSY == 0 {
                return Ok(());
            }
            self.delay.delay_us(self.config.poll_interval_us);
        }

        if self.read_status()? & STATUS_BUSY == 0 {
            Ok(())
        } else {
            Err(FlashError::Timeout)
        }
    }

    fn write_enable(&mut self) -> Result<(), FlashError> {
        self.transaction(|spi| spi.write(&[cmd::WRITE_ENABLE]))
    }

    /// Run one select-framed transaction
    ///
    /// The select line is released even when the transfer fails.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut SPI) -> Result<R, SPI::Error>,
    ) -> Result<R, FlashError> {
        self.cs.select().map_err(|_| FlashError::Select)?;
        let result = f(&mut self.spi);
        let released = self.cs.deselect();

        let value = result.map_err(|_| FlashError::Bus)?;
        released.map_err(|_| FlashError::Select)?;
        Ok(value)
    }
}

impl<SPI, CS, D> NorFlash for W25q<SPI, CS, D>
where
    SPI: SpiBus,
    CS: ChipSelect,
    D: DelayNs,
{
    const CAPACITY: u32 = 0x40_0000;
    const SECTOR_SIZE: u32 = 4096;
    const PAGE_SIZE: u32 = 256;

    fn read_id(&mut self) -> Result<JedecId, FlashError> {
        let mut id = [0u8; 3];
        self.transaction(|spi| {
            spi.write(&[cmd::JEDEC_ID])?;
            spi.read(&mut id)
        })?;
        Ok(JedecId::from_bytes(id))
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        check_range(addr, buf.len(), Self::CAPACITY)?;
        if buf.is_empty() {
            return Ok(());
        }

        self.wait_ready(self.config.ready_timeout_ms)?;
        self.transaction(|spi| {
            spi.write(&command_with_address(cmd::READ_DATA, addr))?;
            spi.read(buf)
        })
    }

    fn erase_sector(&mut self, addr: u32) -> Result<(), FlashError> {
        check_range(addr, 1, Self::CAPACITY)?;
        let header = command_with_address(cmd::SECTOR_ERASE, sector_base(addr, Self::SECTOR_SIZE));

        self.wait_ready(self.config.ready_timeout_ms)?;
        self.write_enable()?;
        self.transaction(|spi| spi.write(&header))?;
        self.wait_ready(self.config.sector_erase_timeout_ms)
    }

    fn erase_chip(&mut self) -> Result<(), FlashError> {
        self.wait_ready(self.config.ready_timeout_ms)?;
        self.write_enable()?;
        self.transaction(|spi| spi.write(&[cmd::CHIP_ERASE]))?;
        self.wait_ready(self.config.chip_erase_timeout_ms)
    }

    fn program_page(&mut self, addr: u32, data: &[u8]) -> Result<(), FlashError> {
        check_range(addr, data.len(), Self::CAPACITY)?;
        if crosses_page(addr, data.len(), Self::PAGE_SIZE) {
            return Err(FlashError::PageBoundary);
        }
        if data.is_empty() {
            return Ok(());
        }

        self.wait_ready(self.config.ready_timeout_ms)?;
        self.write_enable()?;
        self.transaction(|spi| {
            spi.write(&command_with_address(cmd::PAGE_PROGRAM, addr))?;
            spi.write(data)
        })?;
        self.wait_ready(self.config.page_program_timeout_ms)
    }
}
