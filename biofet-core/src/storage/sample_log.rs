//! Append-only sample log in the data region
//!
//! Sectors are erased lazily: a new log erases the first data sector and
//! each append erases the following sector before the log first reaches
//! it. The byte right after the log end is always erased.
//!
//! A failed program can leave part of a record past the log end. The tail
//! is then marked dirty and appends are refused until the log is restarted.
//! Recovery after a reboot keeps only complete records, so anything after
//! the last `\n` is dropped.

use biofet_hal::flash::{sector_base, NorFlash, ERASED_BYTE};
use biofet_hal::uart::UartTx;

use super::{Storage, StorageError, DATA_BASE, OFFLOAD_CHUNK_LEN};

const SCAN_CHUNK_LEN: usize = 256;
const RECORD_END: u8 = b'\n';

/// Errors from streaming the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OffloadError<E> {
    /// Reading the log failed
    Storage(StorageError),
    /// Writing to the link failed
    Link(E),
}

impl<F: NorFlash> Storage<F> {
    /// Bytes in the log
    pub fn log_len(&self) -> u32 {
        self.log_len
    }

    /// Start a new, empty log
    ///
    /// Erases the first data sector so stale records from an earlier run
    /// cannot be mistaken for part of the new log.
    pub fn begin_log(&mut self) -> Result<(), StorageError> {
        self.log_len = 0;
        self.erased_end = DATA_BASE;
        self.tail_dirty = false;
        self.flash.erase_sector(DATA_BASE)?;
        self.erased_end = DATA_BASE + F::SECTOR_SIZE;
        Ok(())
    }

    /// Append bytes at the write cursor
    ///
    /// `bytes` must not contain an erased byte and should end with `\n`;
    /// only `\n`-terminated records survive a reboot. Fails with `LogFull`
    /// before touching the device if the region has no room.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        if self.tail_dirty {
            return Err(StorageError::TailDirty);
        }
        let start = DATA_BASE + self.log_len;
        let end = start as u64 + bytes.len() as u64;
        if end >= F::CAPACITY as u64 {
            return Err(StorageError::LogFull);
        }
        let end = end as u32;

        while self.erased_end <= end {
            self.flash.erase_sector(self.erased_end)?;
            self.erased_end += F::SECTOR_SIZE;
        }

        if let Err(e) = self.flash.program(start, bytes) {
            self.tail_dirty = true;
            return Err(e.into());
        }
        self.log_len += bytes.len() as u32;
        Ok(())
    }

    /// Recover the log length after a reboot
    ///
    /// Scans the data region for the first erased byte, then cuts the log
    /// back to the last record terminator. A cut marks the tail dirty.
    pub fn recover_log(&mut self) -> Result<u32, StorageError> {
        let mut buf = [0u8; SCAN_CHUNK_LEN];
        let mut addr = DATA_BASE;

        while addr < F::CAPACITY {
            let len = SCAN_CHUNK_LEN.min((F::CAPACITY - addr) as usize);
            let chunk = &mut buf[..len];
            self.flash.read(addr, chunk)?;

            if let Some(pos) = chunk.iter().position(|&b| b == ERASED_BYTE) {
                addr += pos as u32;
                break;
            }
            addr += len as u32;
        }

        let end = self.last_record_end(addr)?;
        self.log_len = end - DATA_BASE;
        self.tail_dirty = end != addr;
        self.erased_end = (sector_base(addr, F::SECTOR_SIZE) + F::SECTOR_SIZE).min(F::CAPACITY);
        Ok(self.log_len)
    }

    /// Address just past the last `\n` below `limit`, or `DATA_BASE`
    fn last_record_end(&mut self, limit: u32) -> Result<u32, StorageError> {
        let mut buf = [0u8; SCAN_CHUNK_LEN];
        let mut addr = limit;

        while addr > DATA_BASE {
            let len = SCAN_CHUNK_LEN.min((addr - DATA_BASE) as usize);
            let chunk = &mut buf[..len];
            addr -= len as u32;
            self.flash.read(addr, chunk)?;

            if let Some(pos) = chunk.iter().rposition(|&b| b == RECORD_END) {
                return Ok(addr + pos as u32 + 1);
            }
        }

        Ok(DATA_BASE)
    }

    /// Stream the raw log bytes to the link
    pub fn offload<T: UartTx>(&mut self, tx: &mut T) -> Result<(), OffloadError<T::Error>> {
        let mut buf = [0u8; OFFLOAD_CHUNK_LEN];
        let mut offset = 0u32;

        while offset < self.log_len {
            let len = OFFLOAD_CHUNK_LEN.min((self.log_len - offset) as usize);
            let chunk = &mut buf[..len];
            self.flash
                .read(DATA_BASE + offset, chunk)
                .map_err(|e| OffloadError::Storage(e.into()))?;
            tx.write_blocking(chunk).map_err(OffloadError::Link)?;
            offset += len as u32;
        }

        Ok(())
    }
}
