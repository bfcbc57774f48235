//! Persistence layer
//!
//! Owns the flash device and splits it into two regions:
//!
//! | Region        | Address     | Contents                       |
//! |---------------|-------------|--------------------------------|
//! | Config sector | `0x000000`  | [`crate::config::RECORD_LEN`]-byte record |
//! | Data region   | `0x001000`+ | append-only sample log         |
//!
//! The log is self-delimiting. Records never contain an erased byte, and
//! appends keep at least one erased byte after the last record, so the
//! log length after a reboot is the offset of the first `0xFF` in the data
//! region, cut back to the last complete `\n`-terminated record.

mod sample_log;

pub use sample_log::OffloadError;

use biofet_hal::flash::{FlashError, JedecId, NorFlash};
use biofet_protocol::ErrorCode;

use crate::config::{TestConfiguration, RECORD_LEN};

/// Config record address
pub const CONFIG_ADDR: u32 = 0x00_0000;

/// Start of the sample log
pub const DATA_BASE: u32 = 0x00_1000;

/// Bytes read per flash transaction during offload
pub const OFFLOAD_CHUNK_LEN: usize = 64;

/// Errors from persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Device operation failed or timed out
    Flash(FlashError),
    /// Data region has no room for the record
    LogFull,
    /// An earlier append failed part-way; the log must be restarted
    TailDirty,
}

impl From<FlashError> for StorageError {
    fn from(e: FlashError) -> Self {
        StorageError::Flash(e)
    }
}

impl From<StorageError> for ErrorCode {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Flash(_) | StorageError::TailDirty => ErrorCode::StorageFault,
            StorageError::LogFull => ErrorCode::LogFull,
        }
    }
}

/// Config record and sample log on one flash device
pub struct Storage<F> {
    flash: F,
    /// Bytes in the log (the write cursor)
    log_len: u32,
    /// Everything in `[log end, erased_end)` is known to be erased
    erased_end: u32,
    /// Bytes past the log end may be programmed; appends are refused
    tail_dirty: bool,
}

impl<F: NorFlash> Storage<F> {
    /// Wrap a flash device; the log is empty until recovered or written
    pub fn new(flash: F) -> Self {
        Self {
            flash,
            log_len: 0,
            erased_end: DATA_BASE,
            tail_dirty: false,
        }
    }

    /// Read the device id
    pub fn read_id(&mut self) -> Result<JedecId, StorageError> {
        Ok(self.flash.read_id()?)
    }

    /// Persist the configuration record
    ///
    /// Erases the config sector, then programs the record. The record fits
    /// in the first page so no split is needed.
    pub fn save_config(&mut self, config: &TestConfiguration) -> Result<(), StorageError> {
        self.flash.erase_sector(CONFIG_ADDR)?;
        self.flash.program(CONFIG_ADDR, &config.to_record())?;
        Ok(())
    }

    /// Load the configuration record
    ///
    /// Returns `Ok(None)` if the sector holds no valid record; the caller
    /// substitutes defaults.
    pub fn load_config(&mut self) -> Result<Option<TestConfiguration>, StorageError> {
        let mut record = [0u8; RECORD_LEN];
        self.flash.read(CONFIG_ADDR, &mut record)?;
        Ok(TestConfiguration::from_record(&record).ok())
    }

    /// Erase the whole device, config sector included
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.log_len = 0;
        self.erased_end = DATA_BASE;
        self.tail_dirty = false;
        self.flash.erase_chip()?;
        self.erased_end = F::CAPACITY;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> F {
        self.flash
    }
}
