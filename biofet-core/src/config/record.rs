//! Persisted configuration record
//!
//! Fixed 12-byte little-endian layout at the start of the config sector:
//!
//! ```text
//! ┌──────┬─────────┬──────────────────┬──────────────┐
//! │ TYPE │ PAD     │ RUN TIME (f32)   │ MAGIC (u32)  │
//! │ 1B   │ 3B 0xFF │ 4B minutes       │ 4B B10FE701  │
//! └──────┴─────────┴──────────────────┴──────────────┘
//! ```
//!
//! The trailing magic doubles as a power-loss check: an interrupted save
//! leaves the tail erased and the record is rejected on the next boot.

use super::types::{TestConfiguration, TestType};
use biofet_hal::flash::ERASED_BYTE;

/// Marker closing a valid record
pub const CONFIG_MAGIC: u32 = 0xB10F_E701;

/// Encoded record size in bytes
pub const RECORD_LEN: usize = 12;

const TYPE_OFFSET: usize = 0;
const RUN_TIME_OFFSET: usize = 4;
const MAGIC_OFFSET: usize = 8;

/// Why a stored record was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Magic marker missing (blank sector or interrupted save)
    BadMagic,
    /// Unknown test type code
    BadTestType,
    /// Run time not finite or not > 0
    BadRunTime,
}

impl TestConfiguration {
    /// Encode the persisted fields
    pub fn to_record(&self) -> [u8; RECORD_LEN] {
        let mut record = [ERASED_BYTE; RECORD_LEN];
        record[TYPE_OFFSET] = self.test_type.code();
        record[RUN_TIME_OFFSET..MAGIC_OFFSET].copy_from_slice(&self.run_time_minutes.to_le_bytes());
        record[MAGIC_OFFSET..].copy_from_slice(&CONFIG_MAGIC.to_le_bytes());
        record
    }

    /// Decode a stored record
    ///
    /// Fields the record does not carry keep their defaults.
    pub fn from_record(record: &[u8; RECORD_LEN]) -> Result<Self, RecordError> {
        let magic = u32::from_le_bytes([
            record[MAGIC_OFFSET],
            record[MAGIC_OFFSET + 1],
            record[MAGIC_OFFSET + 2],
            record[MAGIC_OFFSET + 3],
        ]);
        if magic != CONFIG_MAGIC {
            return Err(RecordError::BadMagic);
        }

        let test_type = TestType::from_code(record[TYPE_OFFSET]).ok_or(RecordError::BadTestType)?;

        let run_time_minutes = f32::from_le_bytes([
            record[RUN_TIME_OFFSET],
            record[RUN_TIME_OFFSET + 1],
            record[RUN_TIME_OFFSET + 2],
            record[RUN_TIME_OFFSET + 3],
        ]);
        if !Self::is_valid_run_time(run_time_minutes) {
            return Err(RecordError::BadRunTime);
        }

        Ok(Self {
            test_type,
            run_time_minutes,
            ..Self::default()
        })
    }
}
