//! Sample log records
//!
//! One record per line: `<elapsedMs>,<primaryV>,<secondaryV>\n`, voltages
//! with three decimals. Records are plain ASCII so they never contain an
//! erased (0xFF) byte.

use core::fmt::Write;
use heapless::String;

/// Longest encoded record
pub const MAX_SAMPLE_LEN: usize = 48;

/// One encoded record, terminator included
pub type SampleLine = String<MAX_SAMPLE_LEN>;

/// Logged sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleRecord {
    /// Milliseconds since the run started
    pub elapsed_ms: u32,
    /// Primary channel voltage
    pub primary_v: f32,
    /// Secondary channel voltage
    pub secondary_v: f32,
}

impl SampleRecord {
    /// Encode as a log line
    ///
    /// Fails only if a voltage is too large to fit the line.
    pub fn encode(&self) -> Result<SampleLine, core::fmt::Error> {
        let mut line = SampleLine::new();
        writeln!(
            line,
            "{},{:.3},{:.3}",
            self.elapsed_ms, self.primary_v, self.secondary_v
        )?;
        Ok(line)
    }

    #[cfg(test)]
    pub(crate) fn decode(line: &str) -> Option<Self> {
        let mut fields = line.trim_end().split(',');
        let elapsed_ms = fields.next()?.parse().ok()?;
        let primary_v = fields.next()?.parse().ok()?;
        let secondary_v = fields.next()?.parse().ok()?;
        if fields.next().is_some() {
            return None;
        }
        Some(Self {
            elapsed_ms,
            primary_v,
            secondary_v,
        })
    }
}
