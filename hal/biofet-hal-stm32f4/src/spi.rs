//! SPI adapter for STM32F4
//!
//! Wraps any blocking embedded-hal 1.0 bus (embassy-stm32's `Spi` in
//! `Blocking` mode on the board) as a [`biofet_hal::spi::SpiBus`]. Every
//! operation flushes before returning so a select line released right
//! after it never cuts off the last byte.

use biofet_hal::spi::{Mode, SpiBus, SpiConfig};
use embassy_stm32::spi::{self, Phase, Polarity};
use embassy_stm32::time::Hertz;
use embedded_hal::spi::{Error as _, ErrorKind, SpiBus as EhSpiBus};

/// Error from SPI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiBusError {
    /// Receive overrun
    Overrun,
    /// Multi-master mode fault
    ModeFault,
    /// Frame format error
    FrameFormat,
    /// Other error
    Other,
}

impl From<ErrorKind> for SpiBusError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Overrun => SpiBusError::Overrun,
            ErrorKind::ModeFault => SpiBusError::ModeFault,
            ErrorKind::FrameFormat => SpiBusError::FrameFormat,
            _ => SpiBusError::Other,
        }
    }
}

/// Translate a board-agnostic SPI config for embassy-stm32
pub fn spi_config(config: &SpiConfig) -> spi::Config {
    let (polarity, phase) = match config.mode {
        Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
        Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
        Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
        Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
    };

    let mut out = spi::Config::default();
    out.frequency = Hertz(config.frequency);
    out.mode = spi::Mode { polarity, phase };
    out
}

/// Blocking SPI master
pub struct BlockingSpi<B> {
    bus: B,
}

impl<B: EhSpiBus<u8>> BlockingSpi<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    fn finish(&mut self, result: Result<(), B::Error>) -> Result<(), SpiBusError> {
        result.map_err(|e| SpiBusError::from(e.kind()))?;
        self.bus.flush().map_err(|e| SpiBusError::from(e.kind()))
    }
}

impl<B: EhSpiBus<u8>> SpiBus for BlockingSpi<B> {
    type Error = SpiBusError;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let result = self.bus.write(data);
        self.finish(result)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        buf.fill(0);
        let result = self.bus.transfer_in_place(buf);
        self.finish(result)
    }
}
