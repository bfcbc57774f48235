//! UART adapter for STM32F4
//!
//! The command link transmits through the `biofet-hal` [`UartTx`] trait;
//! reception stays on embassy's async reader in the firmware loop.

use biofet_hal::uart::{DataBits, Parity, StopBits, UartConfig, UartTx};
use embassy_stm32::usart::{self, Error as UsartError};

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Frame format the peripheral cannot produce
    Unsupported,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Translate a board-agnostic UART config for embassy-stm32
///
/// The F4 USART word is 8 or 9 bits, so 7 data bits are rejected.
pub fn uart_config(config: &UartConfig) -> Result<usart::Config, UartBusError> {
    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => return Err(UartBusError::Unsupported),
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    Ok(out)
}

/// Transmit half of the command link
///
/// Wraps any blocking `embedded_io::Write` whose errors are USART errors,
/// e.g. `BufferedUartTx` or a blocking `UartTx`.
pub struct SerialTx<W> {
    inner: W,
}

impl<W> SerialTx<W>
where
    W: embedded_io::Write<Error = UsartError>,
{
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W> UartTx for SerialTx<W>
where
    W: embedded_io::Write<Error = UsartError>,
{
    type Error = UartBusError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data).map_err(UartBusError::from)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush().map_err(UartBusError::from)
    }
}
