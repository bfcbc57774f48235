//! Command link transmitter with response logging

use biofet_hal::uart::UartTx;
use biofet_protocol::Response;
use defmt::*;

/// Logs every response line before sending it
pub struct LoggedLink<T> {
    inner: T,
}

impl<T: UartTx> LoggedLink<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: UartTx> UartTx for LoggedLink<T> {
    type Error = T::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_blocking(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        match Response::from_line(line) {
            Some(Response::Error(code)) => warn!("{}", code.as_str()),
            Some(Response::TestComplete) => info!("Run complete"),
            _ => trace!("> {}", line),
        }
        self.inner.write_line(line)
    }
}
