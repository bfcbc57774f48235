//! Nucleo-F401RE board map
//!
//! | Signal        | Pin  | Peripheral |
//! |---------------|------|------------|
//! | Flash SCK     | PA5  | SPI1       |
//! | Flash MISO    | PA6  | SPI1       |
//! | Flash MOSI    | PA7  | SPI1       |
//! | Flash CS      | PB6  | GPIO       |
//! | Link TX       | PA2  | USART2     |
//! | Link RX       | PA3  | USART2     |
//! | Boot mode     | PC13 | GPIO       |
//!
//! USART2 is routed to the ST-LINK virtual COM port. The boot-mode input is
//! the blue user button: holding it through reset starts a run.

use biofet_hal::spi::{Mode, SpiConfig};
use biofet_hal::uart::{DataBits, Parity, StopBits, UartConfig};

/// W25Q bus: mode 0, well under the part's read-data clock limit
pub const FLASH_SPI: SpiConfig = SpiConfig {
    frequency: 8_000_000,
    mode: Mode::Mode0,
};

/// Host command link, 115200 8N1
pub const COMMAND_UART: UartConfig = UartConfig {
    baudrate: 115_200,
    data_bits: DataBits::Eight,
    parity: Parity::None,
    stop_bits: StopBits::One,
};

/// The user button pulls PC13 low when pressed
pub const BOOT_MODE_ACTIVE_HIGH: bool = false;

/// Control loop period; must not exceed the analog update interval
pub const TICK_INTERVAL_MS: u64 = 10;

pub const UART_TX_BUF_LEN: usize = 256;
pub const UART_RX_BUF_LEN: usize = 256;
