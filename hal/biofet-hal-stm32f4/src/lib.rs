//! STM32F4-specific HAL for the BioFET firmware
//!
//! This crate adapts embassy-stm32 peripherals to the `biofet-hal` traits
//! so the board-agnostic drivers and controller can run on them:
//!
//! - STM32F401RE (Nucleo-F401RE bench board)
//! - STM32F411RE
//!
//! # Features
//!
//! - `stm32f401re` / `stm32f411re` - Select the chip
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware brings up the peripherals with embassy-stm32 directly,
//! then wraps them:
//!
//! - [`spi::BlockingSpi`] around a blocking `Spi` for the flash bus
//! - [`gpio::OutputLine`] / [`gpio::InputLine`] around `Output` / `Input`
//! - [`uart::SerialTx`] around the transmit half of the command UART
//!
//! [`spi::spi_config`] and [`uart::uart_config`] translate the
//! board-agnostic configs into embassy ones.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod uart;

pub use gpio::{InputLine, OutputLine};
pub use spi::{spi_config, BlockingSpi, SpiBusError};
pub use uart::{uart_config, SerialTx, UartBusError};
