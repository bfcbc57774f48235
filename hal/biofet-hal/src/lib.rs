//! BioFET Hardware Abstraction Layer
//!
//! This crate defines the bus and device traits the controller logic is
//! written against. Chip-specific crates (`biofet-hal-stm32f4`) implement
//! them on top of real peripherals; tests implement them with mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  biofet-core (controller, persistence)  │
//! └─────────────────────────────────────────┘
//!            │                      │
//!            ▼                      ▼
//! ┌────────────────────┐   ┌────────────────────┐
//! │ flash::NorFlash    │   │ uart::UartTx       │
//! └────────────────────┘   └────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────────────────────────┐
//! │  biofet-drivers (W25Q over SpiBus +     │
//! │  ChipSelect)                            │
//! └─────────────────────────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────────────────────────┐
//! │  biofet-hal-stm32f4 (embassy-stm32)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`select::ChipSelect`] - Device select bracketing a bus transaction
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`uart::UartTx`] - Serial responses
//! - [`flash::NorFlash`] - Erase/program/read storage device

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod select;
pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, JedecId, NorFlash};
pub use gpio::{InputPin, OutputPin};
pub use select::ChipSelect;
pub use spi::SpiBus;
pub use uart::UartTx;
