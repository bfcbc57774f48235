//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the device traits
//! defined in `biofet-hal`:
//!
//! - Flash storage (W25Q32 SPI NOR flash)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod flash;
