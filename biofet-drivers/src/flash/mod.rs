//! Flash storage drivers

pub mod w25q;

#[cfg(test)]
mod emulator;

pub use w25q::{W25q, W25qConfig};
