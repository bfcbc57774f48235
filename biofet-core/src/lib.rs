//! Board-agnostic core logic for the BioFET test rig controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Analog output capability trait
//! - Test configuration and its persisted record
//! - Idle/Running state machine
//! - Ramp and constant setpoints, run cadence timing, sample records
//! - Persistence layer (config sector, append-only sample log)
//! - Controller tying commands, runs and storage together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod run;
pub mod state;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod mock;

pub use controller::{BootReport, ConfigSource, Controller};
