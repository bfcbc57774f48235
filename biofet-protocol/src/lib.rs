//! BioFET Rig Serial Protocol
//!
//! This crate defines the text protocol between a host (bench PC) and the
//! rig controller over an 8N1 UART.
//!
//! # Protocol Overview
//!
//! Every message is one ASCII line terminated by `\n`:
//! ```text
//! host → rig   SET_TYPE 2        rig → host   OK
//! host → rig   SET_TIME 1.5      rig → host   OK
//! host → rig   START             rig → host   OK
//!                                 rig → host   TEST_COMPLETE
//! host → rig   READ_FLASH        rig → host   BEGIN_DATA
//!                                              0,0.000,0.000
//!                                              ...
//!                                              END_DATA
//! ```
//!
//! Input lines are bounded; an overlong line is answered with
//! `ERR: Buffer Overflow` instead of being dropped silently.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod line;
pub mod response;

pub use command::{Command, CommandError, TYPE_CONSTANT_VOLTAGE, TYPE_RAMP};
pub use line::{Line, LineError, LineParser, MAX_LINE_LEN};
pub use response::{ErrorCode, Response};
