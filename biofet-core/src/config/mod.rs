//! Configuration types
//!
//! Board-agnostic configuration structures and the fixed-width record used
//! to persist them in the config sector.

pub mod record;
pub mod types;

pub use record::{RecordError, CONFIG_MAGIC, RECORD_LEN};
pub use types::*;
