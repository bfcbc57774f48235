//! Controller → host response lines
//!
//! Every response is a fixed text line. Data offload is the only
//! multi-line reply: `BEGIN_DATA`, the raw log bytes, then `END_DATA`.

use crate::command::CommandError;
use crate::line::LineError;

/// Error reported to the host as an `ERR:` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    UnknownCommand,
    InvalidType,
    InvalidTime,
    BufferOverflow,
    StorageFault,
    LogFull,
}

impl ErrorCode {
    /// Full response line, without terminator
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UnknownCommand => "ERR: Unknown Command",
            ErrorCode::InvalidType => "ERR: Invalid Type",
            ErrorCode::InvalidTime => "ERR: Invalid Time",
            ErrorCode::BufferOverflow => "ERR: Buffer Overflow",
            ErrorCode::StorageFault => "ERR: Storage Fault",
            ErrorCode::LogFull => "ERR: Log Full",
        }
    }
}

impl From<CommandError> for ErrorCode {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::UnknownCommand => ErrorCode::UnknownCommand,
            CommandError::InvalidType => ErrorCode::InvalidType,
            CommandError::InvalidTime => ErrorCode::InvalidTime,
        }
    }
}

impl From<LineError> for ErrorCode {
    fn from(e: LineError) -> Self {
        match e {
            LineError::Overflow => ErrorCode::BufferOverflow,
        }
    }
}

/// Single response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    Ok,
    Pong,
    /// Ramp run reached its duration
    TestComplete,
    /// Log offload follows
    BeginData,
    /// Log offload finished
    EndData,
    Error(ErrorCode),
}

impl Response {
    /// Response line, without terminator
    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Ok => "OK",
            Response::Pong => "PONG",
            Response::TestComplete => "TEST_COMPLETE",
            Response::BeginData => "BEGIN_DATA",
            Response::EndData => "END_DATA",
            Response::Error(code) => code.as_str(),
        }
    }

    /// Recognise a response line (host side and tests)
    pub fn from_line(line: &str) -> Option<Self> {
        let response = match line.trim_end_matches(['\r', '\n']) {
            "OK" => Response::Ok,
            "PONG" => Response::Pong,
            "TEST_COMPLETE" => Response::TestComplete,
            "BEGIN_DATA" => Response::BeginData,
            "END_DATA" => Response::EndData,
            "ERR: Unknown Command" => Response::Error(ErrorCode::UnknownCommand),
            "ERR: Invalid Type" => Response::Error(ErrorCode::InvalidType),
            "ERR: Invalid Time" => Response::Error(ErrorCode::InvalidTime),
            "ERR: Buffer Overflow" => Response::Error(ErrorCode::BufferOverflow),
            "ERR: Storage Fault" => Response::Error(ErrorCode::StorageFault),
            "ERR: Log Full" => Response::Error(ErrorCode::LogFull),
            _ => return None,
        };
        Some(response)
    }
}

impl From<ErrorCode> for Response {
    fn from(code: ErrorCode) -> Self {
        Response::Error(code)
    }
}
