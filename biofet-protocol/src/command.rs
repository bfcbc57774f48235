//! Host → controller commands
//!
//! Each command is one ASCII line. The keyword is matched as a prefix of
//! the line, so trailing text after an argument-less keyword is ignored.
//! Arguments are validated here; a rejected argument never reaches the
//! controller.

/// Test type code for constant-voltage runs
pub const TYPE_CONSTANT_VOLTAGE: u8 = 1;

/// Test type code for ramp runs
pub const TYPE_RAMP: u8 = 2;

/// Errors from parsing a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Keyword not recognised
    UnknownCommand,
    /// `SET_TYPE` argument missing or not 1/2
    InvalidType,
    /// `SET_TIME` argument missing, not a number, or not > 0
    InvalidTime,
}

/// Parsed command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Select the test type by code
    SetType(u8),
    /// Set the run time in minutes
    SetTime(f32),
    /// Persist the current configuration
    SaveConfig,
    /// Erase the whole storage device
    ClearFlash,
    /// Begin a run
    Start,
    /// Abort a run and force safe outputs
    Stop,
    /// Stream the sample log
    ReadFlash,
    /// Liveness check
    Ping,
}

impl Command {
    /// Parse one line with its terminator already removed
    pub fn parse(line: &[u8]) -> Result<Self, CommandError> {
        let text = core::str::from_utf8(line).map_err(|_| CommandError::UnknownCommand)?;
        let text = text.trim();

        if let Some(arg) = text.strip_prefix("SET_TYPE") {
            return parse_type(arg).map(Command::SetType);
        }
        if let Some(arg) = text.strip_prefix("SET_TIME") {
            return parse_time(arg).map(Command::SetTime);
        }

        let command = if text.starts_with("SAVE_CONFIG") {
            Command::SaveConfig
        } else if text.starts_with("CLEAR_FLASH") {
            Command::ClearFlash
        } else if text.starts_with("START") {
            Command::Start
        } else if text.starts_with("STOP") {
            Command::Stop
        } else if text.starts_with("READ_FLASH") {
            Command::ReadFlash
        } else if text.starts_with("PING") {
            Command::Ping
        } else {
            return Err(CommandError::UnknownCommand);
        };

        Ok(command)
    }

    /// Keyword, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetType(_) => "SET_TYPE",
            Command::SetTime(_) => "SET_TIME",
            Command::SaveConfig => "SAVE_CONFIG",
            Command::ClearFlash => "CLEAR_FLASH",
            Command::Start => "START",
            Command::Stop => "STOP",
            Command::ReadFlash => "READ_FLASH",
            Command::Ping => "PING",
        }
    }
}

fn parse_type(arg: &str) -> Result<u8, CommandError> {
    match arg.trim().parse::<u8>() {
        Ok(code @ (TYPE_CONSTANT_VOLTAGE | TYPE_RAMP)) => Ok(code),
        _ => Err(CommandError::InvalidType),
    }
}

fn parse_time(arg: &str) -> Result<f32, CommandError> {
    match arg.trim().parse::<f32>() {
        Ok(minutes) if minutes.is_finite() && minutes > 0.0 => Ok(minutes),
        _ => Err(CommandError::InvalidTime),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse(b"PING"), Ok(Command::Ping));
        assert_eq!(Command::parse(b"START"), Ok(Command::Start));
        assert_eq!(Command::parse(b"STOP"), Ok(Command::Stop));
        assert_eq!(Command::parse(b"SAVE_CONFIG"), Ok(Command::SaveConfig));
        assert_eq!(Command::parse(b"CLEAR_FLASH"), Ok(Command::ClearFlash));
        assert_eq!(Command::parse(b"READ_FLASH"), Ok(Command::ReadFlash));
    }

    #[test]
    fn test_prefix_match_ignores_trailing_text() {
        assert_eq!(Command::parse(b"PING now"), Ok(Command::Ping));
        assert_eq!(Command::parse(b"  STOP  "), Ok(Command::Stop));
    }

    #[test]
    fn test_set_type() {
        assert_eq!(Command::parse(b"SET_TYPE 1"), Ok(Command::SetType(1)));
        assert_eq!(Command::parse(b"SET_TYPE 2"), Ok(Command::SetType(2)));
        assert_eq!(Command::parse(b"SET_TYPE 3"), Err(CommandError::InvalidType));
        assert_eq!(Command::parse(b"SET_TYPE 0"), Err(CommandError::InvalidType));
        assert_eq!(Command::parse(b"SET_TYPE"), Err(CommandError::InvalidType));
        assert_eq!(Command::parse(b"SET_TYPE x"), Err(CommandError::InvalidType));
    }

    #[test]
    fn test_set_time() {
        assert_eq!(Command::parse(b"SET_TIME 2.5"), Ok(Command::SetTime(2.5)));
        assert_eq!(Command::parse(b"SET_TIME 10"), Ok(Command::SetTime(10.0)));
    }

    #[test]
    fn test_set_time_rejects_bad_values() {
        for line in [
            &b"SET_TIME -1"[..],
            b"SET_TIME abc",
            b"SET_TIME 0",
            b"SET_TIME",
            b"SET_TIME inf",
            b"SET_TIME NaN",
        ] {
            assert_eq!(Command::parse(line), Err(CommandError::InvalidTime));
        }
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(Command::parse(b"FOOBAR"), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse(b"ping"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn test_non_utf8_is_unknown() {
        assert_eq!(
            Command::parse(&[0xC3, 0x28, b'P']),
            Err(CommandError::UnknownCommand)
        );
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for command in [
            Command::SaveConfig,
            Command::ClearFlash,
            Command::Start,
            Command::Stop,
            Command::ReadFlash,
            Command::Ping,
        ] {
            assert_eq!(Command::parse(command.name().as_bytes()), Ok(command));
        }
    }
}
