//! Line framing for the serial command link.
//!
//! Commands arrive as ASCII text terminated by `\n`. Bytes are collected
//! into a bounded buffer:
//! - `\r` is dropped so CRLF terminals work unchanged
//! - an empty line produces nothing
//! - a line longer than [`MAX_LINE_LEN`] is reported once as
//!   [`LineError::Overflow`]; the rest of it up to the next `\n` is
//!   discarded and framing restarts from an empty buffer

use heapless::Vec;

/// Maximum command line length in bytes, terminator excluded
pub const MAX_LINE_LEN: usize = 64;

/// One received command line, terminator stripped
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur during line framing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded the input buffer and was dropped
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Appending bytes to the current line
    Collecting,
    /// Dropping the tail of an overlong line
    Discarding,
}

/// State machine splitting a byte stream into lines
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Line,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed, or `Err` when the current
    /// line overflowed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        match self.state {
            ParseState::Discarding => {
                if byte == b'\n' {
                    self.state = ParseState::Collecting;
                }
                Ok(None)
            }
            ParseState::Collecting => match byte {
                b'\n' => {
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    let line = self.buffer.clone();
                    self.buffer.clear();
                    Ok(Some(line))
                }
                b'\r' => Ok(None),
                _ => {
                    if self.buffer.push(byte).is_err() {
                        self.buffer.clear();
                        self.state = ParseState::Discarding;
                        return Err(LineError::Overflow);
                    }
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(parser: &mut LineParser, bytes: &[u8]) -> Vec<Result<Line, LineError>, 8> {
        let mut out = Vec::new();
        for &byte in bytes {
            match parser.feed(byte) {
                Ok(Some(line)) => out.push(Ok(line)).unwrap(),
                Ok(None) => {}
                Err(e) => out.push(Err(e)).unwrap(),
            }
        }
        out
    }

    #[test]
    fn test_single_line() {
        let mut parser = LineParser::new();
        let out = feed_all(&mut parser, b"PING\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().as_slice(), b"PING");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let mut parser = LineParser::new();
        let out = feed_all(&mut parser, b"START\r\n");
        assert_eq!(out[0].as_ref().unwrap().as_slice(), b"START");
    }

    #[test]
    fn test_empty_lines_are_ignored() {
        let mut parser = LineParser::new();
        let out = feed_all(&mut parser, b"\n\r\n\nSTOP\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().as_slice(), b"STOP");
    }

    #[test]
    fn test_line_at_capacity_is_accepted() {
        let mut parser = LineParser::new();
        let mut bytes = [b'A'; MAX_LINE_LEN + 1];
        bytes[MAX_LINE_LEN] = b'\n';
        let out = feed_all(&mut parser, &bytes);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().len(), MAX_LINE_LEN);
    }

    #[test]
    fn test_overflow_reported_once_then_resyncs() {
        let mut parser = LineParser::new();
        let long = [b'X'; MAX_LINE_LEN + 20];
        let mut out = feed_all(&mut parser, &long);
        assert_eq!(out.as_slice(), &[Err(LineError::Overflow)]);

        // Tail of the long line is dropped, the next line parses normally
        out = feed_all(&mut parser, b"XXXX\nPING\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_ref().unwrap().as_slice(), b"PING");
    }

    #[test]
    fn test_partial_line_joins_next_bytes() {
        let mut parser = LineParser::new();
        assert!(feed_all(&mut parser, b"SET_").is_empty());
        let out = feed_all(&mut parser, b"TIME 5\n");
        assert_eq!(out[0].as_ref().unwrap().as_slice(), b"SET_TIME 5");
    }

    proptest! {
        #[test]
        fn lines_survive_framing(
            text in proptest::collection::vec(0x20u8..0x7F, 1..=MAX_LINE_LEN),
        ) {
            let mut parser = LineParser::new();
            for &byte in &text {
                prop_assert_eq!(parser.feed(byte), Ok(None));
            }
            let line = parser.feed(b'\n').unwrap().unwrap();
            prop_assert_eq!(line.as_slice(), text.as_slice());
            prop_assert_eq!(parser.feed(b'\n'), Ok(None));
        }
    }
}
