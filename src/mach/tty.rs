use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Symbolic terminal requests made by CLS, CON, COFF, AT, INK and PAPER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyRequest {
    Cls,
    CursorOn,
    CursorOff,
    At { row: u8, col: u8 },
    Ink(u8),
    Paper(u8),
}

/// Turns a request into the escape text for one terminal family.
pub trait TerminalProfile {
    fn escape(&self, request: TtyRequest) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Vt100,
    Videotex,
}

impl Default for TerminalKind {
    fn default() -> TerminalKind {
        TerminalKind::Vt100
    }
}

impl TerminalKind {
    pub fn profile(self) -> Box<dyn TerminalProfile> {
        match self {
            TerminalKind::Vt100 => Box::new(Vt100),
            TerminalKind::Videotex => Box::new(Videotex),
        }
    }
}

impl std::str::FromStr for TerminalKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<TerminalKind> {
        match s.to_ascii_lowercase().as_str() {
            "vt100" | "ansi" => Ok(TerminalKind::Vt100),
            "videotex" | "minitel" => Ok(TerminalKind::Videotex),
            _ => Err(error!(IllegalFunctionCall; "UNKNOWN TERMINAL")),
        }
    }
}

/// ANSI escape sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vt100;

impl TerminalProfile for Vt100 {
    fn escape(&self, request: TtyRequest) -> Result<String> {
        Ok(match request {
            TtyRequest::Cls => "\x1B[2J\x1B[H".to_string(),
            TtyRequest::CursorOn => "\x1B[?25h".to_string(),
            TtyRequest::CursorOff => "\x1B[?25l".to_string(),
            TtyRequest::At { row, col } => format!("\x1B[{};{}H", row, col),
            TtyRequest::Ink(n) => format!("\x1B[{}m", 30 + u32::from(n)),
            TtyRequest::Paper(n) => format!("\x1B[{}m", 40 + u32::from(n)),
        })
    }
}

/// Minitel style videotex. Every argument is offset into a single
/// printable byte, so values that would leave 7-bit ASCII are refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct Videotex;

impl Videotex {
    fn offset(base: u8, n: u8) -> Result<char> {
        match base.checked_add(n) {
            Some(b) if b < 0x80 => Ok(char::from(b)),
            _ => Err(error!(IllegalFunctionCall)),
        }
    }
}

impl TerminalProfile for Videotex {
    fn escape(&self, request: TtyRequest) -> Result<String> {
        Ok(match request {
            TtyRequest::Cls => "\x0C".to_string(),
            TtyRequest::CursorOn => "\x11".to_string(),
            TtyRequest::CursorOff => "\x14".to_string(),
            TtyRequest::At { row, col } => {
                let mut s = String::from("\x1F");
                s.push(Videotex::offset(64, row)?);
                s.push(Videotex::offset(64, col)?);
                s
            }
            TtyRequest::Ink(n) => format!("\x1B{}", Videotex::offset(0x40, n)?),
            TtyRequest::Paper(n) => format!("\x1B{}", Videotex::offset(0x50, n)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vt100() {
        let t = Vt100;
        assert_eq!(t.escape(TtyRequest::At { row: 3, col: 7 }).unwrap(), "\x1B[3;7H");
        assert_eq!(t.escape(TtyRequest::Ink(2)).unwrap(), "\x1B[32m");
        assert_eq!(t.escape(TtyRequest::Paper(255)).unwrap(), "\x1B[295m");
    }

    #[test]
    fn test_videotex() {
        let t = Videotex;
        assert_eq!(t.escape(TtyRequest::At { row: 1, col: 2 }).unwrap(), "\x1FAB");
        assert_eq!(t.escape(TtyRequest::Ink(1)).unwrap(), "\x1BA");
        assert_eq!(t.escape(TtyRequest::Paper(1)).unwrap(), "\x1BQ");
        assert!(t.escape(TtyRequest::Ink(64)).is_err());
        assert!(t.escape(TtyRequest::At { row: 200, col: 0 }).is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("VT100".parse::<TerminalKind>().unwrap(), TerminalKind::Vt100);
        assert_eq!("minitel".parse::<TerminalKind>().unwrap(), TerminalKind::Videotex);
        assert!("tty".parse::<TerminalKind>().is_err());
    }
}
