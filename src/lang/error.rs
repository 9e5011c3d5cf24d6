use super::LineNumber;

#[derive(Clone, PartialEq)]
pub struct Error {
    code: u16,
    line_number: LineNumber,
    message: &'static str,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $line:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).in_line_number($line)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $line:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .in_line_number($line)
            .message($msg)
    };
}

/// The four families every error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed line or statement. Always caught before any side effect.
    Syntax,
    /// Valid syntax but a dynamic condition failed.
    Runtime,
    /// A line or variable could not be allocated.
    Memory,
    /// The persistence collaborator failed.
    Io,
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as u16,
            line_number: None,
            message: "",
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn is_direct(&self) -> bool {
        self.line_number.is_none()
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as u16
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            2 | 23 => ErrorKind::Syntax,
            7 => ErrorKind::Memory,
            53 | 57 | 62 | 64 => ErrorKind::Io,
            _ => ErrorKind::Runtime,
        }
    }

    pub fn in_line_number(&self, line: LineNumber) -> Error {
        Error {
            code: self.code,
            line_number: line,
            message: self.message,
        }
    }

    pub fn message(&self, message: &'static str) -> Error {
        debug_assert_eq!(self.message.len(), 0);
        Error {
            code: self.code,
            line_number: self.line_number,
            message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NextWithoutFor = 1,
    SyntaxError = 2,
    ReturnWithoutGosub = 3,
    IllegalFunctionCall = 5,
    OutOfMemory = 7,
    UndefinedLine = 8,
    IllegalDirect = 12,
    StringTooLong = 15,
    CantContinue = 17,
    LineBufferOverflow = 23,
    GosubStackOverflow = 24,
    Break = 27,
    FileNotFound = 53,
    DiskIoError = 57,
    InputPastEnd = 62,
    BadFileName = 64,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            1 => "NEXT WITHOUT FOR",
            2 => "SYNTAX ERROR",
            3 => "RETURN WITHOUT GOSUB",
            5 => "ILLEGAL FUNCTION CALL",
            7 => "OUT OF MEMORY",
            8 => "UNDEFINED LINE",
            12 => "ILLEGAL DIRECT",
            15 => "STRING TOO LONG",
            17 => "CAN'T CONTINUE",
            23 => "LINE BUFFER OVERFLOW",
            24 => "GOSUB STACK OVERFLOW",
            27 => "BREAK",
            53 => "FILE NOT FOUND",
            57 => "DISK I/O ERROR",
            62 => "INPUT PAST END",
            64 => "BAD FILE NAME",
            _ => "",
        };
        let mut suffix = String::new();
        if let Some(line_number) = self.line_number {
            suffix.push_str(&format!(" {}", line_number));
        }
        let mut message = String::new();
        if !self.message.is_empty() {
            message.push_str(&format!("; {}", self.message));
        }
        if code_str.is_empty() {
            if suffix.is_empty() {
                write!(f, "PROGRAM ERROR {}{}", self.code, message)
            } else {
                write!(f, "PROGRAM ERROR {} IN{}{}", self.code, suffix, message)
            }
        } else if suffix.is_empty() {
            write!(f, "{}{}", code_str, message)
        } else {
            write!(f, "{} IN{}{}", code_str, suffix, message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(error!(SyntaxError).to_string(), "SYNTAX ERROR");
        assert_eq!(
            error!(UndefinedLine, Some(10)).to_string(),
            "UNDEFINED LINE IN 10"
        );
        assert_eq!(
            error!(SyntaxError, Some(20); "UNTERMINATED STRING").to_string(),
            "SYNTAX ERROR IN 20; UNTERMINATED STRING"
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(error!(SyntaxError).kind(), ErrorKind::Syntax);
        assert_eq!(error!(ReturnWithoutGosub).kind(), ErrorKind::Runtime);
        assert_eq!(error!(GosubStackOverflow).kind(), ErrorKind::Runtime);
        assert_eq!(error!(StringTooLong).kind(), ErrorKind::Runtime);
        assert_eq!(error!(OutOfMemory).kind(), ErrorKind::Memory);
        assert_eq!(error!(InputPastEnd).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_direct() {
        assert!(error!(Break).is_direct());
        assert!(!error!(Break, Some(5)).is_direct());
        assert!(error!(Break, Some(5)).is(ErrorCode::Break));
    }
}
