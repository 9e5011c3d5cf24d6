//! ## Token encoding
//!
//! One stored line is a byte stream. The first byte of every token is a
//! tag. Keywords carry their ordinal in the tag itself, numbers are
//! followed by four bytes of little-endian `f32`, strings and variable
//! names are followed by their bytes and a NUL. Punctuation is a single
//! raw byte. No token needs more lookahead than its own tag to skip.

pub use super::keyword::Keyword;
use std::convert::TryInto;

pub const TAG_KEYWORD: u8 = 0b1000_0000;
pub const TAG_NUMBER: u8 = 0b0100_0000;
pub const TAG_STRING: u8 = 0b0010_0000;
pub const TAG_NUMBER_VAR: u8 = 0b0001_0000;
pub const TAG_STRING_VAR: u8 = 0b0001_0001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    Keyword(Keyword),
    Number(f32),
    String(&'a [u8]),
    NumberVar(&'a str),
    StringVar(&'a str),
    Symbol(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    BitAnd,
    BitOr,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    LParen,
    RParen,
    Comma,
    Semicolon,
}

impl Symbol {
    pub fn from_byte(byte: u8) -> Option<Symbol> {
        use Symbol::*;
        Some(match byte {
            b'+' => Plus,
            b'-' => Minus,
            b'*' => Multiply,
            b'/' => Divide,
            b'%' => Modulus,
            b'&' => BitAnd,
            b'|' => BitOr,
            b'=' => Equal,
            b'<' => Less,
            b'>' => Greater,
            b'(' => LParen,
            b')' => RParen,
            b',' => Comma,
            b';' => Semicolon,
            // Two character comparisons fold to the single code plus 32.
            0x5D => NotEqual,
            0x5C => LessEqual,
            0x5E => GreaterEqual,
            _ => return None,
        })
    }

    pub fn byte(self) -> u8 {
        use Symbol::*;
        match self {
            Plus => b'+',
            Minus => b'-',
            Multiply => b'*',
            Divide => b'/',
            Modulus => b'%',
            BitAnd => b'&',
            BitOr => b'|',
            Equal => b'=',
            NotEqual => b'=' + 32,
            Less => b'<',
            LessEqual => b'<' + 32,
            Greater => b'>',
            GreaterEqual => b'>' + 32,
            LParen => b'(',
            RParen => b')',
            Comma => b',',
            Semicolon => b';',
        }
    }

    pub fn is_comparison(self) -> bool {
        use Symbol::*;
        matches!(
            self,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual
        )
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Symbol::*;
        match self {
            NotEqual => write!(f, "<>"),
            LessEqual => write!(f, "<="),
            GreaterEqual => write!(f, ">="),
            _ => write!(f, "{}", char::from(self.byte())),
        }
    }
}

impl<'a> Token<'a> {
    /// Decodes the token starting at `pos`, returning it and the position
    /// just past it. Truncated or unknown bytes decode to `None`.
    pub fn decode(bytes: &'a [u8], pos: usize) -> Option<(Token<'a>, usize)> {
        let tag = *bytes.get(pos)?;
        let body = pos + 1;
        if tag & TAG_KEYWORD != 0 {
            let keyword = Keyword::from_ordinal(tag & !TAG_KEYWORD)?;
            return Some((Token::Keyword(keyword), body));
        }
        match tag {
            TAG_NUMBER => {
                let raw: [u8; 4] = bytes.get(body..body + 4)?.try_into().ok()?;
                Some((Token::Number(f32::from_le_bytes(raw)), body + 4))
            }
            TAG_STRING => {
                let (s, next) = until_nul(bytes, body)?;
                Some((Token::String(s), next))
            }
            TAG_NUMBER_VAR | TAG_STRING_VAR => {
                let (s, next) = until_nul(bytes, body)?;
                let name = std::str::from_utf8(s).ok()?;
                if tag == TAG_NUMBER_VAR {
                    Some((Token::NumberVar(name), next))
                } else {
                    Some((Token::StringVar(name), next))
                }
            }
            _ => Some((Token::Symbol(Symbol::from_byte(tag)?), body)),
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Token::Keyword(kw) => out.push(TAG_KEYWORD | kw.ordinal()),
            Token::Number(n) => {
                out.push(TAG_NUMBER);
                out.extend_from_slice(&n.to_le_bytes());
            }
            Token::String(s) => {
                out.push(TAG_STRING);
                out.extend_from_slice(s);
                out.push(0);
            }
            Token::NumberVar(name) => {
                out.push(TAG_NUMBER_VAR);
                out.extend_from_slice(name.as_bytes());
                out.push(0);
            }
            Token::StringVar(name) => {
                out.push(TAG_STRING_VAR);
                out.extend_from_slice(name.as_bytes());
                out.push(0);
            }
            Token::Symbol(sym) => out.push(sym.byte()),
        }
    }
}

fn until_nul(bytes: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let rest = bytes.get(pos..)?;
    let len = rest.iter().position(|&b| b == 0)?;
    Some((&rest[..len], pos + len + 1))
}

/// A read position in an immutable token stream.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Cursor<'a> {
        Cursor { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewinds or skips to a position previously returned by `position`.
    pub fn seek(&mut self, pos: usize) {
        debug_assert!(pos <= self.bytes.len());
        self.pos = pos.min(self.bytes.len());
    }

    pub fn is_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<Token<'a>> {
        Token::decode(self.bytes, self.pos).map(|(token, _)| token)
    }

    /// Steps over the token at the cursor, if it decodes.
    pub fn advance(&mut self) -> bool {
        match Token::decode(self.bytes, self.pos) {
            Some((_, next)) => {
                self.pos = next;
                true
            }
            None => false,
        }
    }

    /// Takes everything left.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.bytes.get(self.pos..).unwrap_or_default();
        self.pos = self.bytes.len();
        rest
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (token, next) = Token::decode(self.bytes, self.pos)?;
        self.pos = next;
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_each_kind() {
        let mut bytes = vec![];
        Token::Keyword(Keyword::Print).encode(&mut bytes);
        Token::Number(2.5).encode(&mut bytes);
        Token::String(b"HI").encode(&mut bytes);
        Token::NumberVar("AB").encode(&mut bytes);
        Token::StringVar("A").encode(&mut bytes);
        Token::Symbol(Symbol::LessEqual).encode(&mut bytes);
        let tokens: Vec<Token> = Cursor::new(&bytes).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Print),
                Token::Number(2.5),
                Token::String(b"HI"),
                Token::NumberVar("AB"),
                Token::StringVar("A"),
                Token::Symbol(Symbol::LessEqual),
            ]
        );
    }

    #[test]
    fn test_layout() {
        let mut bytes = vec![];
        Token::Number(1.0).encode(&mut bytes);
        assert_eq!(bytes, vec![TAG_NUMBER, 0x00, 0x00, 0x80, 0x3F]);
        bytes.clear();
        Token::StringVar("A").encode(&mut bytes);
        assert_eq!(bytes, vec![TAG_STRING_VAR, b'A', 0]);
        bytes.clear();
        Token::Symbol(Symbol::NotEqual).encode(&mut bytes);
        assert_eq!(bytes, vec![0x5D]);
    }

    #[test]
    fn test_truncated_stream() {
        assert_eq!(Token::decode(&[TAG_NUMBER, 1, 2], 0), None);
        assert_eq!(Token::decode(&[TAG_STRING, b'A'], 0), None);
        assert_eq!(Token::decode(&[b'!'], 0), None);
        assert_eq!(Token::decode(&[], 0), None);
    }

    #[test]
    fn test_cursor() {
        let bytes = [b'(', TAG_NUMBER, 0, 0, 0x80, 0x3F, b')'];
        let mut cursor = Cursor::new(&bytes);
        assert_eq!(cursor.peek(), Some(Token::Symbol(Symbol::LParen)));
        assert!(cursor.advance());
        let mark = cursor.position();
        assert_eq!(cursor.next(), Some(Token::Number(1.0)));
        cursor.seek(mark);
        assert_eq!(cursor.rest(), &[TAG_NUMBER, 0, 0, 0x80, 0x3F, b')'][..]);
        assert!(cursor.is_end());
    }
}
