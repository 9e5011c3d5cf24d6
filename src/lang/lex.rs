use super::token::*;
use super::{Error, LineNumber, MAX_LINE_LEN};

type Result<T> = std::result::Result<T, Error>;

/// Encodes one line of source. A leading number becomes the line number
/// and is not part of the returned stream. An empty stream with a line
/// number means "delete that line".
pub fn tokenize(s: &str) -> Result<(LineNumber, Vec<u8>)> {
    let s = s.trim_end_matches(|c| c == '\r' || c == '\n');
    if s.len() > MAX_LINE_LEN {
        return Err(error!(LineBufferOverflow));
    }
    BasicLexer::lex(s.as_bytes())
}

fn is_basic_whitespace(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

fn is_basic_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_basic_alphabetic(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

struct BasicLexer<'a> {
    src: &'a [u8],
    pos: usize,
    out: Vec<u8>,
}

impl<'a> BasicLexer<'a> {
    fn lex(src: &'a [u8]) -> Result<(LineNumber, Vec<u8>)> {
        let mut lexer = BasicLexer {
            src,
            pos: 0,
            out: Vec::with_capacity(src.len() + 8),
        };
        let mut line_number = None;
        let mut first = true;
        while let Some(ch) = lexer.peek() {
            if is_basic_whitespace(ch) {
                lexer.pos += 1;
                continue;
            }
            if is_basic_digit(ch) {
                let value = lexer.number()?;
                if first {
                    line_number = Some(Self::line_number(value)?);
                } else {
                    Token::Number(value).encode(&mut lexer.out);
                }
            } else if is_basic_alphabetic(ch) {
                if lexer.alphabetic()? == Some(Keyword::Rem) {
                    lexer.remark();
                }
            } else if ch == b'"' {
                lexer.string()?;
            } else {
                lexer.minutia()?;
            }
            first = false;
        }
        if lexer.out.len() > MAX_LINE_LEN {
            return Err(error!(LineBufferOverflow));
        }
        Ok((line_number, lexer.out))
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.pos + ahead).copied()
    }

    fn line_number(value: f32) -> Result<u16> {
        let msg = "INVALID LINE NUMBER";
        if value.fract() != 0.0 || value < 1.0 || value > u16::max_value() as f32 {
            return Err(error!(SyntaxError; msg));
        }
        Ok(value as u16)
    }

    fn number(&mut self) -> Result<f32> {
        let start = self.pos;
        while self.peek().map_or(false, is_basic_digit) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            while self.peek().map_or(false, is_basic_digit) {
                self.pos += 1;
            }
        }
        if let Some(b'E') | Some(b'e') = self.peek() {
            let sign = match self.peek_at(1) {
                Some(b'+') | Some(b'-') => 1,
                _ => 0,
            };
            if self.peek_at(1 + sign).map_or(false, is_basic_digit) {
                self.pos += 1 + sign;
                while self.peek().map_or(false, is_basic_digit) {
                    self.pos += 1;
                }
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| error!(SyntaxError; "INVALID NUMBER"))?;
        match text.parse::<f32>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => Err(error!(SyntaxError; "NUMBER OUT OF RANGE")),
            Err(_) => Err(error!(SyntaxError; "INVALID NUMBER")),
        }
    }

    fn string(&mut self) -> Result<()> {
        self.pos += 1;
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(error!(SyntaxError; "UNTERMINATED STRING")),
                Some(0) => return Err(error!(SyntaxError; "INVALID CHARACTER")),
                Some(b'"') => break,
                Some(_) => self.pos += 1,
            }
        }
        Token::String(&self.src[start..self.pos]).encode(&mut self.out);
        self.pos += 1;
        Ok(())
    }

    /// A run of letters and digits, optionally closed by `$`.
    fn alphabetic(&mut self) -> Result<Option<Keyword>> {
        let mut word = Vec::new();
        while let Some(ch) = self.peek() {
            if is_basic_alphabetic(ch) || is_basic_digit(ch) {
                word.push(ch.to_ascii_uppercase());
                self.pos += 1;
            } else if ch == b'$' {
                word.push(ch);
                self.pos += 1;
                break;
            } else {
                break;
            }
        }
        if let Some(keyword) = Keyword::lookup(&word) {
            Token::Keyword(keyword).encode(&mut self.out);
            return Ok(Some(keyword));
        }
        let name = String::from_utf8(word).map_err(|_| error!(SyntaxError))?;
        match name.strip_suffix('$') {
            Some(stem) => Token::StringVar(stem).encode(&mut self.out),
            None => Token::NumberVar(&name).encode(&mut self.out),
        }
        Ok(None)
    }

    /// Everything after REM is kept verbatim.
    fn remark(&mut self) {
        while self.peek().map_or(false, is_basic_whitespace) {
            self.pos += 1;
        }
        let text: Vec<u8> = self.src[self.pos..]
            .iter()
            .copied()
            .filter(|&b| b != 0)
            .collect();
        self.pos = self.src.len();
        if !text.is_empty() {
            Token::String(&text).encode(&mut self.out);
        }
    }

    fn minutia(&mut self) -> Result<()> {
        let ch = self.src[self.pos];
        let next = self.peek_at(1);
        let symbol = match (ch, next) {
            (b'<', Some(b'>')) => Some(Symbol::NotEqual),
            (b'<', Some(b'=')) => Some(Symbol::LessEqual),
            (b'>', Some(b'=')) => Some(Symbol::GreaterEqual),
            _ => None,
        };
        if let Some(symbol) = symbol {
            self.pos += 2;
            Token::Symbol(symbol).encode(&mut self.out);
            return Ok(());
        }
        let symbol = match ch {
            b';' | b',' | b'+' | b'-' | b'|' | b'&' | b'*' | b'/' | b'%' | b'=' | b'<'
            | b'>' | b'(' | b')' => Symbol::from_byte(ch),
            _ => None,
        };
        match symbol {
            Some(symbol) => {
                self.pos += 1;
                Token::Symbol(symbol).encode(&mut self.out);
                Ok(())
            }
            None => Err(error!(SyntaxError; "INVALID CHARACTER")),
        }
    }
}
