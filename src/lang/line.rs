use super::{tokenize, untokenize, Error, LineNumber};
use std::rc::Rc;

/// ## A stored program line
///
/// The token bytes are shared so the machine can keep executing a line
/// while the program index is being changed underneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    number: u16,
    tokens: Rc<[u8]>,
}

impl Line {
    pub fn new(number: u16, tokens: &[u8]) -> Line {
        Line {
            number,
            tokens: tokens.into(),
        }
    }

    /// Tokenizes numbered source. Direct lines and line numbers with no
    /// statement come back as `Ok(None)` together with their line number.
    pub fn parse(s: &str) -> Result<(LineNumber, Option<Line>), Error> {
        let (number, tokens) = tokenize(s)?;
        match number {
            Some(n) if !tokens.is_empty() => Ok((number, Some(Line::new(n, &tokens)))),
            _ => Ok((number, None)),
        }
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn tokens(&self) -> &Rc<[u8]> {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.number, untokenize(&self.tokens))
    }
}
