//! Reserved words and the packed keyword table.
//!
//! The table is every spelling laid end to end with bit 7 set on the
//! last byte of each word. A keyword's ordinal is the index of its run.

const END_TAG: u8 = 0b1000_0000;

macro_rules! keywords {
    ($($name:ident => $spelling:expr,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($name,)*
        }

        impl Keyword {
            /// Every keyword in ordinal order.
            pub const ALL: &'static [Keyword] = &[$(Keyword::$name,)*];
        }

        const SPELLINGS: &[&str] = &[$($spelling,)*];
    };
}

keywords! {
    Print => "PRINT",
    Input => "INPUT",
    Let => "LET",
    If => "IF",
    Then => "THEN",
    For => "FOR",
    To => "TO",
    Step => "STEP",
    Next => "NEXT",
    Goto => "GOTO",
    Gosub => "GOSUB",
    Return => "RETURN",
    Run => "RUN",
    Cont => "CONT",
    Stop => "STOP",
    New => "NEW",
    Clear => "CLEAR",
    List => "LIST",
    Save => "SAVE",
    Load => "LOAD",
    Erase => "ERASE",
    Cat => "CAT",
    Rem => "REM",
    Cls => "CLS",
    At => "AT",
    Ink => "INK",
    Paper => "PAPER",
    Con => "CON",
    Coff => "COFF",
    And => "AND",
    Or => "OR",
    Not => "NOT",
    Pi => "PI",
    Rnd => "RND",
    Abs => "ABS",
    Sin => "SIN",
    Cos => "COS",
    Tan => "TAN",
    Asn => "ASN",
    Acs => "ACS",
    Atn => "ATN",
    Exp => "EXP",
    Ln => "LN",
    Sqr => "SQR",
    Int => "INT",
    Sgn => "SGN",
    Bin => "BIN",
    Code => "CODE",
    Len => "LEN",
    Val => "VAL",
    Chr => "CHR$",
    Str => "STR$",
}

const fn packed_len(words: &[&str]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < words.len() {
        len += words[i].len();
        i += 1;
    }
    len
}

const TABLE_LEN: usize = packed_len(SPELLINGS);

const fn pack(words: &[&str]) -> [u8; TABLE_LEN] {
    let mut table = [0u8; TABLE_LEN];
    let mut at = 0;
    let mut i = 0;
    while i < words.len() {
        let bytes = words[i].as_bytes();
        let mut j = 0;
        while j < bytes.len() {
            table[at] = if j + 1 == bytes.len() {
                bytes[j] | END_TAG
            } else {
                bytes[j]
            };
            at += 1;
            j += 1;
        }
        i += 1;
    }
    table
}

static TABLE: [u8; TABLE_LEN] = pack(SPELLINGS);

fn runs() -> impl Iterator<Item = &'static [u8]> {
    TABLE.split_inclusive(|b| b & END_TAG != 0)
}

impl Keyword {
    /// Exact, full-word match of an uppercased identifier.
    pub fn lookup(word: &[u8]) -> Option<Keyword> {
        let ordinal = runs().position(|run| {
            run.len() == word.len() && run.iter().zip(word).all(|(k, w)| k & !END_TAG == *w)
        })?;
        Keyword::ALL.get(ordinal).copied()
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Keyword> {
        Keyword::ALL.get(ordinal as usize).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Keywords that take an argument directly after them.
    pub fn is_function(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            Not | Abs
                | Sin
                | Cos
                | Tan
                | Asn
                | Acs
                | Atn
                | Exp
                | Ln
                | Sqr
                | Int
                | Sgn
                | Bin
                | Code
                | Len
                | Val
                | Chr
                | Str
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(run) = runs().nth(self.ordinal() as usize) {
            for b in run {
                write!(f, "{}", char::from(b & !END_TAG))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_fit_in_tag() {
        assert!(Keyword::ALL.len() < 128);
        for (index, kw) in Keyword::ALL.iter().enumerate() {
            assert_eq!(kw.ordinal() as usize, index);
        }
    }

    #[test]
    fn test_render_matches_spelling() {
        for (kw, spelling) in Keyword::ALL.iter().zip(SPELLINGS) {
            assert_eq!(&kw.to_string(), spelling);
            assert_eq!(Keyword::lookup(spelling.as_bytes()), Some(*kw));
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Keyword::lookup(b"PRINT"), Some(Keyword::Print));
        assert_eq!(Keyword::lookup(b"CHR$"), Some(Keyword::Chr));
        assert_eq!(Keyword::lookup(b"PRIN"), None);
        assert_eq!(Keyword::lookup(b"PRINTS"), None);
        assert_eq!(Keyword::lookup(b"CHR"), None);
        assert_eq!(Keyword::lookup(b""), None);
    }

    #[test]
    fn test_table_is_tagged() {
        assert_eq!(runs().count(), Keyword::ALL.len());
        assert_eq!(TABLE[0], b'P');
        assert_eq!(TABLE[4], b'T' | END_TAG);
    }
}
