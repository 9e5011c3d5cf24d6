use super::operation::format_g;
use crate::error;
use crate::lang::{Error, Keyword};

type Result<T> = std::result::Result<T, Error>;

/// ## Builtin functions
pub struct Function {}

impl Function {
    /// Applies a single argument numeric function.
    pub fn numeric(func: Keyword, n: f32) -> Result<f32> {
        use Keyword::*;
        Ok(match func {
            Abs => n.abs(),
            Sin => n.sin(),
            Cos => n.cos(),
            Tan => n.tan(),
            Asn => n.asin(),
            Acs => n.acos(),
            Atn => n.atan(),
            Exp => n.exp(),
            Ln => n.ln(),
            Sqr => n.sqrt(),
            Int => n.trunc(),
            Sgn => Function::sgn(n),
            Not => {
                if n == 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Bin => Function::bin(n)?,
            _ => return Err(error!(SyntaxError)),
        })
    }

    pub fn sgn(n: f32) -> f32 {
        if n > 0.0 {
            1.0
        } else if n < 0.0 {
            -1.0
        } else {
            0.0
        }
    }

    /// Reads the decimal digits of `n` as a binary number.
    pub fn bin(n: f32) -> Result<f32> {
        if !n.is_finite() || n < 0.0 {
            return Err(error!(IllegalFunctionCall));
        }
        let digits = format!("{:.0}", n.trunc());
        let mut value = 0.0f32;
        for digit in digits.bytes() {
            value = value * 2.0
                + match digit {
                    b'0' => 0.0,
                    b'1' => 1.0,
                    _ => return Err(error!(IllegalFunctionCall)),
                };
        }
        Ok(value)
    }

    pub fn code(s: &str) -> f32 {
        s.chars().next().map_or(0.0, |ch| ch as u32 as f32)
    }

    pub fn len(s: &str) -> f32 {
        s.chars().count() as f32
    }

    /// Text that is not a number reads as zero.
    pub fn val(s: &str) -> f32 {
        s.trim().parse::<f32>().unwrap_or(0.0)
    }

    pub fn chr(n: f32) -> Result<String> {
        let n = n.trunc();
        if !(0.0..=255.0).contains(&n) {
            return Err(error!(IllegalFunctionCall));
        }
        Ok(char::from(n as u8).to_string())
    }

    pub fn str(n: f32) -> String {
        format_g(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    #[test]
    fn test_bin() {
        assert_eq!(Function::bin(1011.0).unwrap(), 11.0);
        assert_eq!(Function::bin(0.0).unwrap(), 0.0);
        assert!(Function::bin(12.0).unwrap_err().is(ErrorCode::IllegalFunctionCall));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(Function::numeric(Keyword::Int, -2.7).unwrap(), -2.0);
        assert_eq!(Function::numeric(Keyword::Sgn, -0.1).unwrap(), -1.0);
        assert_eq!(Function::numeric(Keyword::Not, 0.0).unwrap(), 1.0);
        assert_eq!(Function::numeric(Keyword::Sqr, 16.0).unwrap(), 4.0);
        assert!(Function::numeric(Keyword::Print, 1.0).is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(Function::code("A"), 65.0);
        assert_eq!(Function::code(""), 0.0);
        assert_eq!(Function::len("HÉLLO"), 5.0);
        assert_eq!(Function::val(" 2.5 "), 2.5);
        assert_eq!(Function::val("X"), 0.0);
        assert_eq!(Function::chr(65.0).unwrap(), "A");
        assert!(Function::chr(256.0).is_err());
        assert_eq!(Function::str(0.5), "0.5");
    }
}
