use crate::lang::token::Symbol;

/// ## Numeric operators
///
/// Everything is single precision. `%`, `&` and `|` work on the operands
/// truncated toward zero.
pub struct Operation {}

impl Operation {
    pub fn negate(n: f32) -> f32 {
        -n
    }

    pub fn binary(op: Symbol, lhs: f32, rhs: f32) -> f32 {
        use Symbol::*;
        match op {
            Plus => lhs + rhs,
            Minus => lhs - rhs,
            Multiply => lhs * rhs,
            Divide => lhs / rhs,
            Modulus => Operation::modulus(lhs, rhs),
            BitAnd => (truncate(lhs) & truncate(rhs)) as f32,
            BitOr => (truncate(lhs) | truncate(rhs)) as f32,
            _ => Operation::compare(op, lhs, rhs),
        }
    }

    /// A zero divisor gives infinity instead of trapping.
    pub fn modulus(lhs: f32, rhs: f32) -> f32 {
        let divisor = truncate(rhs);
        if divisor == 0 {
            return f32::INFINITY;
        }
        truncate(lhs).wrapping_rem(divisor) as f32
    }

    pub fn compare(op: Symbol, lhs: f32, rhs: f32) -> f32 {
        use Symbol::*;
        truth(match op {
            Equal => lhs == rhs,
            NotEqual => lhs != rhs,
            Less => lhs < rhs,
            LessEqual => lhs <= rhs,
            Greater => lhs > rhs,
            GreaterEqual => lhs >= rhs,
            _ => false,
        })
    }

    pub fn compare_strings(op: Symbol, lhs: &str, rhs: &str) -> f32 {
        use Symbol::*;
        truth(match op {
            Equal => lhs == rhs,
            NotEqual => lhs != rhs,
            Less => lhs < rhs,
            LessEqual => lhs <= rhs,
            Greater => lhs > rhs,
            GreaterEqual => lhs >= rhs,
            _ => false,
        })
    }

    pub fn and(lhs: f32, rhs: f32) -> f32 {
        truth(lhs != 0.0 && rhs != 0.0)
    }

    pub fn or(lhs: f32, rhs: f32) -> f32 {
        truth(lhs != 0.0 || rhs != 0.0)
    }
}

fn truncate(n: f32) -> i32 {
    n.trunc() as i32
}

fn truth(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Formats like C's `%g`: six significant digits, trailing zeros dropped,
/// exponent form outside 1e-4..1e6.
pub fn format_g(n: f32) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let n = f64::from(n);
    let sci = format!("{:.5e}", n);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => return sci,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= 6 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_zeros(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (5 - exponent) as usize;
        strip_zeros(&format!("{:.*}", decimals, n)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_g() {
        assert_eq!(format_g(14.0), "14");
        assert_eq!(format_g(-2.5), "-2.5");
        assert_eq!(format_g(1.0 / 3.0), "0.333333");
        assert_eq!(format_g(123456.0), "123456");
        assert_eq!(format_g(1234567.0), "1.23457e+06");
        assert_eq!(format_g(1e10), "1e+10");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(0.00001), "1e-05");
        assert_eq!(format_g(f32::INFINITY), "inf");
        assert_eq!(format_g(0.0), "0");
    }

    #[test]
    fn test_modulus() {
        assert_eq!(Operation::modulus(7.0, 3.0), 1.0);
        assert_eq!(Operation::modulus(-7.9, 3.2), -1.0);
        assert_eq!(Operation::modulus(7.0, 0.0), f32::INFINITY);
        assert_eq!(Operation::modulus(7.0, 0.5), f32::INFINITY);
    }

    #[test]
    fn test_binary() {
        assert_eq!(Operation::binary(Symbol::BitAnd, 6.0, 3.0), 2.0);
        assert_eq!(Operation::binary(Symbol::BitOr, 6.0, 3.0), 7.0);
        assert_eq!(Operation::binary(Symbol::Divide, 1.0, 0.0), f32::INFINITY);
        assert_eq!(Operation::binary(Symbol::LessEqual, 1.0, 1.0), 1.0);
        assert_eq!(Operation::compare_strings(Symbol::Less, "A", "B"), 1.0);
        assert_eq!(Operation::and(1.0, 0.0), 0.0);
        assert_eq!(Operation::or(1.0, 0.0), 1.0);
    }
}
