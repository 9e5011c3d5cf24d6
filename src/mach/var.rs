use super::avl::AvlTree;
use super::Val;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// Longest string value, in characters.
pub const MAX_STRING_LEN: usize = 255;

/// Fails when `s` could not be stored in a variable.
pub fn check_length(s: &str) -> Result<()> {
    if s.chars().count() > MAX_STRING_LEN {
        return Err(error!(StringTooLong; "MAXIMUM STRING LENGTH IS 255"));
    }
    Ok(())
}

/// ## Variable memory
///
/// Keys carry the kind: `A` is numeric and `A$` is a string, so the two
/// never collide.

#[derive(Debug)]
pub struct Var {
    vars: AvlTree<String, Val>,
    capacity: usize,
}

impl Default for Var {
    fn default() -> Var {
        Var::new(u16::max_value() as usize)
    }
}

impl Var {
    pub fn new(capacity: usize) -> Var {
        Var {
            vars: AvlTree::new(),
            capacity,
        }
    }

    pub fn string_key(name: &str) -> String {
        format!("{}$", name)
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn find(&self, key: &str) -> Option<&Val> {
        self.vars.find(&key.to_string())
    }

    pub fn fetch_number(&self, name: &str) -> f32 {
        match self.find(name) {
            Some(Val::Number(n)) => *n,
            _ => 0.0,
        }
    }

    pub fn fetch_string(&self, name: &str) -> String {
        match self.vars.find(&Var::string_key(name)) {
            Some(Val::String(s)) => s.clone(),
            _ => String::new(),
        }
    }

    pub fn store_number(&mut self, name: &str, n: f32) -> Result<()> {
        self.store(name.to_string(), Val::Number(n))
    }

    pub fn store_string(&mut self, name: &str, s: String) -> Result<()> {
        self.store(Var::string_key(name), Val::String(s))
    }

    /// Stores under a full key. The value's kind must match the key.
    pub fn store(&mut self, key: String, value: Val) -> Result<()> {
        if key.ends_with('$') != value.is_string() {
            return Err(error!(SyntaxError; "TYPE MISMATCH"));
        }
        if let Val::String(s) = &value {
            check_length(s)?;
        }
        if let Some(slot) = self.vars.find_mut(&key) {
            *slot = value;
            return Ok(());
        }
        if self.vars.len() >= self.capacity {
            return Err(error!(OutOfMemory));
        }
        self.vars.insert(key, value);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Val)> {
        self.vars.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::TestResult;

    #[test]
    fn test_unset_defaults() {
        let var = Var::default();
        assert_eq!(var.fetch_number("A"), 0.0);
        assert_eq!(var.fetch_string("A"), "");
    }

    #[test]
    fn test_capacity() {
        let mut var = Var::new(1);
        var.store_number("A", 1.0).unwrap();
        var.store_number("A", 2.0).unwrap();
        assert!(var.store_string("A", "X".into()).unwrap_err().is(crate::lang::ErrorCode::OutOfMemory));
        assert_eq!(var.len(), 1);
    }

    #[test]
    fn test_string_length() {
        let mut var = Var::default();
        var.store_string("A", "X".repeat(MAX_STRING_LEN)).unwrap();
        let e = var.store_string("B", "X".repeat(MAX_STRING_LEN + 1)).unwrap_err();
        assert!(e.is(crate::lang::ErrorCode::StringTooLong));
        assert!(var.find("B$").is_none());
        var.store_string("C", "É".repeat(MAX_STRING_LEN)).unwrap();
    }

    #[test]
    fn test_kind_must_match_key() {
        let mut var = Var::default();
        assert!(var.store("A".into(), Val::String("X".into())).is_err());
        assert!(var.store("A$".into(), Val::Number(1.0)).is_err());
    }

    #[test]
    fn prop_number_and_string_never_alias() {
        fn property(n: f32, s: String) -> TestResult {
            if !n.is_finite() || s.chars().count() > MAX_STRING_LEN {
                return TestResult::discard();
            }
            let mut var = Var::default();
            var.store_number("A", n).unwrap();
            var.store_string("A", s.clone()).unwrap();
            TestResult::from_bool(
                var.fetch_number("A") == n
                    && var.fetch_string("A") == s
                    && var.find("A") == Some(&Val::Number(n)),
            )
        }
        let mut qc = quickcheck::QuickCheck::new().tests(50);
        qc.quickcheck(property as fn(f32, String) -> TestResult);
    }
}
