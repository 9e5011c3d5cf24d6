use super::operation::format_g;

/// A variable's value. The kind is fixed by the variable's name.
#[derive(Debug, Clone, PartialEq)]
pub enum Val {
    Number(f32),
    String(String),
}

impl Val {
    pub fn is_string(&self) -> bool {
        matches!(self, Val::String(_))
    }
}

impl Default for Val {
    fn default() -> Val {
        Val::Number(0.0)
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::Number(n) => write!(f, "{}", format_g(*n)),
            Val::String(s) => write!(f, "{}", s),
        }
    }
}
