//! Values that rules evaluate to.

use alloc::string::String;
use core::fmt::{self, Display};

/// Value of a rule or an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// absent value, e.g. of a rule that is not applicable
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// Does the value count as true in a condition?
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(x) => *x != 0.,
            Self::Text(s) => !s.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(true) => write!(f, "oui"),
            Self::Bool(false) => write!(f, "non"),
            Self::Number(x) => write!(f, "{}", x),
            Self::Text(s) => write!(f, "'{}'", s),
        }
    }
}

/// Unit of a numeric value, such as `€` or `km/h`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit(pub String);

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
