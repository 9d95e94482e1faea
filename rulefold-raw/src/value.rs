use crate::RawRule;
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};
use itertools::Itertools;

/// Attribute value of a raw rule.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Map(RawRule),
}

impl RawValue {
    /// Return the text of the value if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Does the value fit on the line of its key?
    pub(crate) fn is_inline(&self) -> bool {
        match self {
            Self::Map(map) => map.is_empty(),
            _ => true,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.into())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(x: f64) -> Self {
        Self::Number(x)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Print inline values.
///
/// Maps are printed in flow style here;
/// block style is handled by [`RawRule`].
impl Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(true) => write!(f, "oui"),
            Self::Bool(false) => write!(f, "non"),
            Self::Number(x) => write!(f, "{}", x),
            Self::Text(s) if s.is_empty() => write!(f, "''"),
            Self::Text(s) => write!(f, "{}", s),
            Self::List(xs) => write!(f, "[{}]", xs.iter().format(", ")),
            Self::Map(map) => {
                let entries = map
                    .iter()
                    .format_with(", ", |(k, v), f| f(&format_args!("{}: {}", k, v)));
                write!(f, "{{{}}}", entries)
            }
        }
    }
}

#[test]
fn inline() {
    use alloc::string::ToString;
    use alloc::vec;
    assert_eq!(RawValue::Number(10.).to_string(), "10");
    assert_eq!(RawValue::Number(0.5).to_string(), "0.5");
    assert_eq!(RawValue::Bool(false).to_string(), "non");
    assert_eq!(RawValue::from("10 * D").to_string(), "10 * D");
    assert_eq!(RawValue::from("").to_string(), "''");
    let list = RawValue::List(vec![RawValue::from("b"), RawValue::from("c")]);
    assert_eq!(list.to_string(), "[b, c]");
}
