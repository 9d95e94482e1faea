use crate::RawValue;
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};

/// Attributes of a rule, in the order in which they were written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRule(Vec<(String, RawValue)>);

impl RawRule {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set an attribute.
    ///
    /// An attribute that is already present keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) -> Option<RawValue> {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => Some(core::mem::replace(v, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        let pos = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(pos).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn fmt_block(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result {
        for (key, value) in self.iter() {
            write!(f, "{:indent$}{}:", "", key, indent = indent)?;
            match value {
                RawValue::Map(map) if !value.is_inline() => {
                    writeln!(f)?;
                    map.fmt_block(f, indent + 2)?
                }
                _ => writeln!(f, " {}", value)?,
            }
        }
        Ok(())
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawRule {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        let mut rule = Self::new();
        iter.into_iter().for_each(|(k, v)| {
            rule.insert(k, v);
        });
        rule
    }
}

impl Display for RawRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_block(f, 0)
    }
}

/// Named raw rules, in the order in which they are written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRules(Vec<(String, RawRule)>);

impl RawRules {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, name: impl Into<String>, rule: RawRule) {
        self.0.push((name.into(), rule))
    }

    pub fn get(&self, name: &str) -> Option<&RawRule> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawRule)> {
        self.0.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Print rules in block style, one attribute per line.
///
/// Rules without attributes are printed as `null`,
/// just like members of an enumeration are usually written.
impl Display for RawRules {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (name, rule) in self.iter() {
            if rule.is_empty() {
                writeln!(f, "{}: null", name)?
            } else {
                writeln!(f, "{}:", name)?;
                rule.fmt_block(f, 2)?
            }
        }
        Ok(())
    }
}

#[test]
fn insert() {
    let mut rule = RawRule::new();
    assert_eq!(rule.insert("valeur", RawValue::from("10 * D")), None);
    rule.insert("question", RawValue::from("Combien ?"));
    let old = rule.insert("valeur", RawValue::Number(30.));
    assert_eq!(old, Some(RawValue::from("10 * D")));

    let keys: Vec<_> = rule.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["valeur", "question"]);
    assert_eq!(rule.remove("question"), Some(RawValue::from("Combien ?")));
    assert!(!rule.contains_key("question"));
}

#[test]
fn block() {
    use alloc::string::ToString;

    let contexte: RawRule = [("constant", RawValue::Number(20.))].into_iter().collect();
    let root: RawRule = [
        ("valeur", RawValue::from("inner")),
        ("contexte", RawValue::Map(contexte)),
    ]
    .into_iter()
    .collect();

    let mut rules = RawRules::new();
    rules.push("root", root);
    rules.push("b", RawRule::new());
    let expected = "root:\n  valeur: inner\n  contexte:\n    constant: 20\nb: null\n";
    assert_eq!(rules.to_string(), expected);
}
