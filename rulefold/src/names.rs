//! Maps from dotted strings to rule names.

use crate::name::{RuleName, SEP};
use alloc::{format, string::String, vec::Vec};
use fnv::FnvHashMap;

#[derive(Debug)]
pub enum Error {
    Reinsertion,
}

/// Map from dotted strings to rule names.
///
/// This is where rule names obtain their identity:
/// every string is inserted once, and
/// all later lookups of the same string yield the same name.
#[derive(Default)]
pub struct Names<'s>(FnvHashMap<&'s str, RuleName<'s>>);

impl<'s> Names<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, path: &str) -> Option<RuleName<'s>> {
        self.0.get(path).copied()
    }

    pub fn insert(&mut self, s: &'s str) -> Result<RuleName<'s>, Error> {
        let name = RuleName::new(s);
        if self.0.insert(s, name).is_some() {
            return Err(Error::Reinsertion);
        }
        Ok(name)
    }

    /// Resolve a reference made from within the rule `context`.
    ///
    /// The reference is searched in the namespace of the context first,
    /// then in the enclosing namespaces, and finally at the top level.
    ///
    /// ~~~
    /// # use rulefold::Names;
    /// let names: Names = ["a . b", "a . c", "c", "d"].into_iter().collect();
    /// let ab = names.get("a . b").unwrap();
    /// assert_eq!(names.resolve(ab, "c"), names.get("a . c"));
    /// assert_eq!(names.resolve(ab, "d"), names.get("d"));
    /// assert_eq!(names.resolve(ab, "e"), None);
    /// ~~~
    pub fn resolve(&self, context: RuleName<'s>, reference: &str) -> Option<RuleName<'s>> {
        let namespaces: Vec<_> = context.namespaces().collect();
        let scopes = core::iter::once(context.as_str())
            .chain(namespaces.into_iter().rev())
            .map(|scope| format!("{}{}{}", scope, SEP, reference));
        scopes
            .chain(core::iter::once(String::from(reference)))
            .find_map(|path| self.get(&path))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collect names, where equal strings obtain the same name.
impl<'s> FromIterator<&'s str> for Names<'s> {
    fn from_iter<I: IntoIterator<Item = &'s str>>(iter: I) -> Self {
        let mut names = Self::new();
        for s in iter {
            if names.get(s).is_none() {
                names.0.insert(s, RuleName::new(s));
            }
        }
        names
    }
}

#[test]
fn reinsertion() {
    let mut names = Names::new();
    let a = names.insert("a").unwrap();
    assert_eq!(names.get("a"), Some(a));
    assert!(matches!(names.insert("a"), Err(Error::Reinsertion)));
    assert_eq!(names.len(), 1);
}

#[test]
fn resolve_prefers_innermost() {
    let names: Names = ["a . b . c", "a . c", "c", "a . b"].into_iter().collect();
    let ab = names.get("a . b").unwrap();
    assert_eq!(names.resolve(ab, "c"), names.get("a . b . c"));
    assert_eq!(names.resolve(ab, "a . c"), names.get("a . c"));
    // relative paths are resolved in enclosing namespaces
    assert_eq!(names.resolve(ab, "b . c"), names.get("a . b . c"));
}
