//! Rule names with fast copying, hashing and equality checking.

use core::fmt;
use core::hash::{Hash, Hasher};

/// Separator between the components of a dotted name.
pub const SEP: &str = " . ";

/// Dotted rule name with fast copying, hashing, and equality check.
///
/// Copying, hashing, and equality checking is performed on
/// the address of the underlying string, making them constant-time operations.
/// More importantly, two names are only equal if
/// they were handed out by the same name resolution,
/// so a reference to `a . b` never matches a rule `a . bc`,
/// nor a second rule that happens to be spelled `a . b`:
///
/// ~~~
/// # use rulefold::RuleName;
/// let h1 = String::from("a . b");
/// let h2 = String::from("a . b");
/// let n1 = RuleName::new(&h1);
/// let n2 = RuleName::new(&h2);
///
/// assert_eq!(n1, n1.clone());
/// assert_ne!(n1, n2);
/// assert_eq!(n1.as_str(), n2.as_str());
/// ~~~
///
/// To consistently assign the same names to equivalent strings,
/// you can use the [`Names`] type.
///
/// [`Names`]: crate::Names
#[derive(Copy, Clone, Debug)]
pub struct RuleName<'s>(&'s str);

impl<'s> RuleName<'s> {
    pub fn new(s: &'s str) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &'s str {
        self.0
    }

    /// Components of the dotted name, from the outermost namespace on.
    pub fn components(&self) -> impl Iterator<Item = &'s str> {
        self.0.split(SEP)
    }

    /// Names of the enclosing namespaces, from the outermost one on.
    ///
    /// ~~~
    /// # use rulefold::RuleName;
    /// let name = RuleName::new("a . b . c");
    /// assert_eq!(name.namespaces().collect::<Vec<_>>(), ["a", "a . b"]);
    /// ~~~
    pub fn namespaces(&self) -> impl Iterator<Item = &'s str> {
        let s = self.0;
        s.match_indices(SEP).map(move |(i, _)| &s[..i])
    }

    /// Is this the name of a node that shadows a rule in situations?
    ///
    /// Such names end with a component starting with `$`, e.g. `a . $SITUATION`.
    pub fn is_internal(&self) -> bool {
        self.components()
            .last()
            .map_or(false, |last| last.starts_with('$'))
    }
}

impl<'s> Hash for RuleName<'s> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::ptr::hash(self.0, state)
    }
}

impl<'s> PartialEq for RuleName<'s> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.0, other.0)
    }
}

impl<'s> Eq for RuleName<'s> {}

impl<'s> fmt::Display for RuleName<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

#[test]
fn internal() {
    assert!(RuleName::new("a . $SITUATION").is_internal());
    assert!(!RuleName::new("a . b").is_internal());
    assert!(!RuleName::new("a$").is_internal());
}
