//! Maps from rule names to rules.

use crate::rule::{Rule, Status};
use crate::RuleName;
use alloc::{string::String, vec::Vec};
use rulefold_raw::RawValue;

/// Immutable HashMap for fast cloning of graphs.
type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

#[derive(Debug)]
pub enum Error {
    Reintroduction,
    /// another rule with the same text is already in the graph
    Ambiguous(String),
}

/// Rules by their names.
///
/// Cloning a graph is cheap, and
/// modifying the clone leaves the original untouched.
///
/// ~~~
/// # use rulefold::{Expr, Graph, Names, Rule};
/// let names: Names = ["a", "b"].into_iter().collect();
/// let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());
///
/// let mut graph = Graph::new();
/// graph.insert(Rule::new(a).with_value(Expr::from(b)))?;
/// let copy = graph.clone();
/// graph.remove(a);
/// assert!(copy.contains(a));
/// assert_eq!(copy.find("a"), Some(a));
/// assert_eq!(graph.find("a"), None);
/// # Ok::<_, rulefold::Error>(())
/// ~~~
#[derive(Clone, Debug, Default)]
pub struct Graph<'s> {
    rules: FnvHashMap<RuleName<'s>, Rule<'s>>,
    paths: FnvHashMap<&'s str, RuleName<'s>>,
}

impl<'s> Graph<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new rule to the graph.
    pub fn insert(&mut self, rule: Rule<'s>) -> Result<(), Error> {
        let name = rule.name;
        match self.paths.get(name.as_str()) {
            Some(other) if *other == name => return Err(Error::Reintroduction),
            Some(_) => return Err(Error::Ambiguous(name.as_str().into())),
            None => (),
        }
        self.paths.insert(name.as_str(), name);
        self.rules.insert(name, rule);
        Ok(())
    }

    pub fn get(&self, name: RuleName<'s>) -> Option<&Rule<'s>> {
        self.rules.get(&name)
    }

    pub fn get_mut(&mut self, name: RuleName<'s>) -> Option<&mut Rule<'s>> {
        self.rules.get_mut(&name)
    }

    pub fn remove(&mut self, name: RuleName<'s>) -> Option<Rule<'s>> {
        let rule = self.rules.remove(&name)?;
        self.paths.remove(name.as_str());
        Some(rule)
    }

    /// Return the name of the rule with the given text.
    pub fn find(&self, path: &str) -> Option<RuleName<'s>> {
        self.paths.get(path).copied()
    }

    pub fn contains(&self, name: RuleName<'s>) -> bool {
        self.rules.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Return the names of all rules, sorted by their text.
    pub fn names(&self) -> Vec<RuleName<'s>> {
        let mut names: Vec<_> = self.rules.keys().copied().collect();
        names.sort_unstable_by_key(|name| name.as_str());
        names
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<'s>> {
        self.rules.values()
    }

    /// Is the rule in the graph and visible from everywhere?
    ///
    /// This is not the case for private rules and
    /// for rules in the namespace of a private rule.
    pub fn is_accessible(&self, name: RuleName<'s>) -> bool {
        let private = |name: RuleName<'s>| self.get(name).map_or(false, |rule| rule.private);
        self.contains(name)
            && !private(name)
            && !name
                .namespaces()
                .filter_map(|ns| self.find(ns))
                .any(private)
    }

    /// Set the status of rules from their raw marker attribute.
    ///
    /// This recovers the status of rules that were folded before.
    pub fn restore_status(&mut self, marker: &str) {
        for name in self.names() {
            let status = self.get(name).and_then(|rule| rule.raw.get(marker));
            let status = status.and_then(RawValue::as_text).and_then(Status::from_marker);
            if let (Some(status), Some(rule)) = (status, self.get_mut(name)) {
                rule.status = status
            }
        }
    }
}
