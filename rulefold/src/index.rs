//! References between rules, in both directions.

use crate::{Graph, RuleName};
use alloc::vec::Vec;
use fnv::{FnvHashMap, FnvHashSet};

type Links<'s> = FnvHashMap<RuleName<'s>, FnvHashSet<RuleName<'s>>>;

/// Which rules refer to which other rules.
///
/// The parents of a rule are the rules that refer to it, and
/// the children of a rule are the rules it refers to.
/// Both maps are kept as transposes of each other.
///
/// ~~~
/// # use rulefold::{Expr, Graph, Names, ReferenceIndex, Rule};
/// let names: Names = ["a", "b", "c"].into_iter().collect();
/// let [a, b, c] = ["a", "b", "c"].map(|n| names.get(n).unwrap());
///
/// let mut graph = Graph::new();
/// graph.insert(Rule::new(a).with_value(Expr::from(b) + Expr::from(c)))?;
/// graph.insert(Rule::new(b).with_value(Expr::from(c)))?;
/// graph.insert(Rule::new(c))?;
///
/// let index = ReferenceIndex::new(&graph);
/// assert_eq!(index.parents(c), [a, b]);
/// assert_eq!(index.children(a), [b, c]);
/// assert!(!index.has_parents(a));
/// # Ok::<_, rulefold::Error>(())
/// ~~~
#[derive(Debug, Default)]
pub struct ReferenceIndex<'s> {
    parents: Links<'s>,
    children: Links<'s>,
}

fn sorted<'s>(names: Option<&FnvHashSet<RuleName<'s>>>) -> Vec<RuleName<'s>> {
    let mut names: Vec<_> = names.into_iter().flatten().copied().collect();
    names.sort_unstable_by_key(|name| name.as_str());
    names
}

/// Remove a link from `from` to `to`, dropping the entry of `from` if it becomes empty.
fn detach<'s>(links: &mut Links<'s>, from: RuleName<'s>, to: RuleName<'s>) {
    if let Some(set) = links.get_mut(&from) {
        set.remove(&to);
        if set.is_empty() {
            links.remove(&from);
        }
    }
}

impl<'s> ReferenceIndex<'s> {
    /// Index the references in all expressions of the graph.
    ///
    /// References of a rule to itself and to internal names are ignored.
    pub fn new(graph: &Graph<'s>) -> Self {
        let mut index = Self::default();
        for rule in graph.rules() {
            let children = index.children.entry(rule.name).or_default();
            let mut add = |child: RuleName<'s>| {
                if child != rule.name && !child.is_internal() {
                    children.insert(child);
                }
            };
            rule.exprs().for_each(|e| e.for_each_dependency(&mut add));
        }
        for (parent, children) in &index.children {
            for child in children {
                index.parents.entry(*child).or_default().insert(*parent);
            }
        }
        index
    }

    /// Rules that refer to the given rule, sorted by their text.
    pub fn parents(&self, name: RuleName<'s>) -> Vec<RuleName<'s>> {
        sorted(self.parents.get(&name))
    }

    /// Rules that the given rule refers to, sorted by their text.
    pub fn children(&self, name: RuleName<'s>) -> Vec<RuleName<'s>> {
        sorted(self.children.get(&name))
    }

    pub fn has_parents(&self, name: RuleName<'s>) -> bool {
        self.parents.contains_key(&name)
    }

    /// Forget that `parent` refers to `child`.
    pub fn unlink(&mut self, parent: RuleName<'s>, child: RuleName<'s>) {
        if let Some(children) = self.children.get_mut(&parent) {
            children.remove(&child);
        }
        detach(&mut self.parents, child, parent)
    }

    /// Remove a rule that is not referred to by any rule.
    pub fn remove(&mut self, name: RuleName<'s>) {
        assert!(!self.has_parents(name), "{} is still referenced", name);
        for child in self.children.remove(&name).into_iter().flatten() {
            detach(&mut self.parents, child, name)
        }
    }

    /// Are the parents the transpose of the children?
    pub fn is_transposed(&self) -> bool {
        let contains = |links: &Links<'s>, from, to| links.get(&from).map_or(false, |set| set.contains(&to));
        let down = self.children.iter().all(|(p, cs)| cs.iter().all(|c| contains(&self.parents, *c, *p)));
        let up = self.parents.iter().all(|(c, ps)| ps.iter().all(|p| contains(&self.children, *p, *c)));
        down && up
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Expr, Names, Rule};

    fn graph<'s>(names: &Names<'s>) -> Graph<'s> {
        let [a, b, c] = ["a", "b", "a . $SITUATION"].map(|n| names.get(n).unwrap());
        let mut graph = Graph::new();
        let value = Expr::from(a) + Expr::from(b) + Expr::from(c);
        graph.insert(Rule::new(a).with_value(value)).unwrap();
        graph.insert(Rule::new(b)).unwrap();
        graph
    }

    #[test]
    fn ignored() {
        let names: Names = ["a", "b", "a . $SITUATION"].into_iter().collect();
        let graph = graph(&names);
        let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());

        let index = ReferenceIndex::new(&graph);
        assert_eq!(index.children(a), [b]);
        assert_eq!(index.parents(b), [a]);
        assert!(index.children(b).is_empty());
        assert!(!index.has_parents(a));
        assert!(index.is_transposed());
    }

    #[test]
    fn unlink_remove() {
        let names: Names = ["a", "b", "a . $SITUATION"].into_iter().collect();
        let graph = graph(&names);
        let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());

        let mut index = ReferenceIndex::new(&graph);
        index.remove(a);
        assert!(!index.has_parents(b));
        assert!(index.is_transposed());

        let mut index = ReferenceIndex::new(&graph);
        index.unlink(a, b);
        assert!(index.children(a).is_empty());
        assert!(!index.has_parents(b));
        assert!(index.is_transposed());
    }

    #[test]
    #[should_panic]
    fn remove_referenced() {
        let names: Names = ["a", "b", "a . $SITUATION"].into_iter().collect();
        let graph = graph(&names);
        let mut index = ReferenceIndex::new(&graph);
        index.remove(names.get("b").unwrap());
    }
}
