use super::FoldingContext;
use crate::{Evaluate, Expr, RuleName};
use alloc::vec::Vec;
use fnv::{FnvHashMap, FnvHashSet};

/// What prevents rules from being folded during one sweep.
///
/// A taint is computed at the beginning of a sweep.
/// Folding and deletion only remove references and overrides,
/// so a taint may block more rules than necessary, but never fewer.
#[derive(Default)]
pub(super) struct Taint<'s> {
    /// contextual rules overriding a rule
    overridden: FnvHashMap<RuleName<'s>, FnvHashSet<RuleName<'s>>>,
    /// rules that are unfoldable or overridden, or depend on such rules
    tainted: FnvHashSet<RuleName<'s>>,
    inaccessible: FnvHashSet<RuleName<'s>>,
}

impl<'s> Taint<'s> {
    pub(super) fn is_tainted(&self, name: RuleName<'s>) -> bool {
        self.tainted.contains(&name)
    }

    pub(super) fn is_accessible(&self, name: RuleName<'s>) -> bool {
        !self.inaccessible.contains(&name)
    }

    /// Is the rule overridden by a contextual rule other than `by`?
    pub(super) fn is_overridden_except(&self, name: RuleName<'s>, by: RuleName<'s>) -> bool {
        let overriders = self.overridden.get(&name);
        overriders.map_or(false, |rules| rules.iter().any(|r| *r != by))
    }
}

impl<'s, 'a, E: Evaluate<'s>> FoldingContext<'s, 'a, E> {
    pub(super) fn refresh_taint(&mut self) {
        let mut overridden: FnvHashMap<_, FnvHashSet<_>> = FnvHashMap::default();
        let mut inaccessible = FnvHashSet::default();
        for rule in self.graph.rules() {
            if let Some(Expr::Contextual(_, overrides)) = &rule.expr {
                for (name, _) in overrides {
                    overridden.entry(*name).or_default().insert(rule.name);
                }
            }
            if !self.eval.is_accessible(&self.graph, rule.name) {
                inaccessible.insert(rule.name);
            }
        }

        // propagate from the blocking rules to all rules depending on them
        let mut todo: Vec<_> = self.unfoldable.iter().chain(overridden.keys()).copied().collect();
        let mut tainted = FnvHashSet::default();
        while let Some(name) = todo.pop() {
            if tainted.insert(name) {
                todo.extend(self.index.parents(name))
            }
        }
        trace!("{} rules are tainted", tainted.len());

        self.taint = Taint {
            overridden,
            tainted,
            inaccessible,
        }
    }

    /// Does a contextual rule depend on a rule that blocks its folding?
    ///
    /// The rules overridden only by the contextual rule itself do not block it,
    /// because the override is evaluated together with the rule.
    pub(super) fn contextual_reaches_blocking(&self, root: RuleName<'s>) -> bool {
        let blocks = |name: RuleName<'s>| {
            self.unfoldable.contains(&name) || self.taint.is_overridden_except(name, root)
        };
        let mut seen = FnvHashSet::default();
        let mut todo = Vec::from([root]);
        while let Some(name) = todo.pop() {
            if blocks(name) {
                return true;
            }
            if seen.insert(name) {
                todo.extend(self.index.children(name))
            }
        }
        false
    }
}
