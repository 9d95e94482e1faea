//! Constant folding of rule graphs.
//!
//! Folding replaces rules whose value does not depend on the situation
//! by their value, copies that value into all rules referring to them, and
//! deletes rules that are no longer referred to.

mod prune;
mod subst;
mod taint;

use crate::classify::{classify, Unfoldable};
use crate::{Error, Evaluate, Expr, Graph, ReferenceIndex, Rule, RuleName, Status};
use alloc::{boxed::Box, string::String};
use taint::Taint;

type Predicate<'s> = Box<dyn Fn(&Rule<'s>) -> bool + 's>;

/// Configuration of folding.
///
/// ~~~
/// # use rulefold::{fold::Options, Rule, RuleName};
/// let opts = Options::new().keep(|rule| rule.name.as_str() == "total");
/// assert_eq!(opts.marker, "optimized");
/// assert!(opts.keeps(&Rule::new(RuleName::new("total"))));
/// assert!(!opts.avoids(&Rule::new(RuleName::new("total"))));
/// ~~~
pub struct Options<'s> {
    avoid: Option<Predicate<'s>>,
    keep: Option<Predicate<'s>>,
    /// raw attribute recording how far rules were folded
    pub marker: String,
}

impl<'s> Default for Options<'s> {
    fn default() -> Self {
        Self {
            avoid: None,
            keep: None,
            marker: "optimized".into(),
        }
    }
}

impl<'s> Options<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never fold rules satisfying the predicate,
    /// nor replace references in them.
    pub fn avoid(mut self, f: impl Fn(&Rule<'s>) -> bool + 's) -> Self {
        self.avoid = Some(Box::new(f));
        self
    }

    /// Keep rules satisfying the predicate, as well as all rules they refer to,
    /// and delete all other rules that are not referred to.
    pub fn keep(mut self, f: impl Fn(&Rule<'s>) -> bool + 's) -> Self {
        self.keep = Some(Box::new(f));
        self
    }

    pub fn avoids(&self, rule: &Rule<'s>) -> bool {
        self.avoid.as_ref().map_or(false, |f| f(rule))
    }

    pub fn keeps(&self, rule: &Rule<'s>) -> bool {
        self.keep.as_ref().map_or(false, |f| f(rule))
    }

    fn has_keep(&self) -> bool {
        self.keep.is_some()
    }
}

/// State of folding a graph.
///
/// The graph is a copy of the graph given at creation,
/// which is never modified.
pub struct FoldingContext<'s, 'a, E> {
    graph: Graph<'s>,
    index: ReferenceIndex<'s>,
    unfoldable: Unfoldable<'s>,
    taint: Taint<'s>,
    eval: &'a mut E,
    opts: &'a Options<'s>,
}

impl<'s, 'a, E: Evaluate<'s>> FoldingContext<'s, 'a, E> {
    pub fn new(graph: &Graph<'s>, eval: &'a mut E, opts: &'a Options<'s>) -> Result<Self, Error> {
        let mut graph = graph.clone();
        graph.restore_status(&opts.marker);
        let index = ReferenceIndex::new(&graph);
        let unfoldable = classify(&graph, eval)?;
        debug!("{} of {} rules are unfoldable", unfoldable.len(), graph.len());
        Ok(Self {
            graph,
            index,
            unfoldable,
            taint: Taint::default(),
            eval,
            opts,
        })
    }

    /// Fold rules until nothing changes anymore.
    ///
    /// If rules to keep were given, then delete
    /// all rules that are neither kept nor referred to, and
    /// fold again as long as this deletes rules.
    pub fn run(mut self) -> Result<Graph<'s>, Error> {
        loop {
            self.sweep()?;
            if !self.opts.has_keep() || !self.filter() {
                return Ok(self.graph);
            }
        }
    }

    /// Fold all rules repeatedly, until no rule is folded or deleted.
    fn sweep(&mut self) -> Result<(), Error> {
        loop {
            self.refresh_taint();
            let before = self.graph.len();
            let mut folded = 0;
            for name in self.graph.names() {
                let done = self.graph.get(name).map_or(true, |r| r.status == Status::Fully);
                if !done && self.is_foldable(name) && self.fold(name)? {
                    folded += 1
                }
            }
            debug_assert!(self.index.is_transposed());
            info!("folding sweep: {} -> {} rules, {} folded", before, self.graph.len(), folded);
            if self.graph.len() == before && folded == 0 {
                return Ok(());
            }
        }
    }

    /// Can the rule be folded or deleted?
    ///
    /// This is the case if the rule is in the graph and accessible,
    /// is neither avoided nor an input, and
    /// it does not depend, directly or indirectly,
    /// on an unfoldable rule or a rule overridden by a contextual rule.
    /// A contextual rule may depend on the rules that only it overrides.
    fn is_foldable(&self, name: RuleName<'s>) -> bool {
        let rule = match self.graph.get(name) {
            Some(rule) => rule,
            None => return false,
        };
        if self.opts.avoids(rule) || rule.is_input() || !self.taint.is_accessible(name) {
            return false;
        }
        match &rule.expr {
            Some(Expr::Contextual(..)) => !self.contextual_reaches_blocking(name),
            _ => !self.taint.is_tainted(name),
        }
    }

    /// Replace the value of a constant rule by a constant.
    ///
    /// Return whether the rule was folded or deleted.
    fn fold(&mut self, name: RuleName<'s>) -> Result<bool, Error> {
        let empty = self.graph.get(name).map_or(false, Rule::is_empty);
        if empty && !self.index.has_parents(name) {
            return Ok(self.delete(name));
        }

        let y = self.eval.evaluate(&self.graph, name, None)?;
        if !y.is_constant() {
            trace!("{} depends on the situation", name);
            return Ok(false);
        }
        let constant = Expr::Const(y.value, y.unit);
        debug!("fold {} to {}", name, constant);
        if let Some(rule) = self.graph.get_mut(name) {
            rule.expr = Some(constant.clone())
        }

        self.substitute(name, &constant)?;
        let children = self.index.children(name);
        self.prune(name, children);

        if self.index.has_parents(name) || !self.delete(name) {
            if let Some(rule) = self.graph.get_mut(name) {
                assert!(!rule.exprs().any(Expr::has_references), "{} refers to rules", name);
                rule.status = Status::Fully
            }
        }
        Ok(true)
    }

    /// Delete a rule that is not referred to, unless it is kept or unfoldable.
    ///
    /// Return whether the rule was deleted.
    fn delete(&mut self, name: RuleName<'s>) -> bool {
        let keep = self.graph.get(name).map_or(false, |r| self.opts.keeps(r));
        if keep || self.index.has_parents(name) || !self.is_foldable(name) {
            return false;
        }
        debug!("delete {}", name);
        self.index.remove(name);
        self.graph.remove(name);
        true
    }

    /// Delete rules that are neither kept nor referred to, until none is left.
    ///
    /// Return whether any rule was deleted.
    fn filter(&mut self) -> bool {
        let total = self.graph.len();
        loop {
            self.refresh_taint();
            let before = self.graph.len();
            for name in self.graph.names() {
                if !self.index.has_parents(name) {
                    self.delete(name);
                }
            }
            info!("keep filter: {} -> {} rules", before, self.graph.len());
            if self.graph.len() == before {
                return self.graph.len() != total;
            }
        }
    }
}

/// Fold a graph, returning the folded copy.
///
/// ~~~
/// # use rulefold::{fold, Expr, Graph, Interpreter, Names, Rule, Status};
/// let names: Names = ["a", "b"].into_iter().collect();
/// let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());
///
/// let mut graph = Graph::new();
/// graph.insert(Rule::new(a).with_value(Expr::from(b) * Expr::from(2.)))?;
/// graph.insert(Rule::new(b).with_value(Expr::from(21.)))?;
///
/// let opts = fold::Options::new().keep(|rule| rule.name == a);
/// let folded = fold(&graph, &mut Interpreter::new(), &opts)?;
/// assert_eq!(folded.len(), 1);
/// assert_eq!(folded.get(a).unwrap().expr, Some(Expr::from(42.)));
/// assert_eq!(folded.get(a).unwrap().status, Status::Fully);
/// assert_eq!(graph.len(), 2);
/// # Ok::<_, rulefold::Error>(())
/// ~~~
pub fn fold<'s, E: Evaluate<'s>>(
    graph: &Graph<'s>,
    eval: &mut E,
    opts: &Options<'s>,
) -> Result<Graph<'s>, Error> {
    FoldingContext::new(graph, eval, opts)?.run()
}
