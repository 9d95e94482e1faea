//! Detection of rules that must never be folded.

use crate::eval::{self, Evaluate};
use crate::{Expr, Graph, RuleName};
use fnv::FnvHashSet;

/// Rules that may neither be folded nor deleted implicitly.
pub type Unfoldable<'s> = FnvHashSet<RuleName<'s>>;

/// Collect the rules whose value cannot be determined statically.
///
/// These are:
///
/// * rules that replace other rules, together with the replaced rules,
/// * members of enumerations, and
/// * rules whose value is a contextual expression depending on the situation,
///   together with the rules overridden by that expression.
///
/// Rules overridden by a contextual expression with a constant value
/// are protected only as long as the expression exists,
/// see [`FoldingContext`](crate::fold::FoldingContext).
pub fn classify<'s, E: Evaluate<'s>>(
    graph: &Graph<'s>,
    eval: &mut E,
) -> Result<Unfoldable<'s>, eval::Error> {
    let mut unfoldable = Unfoldable::default();
    for rule in graph.names().into_iter().filter_map(|name| graph.get(name)) {
        if !rule.replacements.is_empty() {
            unfoldable.insert(rule.name);
            unfoldable.extend(rule.replacements.iter().map(|r| r.replaced));
        }
        if let Some(enumeration) = &rule.enumeration {
            unfoldable.extend(enumeration.members.iter().copied());
        }
        if let Some(Expr::Contextual(_, overrides)) = &rule.expr {
            if !eval.evaluate(graph, rule.name, None)?.is_constant() {
                trace!("contextual rule {} depends on the situation", rule.name);
                unfoldable.insert(rule.name);
                unfoldable.extend(overrides.iter().map(|(name, _)| *name));
            }
        }
    }
    Ok(unfoldable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Interpreter, Names, Replacement, Rule};
    use alloc::vec;

    #[test]
    fn replacement_and_enumeration() {
        let names: Names = ["x", "y", "e", "e . m", "z"].into_iter().collect();
        let [x, y, e, m, z] = ["x", "y", "e", "e . m", "z"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        graph.insert(Rule::new(x).with_value(Expr::from(1.))).unwrap();
        graph.insert(Rule::new(y).with_replacement(Replacement::new(x))).unwrap();
        graph.insert(Rule::new(e).with_enumeration(vec![m])).unwrap();
        graph.insert(Rule::new(m)).unwrap();
        graph.insert(Rule::new(z).with_value(Expr::from(x))).unwrap();

        let unfoldable = classify(&graph, &mut Interpreter::new()).unwrap();
        assert!(unfoldable.contains(&x) && unfoldable.contains(&y) && unfoldable.contains(&m));
        assert!(!unfoldable.contains(&e) && !unfoldable.contains(&z));
    }

    #[test]
    fn contextual() {
        let names: Names = ["r", "s", "c", "q"].into_iter().collect();
        let [r, s, c, q] = ["r", "s", "c", "q"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        let constant = Expr::contextual(Expr::from(c), vec![(c, Expr::from(2.))]);
        graph.insert(Rule::new(r).with_value(constant)).unwrap();
        let dependent = Expr::contextual(Expr::from(c), vec![(c, Expr::from(q))]);
        graph.insert(Rule::new(s).with_value(dependent)).unwrap();
        graph.insert(Rule::new(c).with_value(Expr::from(1.))).unwrap();
        graph.insert(Rule::new(q).with_question("q ?")).unwrap();

        let unfoldable = classify(&graph, &mut Interpreter::new()).unwrap();
        assert!(unfoldable.contains(&c) && unfoldable.contains(&s));
        assert!(!unfoldable.contains(&r) && !unfoldable.contains(&q));
    }

    #[test]
    fn constant_contextual() {
        let names: Names = ["r", "c"].into_iter().collect();
        let [r, c] = ["r", "c"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        let value = Expr::contextual(Expr::from(c), vec![(c, Expr::from(2.))]);
        graph.insert(Rule::new(r).with_value(value)).unwrap();
        graph.insert(Rule::new(c).with_value(Expr::from(1.))).unwrap();

        let unfoldable = classify(&graph, &mut Interpreter::new()).unwrap();
        assert!(unfoldable.is_empty());
    }

    #[test]
    fn nullable_contextual() {
        let names: Names = ["r", "i", "c"].into_iter().collect();
        let [r, i, c] = ["r", "i", "c"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        let value = Expr::contextual(Expr::from(i), vec![(c, Expr::from(1.))]);
        graph.insert(Rule::new(r).with_value(value)).unwrap();
        let value = Expr::applicable(Expr::from(c), Expr::from(10.));
        graph.insert(Rule::new(i).with_value(value)).unwrap();
        graph.insert(Rule::new(c).with_value(Expr::from(0.))).unwrap();

        let unfoldable = classify(&graph, &mut Interpreter::new()).unwrap();
        assert!(unfoldable.contains(&r) && unfoldable.contains(&c));
        assert!(!unfoldable.contains(&i));
    }
}
