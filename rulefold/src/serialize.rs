//! Writing rule graphs back to their raw form.

use crate::rule::write_value;
use crate::{Graph, Rule};
use rulefold_raw::{RawRule, RawRules};

/// Return the raw form of all rules, sorted by name.
///
/// Rules that were folded obtain their current value and
/// the attribute `marker` with their status.
pub fn serialize(graph: &Graph, marker: &str) -> RawRules {
    let mut rules = RawRules::new();
    for rule in graph.names().into_iter().filter_map(|name| graph.get(name)) {
        rules.push(rule.name.as_str(), raw(rule, marker))
    }
    rules
}

fn raw(rule: &Rule, marker: &str) -> RawRule {
    let mut raw = rule.raw.clone();
    if let Some(status) = rule.status.marker() {
        if let Some(expr) = &rule.expr {
            write_value(&mut raw, expr)
        }
        if let Some(default) = &rule.default {
            raw.insert("par défaut", default.into());
        }
        raw.insert(marker, status.into());
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Expr, Names, Status};
    use alloc::{string::ToString, vec};

    #[test]
    fn folded() {
        let names: Names = ["a", "b", "c"].into_iter().collect();
        let [a, b, c] = ["a", "b", "c"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        let value = Expr::contextual(Expr::from(b), vec![(c, Expr::from(1.))]);
        let mut rule = Rule::new(a).with_value(value);
        rule.expr = Some(Expr::from(2.));
        rule.status = Status::Fully;
        graph.insert(rule).unwrap();
        graph.insert(Rule::new(b).with_value(Expr::from(c))).unwrap();
        graph.insert(Rule::new(c)).unwrap();

        let raw = serialize(&graph, "optimized");
        let expected = "a:\n  valeur: 2\n  optimized: fully\nb:\n  valeur: c\nc: null\n";
        assert_eq!(raw.to_string(), expected);
    }
}
