//! Evaluation of rules in situations.

use crate::{Expr, Graph, Rule, RuleName, Unit, Value};
use alloc::{format, string::String, vec::Vec};
use fnv::FnvHashSet;

/// Immutable HashMap for fast cloning of situations.
type FnvHashMap<K, V> = im::hashmap::HashMap<K, V, fnv::FnvBuildHasher>;

#[derive(Debug)]
pub enum Error {
    /// rule whose value depends on itself
    Cycle(String),
    UnknownRule(String),
    /// operation on values it is not defined on
    Type(String),
}

type Result<T> = core::result::Result<T, Error>;

/// Values of rules given by the user, overriding the values in the graph.
pub type Situation<'s> = FnvHashMap<RuleName<'s>, Expr<'s>>;

/// Result of evaluating a rule.
#[derive(Clone, Debug, Default)]
pub struct Evaluation<'s> {
    pub value: Value,
    pub unit: Option<Unit>,
    /// inputs that the evaluation needed, but that were not given
    pub missing: FnvHashSet<RuleName<'s>>,
    /// could the value become null in another situation?
    pub nullable: bool,
}

impl<'s> Evaluation<'s> {
    pub fn new(value: Value, unit: Option<Unit>) -> Self {
        Self {
            value,
            unit,
            ..Default::default()
        }
    }

    /// Does the value hold in every situation?
    pub fn is_constant(&self) -> bool {
        self.missing.is_empty() && !self.nullable
    }

    /// Inherit the missing inputs and nullability of another evaluation.
    fn absorb(mut self, other: Self) -> Self {
        self.missing.extend(other.missing);
        self.nullable |= other.nullable;
        self
    }
}

/// Evaluator of rules.
///
/// The graph is given on every call, because
/// evaluations have to reflect all modifications made to the graph so far.
pub trait Evaluate<'s> {
    /// Evaluate a rule, in the default situation if none is given.
    fn evaluate(
        &mut self,
        graph: &Graph<'s>,
        name: RuleName<'s>,
        situation: Option<&Situation<'s>>,
    ) -> Result<Evaluation<'s>>;

    /// May the rule be referenced from anywhere in the graph?
    fn is_accessible(&self, graph: &Graph<'s>, name: RuleName<'s>) -> bool {
        graph.is_accessible(name)
    }
}

/// Evaluator that interprets expressions directly.
///
/// Inputs evaluate to their default value (or null) and
/// report themselves as missing unless the situation gives them.
/// The value of conditionally applicable expressions is always nullable.
///
/// ~~~
/// # use rulefold::{Evaluate, Expr, Graph, Interpreter, Names, Rule, Value};
/// let names: Names = ["a", "b"].into_iter().collect();
/// let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());
///
/// let mut graph = Graph::new();
/// graph.insert(Rule::new(a).with_value(Expr::from(b) * Expr::from(2.)))?;
/// graph.insert(Rule::new(b).with_question("b ?").with_default(Expr::from(3.)))?;
///
/// let eval = Interpreter::new().evaluate(&graph, a, None)?;
/// assert_eq!(eval.value, Value::Number(6.));
/// assert!(eval.missing.contains(&b));
///
/// let situation = [(b, Expr::from(4.))].into_iter().collect();
/// let eval = Interpreter::new().evaluate(&graph, a, Some(&situation))?;
/// assert_eq!(eval.value, Value::Number(8.));
/// assert!(eval.is_constant());
/// # Ok::<_, rulefold::Error>(())
/// ~~~
#[derive(Default)]
pub struct Interpreter<'s> {
    /// rules currently being evaluated
    stack: Vec<RuleName<'s>>,
}

impl<'s> Interpreter<'s> {
    pub fn new() -> Self {
        Self::default()
    }

    fn rule(&mut self, graph: &Graph<'s>, name: RuleName<'s>, sit: &Situation<'s>) -> Result<Evaluation<'s>> {
        if self.stack.contains(&name) {
            return Err(Error::Cycle(name.as_str().into()));
        }
        self.stack.push(name);
        let y = match (sit.get(&name), graph.get(name)) {
            (Some(e), _) => self.expr(graph, e, sit),
            (None, Some(rule)) => self.body(graph, rule, sit),
            (None, None) => Err(Error::UnknownRule(name.as_str().into())),
        };
        self.stack.pop();
        y
    }

    fn body(&mut self, graph: &Graph<'s>, rule: &Rule<'s>, sit: &Situation<'s>) -> Result<Evaluation<'s>> {
        let enumerated = rule.enumeration.is_some() && rule.expr.is_none();
        if rule.is_input() || enumerated {
            let mut y = match &rule.default {
                Some(default) => self.expr(graph, default, sit)?,
                None => Evaluation::default(),
            };
            y.missing.insert(rule.name);
            return Ok(y);
        }
        match &rule.expr {
            Some(e) => self.expr(graph, e, sit),
            None => Ok(Evaluation::default()),
        }
    }

    fn expr(&mut self, graph: &Graph<'s>, e: &Expr<'s>, sit: &Situation<'s>) -> Result<Evaluation<'s>> {
        match e {
            Expr::Ref(name) => self.rule(graph, *name, sit),
            Expr::Const(v, u) => Ok(Evaluation::new(v.clone(), u.clone())),
            Expr::Op(op, l, r) => {
                let l = self.expr(graph, l, sit)?;
                let r = self.expr(graph, r, sit)?;
                let value = op.apply(&l.value, &r.value);
                let value = value.ok_or_else(|| Error::Type(format!("{} {} {}", l.value, op, r.value)))?;
                let unit = match op.is_comparison() {
                    true => None,
                    false => l.unit.clone().or_else(|| r.unit.clone()),
                };
                Ok(Evaluation::new(value, unit).absorb(l).absorb(r))
            }
            Expr::Cond(c, then, els) => {
                let c = self.expr(graph, c, sit)?;
                let branch = if c.value.is_truthy() { then } else { els };
                Ok(self.expr(graph, branch, sit)?.absorb(c))
            }
            Expr::Applicable(c, v) | Expr::NotApplicable(c, v) => {
                let c = self.expr(graph, c, sit)?;
                let applies = c.value.is_truthy() == matches!(e, Expr::Applicable(..));
                let mut y = match applies {
                    true => self.expr(graph, v, sit)?,
                    false => Evaluation::default(),
                };
                y.nullable = true;
                Ok(y.absorb(c))
            }
            Expr::All(es) | Expr::Any(es) => {
                let all = matches!(e, Expr::All(_));
                let mut y = Evaluation::new(Value::Bool(all), None);
                for x in es {
                    let x = self.expr(graph, x, sit)?;
                    if x.value.is_truthy() != all {
                        y.value = Value::Bool(!all)
                    }
                    y = y.absorb(x)
                }
                Ok(y)
            }
            Expr::Contextual(inner, overrides) => {
                let mut inner_sit = sit.clone();
                let mut y = Evaluation::default();
                for (name, e) in overrides {
                    let x = self.expr(graph, e, sit)?;
                    inner_sit.insert(*name, Expr::Const(x.value.clone(), x.unit.clone()));
                    y = y.absorb(x)
                }
                Ok(self.expr(graph, inner, &inner_sit)?.absorb(y))
            }
        }
    }
}

impl<'s> Evaluate<'s> for Interpreter<'s> {
    fn evaluate(
        &mut self,
        graph: &Graph<'s>,
        name: RuleName<'s>,
        situation: Option<&Situation<'s>>,
    ) -> Result<Evaluation<'s>> {
        self.stack.clear();
        let default = Situation::default();
        let y = self.rule(graph, name, situation.unwrap_or(&default))?;
        trace!("evaluated {} to {}", name, y.value);
        Ok(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Names;
    use alloc::vec;

    #[test]
    fn cycle() {
        let names: Names = ["a", "b"].into_iter().collect();
        let (a, b) = (names.get("a").unwrap(), names.get("b").unwrap());
        let mut graph = Graph::new();
        graph.insert(Rule::new(a).with_value(Expr::from(b))).unwrap();
        graph.insert(Rule::new(b).with_value(Expr::from(a) + Expr::from(1.))).unwrap();

        let y = Interpreter::new().evaluate(&graph, a, None);
        assert!(matches!(y, Err(Error::Cycle(_))));
    }

    #[test]
    fn contextual() {
        let names: Names = ["root", "inner", "constant", "question"].into_iter().collect();
        let [root, inner, constant, question] =
            ["root", "inner", "constant", "question"].map(|n| names.get(n).unwrap());

        let mut graph = Graph::new();
        let value = Expr::contextual(Expr::from(inner), vec![(constant, Expr::from(20.))]);
        graph.insert(Rule::new(root).with_value(value)).unwrap();
        let value = Expr::from(constant) * Expr::from(question);
        graph.insert(Rule::new(inner).with_value(value)).unwrap();
        graph.insert(Rule::new(constant).with_value(Expr::from(10.))).unwrap();
        let q = Rule::new(question).with_question("?").with_default(Expr::from(2.));
        graph.insert(q).unwrap();

        let mut eval = Interpreter::new();
        let y = eval.evaluate(&graph, root, None).unwrap();
        assert_eq!(y.value, Value::Number(40.));
        assert!(y.missing.contains(&question));
        let y = eval.evaluate(&graph, inner, None).unwrap();
        assert_eq!(y.value, Value::Number(20.));
    }

    #[test]
    fn applicable() {
        let names: Names = ["a", "c"].into_iter().collect();
        let (a, c) = (names.get("a").unwrap(), names.get("c").unwrap());
        let mut graph = Graph::new();
        let value = Expr::applicable(Expr::from(c), Expr::from(5.));
        graph.insert(Rule::new(a).with_value(value)).unwrap();
        graph.insert(Rule::new(c).with_value(Expr::from(false))).unwrap();

        let y = Interpreter::new().evaluate(&graph, a, None).unwrap();
        assert_eq!(y.value, Value::Null);
        assert!(y.nullable && y.missing.is_empty());
    }

    #[test]
    fn ill_typed() {
        let names: Names = ["a"].into_iter().collect();
        let a = names.get("a").unwrap();
        let mut graph = Graph::new();
        let value = Expr::from(true) + Expr::from(1.);
        graph.insert(Rule::new(a).with_value(value)).unwrap();
        let y = Interpreter::new().evaluate(&graph, a, None);
        assert!(matches!(y, Err(Error::Type(_))));
    }
}
