//! Expressions of rules.

use crate::{RuleName, Unit, Value};
use alloc::{boxed::Box, string::String, string::ToString, vec::Vec};
use core::fmt::{self, Display};
use rulefold_raw::RawValue;

/// Binary operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Op {
    pub fn is_comparison(self) -> bool {
        !matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    /// Apply the operator to two values.
    ///
    /// If one of the values is null, so is the result.
    /// Return `None` if the operator is not defined on the given values.
    pub fn apply(self, l: &Value, r: &Value) -> Option<Value> {
        use Value::{Bool, Null, Number};
        match (l, r) {
            (Null, _) | (_, Null) => Some(Null),
            (Number(x), Number(y)) => Some(match self {
                Self::Add => Number(x + y),
                Self::Sub => Number(x - y),
                Self::Mul => Number(x * y),
                Self::Div => Number(x / y),
                Self::Lt => Bool(x < y),
                Self::Le => Bool(x <= y),
                Self::Gt => Bool(x > y),
                Self::Ge => Bool(x >= y),
                Self::Eq => Bool(x == y),
                Self::Ne => Bool(x != y),
            }),
            (l, r) => match self {
                Self::Eq => Some(Bool(l == r)),
                Self::Ne => Some(Bool(l != r)),
                _ => None,
            },
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Ne => "!=",
        };
        s.fmt(f)
    }
}

/// Expression tree of a rule.
///
/// Every tree is owned by exactly one rule;
/// other rules are only ever referred to by name.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr<'s> {
    /// value of another rule
    Ref(RuleName<'s>),
    Const(Value, Option<Unit>),
    Op(Op, Box<Expr<'s>>, Box<Expr<'s>>),
    /// `si` condition `alors` value `sinon` value
    Cond(Box<Expr<'s>>, Box<Expr<'s>>, Box<Expr<'s>>),
    /// value that is null unless the condition holds (`applicable si`)
    Applicable(Box<Expr<'s>>, Box<Expr<'s>>),
    /// value that is null if the condition holds (`non applicable si`)
    NotApplicable(Box<Expr<'s>>, Box<Expr<'s>>),
    /// conjunction (`toutes ces conditions`)
    All(Vec<Expr<'s>>),
    /// disjunction (`une de ces conditions`)
    Any(Vec<Expr<'s>>),
    /// expression evaluated as if the given rules had the given values (`contexte`)
    Contextual(Box<Expr<'s>>, Vec<(RuleName<'s>, Expr<'s>)>),
}

/// A reference that is spelled like a rule name, but is not that rule name.
///
/// This happens if two different name resolutions produced the same string,
/// in which case we cannot decide which rule is meant.
#[derive(Debug)]
pub struct AmbiguousReference(pub String);

impl<'s> Expr<'s> {
    pub fn op(op: Op, l: Self, r: Self) -> Self {
        Self::Op(op, Box::new(l), Box::new(r))
    }

    pub fn cond(c: Self, then: Self, els: Self) -> Self {
        Self::Cond(Box::new(c), Box::new(then), Box::new(els))
    }

    pub fn applicable(c: Self, value: Self) -> Self {
        Self::Applicable(Box::new(c), Box::new(value))
    }

    pub fn not_applicable(c: Self, value: Self) -> Self {
        Self::NotApplicable(Box::new(c), Box::new(value))
    }

    pub fn contextual(inner: Self, overrides: Vec<(RuleName<'s>, Self)>) -> Self {
        Self::Contextual(Box::new(inner), overrides)
    }

    /// Call a function on every rule name that the expression depends on.
    ///
    /// These are the referenced rules as well as
    /// the rules overridden by contextual blocks.
    pub fn for_each_dependency(&self, f: &mut impl FnMut(RuleName<'s>)) {
        match self {
            Self::Ref(name) => f(*name),
            Self::Const(..) => (),
            Self::Op(_, l, r) | Self::Applicable(l, r) | Self::NotApplicable(l, r) => {
                l.for_each_dependency(f);
                r.for_each_dependency(f)
            }
            Self::Cond(c, t, e) => {
                c.for_each_dependency(f);
                t.for_each_dependency(f);
                e.for_each_dependency(f)
            }
            Self::All(es) | Self::Any(es) => {
                for e in es {
                    e.for_each_dependency(f)
                }
            }
            Self::Contextual(inner, overrides) => {
                for (name, e) in overrides {
                    f(*name);
                    e.for_each_dependency(f)
                }
                inner.for_each_dependency(f)
            }
        }
    }

    pub fn depends_on(&self, name: RuleName<'s>) -> bool {
        let mut found = false;
        self.for_each_dependency(&mut |dep| found |= dep == name);
        found
    }

    /// Does the expression contain a reference node?
    pub fn has_references(&self) -> bool {
        match self {
            Self::Ref(_) => true,
            Self::Const(..) => false,
            Self::Op(_, l, r) | Self::Applicable(l, r) | Self::NotApplicable(l, r) => {
                l.has_references() || r.has_references()
            }
            Self::Cond(c, t, e) => c.has_references() || t.has_references() || e.has_references(),
            Self::All(es) | Self::Any(es) => es.iter().any(Self::has_references),
            Self::Contextual(inner, overrides) => {
                inner.has_references() || overrides.iter().any(|(_, e)| e.has_references())
            }
        }
    }

    /// Replace every reference to `target` by a copy of `by`.
    ///
    /// Return the number of replaced references.
    /// References are matched by name identity;
    /// meeting a reference spelled like `target` that is not `target` is an error.
    ///
    /// ~~~
    /// # use rulefold::{Expr, Names};
    /// let names: Names = ["a . b", "a . bc"].into_iter().collect();
    /// let (ab, abc) = (names.get("a . b").unwrap(), names.get("a . bc").unwrap());
    ///
    /// let mut e = Expr::from(ab) * Expr::from(abc) + Expr::from(ab);
    /// assert_eq!(e.replace(ab, &Expr::from(2.)).unwrap(), 2);
    /// assert_eq!(e.to_string(), "(2 * a . bc) + 2");
    /// ~~~
    pub fn replace(&mut self, target: RuleName<'s>, by: &Self) -> Result<usize, AmbiguousReference> {
        match self {
            Self::Ref(name) => {
                let name = *name;
                if name == target {
                    *self = by.clone();
                    Ok(1)
                } else if name.as_str() == target.as_str() {
                    Err(AmbiguousReference(name.as_str().into()))
                } else {
                    Ok(0)
                }
            }
            Self::Const(..) => Ok(0),
            Self::Op(_, l, r) | Self::Applicable(l, r) | Self::NotApplicable(l, r) => {
                Ok(l.replace(target, by)? + r.replace(target, by)?)
            }
            Self::Cond(c, t, e) => {
                Ok(c.replace(target, by)? + t.replace(target, by)? + e.replace(target, by)?)
            }
            Self::All(es) | Self::Any(es) => {
                let mut n = 0;
                for e in es {
                    n += e.replace(target, by)?
                }
                Ok(n)
            }
            Self::Contextual(inner, overrides) => {
                let mut n = inner.replace(target, by)?;
                for (_, e) in overrides {
                    n += e.replace(target, by)?
                }
                Ok(n)
            }
        }
    }

    fn is_atomic(&self) -> bool {
        matches!(self, Self::Ref(_) | Self::Const(..))
    }
}

impl<'s> From<RuleName<'s>> for Expr<'s> {
    fn from(name: RuleName<'s>) -> Self {
        Self::Ref(name)
    }
}

impl<'s> From<f64> for Expr<'s> {
    fn from(x: f64) -> Self {
        Self::Const(Value::Number(x), None)
    }
}

impl<'s> From<bool> for Expr<'s> {
    fn from(b: bool) -> Self {
        Self::Const(Value::Bool(b), None)
    }
}

macro_rules! impl_op {
    ($tr:ident, $f:ident, $op:expr) => {
        impl<'s> core::ops::$tr for Expr<'s> {
            type Output = Self;
            fn $f(self, rhs: Self) -> Self {
                Self::op($op, self, rhs)
            }
        }
    };
}

impl_op!(Add, add, Op::Add);
impl_op!(Sub, sub, Op::Sub);
impl_op!(Mul, mul, Op::Mul);
impl_op!(Div, div, Op::Div);

fn fmt_operand(e: &Expr, f: &mut fmt::Formatter) -> fmt::Result {
    if e.is_atomic() {
        write!(f, "{}", e)
    } else {
        write!(f, "({})", e)
    }
}

fn fmt_list(f: &mut fmt::Formatter, head: &str, es: &[Expr]) -> fmt::Result {
    write!(f, "{} [", head)?;
    for (i, e) in es.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?
        }
        write!(f, "{}", e)?
    }
    write!(f, "]")
}

impl<'s> Display for Expr<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ref(name) => write!(f, "{}", name),
            Self::Const(v, None) => write!(f, "{}", v),
            Self::Const(v, Some(u)) => write!(f, "{} {}", v, u),
            Self::Op(op, l, r) => {
                fmt_operand(l, f)?;
                write!(f, " {} ", op)?;
                fmt_operand(r, f)
            }
            Self::Cond(c, t, e) => write!(f, "si {} alors {} sinon {}", c, t, e),
            Self::Applicable(c, v) => write!(f, "{} applicable si {}", v, c),
            Self::NotApplicable(c, v) => write!(f, "{} non applicable si {}", v, c),
            Self::All(es) => fmt_list(f, "toutes ces conditions", es),
            Self::Any(es) => fmt_list(f, "une de ces conditions", es),
            Self::Contextual(inner, overrides) => {
                write!(f, "{} dans le contexte [", inner)?;
                for (i, (name, e)) in overrides.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?
                    }
                    write!(f, "{} = {}", name, e)?
                }
                write!(f, "]")
            }
        }
    }
}

/// Write an expression in the raw form of rules.
///
/// Constants without unit are written as such, everything else as text.
impl<'s> From<&Expr<'s>> for RawValue {
    fn from(e: &Expr<'s>) -> Self {
        match e {
            Expr::Const(Value::Null, _) => Self::Null,
            Expr::Const(Value::Bool(b), None) => Self::Bool(*b),
            Expr::Const(Value::Number(x), None) => Self::Number(*x),
            e => Self::Text(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Names;
    use alloc::vec;

    #[test]
    fn display() {
        let names: Names = ["B . C", "D"].into_iter().collect();
        let (bc, d) = (names.get("B . C").unwrap(), names.get("D").unwrap());
        let e = Expr::from(bc) * Expr::from(d);
        assert_eq!(e.to_string(), "B . C * D");

        let e = Expr::from(10.) * Expr::from(d) - Expr::Const(Value::Number(1.), Some("€".into()));
        assert_eq!(e.to_string(), "(10 * D) - 1 €");

        let e = Expr::contextual(Expr::from(bc), vec![(d, Expr::from(20.))]);
        assert_eq!(e.to_string(), "B . C dans le contexte [D = 20]");
    }

    #[test]
    fn dependencies() {
        let names: Names = ["a", "b", "c"].into_iter().collect();
        let [a, b, c] = ["a", "b", "c"].map(|n| names.get(n).unwrap());

        let e = Expr::contextual(Expr::from(a), vec![(b, Expr::from(c) + Expr::from(1.))]);
        let mut deps = Vec::new();
        e.for_each_dependency(&mut |n| deps.push(n));
        assert_eq!(deps, [b, c, a]);
        assert!(e.depends_on(b));
        assert!(e.has_references());
        assert!(!Expr::from(1.).has_references());
    }

    #[test]
    fn replace_ambiguous() {
        let other = String::from("a");
        let names: Names = ["a"].into_iter().collect();
        let a = names.get("a").unwrap();
        let a2 = RuleName::new(&other);

        let mut e = Expr::from(a) + Expr::from(a2);
        assert!(matches!(e.replace(a, &Expr::from(1.)), Err(AmbiguousReference(_))));
        let mut e = Expr::from(a) + Expr::from(1.);
        assert_eq!(e.replace(a, &Expr::from(1.)).unwrap(), 1);
        assert_eq!(e, Expr::from(1.) + Expr::from(1.));
    }

    #[test]
    fn apply() {
        use Value::*;
        assert_eq!(Op::Mul.apply(&Number(10.), &Number(3.)), Some(Number(30.)));
        assert_eq!(Op::Add.apply(&Null, &Number(3.)), Some(Null));
        assert_eq!(Op::Le.apply(&Number(1.), &Number(1.)), Some(Bool(true)));
        assert_eq!(Op::Eq.apply(&Text("x".into()), &Text("x".into())), Some(Bool(true)));
        assert_eq!(Op::Add.apply(&Bool(true), &Number(1.)), None);
    }

    #[test]
    fn raw() {
        assert_eq!(RawValue::from(&Expr::from(30.)), RawValue::Number(30.));
        let e = Expr::Const(Value::Number(30.), Some("€".into()));
        assert_eq!(RawValue::from(&e), RawValue::from("30 €"));
    }
}
