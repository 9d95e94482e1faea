//! Rules, the nodes of rule graphs.

use crate::{Expr, RuleName};
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};
use fnv::FnvHashSet;
use rulefold_raw::{RawRule, RawValue};

/// Rerouting of references to `replaced` to the replacing rule (`remplace`).
///
/// Which references are rerouted depends on the whitelist, the blacklist,
/// and the priority among all replacements of the same rule.
#[derive(Clone, Debug)]
pub struct Replacement<'s> {
    pub replaced: RuleName<'s>,
    /// if non-empty, only replace in these rules (`dans`)
    pub whitelist: FnvHashSet<RuleName<'s>>,
    /// never replace in these rules (`sauf dans`)
    pub blacklist: FnvHashSet<RuleName<'s>>,
    pub priority: Option<i32>,
}

impl<'s> Replacement<'s> {
    pub fn new(replaced: RuleName<'s>) -> Self {
        Self {
            replaced,
            whitelist: Default::default(),
            blacklist: Default::default(),
            priority: None,
        }
    }
}

/// Closed set of rules that are the possible values of a rule (`une possibilité`).
#[derive(Clone, Debug)]
pub struct Enumeration<'s> {
    pub members: Vec<RuleName<'s>>,
}

/// How far a rule has been folded.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Unset,
    /// some references were replaced by constants
    Partially,
    /// the value is a constant
    Fully,
}

impl Status {
    /// Marker text of the status, if it is not `Unset`.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Partially => Some("partially"),
            Self::Fully => Some("fully"),
        }
    }

    /// Status corresponding to a marker text.
    pub fn from_marker(s: &str) -> Option<Self> {
        match s {
            "partially" => Some(Self::Partially),
            "fully" => Some(Self::Fully),
            _ => None,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.marker().unwrap_or("unset").fmt(f)
    }
}

/// A named rule.
///
/// Besides the parsed mechanisms, a rule keeps its raw form,
/// from which it is serialized again.
/// The builder methods update both.
///
/// ~~~
/// # use rulefold::{Expr, Rule, RuleName};
/// let rule = Rule::new(RuleName::new("prix")).with_value(Expr::from(10.));
/// assert_eq!(rule.raw.to_string(), "valeur: 10\n");
/// assert!(!rule.is_input());
/// ~~~
#[derive(Clone, Debug)]
pub struct Rule<'s> {
    pub name: RuleName<'s>,
    pub raw: RawRule,
    /// `valeur`
    pub expr: Option<Expr<'s>>,
    /// `par défaut`
    pub default: Option<Expr<'s>>,
    pub question: Option<String>,
    pub replacements: Vec<Replacement<'s>>,
    pub enumeration: Option<Enumeration<'s>>,
    /// `privé`
    pub private: bool,
    pub status: Status,
}

/// Write an expression as the value of a raw rule.
///
/// A contextual expression is written as
/// the value of the inner expression and a `contexte` map;
/// for any other expression, a previous `contexte` map is removed.
pub(crate) fn write_value(raw: &mut RawRule, expr: &Expr) {
    if let Expr::Contextual(inner, overrides) = expr {
        raw.insert("valeur", (&**inner).into());
        let ctx = overrides.iter().map(|(n, e)| (n.as_str(), RawValue::from(e)));
        raw.insert("contexte", RawValue::Map(ctx.collect()));
    } else {
        raw.insert("valeur", expr.into());
        raw.remove("contexte");
    }
}

fn name_list<'s>(names: impl Iterator<Item = RuleName<'s>>) -> RawValue {
    RawValue::List(names.map(|n| n.as_str().into()).collect())
}

impl<'s> Rule<'s> {
    /// Create a rule without any content.
    pub fn new(name: RuleName<'s>) -> Self {
        Self {
            name,
            raw: RawRule::new(),
            expr: None,
            default: None,
            question: None,
            replacements: Vec::new(),
            enumeration: None,
            private: false,
            status: Status::Unset,
        }
    }

    /// Set the value of the rule.
    pub fn with_value(mut self, expr: Expr<'s>) -> Self {
        write_value(&mut self.raw, &expr);
        self.expr = Some(expr);
        self
    }

    pub fn with_question(mut self, question: &str) -> Self {
        self.raw.insert("question", question.into());
        self.question = Some(question.into());
        self
    }

    pub fn with_default(mut self, default: Expr<'s>) -> Self {
        self.raw.insert("par défaut", (&default).into());
        self.default = Some(default);
        self
    }

    pub fn with_replacement(mut self, replacement: Replacement<'s>) -> Self {
        self.replacements.push(replacement);
        let replaced = self.replacements.iter().map(|r| r.replaced);
        self.raw.insert("remplace", name_list(replaced));
        self
    }

    pub fn with_enumeration(mut self, members: Vec<RuleName<'s>>) -> Self {
        self.raw
            .insert("une possibilité", name_list(members.iter().copied()));
        self.enumeration = Some(Enumeration { members });
        self
    }

    pub fn private(mut self) -> Self {
        self.raw.insert("privé", true.into());
        self.private = true;
        self
    }

    /// Is the value of the rule provided by the user?
    pub fn is_input(&self) -> bool {
        self.question.is_some() || self.default.is_some()
    }

    /// Does the rule declare nothing at all?
    ///
    /// Such rules typically serve as namespaces or as enumeration members.
    pub fn is_empty(&self) -> bool {
        self.expr.is_none()
            && !self.is_input()
            && self.replacements.is_empty()
            && self.enumeration.is_none()
    }

    /// Expression trees of the rule that refer to other rules.
    pub fn exprs(&self) -> impl Iterator<Item = &Expr<'s>> {
        self.expr.iter().chain(self.default.iter())
    }

    pub fn exprs_mut(&mut self) -> impl Iterator<Item = &mut Expr<'s>> {
        self.expr.iter_mut().chain(self.default.iter_mut())
    }
}

#[test]
fn contextual_raw() {
    use alloc::{string::ToString, vec};
    let (root, inner, constant) = ("root", "inner", "constant");
    let (root, inner, constant) = (
        RuleName::new(root),
        RuleName::new(inner),
        RuleName::new(constant),
    );
    let e = Expr::contextual(Expr::from(inner), vec![(constant, Expr::from(20.))]);
    let rule = Rule::new(root).with_value(e);
    assert_eq!(
        rule.raw.to_string(),
        "valeur: inner\ncontexte:\n  constant: 20\n"
    );
    assert!(!rule.is_empty());
    assert_eq!(rule.exprs().count(), 1);
}

#[test]
fn empty() {
    let a = RuleName::new("a");
    assert!(Rule::new(a).is_empty());
    assert!(!Rule::new(a).with_question("a ?").is_empty());
    assert!(Rule::new(a).with_question("a ?").is_input());
    assert_eq!(Status::from_marker("fully"), Some(Status::Fully));
}
