#![no_std]
#![forbid(unsafe_code)]

//! Constant folding and dead rule elimination for declarative rule graphs.
//!
//! A rule graph maps dotted rule names, such as `impôt . revenu net`,
//! to rules whose values are expressions over other rules.
//! Some rules are inputs whose values are given by the user in a *situation*.
//! Every rule whose value does not depend on the situation can be
//! replaced by its value, and the rules that refer to it can use that value.
//! Afterwards, rules that are no longer referred to can be removed.
//!
//! # Usage
//!
//! Rule names are handed out by a [`Names`] table.
//! Two references designate the same rule only if
//! they were obtained from the same table entry,
//! which is why names are never compared by their text.
//! Rules are built from names and expressions and inserted into a [`Graph`].
//! Folding a graph with [`fold()`] yields a new graph,
//! using an evaluator implementing [`Evaluate`], such as the [`Interpreter`].
//! Finally, the folded graph can be written back to its raw form with [`serialize`].
//!
//! ~~~
//! # use rulefold::{fold, serialize, Expr, Graph, Interpreter, Names, Rule};
//! let names: Names = ["ruleA", "B . C", "D"].into_iter().collect();
//! let [a, bc, d] = ["ruleA", "B . C", "D"].map(|n| names.get(n).unwrap());
//!
//! let mut graph = Graph::new();
//! graph.insert(Rule::new(a).with_value(Expr::from(bc) * Expr::from(d)))?;
//! graph.insert(Rule::new(bc).with_value(Expr::from(10.)))?;
//! graph.insert(Rule::new(d).with_value(Expr::from(3.)))?;
//!
//! let opts = fold::Options::new().keep(move |rule| rule.name == a);
//! let folded = fold(&graph, &mut Interpreter::new(), &opts)?;
//! let raw = serialize(&folded, &opts.marker);
//! assert_eq!(raw.to_string(), "ruleA:\n  valeur: 30\n  optimized: fully\n");
//! # Ok::<_, rulefold::Error>(())
//! ~~~

extern crate alloc;
#[macro_use]
extern crate log;

pub mod classify;
mod error;
pub mod eval;
pub mod expr;
pub mod fold;
pub mod graph;
mod index;
pub mod name;
pub mod names;
pub mod rule;
mod serialize;
mod value;

pub use error::Error;
pub use eval::{Evaluate, Evaluation, Interpreter, Situation};
pub use expr::{AmbiguousReference, Expr, Op};
pub use fold::fold;
pub use graph::Graph;
pub use index::ReferenceIndex;
pub use name::RuleName;
pub use names::Names;
pub use rule::{Enumeration, Replacement, Rule, Status};
pub use serialize::serialize;
pub use value::{Unit, Value};
