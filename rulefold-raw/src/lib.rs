//! Raw declarative form of rules.
//!
//! This is the form in which rules are written in rule files:
//! every rule is a dotted name mapped to an ordered set of attributes,
//! such as `valeur`, `question`, or `par défaut`.
//! Optimization passes keep the raw form of every rule around,
//! so that rules can be written back after they have been rewritten.
//!
//! Example usage:
//!
//! ~~~
//! use rulefold_raw::{RawRule, RawRules, RawValue};
//!
//! let mut total = RawRule::new();
//! total.insert("valeur", RawValue::Number(30.));
//! total.insert("optimized", RawValue::from("fully"));
//!
//! let mut rules = RawRules::new();
//! rules.push("total", total);
//! assert_eq!(rules.to_string(), "total:\n  valeur: 30\n  optimized: fully\n");
//! ~~~
#![no_std]

extern crate alloc;

mod rule;
mod value;

pub use rule::{RawRule, RawRules};
pub use value::RawValue;
