//! A [Rust][0] library giving executable semantics to first-order
//! [term rewriting systems][1] and reversible local mutations over them —
//! the computational core of a Markov-chain search for rewriting systems
//! that explain observed evaluations.
//!
//! Three pieces fit together:
//!
//! - terms, rules, unification, and a normal-order rewriting engine
//!   ([`Term`], [`Rule`], [`TRS`]);
//! - a probability-weighted exploration of every rewrite path from a term
//!   ([`trace::Trace`]), which external likelihoods query with
//!   [`rewrites_to`];
//! - a proposal mechanism ([`propose::Proposer`]) that perturbs a system
//!   and computes the exact probability of any one of its own transitions,
//!   as Metropolis–Hastings acceptance ratios require.
//!
//! [`Term`]: enum.Term.html
//! [`Rule`]: struct.Rule.html
//! [`TRS`]: struct.TRS.html
//! [`trace::Trace`]: trace/struct.Trace.html
//! [`rewrites_to`]: trace/struct.Trace.html#method.rewrites_to
//! [`propose::Proposer`]: propose/trait.Proposer.html
//!
//! # Example
//!
//! ```
//! use trs_induction::{Operator, Rule, Term, Variable, TRS};
//!
//! // SUCC(PRED(x)) = x
//! let succ = Operator::new(Some("SUCC".to_string()), 1);
//! let pred = Operator::new(Some("PRED".to_string()), 1);
//! let zero = Operator::new(Some("ZERO".to_string()), 0);
//! let x = Variable::new(Some("x".to_string()));
//!
//! let rule = Rule::new(
//!     Term::apply(
//!         succ.clone(),
//!         vec![Term::apply(pred.clone(), vec![Term::Variable(x.clone())]).unwrap()],
//!     )
//!     .unwrap(),
//!     vec![Term::Variable(x)],
//! )
//! .unwrap();
//! let trs = TRS::new(vec![rule]);
//!
//! // SUCC(PRED(ZERO)) rewrites to ZERO in one step
//! let zero_t = Term::apply(zero, vec![]).unwrap();
//! let start = Term::apply(
//!     succ,
//!     vec![Term::apply(pred, vec![zero_t.clone()]).unwrap()],
//! )
//! .unwrap();
//!
//! assert_eq!(trs.rewrite(&start), Some(vec![zero_t.clone()]));
//! assert_eq!(trs.rewrite(&zero_t), None);
//! ```
//!
//! # Term Rewriting Systems
//!
//! Term Rewriting Systems (TRS) are a simple formalism from theoretical
//! computer science used to model the behavior and evolution of tree-based
//! structures like natural language parse trees or abstract syntax trees.
//!
//! A TRS is defined as a pair _(S, R)_. _S_ is a set of symbols called the
//! signature and together with a disjoint and countably infinite set of
//! variables, defines the set of all possible trees, or terms, which the
//! system can consider. _R_ is a set of rewrite rules. A rewrite rule is an
//! equation, _s = t_, and is interpreted as follows: any term matching the
//! pattern described by _s_ can be rewritten according to the pattern
//! described by _t_. Together _S_ and _R_ define a TRS that describes a
//! system of computation, which can be considered as a sort of programming
//! language. This library provides a way to describe arbitrary first-order
//! TRSs (i.e. no lambda-binding in rules), to evaluate terms against them,
//! and to search over them stochastically.
//!
//! ### Further Reading
//!
//! - Baader & Nipkow (1999). [Term rewriting and all that][2]. Cambridge University Press.
//! - Bezem, Klop, & de Vrijer (Eds.) (2003). [Term Rewriting Systems][3]. Cambridge University Press.
//! - [Rewriting][4]. (2017). Wikipedia.
//!
//! [0]: https://www.rust-lang.org
//!      "The Rust Programming Language"
//! [1]: https://en.wikipedia.org/wiki/Rewriting#Term_rewriting_systems
//!      "Wikipedia - Term Rewriting Systems"
//! [2]: http://www.cambridge.org/us/academic/subjects/computer-science/programming-languages-and-applied-logic/term-rewriting-and-all
//!      "Term Rewriting and All That"
//! [3]: http://www.cambridge.org/us/academic/subjects/computer-science/programming-languages-and-applied-logic/term-rewriting-systems
//!      "Term Rewriting Systems"
//! [4]: https://en.wikipedia.org/wiki/Rewriting
//!      "Wikipedia - Rewriting"

pub mod propose;
pub mod trace;

mod pretty;
mod types;

pub use crate::types::*;
