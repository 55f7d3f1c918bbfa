use itertools::Itertools;
use std::collections::HashSet;
use std::fmt;

use super::{Atom, Operator, Term, Variable};

/// A rewrite rule equating a left-hand-side pattern with one or more
/// alternative right-hand-side [`Term`]s.
///
/// [`Term`]: enum.Term.html
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// The pattern rewritten terms must match.
    pub lhs: Term,
    /// The alternatives a matching term may rewrite to.
    pub rhs: Vec<Term>,
}
impl Rule {
    /// Logic ensuring that the `lhs` and `rhs` are compatible.
    fn is_valid(lhs: &Term, rhs: &[Term]) -> bool {
        // the lhs must be an application, and rewriting needs something to
        // rewrite to
        if rhs.is_empty() {
            return false;
        }
        if let Term::Application { .. } = lhs {
            // variables(rhs) must be a subset of variables(lhs)
            let lhs_vars: HashSet<_> = lhs.variables().into_iter().collect();
            let rhs_vars: HashSet<_> = rhs.iter().flat_map(Term::variables).collect();
            rhs_vars.is_subset(&lhs_vars)
        } else {
            false
        }
    }
    /// Construct a rewrite rule from a left-hand-side (LHS) [`Term`] with
    /// one or more right-hand-side (RHS) [`Term`]s. Returns `None` if the
    /// rule is not valid.
    ///
    /// Valid rules meet three conditions:
    ///
    /// 1. `lhs` is an [`Application`]. This prevents a single rule from
    ///    matching all possible terms.
    /// 2. `rhs` is non-empty, so that a matching term always has somewhere
    ///    to go.
    /// 3. A [`Term`] in `rhs` can only use a [`Variable`] if it appears in
    ///    `lhs`. This prevents rewrites from inventing arbitrary terms.
    ///
    /// [`Term`]: enum.Term.html
    /// [`Application`]: enum.Term.html#variant.Application
    /// [`Variable`]: struct.Variable.html
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Rule, Term, Variable};
    /// let f = Operator::new(Some("F".to_string()), 1);
    /// let x = Variable::new(Some("x".to_string()));
    /// let y = Variable::new(Some("y".to_string()));
    ///
    /// let lhs = Term::apply(f, vec![Term::Variable(x.clone())]).unwrap();
    ///
    /// assert!(Rule::new(lhs.clone(), vec![Term::Variable(x.clone())]).is_some());
    /// // a bare variable cannot head a rule
    /// assert!(Rule::new(Term::Variable(x), vec![lhs.clone()]).is_none());
    /// // the rhs cannot invent variables
    /// assert!(Rule::new(lhs.clone(), vec![Term::Variable(y)]).is_none());
    /// // the rhs cannot be empty
    /// assert!(Rule::new(lhs, vec![]).is_none());
    /// ```
    pub fn new(lhs: Term, rhs: Vec<Term>) -> Option<Rule> {
        if Rule::is_valid(&lhs, &rhs) {
            Some(Rule { lhs, rhs })
        } else {
            None
        }
    }
    /// The number of RHS alternatives in the rule.
    pub fn len(&self) -> usize {
        self.rhs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }
    /// The total number of subterms across all terms in the rule.
    pub fn size(&self) -> usize {
        self.lhs.size() + self.rhs.iter().map(Term::size).sum::<usize>()
    }
    /// Give the lone RHS, if it exists.
    pub fn rhs(&self) -> Option<&Term> {
        if self.rhs.len() == 1 {
            Some(&self.rhs[0])
        } else {
            None
        }
    }
    /// All the [`Variable`]s in the rule; every RHS variable also occurs in
    /// the LHS.
    ///
    /// [`Variable`]: struct.Variable.html
    pub fn variables(&self) -> Vec<Variable> {
        self.lhs.variables()
    }
    /// All the [`Operator`]s in the rule.
    ///
    /// [`Operator`]: struct.Operator.html
    pub fn operators(&self) -> Vec<Operator> {
        let lhs = self.lhs.operators().into_iter();
        let rhs = self.rhs.iter().flat_map(Term::operators);
        lhs.chain(rhs).unique().collect()
    }
    /// All the [`Atom`]s in the rule.
    ///
    /// [`Atom`]: enum.Atom.html
    pub fn atoms(&self) -> Vec<Atom> {
        let lhs = self.lhs.atoms();
        let rhs = self.rhs.iter().flat_map(Term::atoms);
        lhs.chain(rhs).unique().collect()
    }
}
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rhs = self.rhs.iter().map(|t| t.to_string()).join(" | ");
        write!(f, "{} = {}", self.lhs, rhs)
    }
}
