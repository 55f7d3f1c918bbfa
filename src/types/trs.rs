use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use super::{Atom, Rule, Signature, Term};

/// A first-order term rewriting system: an ordered sequence of [`Rule`]s
/// plus the [`Signature`] scoping them.
///
/// Rule order matters: when several rules could fire at the same position,
/// the earliest one wins. The signature always contains every symbol the
/// rules mention; rule edits maintain this, and [`remove_symbol`] cascades
/// the other way by deleting every rule that references a removed symbol.
///
/// [`Rule`]: struct.Rule.html
/// [`Signature`]: struct.Signature.html
/// [`remove_symbol`]: #method.remove_symbol
#[derive(Debug, Clone, PartialEq)]
pub struct TRS {
    pub rules: Vec<Rule>,
    pub(crate) signature: Signature,
}
impl TRS {
    /// Construct a rewriting system from a list of [`Rule`]s, deriving the
    /// signature from the symbols they use.
    ///
    /// [`Rule`]: struct.Rule.html
    pub fn new(rules: Vec<Rule>) -> TRS {
        let mut signature = Signature::default();
        for rule in &rules {
            for atom in rule.atoms() {
                signature.add(atom);
            }
        }
        TRS { rules, signature }
    }
    /// The symbols in scope for this system.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
    /// The number of rules in the system.
    pub fn len(&self) -> usize {
        self.rules.len()
    }
    /// Are there any rules in the system?
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
    /// The total number of subterms across all rules.
    pub fn size(&self) -> usize {
        self.rules.iter().map(Rule::size).sum()
    }
    /// Put `rule` at the highest priority position.
    pub fn push(&mut self, rule: Rule) {
        for atom in rule.atoms() {
            self.signature.add(atom);
        }
        self.rules.insert(0, rule);
    }
    /// Insert `rule` so that it is tried after `idx - 1` others.
    pub fn insert_idx(&mut self, idx: usize, rule: Rule) -> Result<&mut TRS, TRSError> {
        if idx > self.rules.len() {
            return Err(TRSError::InvalidIndex(idx, self.rules.len()));
        }
        for atom in rule.atoms() {
            self.signature.add(atom);
        }
        self.rules.insert(idx, rule);
        Ok(self)
    }
    /// Remove and return the rule at index `idx`.
    pub fn remove_idx(&mut self, idx: usize) -> Result<Rule, TRSError> {
        if idx >= self.rules.len() {
            return Err(TRSError::InvalidIndex(idx, self.rules.len()));
        }
        Ok(self.rules.remove(idx))
    }
    /// Replace the rule at index `idx` with `rule`.
    pub fn replace_idx(&mut self, idx: usize, rule: Rule) -> Result<&mut TRS, TRSError> {
        if idx >= self.rules.len() {
            return Err(TRSError::InvalidIndex(idx, self.rules.len()));
        }
        for atom in rule.atoms() {
            self.signature.add(atom);
        }
        self.rules[idx] = rule;
        Ok(self)
    }
    /// Bring `atom` into scope without attaching it to any rule.
    pub fn add_symbol(&mut self, atom: Atom) {
        self.signature.add(atom);
    }
    /// Take `atom` out of scope and delete every rule referencing it, so no
    /// rule is left mentioning an unknown symbol.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Atom, Operator, Rule, Term, TRS};
    /// let a = Operator::new(Some("A".to_string()), 0);
    /// let b = Operator::new(Some("B".to_string()), 0);
    /// let c = Operator::new(Some("C".to_string()), 0);
    /// let a_t = Term::apply(a.clone(), vec![]).unwrap();
    /// let b_t = Term::apply(b.clone(), vec![]).unwrap();
    /// let c_t = Term::apply(c.clone(), vec![]).unwrap();
    ///
    /// let mut trs = TRS::new(vec![
    ///     Rule::new(a_t.clone(), vec![b_t.clone()]).unwrap(),
    ///     Rule::new(c_t.clone(), vec![c_t.clone()]).unwrap(),
    /// ]);
    /// assert_eq!(trs.len(), 2);
    ///
    /// trs.remove_symbol(&Atom::from(b));
    /// assert_eq!(trs.len(), 1);
    /// assert!(!trs.signature().contains(&Atom::from(Operator::new(Some("B".to_string()), 0))));
    /// ```
    pub fn remove_symbol(&mut self, atom: &Atom) {
        self.signature.remove(atom);
        self.rules.retain(|rule| !rule.atoms().contains(atom));
    }
    /// Return rewrites modifying the entire term, if possible, else `None`.
    fn rewrite_head(&self, term: &Term) -> Option<Vec<Term>> {
        for rule in &self.rules {
            if let Some(ref sub) = Term::pmatch(&rule.lhs, term) {
                return Some(rule.rhs.iter().map(|rhs| rhs.substitute(sub)).collect());
            }
        }
        None
    }
    /// Return rewrites modifying subterms, if possible, else `None`.
    fn rewrite_args(&self, term: &Term) -> Option<Vec<Term>> {
        if let Term::Application { op, args } = term {
            for (i, arg) in args.iter().enumerate() {
                if let Some(v) = self.rewrite(arg) {
                    let res = v
                        .into_iter()
                        .map(|x| {
                            let mut new_args = args.clone();
                            new_args[i] = x;
                            Term::Application {
                                op: op.clone(),
                                args: new_args,
                            }
                        })
                        .collect();
                    return Some(res);
                }
            }
            None
        } else {
            None
        }
    }
    /// Perform a single rewrite step using a normal-order
    /// (leftmost-outermost) strategy, enumerating every alternative at the
    /// first rewritable position. `None` means no position rewrites, which
    /// is how callers detect normal forms; it is distinct from a rewrite
    /// that reproduces the term.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Rule, Term, TRS, Variable};
    /// let f = Operator::new(Some("F".to_string()), 1);
    /// let g = Operator::new(Some("G".to_string()), 1);
    /// let a = Term::apply(Operator::new(Some("A".to_string()), 0), vec![]).unwrap();
    /// let x = Variable::new(Some("x".to_string()));
    ///
    /// // F(x) = G(x)
    /// let trs = TRS::new(vec![Rule::new(
    ///     Term::apply(f.clone(), vec![Term::Variable(x.clone())]).unwrap(),
    ///     vec![Term::apply(g.clone(), vec![Term::Variable(x)]).unwrap()],
    /// ).unwrap()]);
    ///
    /// let f_a = Term::apply(f, vec![a.clone()]).unwrap();
    /// let g_a = Term::apply(g, vec![a.clone()]).unwrap();
    ///
    /// assert_eq!(trs.rewrite(&f_a), Some(vec![g_a.clone()]));
    /// assert_eq!(trs.rewrite(&g_a), None);
    /// ```
    pub fn rewrite(&self, term: &Term) -> Option<Vec<Term>> {
        match term {
            Term::Variable(_) => None,
            app => self.rewrite_head(app).or_else(|| self.rewrite_args(app)),
        }
    }
    /// Perform a single rewrite step at the same position [`rewrite`] would
    /// use, drawing one alternative uniformly at random instead of
    /// enumerating them all.
    ///
    /// [`rewrite`]: #method.rewrite
    pub fn rewrite_one<R: Rng>(&self, term: &Term, rng: &mut R) -> Option<Term> {
        match term {
            Term::Variable(_) => None,
            Term::Application { op, args } => {
                for rule in &self.rules {
                    if let Some(ref sub) = Term::pmatch(&rule.lhs, term) {
                        return rule.rhs.choose(rng).map(|rhs| rhs.substitute(sub));
                    }
                }
                for (i, arg) in args.iter().enumerate() {
                    if let Some(new_arg) = self.rewrite_one(arg, rng) {
                        let mut new_args = args.clone();
                        new_args[i] = new_arg;
                        return Some(Term::Application {
                            op: op.clone(),
                            args: new_args,
                        });
                    }
                }
                None
            }
        }
    }
}
impl fmt::Display for TRS {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            self.rules.iter().map(|rule| format!("{};", rule)).join("\n")
        )
    }
}

/// The error type for [`TRS`] manipulations.
///
/// [`TRS`]: struct.TRS.html
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TRSError {
    /// Returned when requesting a rule at an index outside the range of
    /// indices for the TRS.
    InvalidIndex(usize, usize),
}
impl fmt::Display for TRSError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TRSError::InvalidIndex(idx, len) => {
                write!(f, "index {} outside a TRS of {} rules", idx, len)
            }
        }
    }
}
impl ::std::error::Error for TRSError {}
