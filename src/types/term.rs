use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::collections::HashMap;
use std::fmt;

use super::{Atom, Operator, Variable};
use crate::pretty;

/// The error type for term construction and substitution application.
#[derive(Debug, Clone, PartialEq)]
pub enum TermError {
    /// Returned when an application is built with the wrong number of
    /// arguments for its head.
    ///
    /// See [`Term::apply`] for more information.
    ///
    /// [`Term::apply`]: enum.Term.html#method.apply
    ArityMismatch { op: Operator, found: usize },
    /// Returned when a substitution is applied to a variable it does not
    /// bind.
    ///
    /// See [`Substitution::apply`] for more information.
    ///
    /// [`Substitution::apply`]: struct.Substitution.html#method.apply
    UnboundVariable(Variable),
}
impl fmt::Display for TermError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TermError::ArityMismatch { op, found } => write!(
                f,
                "operator {} with arity {} applied to {} arguments",
                op,
                op.arity(),
                found
            ),
            TermError::UnboundVariable(v) => write!(f, "no binding for variable {}", v),
        }
    }
}
impl ::std::error::Error for TermError {}

/// A way of signifying what type of unification is being performed.
#[derive(PartialEq, Eq)]
enum Unification {
    Match,
    Unify,
}

/// A first-order term: either a [`Variable`] or an [`Operator`] applied to
/// a sequence of terms.
///
/// Every `Application` holds exactly as many arguments as its head's arity;
/// [`Term::apply`] checks this at construction.
///
/// [`Variable`]: struct.Variable.html
/// [`Operator`]: struct.Operator.html
/// [`Term::apply`]: #method.apply
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A concrete but unspecified `Term` (e.g. `x`, `y`).
    Variable(Variable),
    /// An [`Operator`] applied to zero or more `Term`s (e.g. `F(x, y)`, `G`).
    ///
    /// [`Operator`]: struct.Operator.html
    Application { op: Operator, args: Vec<Term> },
}
impl Term {
    /// Build the application of `op` to `args`, checking the arity.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Term, TermError};
    /// let a = Operator::new(Some("A".to_string()), 0);
    /// let f = Operator::new(Some("F".to_string()), 2);
    ///
    /// let a_term = Term::apply(a.clone(), vec![]).unwrap();
    /// assert!(Term::apply(f.clone(), vec![a_term.clone(), a_term.clone()]).is_ok());
    ///
    /// let err = Term::apply(f.clone(), vec![a_term]).unwrap_err();
    /// assert_eq!(err, TermError::ArityMismatch { op: f, found: 1 });
    /// ```
    pub fn apply(op: Operator, args: Vec<Term>) -> Result<Term, TermError> {
        if op.arity() as usize == args.len() {
            Ok(Term::Application { op, args })
        } else {
            Err(TermError::ArityMismatch {
                op,
                found: args.len(),
            })
        }
    }
    /// The [`Atom`] heading the term.
    ///
    /// [`Atom`]: enum.Atom.html
    pub fn head(&self) -> Atom {
        match self {
            Term::Variable(v) => Atom::Variable(v.clone()),
            Term::Application { op, .. } => Atom::Operator(op.clone()),
        }
    }
    /// The term's immediate arguments; a variable has none.
    pub fn args(&self) -> &[Term] {
        match self {
            Term::Variable(_) => &[],
            Term::Application { args, .. } => args,
        }
    }
    /// Every symbol occurrence in the term: the head, then each argument's
    /// atoms in order. The iterator is lazy and can be restarted by calling
    /// `atoms` again.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Atom, Operator, Term, Variable};
    /// let f = Operator::new(Some("F".to_string()), 2);
    /// let a = Operator::new(Some("A".to_string()), 0);
    /// let x = Variable::new(Some("x".to_string()));
    ///
    /// let term = Term::apply(f.clone(), vec![
    ///     Term::Variable(x.clone()),
    ///     Term::apply(a.clone(), vec![]).unwrap(),
    /// ]).unwrap();
    ///
    /// let atoms: Vec<Atom> = term.atoms().collect();
    /// assert_eq!(atoms, vec![Atom::from(f), Atom::from(x), Atom::from(a)]);
    /// ```
    pub fn atoms(&self) -> Atoms {
        Atoms {
            stack: smallvec![self],
        }
    }
    /// The term itself followed by every subterm of each argument,
    /// pre-order. Lazy and restartable, like [`atoms`].
    ///
    /// [`atoms`]: #method.atoms
    pub fn subterms(&self) -> Subterms {
        Subterms {
            stack: smallvec![self],
        }
    }
    /// The number of subterms in the term.
    pub fn size(&self) -> usize {
        self.subterms().count()
    }
    /// Every [`Variable`] used in the term, in order of first appearance.
    ///
    /// [`Variable`]: struct.Variable.html
    pub fn variables(&self) -> Vec<Variable> {
        self.atoms()
            .filter_map(|atom| match atom {
                Atom::Variable(v) => Some(v),
                _ => None,
            })
            .unique()
            .collect()
    }
    /// Every [`Operator`] used in the term, in order of first appearance.
    ///
    /// [`Operator`]: struct.Operator.html
    pub fn operators(&self) -> Vec<Operator> {
        self.atoms()
            .filter_map(|atom| match atom {
                Atom::Operator(o) => Some(o),
                _ => None,
            })
            .unique()
            .collect()
    }
    /// Render the term with a binary operator named `.` written as
    /// juxtaposition. Presentation only; see the canonical form in
    /// [`Display`].
    ///
    /// [`Display`]: #impl-Display
    pub fn pretty(&self) -> String {
        pretty::pretty_term(self, true)
    }
    /// Replace every variable bound by `sub`, leaving unbound variables in
    /// place.
    ///
    /// For the strict version, which fails on unbound variables, see
    /// [`Substitution::apply`].
    ///
    /// [`Substitution::apply`]: struct.Substitution.html#method.apply
    pub fn substitute(&self, sub: &Substitution) -> Term {
        match self {
            Term::Variable(v) => sub.get(v).cloned().unwrap_or_else(|| self.clone()),
            Term::Application { op, args } => Term::Application {
                op: op.clone(),
                args: args.iter().map(|t| t.substitute(sub)).collect(),
            },
        }
    }
    /// Take a slice of pairs of terms and perform a substitution on each.
    fn constraint_substitute(cs: &[(Term, Term)], sub: &Substitution) -> Vec<(Term, Term)> {
        cs.iter()
            .map(|(s, t)| (s.substitute(sub), t.substitute(sub)))
            .collect()
    }
    /// Compose two substitutions.
    fn compose(sub1: Option<Substitution>, sub2: Option<Substitution>) -> Option<Substitution> {
        match (sub1, sub2) {
            (Some(mut s1), Some(s2)) => {
                for (k, v) in s2.0 {
                    let v = v.substitute(&s1);
                    s1.0.insert(k, v);
                }
                Some(s1)
            }
            _ => None,
        }
    }
    /// Compute a substitution equating two terms, or `None` when no unifier
    /// exists. Variables on either side may bind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Term, Variable};
    /// let f = Operator::new(Some("F".to_string()), 2);
    /// let a = Term::apply(Operator::new(Some("A".to_string()), 0), vec![]).unwrap();
    /// let b = Term::apply(Operator::new(Some("B".to_string()), 0), vec![]).unwrap();
    /// let x = Variable::new(Some("x".to_string()));
    /// let y = Variable::new(Some("y".to_string()));
    ///
    /// let t1 = Term::apply(f.clone(), vec![Term::Variable(x), a.clone()]).unwrap();
    /// let t2 = Term::apply(f.clone(), vec![b.clone(), Term::Variable(y)]).unwrap();
    ///
    /// let sub = Term::unify(&t1, &t2).unwrap();
    /// assert_eq!(t1.substitute(&sub), t2.substitute(&sub));
    /// ```
    pub fn unify(t1: &Term, t2: &Term) -> Option<Substitution> {
        Term::unify_internal(vec![(t1.clone(), t2.clone())], Unification::Unify)
    }
    /// Match `pattern` against `term`: compute a substitution over
    /// `pattern`'s variables making it equal to `term`, or `None`. Variables
    /// in `term` are opaque symbols and never bind.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Term, Variable};
    /// let f = Operator::new(Some("F".to_string()), 1);
    /// let a = Term::apply(Operator::new(Some("A".to_string()), 0), vec![]).unwrap();
    /// let x = Variable::new(Some("x".to_string()));
    ///
    /// let pattern = Term::apply(f.clone(), vec![Term::Variable(x.clone())]).unwrap();
    /// let target = Term::apply(f.clone(), vec![a.clone()]).unwrap();
    ///
    /// let sub = Term::pmatch(&pattern, &target).unwrap();
    /// assert_eq!(sub.get(&x), Some(&a));
    /// assert!(Term::pmatch(&target, &pattern).is_none());
    /// ```
    pub fn pmatch(pattern: &Term, term: &Term) -> Option<Substitution> {
        Term::unify_internal(vec![(pattern.clone(), term.clone())], Unification::Match)
    }
    /// The internal implementation of `unify` and `pmatch`.
    fn unify_internal(mut cs: Vec<(Term, Term)>, utype: Unification) -> Option<Substitution> {
        let c = cs.pop();
        match c {
            None => Some(Substitution::new()),
            Some((ref s, ref t)) if s == t => Term::unify_internal(cs, utype),
            Some((
                Term::Application { op: h1, args: a1 },
                Term::Application { op: h2, args: a2 },
            )) if h1 == h2 => {
                cs.extend(a1.into_iter().zip(a2));
                Term::unify_internal(cs, utype)
            }
            Some((Term::Variable(var), ref t)) if !t.variables().contains(&var) => {
                let mut st = Substitution::new();
                st.insert(var, t.clone());
                let cs = Term::constraint_substitute(&cs, &st);
                Term::compose(Term::unify_internal(cs, utype), Some(st))
            }
            Some((ref s, Term::Variable(var)))
                if utype == Unification::Unify && !s.variables().contains(&var) =>
            {
                let mut ts = Substitution::new();
                ts.insert(var, s.clone());
                let cs = Term::constraint_substitute(&cs, &ts);
                Term::compose(Term::unify_internal(cs, utype), Some(ts))
            }
            _ => None,
        }
    }
}
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Application { op, args } => {
                if args.is_empty() {
                    write!(f, "{}", op)
                } else {
                    write!(f, "{}(", op)?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}

/// An iterator over the symbol occurrences of a [`Term`], pre-order.
///
/// See [`Term::atoms`].
///
/// [`Term`]: enum.Term.html
/// [`Term::atoms`]: enum.Term.html#method.atoms
pub struct Atoms<'a> {
    stack: SmallVec<[&'a Term; 32]>,
}
impl<'a> Iterator for Atoms<'a> {
    type Item = Atom;
    fn next(&mut self) -> Option<Atom> {
        let term = self.stack.pop()?;
        match term {
            Term::Variable(v) => Some(Atom::Variable(v.clone())),
            Term::Application { op, args } => {
                for arg in args.iter().rev() {
                    self.stack.push(arg);
                }
                Some(Atom::Operator(op.clone()))
            }
        }
    }
}

/// An iterator over the subterms of a [`Term`], pre-order.
///
/// See [`Term::subterms`].
///
/// [`Term`]: enum.Term.html
/// [`Term::subterms`]: enum.Term.html#method.subterms
pub struct Subterms<'a> {
    stack: SmallVec<[&'a Term; 32]>,
}
impl<'a> Iterator for Subterms<'a> {
    type Item = &'a Term;
    fn next(&mut self) -> Option<&'a Term> {
        let term = self.stack.pop()?;
        if let Term::Application { args, .. } = term {
            for arg in args.iter().rev() {
                self.stack.push(arg);
            }
        }
        Some(term)
    }
}

/// A transient mapping from [`Variable`]s to [`Term`]s, produced by
/// unification and consumed by rewriting.
///
/// [`Variable`]: struct.Variable.html
/// [`Term`]: enum.Term.html
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Substitution(pub(crate) HashMap<Variable, Term>);
impl Substitution {
    pub fn new() -> Substitution {
        Substitution(HashMap::new())
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.0.get(var)
    }
    pub fn insert(&mut self, var: Variable, term: Term) -> Option<Term> {
        self.0.insert(var, term)
    }
    /// Strictly apply the substitution to `term`: rebuild applications,
    /// replace bound variables, and fail with
    /// [`TermError::UnboundVariable`] on a variable with no binding.
    ///
    /// [`TermError::UnboundVariable`]: enum.TermError.html#variant.UnboundVariable
    ///
    /// # Examples
    ///
    /// ```
    /// # use trs_induction::{Operator, Substitution, Term, TermError, Variable};
    /// let a = Term::apply(Operator::new(Some("A".to_string()), 0), vec![]).unwrap();
    /// let x = Variable::new(Some("x".to_string()));
    /// let y = Variable::new(Some("y".to_string()));
    ///
    /// let mut sub = Substitution::new();
    /// sub.insert(x.clone(), a.clone());
    ///
    /// assert_eq!(sub.apply(&Term::Variable(x)), Ok(a));
    /// assert_eq!(
    ///     sub.apply(&Term::Variable(y.clone())),
    ///     Err(TermError::UnboundVariable(y)),
    /// );
    /// ```
    pub fn apply(&self, term: &Term) -> Result<Term, TermError> {
        match term {
            Term::Variable(v) => self
                .get(v)
                .cloned()
                .ok_or_else(|| TermError::UnboundVariable(v.clone())),
            Term::Application { op, args } => {
                let args = args
                    .iter()
                    .map(|t| self.apply(t))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Term::Application {
                    op: op.clone(),
                    args,
                })
            }
        }
    }
}
