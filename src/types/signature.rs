use rand::Rng;
use std::collections::HashSet;
use std::fmt;

use super::{Atom, Operator, Term, Variable};

/// Records the universe of symbols in scope for a rewriting system.
///
/// Atoms are kept in insertion order, without duplicates, so that uniform
/// draws over them are reproducible under a fixed seed. Two `Signature`s are
/// equal when they contain the same symbols, whatever the order.
///
/// # Examples
///
/// ```
/// # use trs_induction::{Atom, Operator, Signature, Variable};
/// let succ = Operator::new(Some("SUCC".to_string()), 1);
/// let zero = Operator::new(Some("ZERO".to_string()), 0);
/// let x = Variable::new(Some("x".to_string()));
///
/// let sig = Signature::new(vec![
///     Atom::from(succ.clone()),
///     Atom::from(zero.clone()),
///     Atom::from(x.clone()),
/// ]);
///
/// assert_eq!(sig.operators(), vec![succ, zero.clone()]);
/// assert_eq!(sig.variables(), vec![x.clone()]);
/// assert_eq!(sig.terminals(), vec![Atom::from(zero), Atom::from(x)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Signature {
    atoms: Vec<Atom>,
}
impl Signature {
    /// Construct a `Signature` from the given atoms, dropping duplicates.
    pub fn new(atoms: Vec<Atom>) -> Signature {
        let mut sig = Signature::default();
        for atom in atoms {
            sig.add(atom);
        }
        sig
    }
    /// Every atom known to the signature, in the order it was added.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }
    /// Every [`Operator`] known to the signature.
    ///
    /// [`Operator`]: struct.Operator.html
    pub fn operators(&self) -> Vec<Operator> {
        self.atoms
            .iter()
            .filter_map(|a| match a {
                Atom::Operator(o) => Some(o.clone()),
                _ => None,
            })
            .collect()
    }
    /// Every [`Variable`] known to the signature.
    ///
    /// [`Variable`]: struct.Variable.html
    pub fn variables(&self) -> Vec<Variable> {
        self.atoms
            .iter()
            .filter_map(|a| match a {
                Atom::Variable(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }
    /// Every arity-0 atom known to the signature.
    pub fn terminals(&self) -> Vec<Atom> {
        self.atoms
            .iter()
            .filter(|a| a.is_terminal())
            .cloned()
            .collect()
    }
    pub fn contains(&self, atom: &Atom) -> bool {
        self.atoms.contains(atom)
    }
    pub fn len(&self) -> usize {
        self.atoms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
    /// Bring `atom` into scope. Adding a symbol twice has no effect.
    pub fn add(&mut self, atom: Atom) {
        if !self.atoms.contains(&atom) {
            self.atoms.push(atom);
        }
    }
    /// Take `atom` out of scope.
    ///
    /// This is a plain set removal. When the signature belongs to a
    /// [`TRS`], use [`TRS::remove_symbol`], which also deletes the rules
    /// referencing the symbol.
    ///
    /// [`TRS`]: struct.TRS.html
    /// [`TRS::remove_symbol`]: struct.TRS.html#method.remove_symbol
    pub fn remove(&mut self, atom: &Atom) {
        self.atoms.retain(|a| a != atom);
    }
    /// Draw a random term over the signature, choosing heads uniformly and
    /// recursing per arity.
    ///
    /// Fails with [`SignatureError::NoTerminals`] when the signature has no
    /// arity-0 symbol to ground the recursion.
    ///
    /// [`SignatureError::NoTerminals`]: enum.SignatureError.html#variant.NoTerminals
    ///
    /// # Examples
    ///
    /// ```
    /// # use rand::{rngs::StdRng, SeedableRng};
    /// # use trs_induction::{Atom, Operator, Signature};
    /// let mut rng = StdRng::seed_from_u64(0);
    /// let sig = Signature::new(vec![
    ///     Atom::from(Operator::new(Some("S".to_string()), 0)),
    ///     Atom::from(Operator::new(Some("K".to_string()), 0)),
    /// ]);
    ///
    /// let term = sig.sample_term(&mut rng).unwrap();
    /// assert!(sig.contains(&term.head()));
    /// ```
    pub fn sample_term<R: Rng>(&self, rng: &mut R) -> Result<Term, SignatureError> {
        if !self.atoms.iter().any(Atom::is_terminal) {
            return Err(SignatureError::NoTerminals);
        }
        Ok(self.sample_term_internal(rng))
    }
    fn sample_term_internal<R: Rng>(&self, rng: &mut R) -> Term {
        let atom = &self.atoms[rng.gen_range(0..self.atoms.len())];
        match atom {
            Atom::Variable(v) => Term::Variable(v.clone()),
            Atom::Operator(op) => {
                let args = (0..op.arity())
                    .map(|_| self.sample_term_internal(rng))
                    .collect();
                Term::Application {
                    op: op.clone(),
                    args,
                }
            }
        }
    }
}
impl PartialEq for Signature {
    fn eq(&self, other: &Signature) -> bool {
        let mine: HashSet<&Atom> = self.atoms.iter().collect();
        let theirs: HashSet<&Atom> = other.atoms.iter().collect();
        mine == theirs
    }
}
impl Eq for Signature {}

/// The error type for constraint checks in signature-based sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// Returned when sampling needs an arity-0 symbol to terminate but the
    /// signature holds none.
    NoTerminals,
}
impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignatureError::NoTerminals => write!(f, "signature has no terminals"),
        }
    }
}
impl ::std::error::Error for SignatureError {}
