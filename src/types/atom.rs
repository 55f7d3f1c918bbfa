use lazy_static::lazy_static;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{Arity, Name};

lazy_static! {
    static ref VAR_ID: AtomicUsize = AtomicUsize::new(0);
}

/// Returns the next internal counter, incrementing it.
fn var_next() -> usize {
    VAR_ID.fetch_add(1, Ordering::Relaxed)
}

/// A symbol with fixed arity, usable as the head of an application.
///
/// Two `Operator`s denote the same symbol exactly when they agree on name
/// and arity.
///
/// # Examples
///
/// ```
/// # use trs_induction::Operator;
/// let f1 = Operator::new(Some("F".to_string()), 2);
/// let f2 = Operator::new(Some("F".to_string()), 2);
/// let g = Operator::new(Some("G".to_string()), 2);
///
/// assert_eq!(f1, f2);
/// assert_ne!(f1, g);
/// assert_eq!(f1.arity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    name: Name,
    arity: Arity,
}
impl Operator {
    pub fn new(name: Name, arity: Arity) -> Operator {
        Operator { name, arity }
    }
    pub fn name(&self) -> &Name {
        &self.name
    }
    pub fn arity(&self) -> Arity {
        self.arity
    }
}
impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(f, "{}", name),
            None => write!(f, "op/{}", self.arity),
        }
    }
}

/// A symbol standing for an unspecified term.
///
/// A `Variable`'s identity is the unique token handed out at construction;
/// its name is only decoration. Two calls to [`Variable::new`] always yield
/// distinct variables, whatever their names.
///
/// [`Variable::new`]: struct.Variable.html#method.new
///
/// # Examples
///
/// ```
/// # use trs_induction::Variable;
/// let x1 = Variable::new(Some("x".to_string()));
/// let x2 = Variable::new(Some("x".to_string()));
///
/// assert_eq!(x1, x1.clone());
/// assert_ne!(x1, x2);
/// ```
#[derive(Debug, Clone, Eq)]
pub struct Variable {
    id: usize,
    name: Name,
}
impl Variable {
    pub fn new(name: Name) -> Variable {
        Variable {
            id: var_next(),
            name,
        }
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn name(&self) -> &Name {
        &self.name
    }
}
impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.id == other.id
    }
}
impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(f, "{}_", name),
            None => write!(f, "v{}_", self.id),
        }
    }
}

/// `Atom`s are the symbols from which terms are built: [`Variable`]s and
/// [`Operator`]s.
///
/// [`Variable`]: struct.Variable.html
/// [`Operator`]: struct.Operator.html
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Atom {
    /// The [`Variable`] variant of an `Atom`.
    ///
    /// [`Variable`]: struct.Variable.html
    Variable(Variable),
    /// The [`Operator`] variant of an `Atom`.
    ///
    /// [`Operator`]: struct.Operator.html
    Operator(Operator),
}
impl Atom {
    /// The number of arguments the atom takes; variables take none.
    pub fn arity(&self) -> Arity {
        match self {
            Atom::Variable(_) => 0,
            Atom::Operator(o) => o.arity(),
        }
    }
    /// Can the atom stand on its own as a term?
    pub fn is_terminal(&self) -> bool {
        self.arity() == 0
    }
    pub fn is_operator(&self) -> bool {
        matches!(self, Atom::Operator(_))
    }
    pub fn is_variable(&self) -> bool {
        matches!(self, Atom::Variable(_))
    }
}
impl From<Variable> for Atom {
    fn from(var: Variable) -> Atom {
        Atom::Variable(var)
    }
}
impl From<Operator> for Atom {
    fn from(op: Operator) -> Atom {
        Atom::Operator(op)
    }
}
impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Atom::Variable(v) => write!(f, "{}", v),
            Atom::Operator(o) => write!(f, "{}", o),
        }
    }
}
