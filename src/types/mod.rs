/// Represents the name of a `Variable` or an `Operator`.
pub type Name = Option<String>;

/// Represents the number of arguments an `Operator` takes.
pub type Arity = u32;

pub use self::atom::*;
mod atom;

pub use self::signature::*;
mod signature;

pub use self::term::*;
mod term;

pub use self::rule::*;
mod rule;

pub use self::trs::*;
mod trs;
