//! Render terms for human eyes.
//!
//! The canonical `Display` form spells out every application. `pretty`
//! additionally writes a binary operator named `.` as left-associated
//! juxtaposition, so combinator-style terms read the way they are written
//! on paper: `.(.(S K) K)` becomes `S K K`.

use itertools::Itertools;

use crate::types::Term;

pub(crate) fn pretty_term(term: &Term, spaces_allowed: bool) -> String {
    match term {
        Term::Variable(v) => v.to_string(),
        Term::Application { op, args } => {
            if args.is_empty() {
                return op.to_string();
            }
            if op.name().as_deref() == Some(".") && args.len() == 2 {
                return pretty_binary_application(term, spaces_allowed);
            }
            let args_str = args.iter().map(|arg| pretty_term(arg, true)).join(", ");
            format!("{}({})", op, args_str)
        }
    }
}

/// Flatten a left-nested spine of `.` applications into one sequence.
fn pretty_binary_application(term: &Term, spaces_allowed: bool) -> String {
    let mut first = term;
    let mut rest = vec![]; // in reverse order for fast `push`ing
    while let Term::Application { op, args } = first {
        if op.name().as_deref() == Some(".") && args.len() == 2 {
            rest.push(&args[1]);
            first = &args[0];
        } else {
            break;
        }
    }
    rest.push(first);
    rest.reverse();
    let interior = rest
        .into_iter()
        .map(|x| pretty_term(x, false))
        .join(" ");
    if spaces_allowed {
        interior
    } else {
        format!("({})", interior)
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Operator, Term};

    fn app(op: &Operator, args: Vec<Term>) -> Term {
        Term::apply(op.clone(), args).unwrap()
    }

    #[test]
    fn pretty_juxtaposition() {
        let dot = Operator::new(Some(".".to_string()), 2);
        let s = Operator::new(Some("S".to_string()), 0);
        let k = Operator::new(Some("K".to_string()), 0);
        let s_t = app(&s, vec![]);
        let k_t = app(&k, vec![]);

        // .(.(S K) K)
        let left = app(&dot, vec![app(&dot, vec![s_t.clone(), k_t.clone()]), k_t.clone()]);
        assert_eq!(left.pretty(), "S K K");

        // .(S .(K K))
        let right = app(&dot, vec![s_t, app(&dot, vec![k_t.clone(), k_t])]);
        assert_eq!(right.pretty(), "S (K K)");
    }

    #[test]
    fn pretty_ordinary_application() {
        let f = Operator::new(Some("F".to_string()), 2);
        let a = Operator::new(Some("A".to_string()), 0);
        let a_t = app(&a, vec![]);

        let term = app(&f, vec![a_t.clone(), a_t]);
        assert_eq!(term.pretty(), "F(A, A)");
        assert_eq!(term.to_string(), "F(A A)");
    }
}
