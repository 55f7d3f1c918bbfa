//! Propose local mutations to a rewriting system and score them exactly.
//!
//! A [`Proposer`] perturbs a [`TRS`] into a structurally related candidate
//! and, independently, computes the exact log probability that it would map
//! one given system to another. A Metropolis–Hastings-style sampler needs
//! both: the candidate to evaluate, and the forward and reverse proposal
//! probabilities for the acceptance ratio. No state is carried between the
//! two operations; the probability is re-derived from the structures alone.
//!
//! [`Proposer`]: trait.Proposer.html
//! [`TRS`]: ../struct.TRS.html

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::trace::logsumexp;
use crate::types::{Rule, Term, TRS};

/// A reversible source of candidate rewriting systems.
pub trait Proposer {
    /// Produce a structurally related candidate from `trs`. The input is
    /// untouched; the candidate shares no mutable structure with it.
    fn propose<R: Rng>(&self, trs: &TRS, rng: &mut R) -> Result<TRS, ProposeError>;
    /// The log probability that this mechanism produces `new` from `old`,
    /// derived from the two structures alone. Impossible transitions score
    /// `f64::NEG_INFINITY` rather than failing, so probability arithmetic
    /// stays composable.
    fn proposal_log_p(&self, old: &TRS, new: &TRS) -> f64;
}

/// The error type for failed proposals.
///
/// These are expected, recoverable conditions: the caller retries with
/// another proposer or skips the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposeError {
    /// No rule in the TRS is eligible for the requested mutation.
    NoEligibleRule,
    /// The chosen rule admits no argument order different from the
    /// original.
    NoDistinctPermutation,
}
impl fmt::Display for ProposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProposeError::NoEligibleRule => write!(f, "no eligible rule"),
            ProposeError::NoDistinctPermutation => {
                write!(f, "cannot swap: all arguments are identical")
            }
        }
    }
}
impl ::std::error::Error for ProposeError {}

/// Which of a rule's sides a swap rearranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Lhs,
    Rhs,
    Both,
}

/// Proposes permuting the top-level arguments of one rule's side(s).
///
/// A side is swappable when its top-level application has more than one
/// argument; for the right-hand side this means the rule's lone
/// alternative (a bare variable, or a rule with several alternatives, is
/// never swappable on the right). The permutation drawn is guaranteed to
/// differ from the original order.
///
/// # Examples
///
/// ```
/// # use rand::{rngs::StdRng, SeedableRng};
/// # use trs_induction::{Operator, Rule, Term, TRS};
/// # use trs_induction::propose::{Proposer, SwapProposer};
/// let mut rng = StdRng::seed_from_u64(0);
/// let f = Operator::new(Some("F".to_string()), 2);
/// let a = Term::apply(Operator::new(Some("A".to_string()), 0), vec![]).unwrap();
/// let b = Term::apply(Operator::new(Some("B".to_string()), 0), vec![]).unwrap();
/// let c = Term::apply(Operator::new(Some("C".to_string()), 0), vec![]).unwrap();
///
/// // F(A B) = C
/// let trs = TRS::new(vec![Rule::new(
///     Term::apply(f.clone(), vec![a.clone(), b.clone()]).unwrap(),
///     vec![c],
/// ).unwrap()]);
///
/// // only the lhs is swappable here; retry until that side is drawn
/// let new = loop {
///     if let Ok(new) = SwapProposer.propose(&trs, &mut rng) {
///         break new;
///     }
/// };
/// assert_eq!(new.rules[0].lhs, Term::apply(f, vec![b, a]).unwrap());
///
/// // the probability of having drawn this exact transition
/// let log_p = SwapProposer.proposal_log_p(&trs, &new);
/// assert!((log_p - (1.0f64 / 3.0).ln()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapProposer;

impl Proposer for SwapProposer {
    fn propose<R: Rng>(&self, trs: &TRS, rng: &mut R) -> Result<TRS, ProposeError> {
        let side = match rng.gen_range(0..3) {
            0 => Side::Lhs,
            1 => Side::Rhs,
            _ => Side::Both,
        };
        let eligible = trs
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| swappable(rule, side))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let &idx = eligible.choose(rng).ok_or(ProposeError::NoEligibleRule)?;
        let rule = &trs.rules[idx];

        let lhs = if side == Side::Rhs {
            rule.lhs.clone()
        } else {
            swap_args(&rule.lhs, rng)?
        };
        let rhs = if side == Side::Lhs {
            rule.rhs.clone()
        } else {
            match rule.rhs() {
                Some(t) => vec![swap_args(t, rng)?],
                None => return Err(ProposeError::NoEligibleRule),
            }
        };

        // permuting arguments preserves rule validity
        let mut new_trs = trs.clone();
        new_trs.rules[idx] = Rule { lhs, rhs };
        Ok(new_trs)
    }
    fn proposal_log_p(&self, old: &TRS, new: &TRS) -> f64 {
        if old.signature() != new.signature() {
            return f64::NEG_INFINITY;
        }
        let (old_rule, new_rule) = match find_difference(&old.rules, &new.rules) {
            Some(pair) => pair,
            None => return f64::NEG_INFINITY,
        };
        let p_method = -(3.0f64).ln();
        let p_swap_lhs = log_p_swap(&old_rule.lhs, &new_rule.lhs);
        let p_swap_rhs = match (old_rule.rhs(), new_rule.rhs()) {
            (Some(o), Some(n)) => log_p_swap(o, n),
            _ => f64::NEG_INFINITY,
        };

        // each single-side pathway requires the side it leaves alone to be
        // untouched; a change there that is not itself a swap rules the
        // transition out of that pathway entirely
        let lhs_changed = old_rule.lhs != new_rule.lhs;
        let rhs_changed = old_rule.rhs != new_rule.rhs;
        let p_lhs = if !rhs_changed {
            let n = old.rules.iter().filter(|r| swappable(r, Side::Lhs)).count();
            p_method + log_choice(n) + p_swap_lhs
        } else {
            f64::NEG_INFINITY
        };
        let p_rhs = if !lhs_changed {
            let n = old.rules.iter().filter(|r| swappable(r, Side::Rhs)).count();
            p_method + log_choice(n) + p_swap_rhs
        } else {
            f64::NEG_INFINITY
        };
        let n_both = old
            .rules
            .iter()
            .filter(|r| swappable(r, Side::Both))
            .count();
        let p_both = p_method + log_choice(n_both) + p_swap_lhs + p_swap_rhs;

        logsumexp(&[p_lhs, p_rhs, p_both])
    }
}

fn swappable(rule: &Rule, side: Side) -> bool {
    let lhs_ok = rule.lhs.args().len() > 1;
    let rhs_ok = matches!(rule.rhs(), Some(Term::Application { args, .. }) if args.len() > 1);
    match side {
        Side::Lhs => lhs_ok,
        Side::Rhs => rhs_ok,
        Side::Both => lhs_ok && rhs_ok,
    }
}

/// A uniform draw from the orderings of `args` other than `args` itself.
fn unique_shuffle<R: Rng>(args: &[Term], rng: &mut R) -> Option<Vec<Term>> {
    if args.iter().all_equal() {
        return None;
    }
    let mut shuffled = args.to_vec();
    loop {
        shuffled.shuffle(rng);
        if shuffled != args {
            return Some(shuffled);
        }
    }
}

fn swap_args<R: Rng>(term: &Term, rng: &mut R) -> Result<Term, ProposeError> {
    match term {
        Term::Application { op, args } => {
            let args = unique_shuffle(args, rng).ok_or(ProposeError::NoDistinctPermutation)?;
            Ok(Term::Application {
                op: op.clone(),
                args,
            })
        }
        Term::Variable(_) => Err(ProposeError::NoDistinctPermutation),
    }
}

/// The log probability that a uniform non-identity permutation draw maps
/// `old`'s arguments to `new`'s: the two sides must share a head and an
/// arity above one and be permutations of each other, and an unchanged side
/// scores `f64::NEG_INFINITY` (the draw never returns the original order).
fn log_p_swap(old: &Term, new: &Term) -> f64 {
    if let (
        Term::Application { op: h1, args: a1 },
        Term::Application { op: h2, args: a2 },
    ) = (old, new)
    {
        if h1 == h2 && a1.len() == a2.len() && a1.len() > 1 {
            let mut options = 0;
            let mut hits = 0;
            for perm in a1.iter().permutations(a1.len()) {
                if itertools::equal(perm.iter().copied(), a1.iter()) {
                    continue;
                }
                options += 1;
                if itertools::equal(perm.iter().copied(), a2.iter()) {
                    hits += 1;
                }
            }
            return log_count(hits) - log_count(options);
        }
    }
    f64::NEG_INFINITY
}

/// The single differing pair of aligned rules, if there is exactly one.
fn find_difference<'a>(old: &'a [Rule], new: &'a [Rule]) -> Option<(&'a Rule, &'a Rule)> {
    if old.len() != new.len() {
        return None;
    }
    let mut diffs = old.iter().zip(new).filter(|(x, y)| x != y);
    match (diffs.next(), diffs.next()) {
        (Some((x, y)), None) => Some((x, y)),
        _ => None,
    }
}

/// log(n), with log(0) as negative infinity.
fn log_count(n: usize) -> f64 {
    if n == 0 {
        f64::NEG_INFINITY
    } else {
        (n as f64).ln()
    }
}

/// log(1/n), with nothing to choose from as negative infinity.
fn log_choice(n: usize) -> f64 {
    if n == 0 {
        f64::NEG_INFINITY
    } else {
        -(n as f64).ln()
    }
}
