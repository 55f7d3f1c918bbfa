//! Explore the probability-weighted tree of rewrites descending from a term.
//!
//! A [`Trace`] expands the branching space of rewrite continuations of a
//! root [`Term`] under a [`TRS`], most probable branch first. Each state
//! carries the log-probability of the evaluation path reaching it: stopping
//! to observe a term costs `p_observe`, and following one of `n` available
//! rewrites costs `1/n`. Expansion stops when the frontier empties, the
//! best pending branch falls below the probability floor `min_p`, or the
//! step budget `max_steps` runs out.
//!
//! [`Trace`]: struct.Trace.html
//! [`Term`]: ../enum.Term.html
//! [`TRS`]: ../struct.TRS.html
//!
//! # Examples
//!
//! ```
//! use trs_induction::{Operator, Rule, Term, Variable, TRS};
//! use trs_induction::trace::Trace;
//!
//! // PLUS(SUCC(x) y) = PLUS(x SUCC(y)); PLUS(ZERO y) = y;
//! let plus = Operator::new(Some("PLUS".to_string()), 2);
//! let succ = Operator::new(Some("SUCC".to_string()), 1);
//! let zero = Operator::new(Some("ZERO".to_string()), 0);
//! let x = Variable::new(Some("x".to_string()));
//! let y = Variable::new(Some("y".to_string()));
//!
//! let zero_t = Term::apply(zero, vec![]).unwrap();
//! let one = Term::apply(succ.clone(), vec![zero_t.clone()]).unwrap();
//! let rules = vec![
//!     Rule::new(
//!         Term::apply(plus.clone(), vec![
//!             Term::apply(succ.clone(), vec![Term::Variable(x.clone())]).unwrap(),
//!             Term::Variable(y.clone()),
//!         ]).unwrap(),
//!         vec![Term::apply(plus.clone(), vec![
//!             Term::Variable(x.clone()),
//!             Term::apply(succ.clone(), vec![Term::Variable(y.clone())]).unwrap(),
//!         ]).unwrap()],
//!     ).unwrap(),
//!     Rule::new(
//!         Term::apply(plus.clone(), vec![zero_t.clone(), Term::Variable(y.clone())]).unwrap(),
//!         vec![Term::Variable(y)],
//!     ).unwrap(),
//! ];
//! let trs = TRS::new(rules);
//!
//! // PLUS(SUCC(ZERO) ZERO) evaluates to SUCC(ZERO)
//! let start = Term::apply(plus, vec![one.clone(), zero_t]).unwrap();
//! let mut trace = Trace::new(&trs, &start, 0.1, 10, 1e-6);
//! trace.run();
//!
//! assert!(trace.rewrites_to(&one) > f64::NEG_INFINITY);
//! ```

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::types::{Term, TRS};

/// A probability-weighted tree of the rewrite continuations of a term.
///
/// See the [module documentation] for an overview.
///
/// [module documentation]: index.html
pub struct Trace<'a> {
    // tree
    nodes: Vec<Node>,
    root: NodeHandle,
    unobserved: BinaryHeap<Unobserved>,
    seq: usize,
    steps: usize,
    // parameters
    trs: &'a TRS,
    p_observe: f64,
    max_steps: usize,
    min_p: f64,
}

/// All the data pertaining to a single state in a [`Trace`].
///
/// Nodes are never mutated after creation; expanding a state only attaches
/// children to it.
///
/// [`Trace`]: struct.Trace.html
#[derive(Debug, Clone)]
pub struct Node {
    term: Term,
    state: TraceState,
    log_p: f64,
    parent: Option<NodeHandle>,
    children: SmallVec<[NodeHandle; 4]>,
}

/// A `NodeHandle` references a specific state in a [`Trace`].
///
/// [`Trace`]: struct.Trace.html
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(usize);

/// The role of a state within a [`Trace`].
///
/// [`Trace`]: struct.Trace.html
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceState {
    /// The root state.
    Start,
    /// A state reached by rewriting whose own continuations may not have
    /// been explored yet.
    Unobserved,
    /// A terminal state whose term admits no further rewriting.
    Normal,
    /// A terminal state at which evaluation stopped to report its term.
    Observed,
}
impl fmt::Display for TraceState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TraceState::Start => write!(f, "Start"),
            TraceState::Unobserved => write!(f, "Unobserved"),
            TraceState::Normal => write!(f, "Normal"),
            TraceState::Observed => write!(f, "Observed"),
        }
    }
}

/// A pending expansion. Ordered so that the most probable state pops first,
/// with insertion order as the tie-break.
#[derive(Debug, Clone)]
struct Unobserved {
    handle: NodeHandle,
    log_p: f64,
    seq: usize,
}
impl PartialEq for Unobserved {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Unobserved {}
impl PartialOrd for Unobserved {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Unobserved {
    fn cmp(&self, other: &Self) -> Ordering {
        self.log_p
            .partial_cmp(&other.log_p)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<'a> Trace<'a> {
    /// Create a trace rooted at `term` undergoing rewrites in `trs`.
    ///
    /// `p_observe` is the per-step probability of halting to observe the
    /// current term; `max_steps` bounds the number of expansions; `min_p`
    /// is the probability floor below which a branch is abandoned as
    /// negligible.
    pub fn new(trs: &'a TRS, term: &Term, p_observe: f64, max_steps: usize, min_p: f64) -> Trace<'a> {
        let root = NodeHandle(0);
        let mut unobserved = BinaryHeap::new();
        unobserved.push(Unobserved {
            handle: root,
            log_p: 0.0,
            seq: 0,
        });
        Trace {
            nodes: vec![Node {
                term: term.clone(),
                state: TraceState::Start,
                log_p: 0.0,
                parent: None,
                children: SmallVec::new(),
            }],
            root,
            unobserved,
            seq: 1,
            steps: 0,
            trs,
            p_observe,
            max_steps,
            min_p,
        }
    }
    fn new_node(&mut self, term: Term, parent: NodeHandle, state: TraceState, log_p: f64) -> NodeHandle {
        let nh = NodeHandle(self.nodes.len());
        self.nodes.push(Node {
            term,
            state,
            log_p,
            parent: Some(parent),
            children: SmallVec::new(),
        });
        self.nodes[parent.0].children.push(nh);
        nh
    }
    fn enqueue(&mut self, handle: NodeHandle, log_p: f64) {
        self.unobserved.push(Unobserved {
            handle,
            log_p,
            seq: self.seq,
        });
        self.seq += 1;
    }
    /// The initial state of the trace.
    pub fn root(&self) -> NodeHandle {
        self.root
    }
    /// The total count of states in the trace.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }
    /// Expand the most probable pending state, returning its handle.
    ///
    /// `None` signals that no further expansion is possible under the
    /// current budget: the frontier is empty, the best pending branch is
    /// below the probability floor, or the step budget is spent. It is a
    /// status, not an error; [`run`] uses it to stop.
    ///
    /// [`run`]: #method.run
    pub fn step(&mut self) -> Option<NodeHandle> {
        let Unobserved { handle, log_p, .. } = self.unobserved.pop()?;
        if log_p < self.min_p.ln() || self.steps > self.max_steps {
            return None;
        }
        let term = self[handle].term.clone();
        let rewrites = self.trs.rewrite(&term);
        // a rewrite set that only reproduces the term is as terminal as none
        let stuck = match &rewrites {
            None => true,
            Some(rs) => rs.iter().all(|t| *t == term),
        };
        if stuck {
            self.new_node(term.clone(), handle, TraceState::Normal, log_p);
        }
        self.new_node(
            term,
            handle,
            TraceState::Observed,
            log_p + self.p_observe.ln(),
        );
        if !stuck {
            if let Some(rs) = rewrites {
                let branch_lp = log_p - (rs.len() as f64).ln();
                for t in rs {
                    let child = self.new_node(t, handle, TraceState::Unobserved, branch_lp);
                    self.enqueue(child, branch_lp);
                }
            }
        }
        self.steps += 1;
        Some(handle)
    }
    /// Drive [`step`] until no further expansion is possible.
    ///
    /// [`step`]: #method.step
    pub fn run(&mut self) {
        while self.step().is_some() {}
    }
    /// The terminal ([`Normal`] or [`Observed`]) states reached so far.
    /// Lazy and restartable.
    ///
    /// [`Normal`]: enum.TraceState.html#variant.Normal
    /// [`Observed`]: enum.TraceState.html#variant.Observed
    pub fn leaves(&self) -> Leaves {
        Leaves {
            nodes: self.nodes.iter().enumerate(),
        }
    }
    /// The log probability that the root rewrites to `term`, summed over
    /// every terminal state whose term is structurally equal to the query.
    /// `f64::NEG_INFINITY` when no such state has been reached.
    pub fn rewrites_to(&self, term: &Term) -> f64 {
        let lps = self
            .leaves()
            .filter(|&nh| self[nh].term == *term)
            .map(|nh| self[nh].log_p)
            .collect::<Vec<_>>();
        logsumexp(&lps)
    }
    /// The probability mass accounted for by the terminal states so far.
    pub fn mass(&self) -> f64 {
        let lps = self.leaves().map(|nh| self[nh].log_p).collect::<Vec<_>>();
        logsumexp(&lps).exp()
    }
    /// Draw one terminal state with probability proportional to its mass.
    /// `None` when there is nothing to draw from.
    pub fn sample_leaf<R: Rng>(&self, rng: &mut R) -> Option<NodeHandle> {
        let leaves = self.leaves().collect::<Vec<_>>();
        let weights = leaves
            .iter()
            .map(|&nh| self[nh].log_p.exp())
            .collect::<Vec<_>>();
        let dist = WeightedIndex::new(&weights).ok()?;
        leaves.get(dist.sample(rng)).copied()
    }
}
impl<'a> std::ops::Index<NodeHandle> for Trace<'a> {
    type Output = Node;
    fn index(&self, index: NodeHandle) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl Node {
    /// The [`Term`] at this state.
    ///
    /// [`Term`]: ../enum.Term.html
    pub fn term(&self) -> &Term {
        &self.term
    }
    /// The [`TraceState`] tag of this state.
    ///
    /// [`TraceState`]: enum.TraceState.html
    pub fn state(&self) -> TraceState {
        self.state
    }
    /// The log probability of the evaluation path reaching this state.
    pub fn log_p(&self) -> f64 {
        self.log_p
    }
    /// The state this one descends from; the root has none.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }
    /// The states descending from this one.
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
    /// Whether this state has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An iterator over the terminal states of a [`Trace`].
///
/// See [`Trace::leaves`].
///
/// [`Trace`]: struct.Trace.html
/// [`Trace::leaves`]: struct.Trace.html#method.leaves
pub struct Leaves<'a> {
    nodes: std::iter::Enumerate<std::slice::Iter<'a, Node>>,
}
impl<'a> Iterator for Leaves<'a> {
    type Item = NodeHandle;
    fn next(&mut self) -> Option<NodeHandle> {
        for (i, node) in &mut self.nodes {
            match node.state {
                TraceState::Normal | TraceState::Observed => return Some(NodeHandle(i)),
                _ => (),
            }
        }
        None
    }
}

pub(crate) fn logsumexp(lps: &[f64]) -> f64 {
    let largest = lps.iter().fold(f64::NEG_INFINITY, |acc, lp| acc.max(*lp));
    if largest == f64::NEG_INFINITY {
        f64::NEG_INFINITY
    } else {
        let x = lps.iter().map(|lp| (lp - largest).exp()).sum::<f64>().ln();
        largest + x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logsumexp_empty_is_log_zero() {
        assert_eq!(logsumexp(&[]), f64::NEG_INFINITY);
        assert_eq!(logsumexp(&[f64::NEG_INFINITY]), f64::NEG_INFINITY);
    }

    #[test]
    fn logsumexp_sums_in_probability_space() {
        let lps = [0.5f64.ln(), 0.25f64.ln(), 0.25f64.ln()];
        assert!((logsumexp(&lps) - 0.0).abs() < 1e-12);
    }
}
