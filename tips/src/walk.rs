//! Forward random walks from the genesis to a tip.
//!
//! Every walk strategy builds the approver index once, finds the genesis, and
//! runs [`WALKS_PER_SELECTION`] independent walks. A walk stops at the first
//! transaction nobody approves. Only the step rule differs between
//! strategies, see [`StepPolicy`].

use rand::Rng;

use volt_ledger::{Approvers, Tangle};
use volt_types::TxId;

/// Independent walks per selection; each contributes one tip.
pub const WALKS_PER_SELECTION: usize = 2;

/// How a walk picks the next approver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepPolicy {
    /// Every approver equally likely.
    Uniform,
    /// Probability proportional to `cumulative_weight`.
    Proportional,
    /// Probability proportional to `exp(alpha * (weight - max_weight))`.
    Exponential { alpha: f64 },
}

impl StepPolicy {
    /// Choose one of `children` (non-empty).
    fn step<'a, R: Rng + ?Sized>(
        &self,
        tangle: &Tangle,
        children: &'a [TxId],
        rng: &mut R,
    ) -> &'a TxId {
        if children.len() == 1 {
            return &children[0];
        }
        let weight_of = |id: &TxId| tangle.get(id.as_str()).map_or(0, |tx| tx.cumulative_weight);

        let weights: Vec<f64> = match self {
            Self::Uniform => return &children[rng.gen_range(0..children.len())],
            Self::Proportional => children.iter().map(|id| weight_of(id) as f64).collect(),
            Self::Exponential { alpha } => {
                let max = children.iter().map(weight_of).max().unwrap_or(0) as f64;
                children
                    .iter()
                    .map(|id| (alpha * (weight_of(id) as f64 - max)).exp())
                    .collect()
            }
        };
        match roulette(&weights, rng) {
            Some(index) => &children[index],
            None => &children[rng.gen_range(0..children.len())],
        }
    }
}

/// Roulette-wheel pick over `weights`.
///
/// `None` when the total is zero or not finite, in which case the caller
/// steps uniformly instead.
fn roulette<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    let target = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (index, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if target < cumulative {
            return Some(index);
        }
    }
    // Rounding can leave `target` just above the last partial sum.
    weights.iter().rposition(|w| *w > 0.0)
}

/// Walk from `start` until a transaction without approvers.
///
/// Takes at most `tangle.len()` steps, so a cycle in remote data ends the
/// walk where it stands instead of looping.
pub fn walk_to_tip<R: Rng + ?Sized>(
    tangle: &Tangle,
    approvers: &Approvers,
    start: &TxId,
    policy: StepPolicy,
    rng: &mut R,
) -> TxId {
    let mut current = start;
    for _ in 0..tangle.len() {
        let children = approvers.children(current.as_str());
        if children.is_empty() {
            break;
        }
        current = policy.step(tangle, children, rng);
    }
    current.clone()
}

pub(crate) fn select_by_walks<R: Rng + ?Sized>(
    tangle: &Tangle,
    policy: StepPolicy,
    rng: &mut R,
) -> Vec<TxId> {
    let Some(genesis) = tangle.genesis() else {
        tracing::debug!(entries = tangle.len(), "no genesis, returning fallback marker");
        return vec![TxId::genesis_fallback()];
    };
    let approvers = tangle.approvers();
    (0..WALKS_PER_SELECTION)
        .map(|_| walk_to_tip(tangle, &approvers, &genesis.id, policy, rng))
        .collect()
}
