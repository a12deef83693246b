use rand::Rng;
use serde::{Deserialize, Serialize};

use volt_ledger::Tangle;
use volt_types::TxId;

use crate::walk::{self, StepPolicy};
use crate::weakest;

/// Default bias of the MCMC step toward heavier approvers.
pub const DEFAULT_MCMC_ALPHA: f64 = 0.1;

/// The selectable strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipStrategy {
    /// Parentless entries, else the lightest one. Deterministic.
    #[default]
    Weakest,
    /// Two walks from genesis, uniform step.
    UnweightedRandomWalk,
    /// Two walks from genesis, step ∝ weight.
    WeightedRandomWalk,
    /// Two walks from genesis, step ∝ weight.
    GreedyWeightedWalk,
    /// Two walks from genesis, step ∝ `exp(alpha · (w − w_max))`.
    Mcmc,
}

impl TipStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weakest => "weakest",
            Self::UnweightedRandomWalk => "unweighted_random_walk",
            Self::WeightedRandomWalk => "weighted_random_walk",
            Self::GreedyWeightedWalk => "greedy_weighted_walk",
            Self::Mcmc => "mcmc",
        }
    }

    pub fn all() -> [TipStrategy; 5] {
        [
            Self::Weakest,
            Self::UnweightedRandomWalk,
            Self::WeightedRandomWalk,
            Self::GreedyWeightedWalk,
            Self::Mcmc,
        ]
    }

    pub fn is_walk(&self) -> bool {
        !matches!(self, Self::Weakest)
    }
}

impl std::str::FromStr for TipStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| format!("unknown tip strategy {s:?}"))
    }
}

/// A configured tip selector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TipSelector {
    pub strategy: TipStrategy,
    /// Only read by [`TipStrategy::Mcmc`].
    pub alpha: f64,
}

impl Default for TipSelector {
    fn default() -> Self {
        Self::new(TipStrategy::default())
    }
}

impl TipSelector {
    pub fn new(strategy: TipStrategy) -> Self {
        Self {
            strategy,
            alpha: DEFAULT_MCMC_ALPHA,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Pick the ids to endorse.
    ///
    /// Empty for an empty ledger. The walk strategies return exactly two ids
    /// (possibly equal), or the single [`TxId::GENESIS_FALLBACK`] marker when
    /// the ledger has no genesis.
    pub fn select<R: Rng + ?Sized>(&self, tangle: &Tangle, rng: &mut R) -> Vec<TxId> {
        if tangle.is_empty() {
            return Vec::new();
        }
        let tips = match self.step_policy() {
            None => weakest::select_weakest(tangle),
            Some(policy) => walk::select_by_walks(tangle, policy, rng),
        };
        tracing::trace!(strategy = self.strategy.as_str(), ?tips, "tips selected");
        tips
    }

    fn step_policy(&self) -> Option<StepPolicy> {
        match self.strategy {
            TipStrategy::Weakest => None,
            TipStrategy::UnweightedRandomWalk => Some(StepPolicy::Uniform),
            TipStrategy::WeightedRandomWalk | TipStrategy::GreedyWeightedWalk => {
                Some(StepPolicy::Proportional)
            }
            TipStrategy::Mcmc => Some(StepPolicy::Exponential { alpha: self.alpha }),
        }
    }
}
