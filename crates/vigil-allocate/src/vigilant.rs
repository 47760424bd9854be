//! Vigilant Asset Allocation rules.
//!
//! - [`Vigilant`]: breadth-momentum switch between the best offensive asset,
//!   the best defensive asset and cash
//! - [`RelativeOffensive`]: top N offensive assets regardless of sign
//! - [`DualOffensive`]: best offensive asset with a non-negative score

use crate::allocation::Allocation;
use crate::strategy::{AllocationStrategy, best, require_scores};
use tracing::debug;
use vigil_signals::MomentumTable;
use vigil_traits::{AssetUniverse, Result, Symbol, VigilError};

/// Classical VAA switching rule.
///
/// 1. If any offensive score is negative: hold cash when any defensive score
///    is also negative, otherwise the best defensive asset.
/// 2. Otherwise hold the best offensive asset.
///
/// Ties go to the asset listed first in the universe.
#[derive(Debug, Clone, Default)]
pub struct Vigilant {
    universe: AssetUniverse,
}

impl Vigilant {
    /// Creates the rule over `universe`.
    #[must_use]
    pub const fn new(universe: AssetUniverse) -> Self {
        Self { universe }
    }

    /// The universe the rule chooses from.
    #[must_use]
    pub const fn universe(&self) -> &AssetUniverse {
        &self.universe
    }
}

impl AllocationStrategy for Vigilant {
    fn name(&self) -> &str {
        "vaa"
    }

    fn assets(&self) -> Vec<Symbol> {
        self.universe.combined()
    }

    fn max_holdings(&self) -> usize {
        1
    }

    fn allocate(&self, scores: &MomentumTable) -> Result<Allocation> {
        let offensive = require_scores(scores, self.universe.offensive())?;
        let breadth = offensive.iter().filter(|(_, s)| *s < 0.0).count();

        let allocation = if breadth == 0 {
            best(&offensive).map_or(Allocation::Cash, |s| Allocation::single(s.clone()))
        } else {
            let defensive = require_scores(scores, self.universe.defensive())?;
            if defensive.iter().any(|(_, s)| *s < 0.0) {
                Allocation::Cash
            } else {
                best(&defensive).map_or(Allocation::Cash, |s| Allocation::single(s.clone()))
            }
        };

        debug!(
            date = ?scores.date(),
            bad_offensive = breadth,
            %allocation,
            "VAA decision"
        );
        Ok(allocation)
    }
}

/// The top N offensive assets by score, equally weighted.
///
/// Scores are not checked for sign; the defensive list is unused.
#[derive(Debug, Clone)]
pub struct RelativeOffensive {
    offensive: Vec<Symbol>,
    top_n: usize,
}

impl RelativeOffensive {
    /// Creates the rule holding the `top_n` best offensive assets.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::InvalidConfig`] unless
    /// `1 <= top_n <= offensive.len()`.
    pub fn new(universe: &AssetUniverse, top_n: usize) -> Result<Self> {
        let offensive = universe.offensive().to_vec();
        if top_n == 0 || top_n > offensive.len() {
            return Err(VigilError::InvalidConfig(format!(
                "top_n must be between 1 and {}, got {top_n}",
                offensive.len()
            )));
        }
        Ok(Self { offensive, top_n })
    }

    /// Number of assets held.
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }
}

impl AllocationStrategy for RelativeOffensive {
    fn name(&self) -> &str {
        "vaa-relative"
    }

    fn assets(&self) -> Vec<Symbol> {
        self.offensive.clone()
    }

    fn max_holdings(&self) -> usize {
        self.top_n
    }

    fn allocate(&self, scores: &MomentumTable) -> Result<Allocation> {
        let mut ranked = require_scores(scores, &self.offensive)?;
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let allocation =
            Allocation::equal(ranked.iter().take(self.top_n).map(|(s, _)| (*s).clone()));
        debug!(date = ?scores.date(), %allocation, "Relative momentum decision");
        Ok(allocation)
    }
}

/// The best offensive asset among those with a non-negative score.
///
/// Holds cash when every offensive score is negative.
#[derive(Debug, Clone)]
pub struct DualOffensive {
    offensive: Vec<Symbol>,
}

impl DualOffensive {
    /// Creates the rule over the offensive list of `universe`.
    #[must_use]
    pub fn new(universe: &AssetUniverse) -> Self {
        Self {
            offensive: universe.offensive().to_vec(),
        }
    }
}

impl AllocationStrategy for DualOffensive {
    fn name(&self) -> &str {
        "vaa-dual"
    }

    fn assets(&self) -> Vec<Symbol> {
        self.offensive.clone()
    }

    fn max_holdings(&self) -> usize {
        1
    }

    fn allocate(&self, scores: &MomentumTable) -> Result<Allocation> {
        let eligible: Vec<(&Symbol, f64)> = require_scores(scores, &self.offensive)?
            .into_iter()
            .filter(|(_, s)| *s >= 0.0)
            .collect();
        let allocation = best(&eligible).map_or(Allocation::Cash, |s| Allocation::single(s.clone()));
        debug!(
            date = ?scores.date(),
            eligible = eligible.len(),
            %allocation,
            "Dual momentum decision"
        );
        Ok(allocation)
    }
}
