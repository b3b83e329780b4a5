//! Two-stage weighted loot draws.
//!
//! Stage one picks a quality tier by the configured relative weights, stage
//! two picks an item within that tier by the item's own weight. The RNG is
//! always injected so callers can seed it for deterministic tests.

use rand::Rng;

use crate::config::LootConfig;
use crate::raid::catalog::Catalog;
use crate::raid::types::{Item, Quality};

/// Pick one element from `pool` with probability `weight(e) / Σ weight`.
/// Returns `None` when the pool is empty or every weight is zero.
pub fn weighted_pick<'a, T>(
    rng: &mut impl Rng,
    pool: &'a [T],
    weight: impl Fn(&T) -> u64,
) -> Option<&'a T> {
    let total: u64 = pool.iter().map(&weight).sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.gen_range(0..total);
    for entry in pool {
        let w = weight(entry);
        if roll < w {
            return Some(entry);
        }
        roll -= w;
    }
    // Unreachable while total > 0; keeps the signature honest.
    None
}

/// The tier-then-item loot table over a catalog.
pub struct LootTable<'a> {
    catalog: &'a Catalog,
    weights: &'a LootConfig,
}

impl<'a> LootTable<'a> {
    pub fn new(catalog: &'a Catalog, weights: &'a LootConfig) -> Self {
        Self { catalog, weights }
    }

    /// One complete draw. Returns a fresh copy of the chosen template, or
    /// `None` when the chosen tier holds no items — the draw is still
    /// consumed in that case and callers must tolerate it.
    pub fn draw(&self, rng: &mut impl Rng) -> Option<Item> {
        let quality =
            *weighted_pick(rng, &Quality::ALL, |&q| self.weights.tier_weight(q) as u64)?;
        let pool = self.catalog.items_in(quality);
        weighted_pick(rng, pool, |item| item.weight as u64).cloned()
    }
}
