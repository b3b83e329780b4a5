//! Idle ↔ Searching transitions and lazy loot extraction.
//!
//! Nothing here runs on a timer: the extraction clock is
//! `player.search_start_time`, and [`extract`] settles whatever is due
//! whenever any operation touches the player. The arithmetic must never
//! double-count elapsed time — after settling `due` draws, the start time
//! advances by exactly `due × interval` so the sub-interval remainder keeps
//! accruing, and a repeated call at the same instant settles nothing.

use rand::Rng;

use crate::config::{LootConfig, SearchConfig};
use crate::raid::catalog::Catalog;
use crate::raid::loot::LootTable;
use crate::raid::stats::{effective_stats, EffectiveStats};
use crate::raid::types::{Item, PlayerRecord, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Started,
    /// Only an idle player may start a search.
    NotIdle { status: PlayerStatus },
}

/// Seconds between draws for the given effective stats.
pub fn search_interval(eff: &EffectiveStats, cfg: &SearchConfig) -> i64 {
    (cfg.base_interval_secs - eff.search_speed)
        .clamp(cfg.min_interval_secs, cfg.max_interval_secs)
}

/// Begin a search run. Legal only from Idle; the current-run bag is cleared
/// and the extraction clock starts at `now`.
pub fn start_search(player: &mut PlayerRecord, now: i64) -> SearchOutcome {
    if player.status != PlayerStatus::Idle {
        return SearchOutcome::NotIdle {
            status: player.status,
        };
    }
    player.status = PlayerStatus::Searching;
    player.search_start_time = now;
    player.inventory.clear();
    player.bag_item_count = 0;
    log::debug!("player {} started searching", player.id);
    SearchOutcome::Started
}

/// Settle all draws due since `search_start_time`. No-op unless Searching.
///
/// A full bag freezes accrual: the clock resets to `now` and nothing is
/// drawn, both when the bag was already full on entry and at the exact draw
/// that fills it. Returns the items added by this call.
pub fn extract(
    player: &mut PlayerRecord,
    catalog: &Catalog,
    loot_cfg: &LootConfig,
    search_cfg: &SearchConfig,
    rng: &mut impl Rng,
    now: i64,
) -> Vec<Item> {
    if player.status != PlayerStatus::Searching {
        return Vec::new();
    }

    let eff = effective_stats(player);
    let capacity = eff.backpack_capacity.max(0) as usize;
    if player.inventory.len() >= capacity {
        player.search_start_time = now;
        return Vec::new();
    }

    let interval = search_interval(&eff, search_cfg);
    let elapsed = (now - player.search_start_time).max(0);
    let due = elapsed / interval;
    if due <= 0 {
        return Vec::new();
    }

    let table = LootTable::new(catalog, loot_cfg);
    let mut drawn = Vec::new();
    let mut capacity_hit = false;
    for _ in 0..due {
        // An empty tier consumes the draw without producing an item.
        if let Some(item) = table.draw(rng) {
            player.inventory.push(item.clone());
            player.bag_item_count += 1;
            drawn.push(item);
        }
        if player.inventory.len() >= capacity {
            player.search_start_time = now;
            capacity_hit = true;
            break;
        }
    }

    if !capacity_hit {
        // Carry only the sub-interval remainder forward.
        player.search_start_time += due * interval;
    }

    if !drawn.is_empty() {
        log::debug!(
            "player {} extracted {} item(s), bag {}/{}",
            player.id,
            drawn.len(),
            player.inventory.len(),
            capacity
        );
    }
    drawn
}
