//! Searching → Retreating → Idle transitions and loot settlement.
//!
//! A retreat is pure elapsed-time arithmetic: nothing fires when the timer
//! completes, the payout happens the first time anyone checks after the
//! duration has passed, and only that once.

use crate::config::RetreatConfig;
use crate::raid::stats::{effective_stats, EffectiveStats};
use crate::raid::types::{PlayerRecord, PlayerStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetreatOutcome {
    Started,
    /// Only a searching player may begin a retreat.
    NotSearching { status: PlayerStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// The retreat completed: the bag value was credited and the player is
    /// idle again.
    Settled { payout: i64 },
    /// Still under way; nothing was mutated, safe to poll.
    Pending { remaining: i64 },
    /// Settlement does not apply to the player's current status.
    NotRetreating,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Back to Searching with a fresh accrual clock.
    Cancelled,
    NotRetreating,
}

/// Seconds a retreat takes for the given effective stats.
pub fn retreat_duration(eff: &EffectiveStats, cfg: &RetreatConfig) -> i64 {
    (cfg.base_duration_secs + eff.extra_retreat_time)
        .clamp(cfg.min_duration_secs, cfg.max_duration_secs)
}

/// Begin retreating. The facade settles any pending extraction first so the
/// final bag is complete before the clock starts.
pub fn start_retreat(player: &mut PlayerRecord, now: i64) -> RetreatOutcome {
    if player.status != PlayerStatus::Searching {
        return RetreatOutcome::NotSearching {
            status: player.status,
        };
    }
    player.status = PlayerStatus::Retreating;
    player.retreat_start_time = now;
    log::debug!("player {} started retreating", player.id);
    RetreatOutcome::Started
}

/// Settle the retreat if its duration has elapsed. Credits the bag value
/// exactly once; polling a pending or non-retreating player mutates nothing.
pub fn check_settlement(
    player: &mut PlayerRecord,
    cfg: &RetreatConfig,
    now: i64,
) -> SettlementOutcome {
    if player.status != PlayerStatus::Retreating {
        return SettlementOutcome::NotRetreating;
    }
    let duration = retreat_duration(&effective_stats(player), cfg);
    let elapsed = now - player.retreat_start_time;
    if elapsed < duration {
        return SettlementOutcome::Pending {
            remaining: duration - elapsed,
        };
    }

    let payout = player.bag_value();
    player.currency += payout;
    player.inventory.clear();
    player.bag_item_count = 0;
    player.status = PlayerStatus::Idle;
    player.retreat_start_time = 0;
    log::info!("player {} settled retreat for {}", player.id, payout);
    SettlementOutcome::Settled { payout }
}

/// Abort a retreat and resume searching. The accrual clock restarts fresh —
/// the time spent retreating is forfeit.
pub fn cancel_retreat(player: &mut PlayerRecord, now: i64) -> CancelOutcome {
    if player.status != PlayerStatus::Retreating {
        return CancelOutcome::NotRetreating;
    }
    player.status = PlayerStatus::Searching;
    player.search_start_time = now;
    player.retreat_start_time = 0;
    log::debug!("player {} cancelled retreat", player.id);
    CancelOutcome::Cancelled
}
