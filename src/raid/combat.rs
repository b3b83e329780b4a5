//! PvP raid resolution.
//!
//! An attack runs an ordered ladder of independent preconditions — each with
//! its own rejection so the presentation layer can explain exactly why —
//! then resolves success against the effective-stat probability and applies
//! theft, tolls, cooldowns, and the defender's protection window. Both
//! records are mutated together; the registry persists them as one atomic
//! pair.
//!
//! Theft only ever touches the defender's current-run bag. Equipped and
//! stored gear are never at stake.

use rand::Rng;

use crate::config::GameConfig;
use crate::raid::catalog::Catalog;
use crate::raid::retreat;
use crate::raid::search;
use crate::raid::stats::{effective_stats, EffectiveStats};
use crate::raid::types::{Item, PlayerRecord, PlayerStatus};

/// Why an attack did not reach the dice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackRejection {
    /// The attacker had no record. One was provisioned, but this call is
    /// rejected regardless.
    AttackerJustProvisioned,
    /// Unknown defenders are not provisioned by an attack.
    DefenderUnknown,
    /// A raid cannot target its own attacker.
    SelfTarget,
    /// A negative balance blocks new attacks until it recovers.
    AttackerBankrupt { balance: i64 },
    /// Only searching or retreating players are valid targets.
    DefenderNotRaidable,
    AttackerNotSearching { status: PlayerStatus },
    CooldownActive { remaining: i64 },
    DefenderProtected { remaining: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackOutcome {
    Rejected(AttackRejection),
    /// The raid failed: the attacker pays a doubled toll and eats the short
    /// cooldown. The defender is unaffected.
    Missed { toll: i64, cooldown: i64 },
    /// The raid succeeded: one random bag item moved to the attacker (when
    /// the defender held any), the attacker pays the toll and the long
    /// cooldown, the defender gains a protection window and a restarted
    /// accrual clock.
    Hit {
        stolen: Option<Item>,
        toll: i64,
        cooldown: i64,
    },
}

/// `p = atk / (atk + def + 0.25 × defender_atk)` over effective stats.
/// Zero or negative denominators resolve to no chance at all.
pub fn success_probability(attacker: &EffectiveStats, defender: &EffectiveStats) -> f64 {
    let denominator = attacker.attack + defender.defense + 0.25 * defender.attack;
    if denominator <= 0.0 {
        return 0.0;
    }
    attacker.attack / denominator
}

fn raid_toll(attacker: &EffectiveStats, defender: &EffectiveStats, cfg: &GameConfig) -> i64 {
    cfg.combat
        .min_raid_toll
        .max((defender.attack - attacker.defense).round() as i64)
}

/// Run the full precondition ladder and resolution for one attack.
///
/// Existence checks (and self-target) happen in the facade before any lock
/// is taken; everything from the bankruptcy gate onward lives here, in the
/// order the rules define.
pub fn resolve_attack(
    attacker: &mut PlayerRecord,
    defender: &mut PlayerRecord,
    catalog: &Catalog,
    cfg: &GameConfig,
    rng: &mut impl Rng,
    now: i64,
) -> AttackOutcome {
    if attacker.currency < 0 {
        return AttackOutcome::Rejected(AttackRejection::AttackerBankrupt {
            balance: attacker.currency,
        });
    }

    // A defender whose retreat already ran out is idle and safe.
    retreat::check_settlement(defender, &cfg.retreat, now);
    if defender.status == PlayerStatus::Idle {
        return AttackOutcome::Rejected(AttackRejection::DefenderNotRaidable);
    }

    // Bring both bags up to date before anything is stolen or gated.
    search::extract(defender, catalog, &cfg.loot, &cfg.search, &mut *rng, now);
    search::extract(attacker, catalog, &cfg.loot, &cfg.search, &mut *rng, now);

    if attacker.status != PlayerStatus::Searching {
        return AttackOutcome::Rejected(AttackRejection::AttackerNotSearching {
            status: attacker.status,
        });
    }

    let cooldown_elapsed = now - attacker.attack_cooldown_start;
    if cooldown_elapsed < attacker.attack_cooldown_time {
        return AttackOutcome::Rejected(AttackRejection::CooldownActive {
            remaining: attacker.attack_cooldown_time - cooldown_elapsed,
        });
    }

    if now < defender.attack_protection_end_time {
        return AttackOutcome::Rejected(AttackRejection::DefenderProtected {
            remaining: defender.attack_protection_end_time - now,
        });
    }

    let attacker_eff = effective_stats(attacker);
    let defender_eff = effective_stats(defender);
    let p = success_probability(&attacker_eff, &defender_eff);
    let roll: f64 = rng.gen();
    let toll = raid_toll(&attacker_eff, &defender_eff, cfg);

    if roll >= p {
        let toll = toll * 2;
        let cooldown = (cfg.combat.fail_cooldown_secs + attacker_eff.attack_cooldown).max(0);
        attacker.currency -= toll;
        attacker.attack_cooldown_start = now;
        attacker.attack_cooldown_time = cooldown;
        log::debug!(
            "raid {} -> {} missed (p={:.3}), toll {}",
            attacker.id,
            defender.id,
            p,
            toll
        );
        return AttackOutcome::Missed { toll, cooldown };
    }

    let stolen = if defender.inventory.is_empty() {
        None
    } else {
        let index = rng.gen_range(0..defender.inventory.len());
        let item = defender.inventory.remove(index);
        defender.bag_item_count = defender.bag_item_count.saturating_sub(1);
        attacker.inventory.push(item.clone());
        // Theft may push the attacker's bag past capacity; only the search
        // engine enforces the cap.
        attacker.bag_item_count += 1;
        Some(item)
    };

    let cooldown = (cfg.combat.success_cooldown_secs + attacker_eff.attack_cooldown).max(0);
    attacker.currency -= toll;
    attacker.attack_cooldown_start = now;
    attacker.attack_cooldown_time = cooldown;
    defender.attack_protection_end_time = now + defender_eff.protection_duration;
    // Being hit restarts the victim's accrual clock.
    defender.search_start_time = now;
    log::info!(
        "raid {} -> {} hit (p={:.3}), stole {:?}, toll {}",
        attacker.id,
        defender.id,
        p,
        stolen.as_ref().map(|item| item.id.as_str()),
        toll
    );
    AttackOutcome::Hit {
        stolen,
        toll,
        cooldown,
    }
}
