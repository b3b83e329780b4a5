//! The game facade: one struct owning the catalog, configuration, registry,
//! draw sessions, RNG, and clock, exposing every player-facing operation.
//!
//! The command layer calls these methods and renders the typed outcomes; no
//! user-facing strings are produced here. Each operation is a synchronous
//! read-modify-write over one or two player records, serialized per player
//! by the registry and written through to the store before the in-memory
//! state is committed.
//!
//! Both sources of nondeterminism are injectable: the RNG can be seeded and
//! the clock replaced, which is how the timing-sensitive tests run without
//! waiting out real intervals.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::raid::catalog::Catalog;
use crate::raid::combat::{self, AttackOutcome, AttackRejection};
use crate::raid::equipment::{self, EquipOutcome, SellOutcome, SwapOutcome, UnequipOutcome};
use crate::raid::errors::RaidError;
use crate::raid::gacha::{DrawDecision, DrawOutcome, DrawResolution, DrawSessions, PendingDraw};
use crate::raid::registry::PlayerRegistry;
use crate::raid::retreat::{self, CancelOutcome, RetreatOutcome, SettlementOutcome};
use crate::raid::search::{self, SearchOutcome};
use crate::raid::stats::effective_stats;
use crate::raid::storage::RaidStore;
use crate::raid::types::{Item, PlayerRecord, PlayerStatus};
use crate::raid::upgrade::{self, UpgradeAttribute, UpgradeOutcome};

/// Injectable time source returning unix seconds.
pub type ClockFn = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Snapshot returned by [`RaidGame::check_status`], after lazy settlement
/// and extraction have run.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub status: PlayerStatus,
    pub currency: i64,
    pub bag_count: u32,
    /// Effective bag capacity at the time of the check.
    pub capacity: i64,
    pub inventory: Vec<Item>,
    /// Seconds until the next draw; `None` unless searching with bag space.
    pub next_item_in: Option<i64>,
    /// Seconds until the retreat settles; `None` unless retreating.
    pub retreat_remaining: Option<i64>,
    /// Payout credited by a settlement that completed during this check.
    pub settled: Option<i64>,
}

pub struct RaidGame {
    config: GameConfig,
    catalog: Catalog,
    registry: PlayerRegistry,
    draws: DrawSessions,
    rng: Mutex<StdRng>,
    clock: ClockFn,
}

impl RaidGame {
    /// Boot a game over an opened store. Loads every persisted player into
    /// the registry.
    pub fn new(store: RaidStore, catalog: Catalog, config: GameConfig) -> Result<Self, RaidError> {
        let registry = PlayerRegistry::open(store, config.player.clone())?;
        log::info!(
            "raid game up: {} players, {} items, {} equipment templates",
            registry.player_ids().len(),
            catalog.item_count(),
            catalog.equipment_count()
        );
        Ok(Self {
            config,
            catalog,
            registry,
            draws: DrawSessions::new(),
            rng: Mutex::new(StdRng::from_entropy()),
            clock: Arc::new(|| Utc::now().timestamp()),
        })
    }

    /// Replace the RNG with a seeded one for deterministic draws.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replace the wall clock, for tests that steer time.
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.clock = clock;
        self
    }

    fn now(&self) -> i64 {
        (self.clock)()
    }

    /// Begin a search run. A retreat that already ran out is settled first,
    /// so a returning player does not have to poll before searching again.
    pub fn start_search(&self, player_id: &str) -> Result<SearchOutcome, RaidError> {
        let now = self.now();
        self.registry.with_player(player_id, |player| {
            retreat::check_settlement(player, &self.config.retreat, now);
            search::start_search(player, now)
        })
    }

    /// Settle everything due for this player and report where they stand.
    pub fn check_status(&self, player_id: &str) -> Result<StatusReport, RaidError> {
        let now = self.now();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry.with_player(player_id, |player| {
            let settled = match retreat::check_settlement(player, &self.config.retreat, now) {
                SettlementOutcome::Settled { payout } => Some(payout),
                _ => None,
            };
            search::extract(
                player,
                &self.catalog,
                &self.config.loot,
                &self.config.search,
                &mut *rng,
                now,
            );
            self.report_for(player, now, settled)
        })
    }

    fn report_for(&self, player: &PlayerRecord, now: i64, settled: Option<i64>) -> StatusReport {
        let eff = effective_stats(player);
        let capacity = eff.backpack_capacity.max(0);
        let next_item_in = match player.status {
            PlayerStatus::Searching if (player.inventory.len() as i64) < capacity => {
                let interval = search::search_interval(&eff, &self.config.search);
                Some(interval - (now - player.search_start_time))
            }
            _ => None,
        };
        let retreat_remaining = match player.status {
            PlayerStatus::Retreating => {
                let duration = retreat::retreat_duration(&eff, &self.config.retreat);
                Some(duration - (now - player.retreat_start_time))
            }
            _ => None,
        };
        StatusReport {
            status: player.status,
            currency: player.currency,
            bag_count: player.bag_item_count,
            capacity,
            inventory: player.inventory.clone(),
            next_item_in,
            retreat_remaining,
            settled,
        }
    }

    /// Stop searching and start the retreat clock, banking nothing yet.
    pub fn start_retreat(&self, player_id: &str) -> Result<RetreatOutcome, RaidError> {
        let now = self.now();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry.with_player(player_id, |player| {
            // The final extract: loot accrued up to this instant retreats
            // with the player.
            search::extract(
                player,
                &self.catalog,
                &self.config.loot,
                &self.config.search,
                &mut *rng,
                now,
            );
            retreat::start_retreat(player, now)
        })
    }

    /// Poll the retreat; pays out exactly once when the duration has passed.
    pub fn check_settlement(&self, player_id: &str) -> Result<SettlementOutcome, RaidError> {
        let now = self.now();
        self.registry.with_player(player_id, |player| {
            retreat::check_settlement(player, &self.config.retreat, now)
        })
    }

    /// Abort the retreat and resume searching with a fresh accrual clock.
    pub fn cancel_retreat(&self, player_id: &str) -> Result<CancelOutcome, RaidError> {
        let now = self.now();
        self.registry.with_player(player_id, |player| {
            retreat::cancel_retreat(player, now)
        })
    }

    /// Raid another player. Existence and self-target gates run before any
    /// lock; the rest of the precondition ladder and the resolution happen
    /// under both players' locks and persist as one atomic pair.
    pub fn attack(
        &self,
        attacker_id: &str,
        defender_id: &str,
    ) -> Result<AttackOutcome, RaidError> {
        // Precondition 1: a first-time attacker is provisioned, then
        // rejected — they cannot be searching yet.
        if self.registry.ensure(attacker_id)? {
            return Ok(AttackOutcome::Rejected(
                AttackRejection::AttackerJustProvisioned,
            ));
        }
        // Precondition 2: unknown defenders are not provisioned by a raid.
        if !self.registry.contains(defender_id) {
            return Ok(AttackOutcome::Rejected(AttackRejection::DefenderUnknown));
        }
        if attacker_id == defender_id {
            return Ok(AttackOutcome::Rejected(AttackRejection::SelfTarget));
        }

        let now = self.now();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry
            .with_pair(attacker_id, defender_id, |attacker, defender| {
                combat::resolve_attack(
                    attacker,
                    defender,
                    &self.catalog,
                    &self.config,
                    &mut *rng,
                    now,
                )
            })
    }

    /// Buy one equipment draw; the result becomes a pending keep-or-sell
    /// choice.
    pub fn purchase_draw(&self, player_id: &str) -> Result<DrawOutcome, RaidError> {
        let now = self.now();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        self.registry.with_player(player_id, |player| {
            self.draws
                .purchase(player, &self.catalog, &self.config.gacha, &mut *rng, now)
        })
    }

    /// Decide a pending draw.
    pub fn resolve_draw(
        &self,
        player_id: &str,
        decision: DrawDecision,
    ) -> Result<DrawResolution, RaidError> {
        let now = self.now();
        self.registry.with_player(player_id, |player| {
            self.draws.resolve(
                player,
                &self.config.gacha,
                &self.config.caps,
                decision,
                now,
            )
        })
    }

    /// The player's undecided draw, if any.
    pub fn pending_draw(&self, player_id: &str) -> Option<PendingDraw> {
        self.draws.pending(player_id)
    }

    pub fn equip(&self, player_id: &str, equipment_id: &str) -> Result<EquipOutcome, RaidError> {
        self.registry.with_player(player_id, |player| {
            equipment::equip(player, &self.config.caps, equipment_id)
        })
    }

    pub fn unequip(
        &self,
        player_id: &str,
        equipment_id: &str,
    ) -> Result<UnequipOutcome, RaidError> {
        self.registry.with_player(player_id, |player| {
            equipment::unequip(player, &self.config.caps, equipment_id)
        })
    }

    /// Exchange one equipped piece for one stored piece, all-or-nothing.
    pub fn swap_equipment(
        &self,
        player_id: &str,
        equipped_id: &str,
        stored_id: &str,
    ) -> Result<SwapOutcome, RaidError> {
        self.registry.with_player(player_id, |player| {
            equipment::swap(player, equipped_id, stored_id)
        })
    }

    pub fn sell_stored(
        &self,
        player_id: &str,
        equipment_id: &str,
    ) -> Result<SellOutcome, RaidError> {
        self.registry.with_player(player_id, |player| {
            equipment::sell_stored(player, equipment_id)
        })
    }

    pub fn upgrade_attribute(
        &self,
        player_id: &str,
        attribute: UpgradeAttribute,
        amount: i64,
    ) -> Result<UpgradeOutcome, RaidError> {
        self.registry.with_player(player_id, |player| {
            upgrade::upgrade_attribute(player, &self.config.upgrade, attribute, amount)
        })
    }

    /// Read-only clone of a player record; `None` if never provisioned.
    pub fn snapshot(&self, player_id: &str) -> Option<PlayerRecord> {
        self.registry.snapshot(player_id)
    }

    /// Persist every in-memory record. Call on shutdown.
    pub fn flush(&self) -> Result<(), RaidError> {
        self.registry.flush_all()
    }
}
