//! Gacha-style equipment acquisition.
//!
//! A purchase deducts a fixed cost and draws one template from the full
//! equipment catalog, weighted by the item's own weight times a per-kind
//! multiplier (weapons and armor above backpacks). The drawn copy is held as
//! a short-lived pending choice keyed by player id until the player decides
//! to keep or sell it — the explicit replacement for conversational
//! choose-then-confirm state. Stale choices auto-sell on the next touch so
//! an abandoned draw can neither block purchases forever nor dodge the
//! storage cap.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::Rng;

use crate::config::{CapsConfig, GachaConfig};
use crate::raid::catalog::Catalog;
use crate::raid::loot::weighted_pick;
use crate::raid::types::{Equipment, PlayerRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Paid and drawn; the copy is now this player's pending choice.
    Drawn { equipment: Equipment, cost: i64 },
    InsufficientFunds { cost: i64, balance: i64 },
    /// An unexpired pending choice must be resolved first.
    ChoicePending,
    /// Empty catalog or all-zero weights; nothing was charged.
    NothingAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawDecision {
    Keep,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawResolution {
    Stored { id: String },
    Sold { price: i64 },
    NoPendingChoice,
    /// Equipment storage is at its cap; the pending choice survives so the
    /// player can still sell it.
    StorageFull { capacity: usize },
}

/// One undecided draw.
#[derive(Debug, Clone)]
pub struct PendingDraw {
    pub equipment: Equipment,
    pub drawn_at: i64,
}

/// Pending store-vs-sell choices, keyed by player id.
///
/// Sessions are process-local by design: an undecided draw is conversation
/// state, not game state, and does not survive a restart.
#[derive(Default)]
pub struct DrawSessions {
    sessions: Mutex<HashMap<String, PendingDraw>>,
}

impl DrawSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auto-sell a pending choice that outlived the decision TTL. Runs at
    /// the top of every draw-service touch.
    fn expire_stale(&self, player: &mut PlayerRecord, cfg: &GachaConfig, now: i64) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let stale = sessions
            .get(&player.id)
            .map(|pending| now - pending.drawn_at > cfg.decision_ttl_secs)
            .unwrap_or(false);
        if stale {
            if let Some(pending) = sessions.remove(&player.id) {
                player.currency += pending.equipment.item.value;
                log::info!(
                    "player {} pending draw {} expired, auto-sold for {}",
                    player.id,
                    pending.equipment.id(),
                    pending.equipment.item.value
                );
            }
        }
    }

    /// Buy one draw from the catalog.
    pub fn purchase(
        &self,
        player: &mut PlayerRecord,
        catalog: &Catalog,
        cfg: &GachaConfig,
        rng: &mut impl Rng,
        now: i64,
    ) -> DrawOutcome {
        self.expire_stale(player, cfg, now);

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        if sessions.contains_key(&player.id) {
            return DrawOutcome::ChoicePending;
        }
        if player.currency < cfg.draw_cost {
            return DrawOutcome::InsufficientFunds {
                cost: cfg.draw_cost,
                balance: player.currency,
            };
        }

        let Some(template) = weighted_pick(rng, catalog.all_equipment(), |piece| {
            piece.item.weight as u64 * cfg.kind_multiplier(piece.kind) as u64
        }) else {
            return DrawOutcome::NothingAvailable;
        };

        // An independent copy; the catalog template is never aliased.
        let equipment = template.clone();
        player.currency -= cfg.draw_cost;
        sessions.insert(
            player.id.clone(),
            PendingDraw {
                equipment: equipment.clone(),
                drawn_at: now,
            },
        );
        log::debug!("player {} drew {}", player.id, equipment.id());
        DrawOutcome::Drawn {
            equipment,
            cost: cfg.draw_cost,
        }
    }

    /// Settle the pending choice: keep it in equipment storage or sell it
    /// for its item value.
    pub fn resolve(
        &self,
        player: &mut PlayerRecord,
        gacha: &GachaConfig,
        caps: &CapsConfig,
        decision: DrawDecision,
        now: i64,
    ) -> DrawResolution {
        self.expire_stale(player, gacha, now);

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pending) = sessions.get(&player.id) else {
            return DrawResolution::NoPendingChoice;
        };

        match decision {
            DrawDecision::Keep => {
                if player.equipment_storage.len() >= caps.storage_max {
                    return DrawResolution::StorageFull {
                        capacity: caps.storage_max,
                    };
                }
                let equipment = pending.equipment.clone();
                sessions.remove(&player.id);
                let id = equipment.id().to_string();
                player.equipment_storage.push(equipment);
                DrawResolution::Stored { id }
            }
            DrawDecision::Sell => {
                let price = pending.equipment.item.value;
                sessions.remove(&player.id);
                player.currency += price;
                DrawResolution::Sold { price }
            }
        }
    }

    /// The player's pending choice, if any. Read-only peek for status
    /// displays.
    pub fn pending(&self, player_id: &str) -> Option<PendingDraw> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(player_id)
            .cloned()
    }
}
