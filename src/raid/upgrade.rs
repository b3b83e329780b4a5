//! Gold-for-stat attribute upgrades.
//!
//! Affordability is the only gate — a negative balance blocks attacking,
//! not spending, so a player already in the red simply cannot cover any
//! positive cost.

use crate::config::UpgradeConfig;
use crate::raid::types::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeAttribute {
    Attack,
    Defense,
    SearchSpeed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    Upgraded {
        attribute: UpgradeAttribute,
        amount: i64,
        cost: i64,
        balance: i64,
    },
    InsufficientFunds {
        cost: i64,
        balance: i64,
    },
    /// Zero or negative point amounts are meaningless.
    InvalidAmount {
        amount: i64,
    },
}

/// Buy `amount` points of a base attribute at the configured per-point rate.
pub fn upgrade_attribute(
    player: &mut PlayerRecord,
    cfg: &UpgradeConfig,
    attribute: UpgradeAttribute,
    amount: i64,
) -> UpgradeOutcome {
    if amount <= 0 {
        return UpgradeOutcome::InvalidAmount { amount };
    }
    let rate = match attribute {
        UpgradeAttribute::Attack => cfg.attack_cost_per_point,
        UpgradeAttribute::Defense => cfg.defense_cost_per_point,
        UpgradeAttribute::SearchSpeed => cfg.search_speed_cost_per_point,
    };
    let cost = rate * amount;
    if player.currency < cost {
        return UpgradeOutcome::InsufficientFunds {
            cost,
            balance: player.currency,
        };
    }

    player.currency -= cost;
    match attribute {
        UpgradeAttribute::Attack => player.attack += amount,
        UpgradeAttribute::Defense => player.defense += amount,
        UpgradeAttribute::SearchSpeed => player.search_speed += amount,
    }
    log::debug!(
        "player {} upgraded {:?} by {} for {}",
        player.id,
        attribute,
        amount,
        cost
    );
    UpgradeOutcome::Upgraded {
        attribute,
        amount,
        cost,
        balance: player.currency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raid::types::NewPlayerDefaults;

    #[test]
    fn unaffordable_upgrade_leaves_gold_untouched() {
        let cfg = UpgradeConfig::default();
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.currency = 250;

        // 3 points at 100 each cost 300.
        assert_eq!(
            upgrade_attribute(&mut player, &cfg, UpgradeAttribute::Attack, 3),
            UpgradeOutcome::InsufficientFunds {
                cost: 300,
                balance: 250
            }
        );
        assert_eq!(player.currency, 250);
        assert_eq!(player.attack, 10);
    }

    #[test]
    fn affordable_upgrade_applies() {
        let cfg = UpgradeConfig::default();
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.currency = 250;

        assert_eq!(
            upgrade_attribute(&mut player, &cfg, UpgradeAttribute::Attack, 2),
            UpgradeOutcome::Upgraded {
                attribute: UpgradeAttribute::Attack,
                amount: 2,
                cost: 200,
                balance: 50
            }
        );
        assert_eq!(player.currency, 50);
        assert_eq!(player.attack, 12);
    }

    #[test]
    fn search_speed_uses_its_own_rate() {
        let cfg = UpgradeConfig::default();
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.currency = 400;

        assert!(matches!(
            upgrade_attribute(&mut player, &cfg, UpgradeAttribute::SearchSpeed, 2),
            UpgradeOutcome::Upgraded { cost: 400, .. }
        ));
        assert_eq!(player.search_speed, 2);
        assert_eq!(player.currency, 0);
    }

    #[test]
    fn non_positive_amounts_are_invalid() {
        let cfg = UpgradeConfig::default();
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        assert_eq!(
            upgrade_attribute(&mut player, &cfg, UpgradeAttribute::Defense, 0),
            UpgradeOutcome::InvalidAmount { amount: 0 }
        );
        assert_eq!(
            upgrade_attribute(&mut player, &cfg, UpgradeAttribute::Defense, -4),
            UpgradeOutcome::InvalidAmount { amount: -4 }
        );
        assert_eq!(player.currency, 100);
    }
}
