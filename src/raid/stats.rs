//! Stat aggregation: base player stats combined with every equipped piece.
//!
//! Aggregation is a pure function and is deliberately uncached — equipment
//! and base stats can change between any two reads, so every consumer
//! recomputes at the point of use.

use crate::raid::types::PlayerRecord;

/// Player stats after equipment modifiers.
///
/// Attack and defense carry the percentage multiplier and therefore live as
/// floats; everything else is a plain additive sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub attack: f64,
    pub defense: f64,
    pub luck: i64,
    pub search_speed: i64,
    /// Net equipment adjustment applied to both attack-cooldown bases.
    pub attack_cooldown: i64,
    pub backpack_capacity: i64,
    /// Protection window granted when this player is successfully raided.
    pub protection_duration: i64,
    /// Seconds added to the retreat duration before clamping.
    pub extra_retreat_time: i64,
}

/// Compute effective stats for a player:
/// `attack = (base + Σ add_attack) × (1 + Σ increase_attack_pct / 100)`,
/// defense symmetric, every other field a plain sum on top of its base.
pub fn effective_stats(player: &PlayerRecord) -> EffectiveStats {
    let mut add_attack = 0i64;
    let mut add_defense = 0i64;
    let mut attack_pct = 0i64;
    let mut defense_pct = 0i64;
    let mut luck = player.luck;
    let mut search_speed = player.search_speed;
    let mut attack_cooldown = 0i64;
    let mut backpack_capacity = player.backpack_capacity;
    let mut protection_duration = player.attack_protection_duration;
    let mut extra_retreat_time = 0i64;

    for piece in &player.equipped {
        let mods = &piece.mods;
        add_attack += mods.add_attack;
        add_defense += mods.add_defense;
        attack_pct += mods.increase_attack_pct;
        defense_pct += mods.increase_defense_pct;
        luck += mods.add_luck;
        search_speed += mods.extra_search_speed;
        attack_cooldown += mods.attack_cooldown;
        backpack_capacity += mods.extra_backpack_capacity;
        protection_duration += mods.extra_protection;
        extra_retreat_time += mods.extra_retreat_time;
    }

    EffectiveStats {
        attack: (player.attack + add_attack) as f64 * (1.0 + attack_pct as f64 / 100.0),
        defense: (player.defense + add_defense) as f64 * (1.0 + defense_pct as f64 / 100.0),
        luck,
        search_speed,
        attack_cooldown,
        backpack_capacity,
        protection_duration,
        extra_retreat_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raid::types::{
        Equipment, EquipmentKind, EquipmentModifiers, Item, NewPlayerDefaults, PlayerRecord,
        Quality,
    };

    fn piece(id: &str, kind: EquipmentKind, mods: EquipmentModifiers) -> Equipment {
        Equipment {
            item: Item {
                id: id.to_string(),
                name: id.to_string(),
                value: 10,
                quality: Quality::Common,
                weight: 1,
            },
            kind,
            mods,
        }
    }

    #[test]
    fn bare_player_matches_base() {
        let player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        let eff = effective_stats(&player);
        assert_eq!(eff.attack, 10.0);
        assert_eq!(eff.defense, 5.0);
        assert_eq!(eff.search_speed, 0);
        assert_eq!(eff.backpack_capacity, 4);
        assert_eq!(eff.protection_duration, 180);
        assert_eq!(eff.attack_cooldown, 0);
        assert_eq!(eff.extra_retreat_time, 0);
    }

    #[test]
    fn single_piece_formula_exact() {
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.attack = 20;
        player.equipped.push(piece(
            "smg",
            EquipmentKind::Weapon,
            EquipmentModifiers {
                add_attack: 5,
                increase_attack_pct: 15,
                attack_cooldown: -30,
                ..Default::default()
            },
        ));
        let eff = effective_stats(&player);
        // (20 + 5) * 1.15
        assert_eq!(eff.attack, 28.75);
        assert_eq!(eff.attack_cooldown, -30);
    }

    #[test]
    fn four_pieces_sum_before_multiplying() {
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.attack = 10;
        player.defense = 10;
        player.equipped.push(piece(
            "w",
            EquipmentKind::Weapon,
            EquipmentModifiers {
                add_attack: 10,
                increase_attack_pct: 20,
                ..Default::default()
            },
        ));
        player.equipped.push(piece(
            "a",
            EquipmentKind::Armor,
            EquipmentModifiers {
                add_defense: 20,
                increase_defense_pct: 50,
                extra_protection: 60,
                ..Default::default()
            },
        ));
        player.equipped.push(piece(
            "b",
            EquipmentKind::Backpack,
            EquipmentModifiers {
                extra_backpack_capacity: 3,
                extra_retreat_time: 30,
                ..Default::default()
            },
        ));
        player.equipped.push(piece(
            "x",
            EquipmentKind::Accessory,
            EquipmentModifiers {
                add_attack: 5,
                increase_attack_pct: 5,
                add_luck: 2,
                extra_search_speed: 40,
                ..Default::default()
            },
        ));

        let eff = effective_stats(&player);
        // (10 + 10 + 5) * (1 + 25/100)
        assert_eq!(eff.attack, 31.25);
        // (10 + 20) * 1.5
        assert_eq!(eff.defense, 45.0);
        assert_eq!(eff.luck, 2);
        assert_eq!(eff.search_speed, 40);
        assert_eq!(eff.backpack_capacity, 7);
        assert_eq!(eff.protection_duration, 240);
        assert_eq!(eff.extra_retreat_time, 30);
    }

    #[test]
    fn negative_modifiers_apply() {
        let mut player = PlayerRecord::new("alice", &NewPlayerDefaults::default());
        player.equipped.push(piece(
            "heavy",
            EquipmentKind::Armor,
            EquipmentModifiers {
                extra_search_speed: -120,
                attack_cooldown: 150,
                ..Default::default()
            },
        ));
        let eff = effective_stats(&player);
        assert_eq!(eff.search_speed, -120);
        assert_eq!(eff.attack_cooldown, 150);
    }
}
