//! Game tuning configuration.
//!
//! Every tunable the engines consult lives here: search/retreat timing,
//! loot tier weights, combat cooldowns and tolls, draw costs, upgrade rates,
//! equipment caps, and new-player defaults. All sections have sensible
//! defaults so an empty TOML file yields a playable configuration, and
//! [`GameConfig::validate`] rejects configurations the engines cannot run
//! with (inverted clamp ranges, zero-weight loot tables, and the like).
//!
//! The file format is TOML:
//!
//! ```toml
//! [storage]
//! data_dir = "data"
//!
//! [search]
//! base_interval_secs = 300
//!
//! [gacha]
//! draw_cost = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::raid::types::{EquipmentKind, NewPlayerDefaults, Quality};

/// Errors raised while loading or validating a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for a raid game instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub storage: StorageConfig,
    pub search: SearchConfig,
    pub retreat: RetreatConfig,
    pub loot: LootConfig,
    pub combat: CombatConfig,
    pub gacha: GachaConfig,
    pub upgrade: UpgradeConfig,
    pub caps: CapsConfig,
    pub player: NewPlayerDefaults,
}

impl GameConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Directory holding the JSON seed catalogs.
    pub fn seed_dir(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("seeds")
    }

    /// Directory holding the sled store.
    pub fn store_dir(&self) -> PathBuf {
        Path::new(&self.storage.data_dir).join("raid")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.min_interval_secs <= 0 {
            return Err(ConfigError::Invalid(
                "search.min_interval_secs must be positive".into(),
            ));
        }
        if self.search.min_interval_secs > self.search.max_interval_secs {
            return Err(ConfigError::Invalid(
                "search.min_interval_secs exceeds search.max_interval_secs".into(),
            ));
        }
        if self.retreat.min_duration_secs <= 0 {
            return Err(ConfigError::Invalid(
                "retreat.min_duration_secs must be positive".into(),
            ));
        }
        if self.retreat.min_duration_secs > self.retreat.max_duration_secs {
            return Err(ConfigError::Invalid(
                "retreat.min_duration_secs exceeds retreat.max_duration_secs".into(),
            ));
        }
        if Quality::ALL.iter().all(|&q| self.loot.tier_weight(q) == 0) {
            return Err(ConfigError::Invalid(
                "loot tier weights must not all be zero".into(),
            ));
        }
        if self.gacha.draw_cost <= 0 {
            return Err(ConfigError::Invalid("gacha.draw_cost must be positive".into()));
        }
        if self.gacha.decision_ttl_secs <= 0 {
            return Err(ConfigError::Invalid(
                "gacha.decision_ttl_secs must be positive".into(),
            ));
        }
        if self.caps.equipped_max == 0 || self.caps.storage_max == 0 {
            return Err(ConfigError::Invalid(
                "equipment caps must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Root data directory; the sled store and seed catalogs live under it.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

/// Lazy extraction timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Seconds per draw before search-speed adjustment.
    pub base_interval_secs: i64,
    /// Clamp floor for the adjusted interval.
    pub min_interval_secs: i64,
    /// Clamp ceiling for the adjusted interval.
    pub max_interval_secs: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_interval_secs: 300,
            min_interval_secs: 50,
            max_interval_secs: 1800,
        }
    }
}

/// Retreat settlement timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetreatConfig {
    pub base_duration_secs: i64,
    pub min_duration_secs: i64,
    pub max_duration_secs: i64,
}

impl Default for RetreatConfig {
    fn default() -> Self {
        Self {
            base_duration_secs: 600,
            min_duration_secs: 60,
            max_duration_secs: 1800,
        }
    }
}

/// Relative quality-tier weights for the two-stage loot draw. They need not
/// sum to 100; selection probability is weight over total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LootConfig {
    pub common_weight: u32,
    pub rare_weight: u32,
    pub epic_weight: u32,
    pub legendary_weight: u32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            common_weight: 60,
            rare_weight: 25,
            epic_weight: 15,
            legendary_weight: 3,
        }
    }
}

impl LootConfig {
    pub fn tier_weight(&self, quality: Quality) -> u32 {
        match quality {
            Quality::Common => self.common_weight,
            Quality::Rare => self.rare_weight,
            Quality::Epic => self.epic_weight,
            Quality::Legendary => self.legendary_weight,
        }
    }
}

/// PvP resolution tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CombatConfig {
    /// Cooldown base after a failed attack, seconds.
    pub fail_cooldown_secs: i64,
    /// Cooldown base after a successful attack, seconds.
    pub success_cooldown_secs: i64,
    /// Floor for the gold toll an attacker pays per attack.
    pub min_raid_toll: i64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            fail_cooldown_secs: 120,
            success_cooldown_secs: 600,
            min_raid_toll: 10,
        }
    }
}

/// Equipment draw ("gacha") tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GachaConfig {
    /// Fixed cost of one draw.
    pub draw_cost: i64,
    /// Seconds a store-vs-sell choice may stay pending before it is
    /// auto-sold on the next draw-service touch.
    pub decision_ttl_secs: i64,
    pub weapon_multiplier: u32,
    pub armor_multiplier: u32,
    pub backpack_multiplier: u32,
}

impl Default for GachaConfig {
    fn default() -> Self {
        Self {
            draw_cost: 100,
            decision_ttl_secs: 300,
            weapon_multiplier: 3,
            armor_multiplier: 3,
            backpack_multiplier: 2,
        }
    }
}

impl GachaConfig {
    /// Draw-weight multiplier per equipment kind; unlisted kinds sample at
    /// their base weight.
    pub fn kind_multiplier(&self, kind: EquipmentKind) -> u32 {
        match kind {
            EquipmentKind::Weapon => self.weapon_multiplier,
            EquipmentKind::Armor => self.armor_multiplier,
            EquipmentKind::Backpack => self.backpack_multiplier,
            EquipmentKind::Accessory | EquipmentKind::Other => 1,
        }
    }
}

/// Gold cost per upgraded stat point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpgradeConfig {
    pub attack_cost_per_point: i64,
    pub defense_cost_per_point: i64,
    pub search_speed_cost_per_point: i64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            attack_cost_per_point: 100,
            defense_cost_per_point: 100,
            search_speed_cost_per_point: 200,
        }
    }
}

/// Equipment collection caps enforced by the registry layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CapsConfig {
    pub equipped_max: usize,
    pub storage_max: usize,
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            equipped_max: 4,
            storage_max: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_toml_is_fully_defaulted() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.search.base_interval_secs, 300);
        assert_eq!(config.retreat.base_duration_secs, 600);
        assert_eq!(config.loot.tier_weight(Quality::Legendary), 3);
    }

    #[test]
    fn partial_section_overrides() {
        let config: GameConfig = toml::from_str(
            r#"
            [search]
            base_interval_secs = 120

            [gacha]
            draw_cost = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.search.base_interval_secs, 120);
        assert_eq!(config.search.min_interval_secs, 50);
        assert_eq!(config.gacha.draw_cost, 250);
        assert_eq!(config.gacha.decision_ttl_secs, 300);
    }

    #[test]
    fn inverted_clamp_rejected() {
        let mut config = GameConfig::default();
        config.search.min_interval_secs = 2000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_loot_weights_rejected() {
        let mut config = GameConfig::default();
        config.loot = LootConfig {
            common_weight: 0,
            rare_weight: 0,
            epic_weight: 0,
            legendary_weight: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unlisted_kind_multiplier_is_one() {
        let gacha = GachaConfig::default();
        assert_eq!(gacha.kind_multiplier(EquipmentKind::Accessory), 1);
        assert_eq!(gacha.kind_multiplier(EquipmentKind::Other), 1);
        assert!(gacha.kind_multiplier(EquipmentKind::Weapon) > gacha.kind_multiplier(EquipmentKind::Backpack));
    }
}
