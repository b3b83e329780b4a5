use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PLAYER_SCHEMA_VERSION: u8 = 1;

/// Loot quality tier. Draw probability and item strength both scale with it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Quality {
    /// All tiers in draw order, lowest first.
    pub const ALL: [Quality; 4] = [
        Quality::Common,
        Quality::Rare,
        Quality::Epic,
        Quality::Legendary,
    ];
}

impl Default for Quality {
    fn default() -> Self {
        Self::Common
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    Weapon,
    Armor,
    Backpack,
    Accessory,
    Other,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 5] = [
        EquipmentKind::Weapon,
        EquipmentKind::Armor,
        EquipmentKind::Backpack,
        EquipmentKind::Accessory,
        EquipmentKind::Other,
    ];
}

/// A lootable item template, also the core of every piece of equipment.
///
/// Catalog entries are shared and read-only; anything placed in a player bag
/// is a fresh copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Currency credited when the item is settled or sold.
    pub value: i64,
    #[serde(default)]
    pub quality: Quality,
    /// Relative sampling weight within the item's quality tier.
    #[serde(default = "default_item_weight")]
    pub weight: u32,
}

fn default_item_weight() -> u32 {
    1
}

/// Stat adjustments contributed by one equipped piece.
///
/// Every modifier is an explicit field with a zero default; absent keys in
/// seed data simply stay zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EquipmentModifiers {
    pub add_attack: i64,
    pub add_defense: i64,
    pub add_luck: i64,
    /// Percentage points applied after the additive attack sum.
    pub increase_attack_pct: i64,
    /// Percentage points applied after the additive defense sum.
    pub increase_defense_pct: i64,
    /// Positive values shorten the search interval, negative lengthen it.
    pub extra_search_speed: i64,
    /// Seconds added to the retreat duration before clamping.
    pub extra_retreat_time: i64,
    /// Seconds added to both attack cooldown bases; may be negative.
    pub attack_cooldown: i64,
    pub extra_backpack_capacity: i64,
    /// Seconds added to the post-hit protection window.
    pub extra_protection: i64,
}

/// Equipment is an [`Item`] core plus a slot kind and its modifiers —
/// composition, not a subtype.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Equipment {
    pub item: Item,
    pub kind: EquipmentKind,
    #[serde(default)]
    pub mods: EquipmentModifiers,
}

impl Equipment {
    pub fn id(&self) -> &str {
        &self.item.id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Idle,
    Searching,
    Retreating,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Authoritative per-player record. One exists per player id, created lazily
/// on first reference and never deleted.
///
/// Game timestamps are unix seconds; `0` means "never". All timestamp
/// arithmetic is re-evaluated on demand — nothing here is driven by a timer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub id: String,
    pub attack: i64,
    pub defense: i64,
    pub luck: i64,
    pub search_speed: i64,
    /// May go negative through raid tolls; never clamped.
    pub currency: i64,
    pub status: PlayerStatus,
    pub search_start_time: i64,
    pub retreat_start_time: i64,
    pub attack_cooldown_start: i64,
    /// Duration of the currently pending cooldown, set per attack outcome.
    pub attack_cooldown_time: i64,
    pub attack_protection_end_time: i64,
    /// Base protection window granted when this player is successfully hit.
    pub attack_protection_duration: i64,
    /// Base bag capacity before backpack modifiers.
    pub backpack_capacity: i64,
    /// Current-run loot, cleared when a search starts and when a retreat
    /// settles. Ordered; theft picks uniformly from it.
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// Mirror of `inventory.len()`, kept for the wire/status layer.
    #[serde(default)]
    pub bag_item_count: u32,
    /// Worn equipment, at most [`crate::config::CapsConfig::equipped_max`],
    /// pairwise-distinct ids.
    #[serde(default)]
    pub equipped: Vec<Equipment>,
    /// Owned but unworn equipment.
    #[serde(default)]
    pub equipment_storage: Vec<Equipment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl PlayerRecord {
    /// Fresh record with the supplied base stats. Registry provisioning is
    /// the only caller outside of tests.
    pub fn new(id: &str, defaults: &NewPlayerDefaults) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            attack: defaults.attack,
            defense: defaults.defense,
            luck: defaults.luck,
            search_speed: defaults.search_speed,
            currency: defaults.currency,
            status: PlayerStatus::Idle,
            search_start_time: 0,
            retreat_start_time: 0,
            attack_cooldown_start: 0,
            attack_cooldown_time: 0,
            attack_protection_end_time: 0,
            attack_protection_duration: defaults.attack_protection_duration,
            backpack_capacity: defaults.backpack_capacity,
            inventory: Vec::new(),
            bag_item_count: 0,
            equipped: Vec::new(),
            equipment_storage: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Total settled value of the current-run bag.
    pub fn bag_value(&self) -> i64 {
        self.inventory.iter().map(|item| item.value).sum()
    }
}

/// Base stats stamped onto lazily-provisioned players.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NewPlayerDefaults {
    pub attack: i64,
    pub defense: i64,
    pub luck: i64,
    pub search_speed: i64,
    pub currency: i64,
    pub backpack_capacity: i64,
    pub attack_protection_duration: i64,
}

impl Default for NewPlayerDefaults {
    fn default() -> Self {
        Self {
            attack: 10,
            defense: 5,
            luck: 0,
            search_speed: 0,
            currency: 100,
            backpack_capacity: 4,
            attack_protection_duration: 180,
        }
    }
}
