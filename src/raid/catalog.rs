//! Static item and equipment catalog.
//!
//! Loaded once at process start from JSON seed files so operators can tune
//! loot pools without recompiling; the builtin seeds are embedded as a
//! fallback for fresh installs and tests. The catalog is read-only — every
//! draw hands out a fresh copy of a template, never the shared instance.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::raid::errors::RaidError;
use crate::raid::types::{Equipment, EquipmentKind, Item, Quality};

const BUILTIN_ITEMS: &str = include_str!("../../data/seeds/items.json");
const BUILTIN_EQUIPMENT: &str = include_str!("../../data/seeds/equipment.json");

pub const ITEMS_SEED_FILE: &str = "items.json";
pub const EQUIPMENT_SEED_FILE: &str = "equipment.json";

/// Read-only collections of item and equipment templates, bucketed by
/// quality tier and equipment kind. Empty buckets are legal everywhere; the
/// samplers treat them as "no draw".
#[derive(Debug, Clone)]
pub struct Catalog {
    items_by_quality: HashMap<Quality, Vec<Item>>,
    equipment: Vec<Equipment>,
    equipment_by_kind: HashMap<EquipmentKind, Vec<Equipment>>,
}

impl Catalog {
    /// Bucket flat template lists into the tier/kind indexes.
    pub fn from_parts(items: Vec<Item>, equipment: Vec<Equipment>) -> Self {
        let mut items_by_quality: HashMap<Quality, Vec<Item>> = HashMap::new();
        for item in items {
            items_by_quality.entry(item.quality).or_default().push(item);
        }
        let mut equipment_by_kind: HashMap<EquipmentKind, Vec<Equipment>> = HashMap::new();
        for piece in &equipment {
            equipment_by_kind
                .entry(piece.kind)
                .or_default()
                .push(piece.clone());
        }
        Self {
            items_by_quality,
            equipment,
            equipment_by_kind,
        }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, RaidError> {
        let items: Vec<Item> = serde_json::from_str(BUILTIN_ITEMS)?;
        let equipment: Vec<Equipment> = serde_json::from_str(BUILTIN_EQUIPMENT)?;
        Ok(Self::from_parts(items, equipment))
    }

    /// Load `items.json` and `equipment.json` from a seed directory.
    /// A missing file falls back to the builtin content for that half, so a
    /// deployment can override just one of the two.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RaidError> {
        let dir = dir.as_ref();
        let items_path = dir.join(ITEMS_SEED_FILE);
        let items: Vec<Item> = if items_path.exists() {
            serde_json::from_str(&fs::read_to_string(&items_path)?)?
        } else {
            log::info!("seed file {:?} missing, using builtin items", items_path);
            serde_json::from_str(BUILTIN_ITEMS)?
        };

        let equipment_path = dir.join(EQUIPMENT_SEED_FILE);
        let equipment: Vec<Equipment> = if equipment_path.exists() {
            serde_json::from_str(&fs::read_to_string(&equipment_path)?)?
        } else {
            log::info!(
                "seed file {:?} missing, using builtin equipment",
                equipment_path
            );
            serde_json::from_str(BUILTIN_EQUIPMENT)?
        };

        Ok(Self::from_parts(items, equipment))
    }

    /// Item templates in one quality tier; empty slice when the tier has no
    /// entries.
    pub fn items_in(&self, quality: Quality) -> &[Item] {
        self.items_by_quality
            .get(&quality)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Equipment templates of one kind; empty slice when the bucket is empty.
    pub fn equipment_of(&self, kind: EquipmentKind) -> &[Equipment] {
        self.equipment_by_kind
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every equipment template, in seed order.
    pub fn all_equipment(&self) -> &[Equipment] {
        &self.equipment
    }

    pub fn item_count(&self) -> usize {
        self.items_by_quality.values().map(Vec::len).sum()
    }

    pub fn equipment_count(&self) -> usize {
        self.equipment.len()
    }
}
