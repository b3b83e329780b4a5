//! Equipment loadout management: storage ↔ equipped moves, swaps, selling.
//!
//! The registry layer owns cap enforcement — at most four pieces worn with
//! pairwise-distinct ids, at most ten in storage. Every mutation returns a
//! typed outcome and leaves the record untouched on rejection.

use crate::config::CapsConfig;
use crate::raid::types::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipOutcome {
    Equipped { id: String },
    /// A piece with the same id is already worn.
    AlreadyEquipped { id: String },
    SlotsFull { capacity: usize },
    NotInStorage { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnequipOutcome {
    Unequipped { id: String },
    StorageFull { capacity: usize },
    NotEquipped { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped { removed: String, added: String },
    NotEquipped { id: String },
    NotInStorage { id: String },
    /// The incoming piece would duplicate an id that stays equipped.
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellOutcome {
    Sold { id: String, price: i64 },
    NotInStorage { id: String },
}

/// Move a stored piece into the equipped set.
pub fn equip(player: &mut PlayerRecord, caps: &CapsConfig, id: &str) -> EquipOutcome {
    if player.equipped.iter().any(|piece| piece.id() == id) {
        return EquipOutcome::AlreadyEquipped { id: id.to_string() };
    }
    if player.equipped.len() >= caps.equipped_max {
        return EquipOutcome::SlotsFull {
            capacity: caps.equipped_max,
        };
    }
    let Some(index) = player
        .equipment_storage
        .iter()
        .position(|piece| piece.id() == id)
    else {
        return EquipOutcome::NotInStorage { id: id.to_string() };
    };
    let piece = player.equipment_storage.remove(index);
    player.equipped.push(piece);
    EquipOutcome::Equipped { id: id.to_string() }
}

/// Move a worn piece back into storage.
pub fn unequip(player: &mut PlayerRecord, caps: &CapsConfig, id: &str) -> UnequipOutcome {
    let Some(index) = player.equipped.iter().position(|piece| piece.id() == id) else {
        return UnequipOutcome::NotEquipped { id: id.to_string() };
    };
    if player.equipment_storage.len() >= caps.storage_max {
        return UnequipOutcome::StorageFull {
            capacity: caps.storage_max,
        };
    }
    let piece = player.equipped.remove(index);
    player.equipment_storage.push(piece);
    UnequipOutcome::Unequipped { id: id.to_string() }
}

/// Exchange one worn piece for one stored piece as a single all-or-nothing
/// transaction. Both collections keep their sizes, so the caps cannot be
/// violated by a swap.
pub fn swap(player: &mut PlayerRecord, equipped_id: &str, stored_id: &str) -> SwapOutcome {
    let Some(equipped_index) = player
        .equipped
        .iter()
        .position(|piece| piece.id() == equipped_id)
    else {
        return SwapOutcome::NotEquipped {
            id: equipped_id.to_string(),
        };
    };
    let Some(stored_index) = player
        .equipment_storage
        .iter()
        .position(|piece| piece.id() == stored_id)
    else {
        return SwapOutcome::NotInStorage {
            id: stored_id.to_string(),
        };
    };
    let duplicate = player
        .equipped
        .iter()
        .enumerate()
        .any(|(i, piece)| i != equipped_index && piece.id() == stored_id);
    if duplicate {
        return SwapOutcome::DuplicateId {
            id: stored_id.to_string(),
        };
    }

    std::mem::swap(
        &mut player.equipped[equipped_index],
        &mut player.equipment_storage[stored_index],
    );
    SwapOutcome::Swapped {
        removed: equipped_id.to_string(),
        added: stored_id.to_string(),
    }
}

/// Sell a stored piece for its item value.
pub fn sell_stored(player: &mut PlayerRecord, id: &str) -> SellOutcome {
    let Some(index) = player
        .equipment_storage
        .iter()
        .position(|piece| piece.id() == id)
    else {
        return SellOutcome::NotInStorage { id: id.to_string() };
    };
    let piece = player.equipment_storage.remove(index);
    let price = piece.item.value;
    player.currency += price;
    log::debug!("player {} sold stored {} for {}", player.id, id, price);
    SellOutcome::Sold {
        id: id.to_string(),
        price,
    }
}
