//! The authoritative in-memory player registry with its persistence mirror.
//!
//! Built once at startup from [`RaidStore::load_all`] and injected into the
//! game facade — player state is never reached through globals. Each player
//! lives behind its own mutex, so operations on the same id serialize while
//! unrelated players proceed concurrently. Two-player operations lock in
//! sorted-id order.
//!
//! Every closure runs against a working copy: the store write happens first
//! and the in-memory record is only replaced once the write succeeded, so a
//! persistence failure rolls the operation back instead of letting memory
//! and disk drift apart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::raid::errors::RaidError;
use crate::raid::storage::RaidStore;
use crate::raid::types::{NewPlayerDefaults, PlayerRecord};

pub struct PlayerRegistry {
    store: RaidStore,
    defaults: NewPlayerDefaults,
    players: RwLock<HashMap<String, Arc<Mutex<PlayerRecord>>>>,
}

fn lock(slot: &Arc<Mutex<PlayerRecord>>) -> MutexGuard<'_, PlayerRecord> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlayerRegistry {
    /// Boot the registry from everything the store holds.
    pub fn open(store: RaidStore, defaults: NewPlayerDefaults) -> Result<Self, RaidError> {
        let loaded = store.load_all()?;
        let players = loaded
            .into_iter()
            .map(|(id, record)| (id, Arc::new(Mutex::new(record))))
            .collect();
        Ok(Self {
            store,
            defaults,
            players: RwLock::new(players),
        })
    }

    /// Whether a record for `id` already exists. Does not provision.
    pub fn contains(&self, id: &str) -> bool {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Clone of the current record, if any. Does not provision.
    pub fn snapshot(&self, id: &str) -> Option<PlayerRecord> {
        let map = self.players.read().unwrap_or_else(PoisonError::into_inner);
        map.get(id).map(|slot| lock(slot).clone())
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Slot for `id`, lazily provisioning (and immediately persisting) a
    /// fresh record when none exists. The bool reports provisioning.
    fn entry(&self, id: &str) -> Result<(Arc<Mutex<PlayerRecord>>, bool), RaidError> {
        if let Some(slot) = self
            .players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok((slot.clone(), false));
        }

        let mut map = self.players.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have provisioned while we waited for the lock.
        if let Some(slot) = map.get(id) {
            return Ok((slot.clone(), false));
        }
        let mut record = PlayerRecord::new(id, &self.defaults);
        self.store.save_player(&mut record)?;
        let slot = Arc::new(Mutex::new(record));
        map.insert(id.to_string(), slot.clone());
        log::info!("provisioned new player {}", id);
        Ok((slot, true))
    }

    /// Provision `id` if needed without running an operation. Returns true
    /// when a new record was created.
    pub fn ensure(&self, id: &str) -> Result<bool, RaidError> {
        self.entry(id).map(|(_, created)| created)
    }

    /// Run a read-modify-write operation against one player, write-through.
    pub fn with_player<T>(
        &self,
        id: &str,
        op: impl FnOnce(&mut PlayerRecord) -> T,
    ) -> Result<T, RaidError> {
        let (slot, _) = self.entry(id)?;
        let mut guard = lock(&slot);
        let mut working = guard.clone();
        let outcome = op(&mut working);
        self.store.save_player(&mut working)?;
        *guard = working;
        Ok(outcome)
    }

    /// Run an operation against two distinct players, locking in sorted-id
    /// order and persisting both records in one atomic batch.
    pub fn with_pair<T>(
        &self,
        first: &str,
        second: &str,
        op: impl FnOnce(&mut PlayerRecord, &mut PlayerRecord) -> T,
    ) -> Result<T, RaidError> {
        debug_assert_ne!(first, second, "with_pair requires distinct ids");
        let (slot_first, _) = self.entry(first)?;
        let (slot_second, _) = self.entry(second)?;

        let (mut guard_first, mut guard_second);
        if first < second {
            guard_first = lock(&slot_first);
            guard_second = lock(&slot_second);
        } else {
            guard_second = lock(&slot_second);
            guard_first = lock(&slot_first);
        }

        let mut working_first = guard_first.clone();
        let mut working_second = guard_second.clone();
        let outcome = op(&mut working_first, &mut working_second);
        self.store.save_pair(&mut working_first, &mut working_second)?;
        *guard_first = working_first;
        *guard_second = working_second;
        Ok(outcome)
    }

    /// Persist every in-memory record. Intended for shutdown.
    pub fn flush_all(&self) -> Result<(), RaidError> {
        let map = self.players.read().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<PlayerRecord> =
            map.values().map(|slot| lock(slot).clone()).collect();
        self.store.save_all(records.iter_mut())
    }
}
