//! Sled-backed persistence for player records.
//!
//! This is the whole persistence gateway: `load`/`save` per player, a bulk
//! `load_all` for registry boot, `save_all` for shutdown flushes, and an
//! atomic `save_pair` so a combat write can never land half-applied.
//! Records are bincode-encoded under prefixed keys and flushed after every
//! write; a failed write surfaces as [`RaidError`] and the caller must not
//! keep the unpersisted mutation.

use std::collections::HashMap;
use std::path::Path;

use sled::IVec;

use crate::raid::errors::RaidError;
use crate::raid::types::{PlayerRecord, PLAYER_SCHEMA_VERSION};

const TREE_PRIMARY: &str = "raid";

/// Sled-backed player store.
pub struct RaidStore {
    _db: sled::Db,
    primary: sled::Tree,
}

impl RaidStore {
    /// Open (or create) the store rooted at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RaidError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let primary = db.open_tree(TREE_PRIMARY)?;
        Ok(Self { _db: db, primary })
    }

    fn player_key(id: &str) -> Vec<u8> {
        format!("players:{}", id).into_bytes()
    }

    fn players_prefix() -> &'static [u8] {
        b"players:"
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, RaidError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: IVec) -> Result<T, RaidError> {
        Ok(bincode::deserialize::<T>(&bytes)?)
    }

    fn check_schema(player: &PlayerRecord) -> Result<(), RaidError> {
        if player.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(RaidError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: player.schema_version,
            });
        }
        Ok(())
    }

    /// Insert or update a player record. Stamps the schema version and the
    /// update timestamp before encoding.
    pub fn save_player(&self, player: &mut PlayerRecord) -> Result<(), RaidError> {
        player.schema_version = PLAYER_SCHEMA_VERSION;
        player.touch();
        let bytes = Self::serialize(player)?;
        self.primary.insert(Self::player_key(&player.id), bytes)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Write two records in one atomic batch. Used by combat so the
    /// attacker and defender can never diverge on disk.
    pub fn save_pair(
        &self,
        first: &mut PlayerRecord,
        second: &mut PlayerRecord,
    ) -> Result<(), RaidError> {
        first.schema_version = PLAYER_SCHEMA_VERSION;
        first.touch();
        second.schema_version = PLAYER_SCHEMA_VERSION;
        second.touch();
        let mut batch = sled::Batch::default();
        batch.insert(Self::player_key(&first.id), Self::serialize(first)?);
        batch.insert(Self::player_key(&second.id), Self::serialize(second)?);
        self.primary.apply_batch(batch)?;
        self.primary.flush()?;
        Ok(())
    }

    /// Fetch a player record by id; `None` when the player was never
    /// provisioned.
    pub fn load_player(&self, id: &str) -> Result<Option<PlayerRecord>, RaidError> {
        let Some(bytes) = self.primary.get(Self::player_key(id))? else {
            return Ok(None);
        };
        let player: PlayerRecord = Self::deserialize(bytes)?;
        Self::check_schema(&player)?;
        Ok(Some(player))
    }

    /// Load every player record. Called once when the registry boots.
    pub fn load_all(&self) -> Result<HashMap<String, PlayerRecord>, RaidError> {
        let mut players = HashMap::new();
        for entry in self.primary.scan_prefix(Self::players_prefix()) {
            let (_, bytes) = entry?;
            let player: PlayerRecord = Self::deserialize(bytes)?;
            Self::check_schema(&player)?;
            players.insert(player.id.clone(), player);
        }
        log::debug!("loaded {} player records", players.len());
        Ok(players)
    }

    /// Persist every supplied record in one batch. Used for shutdown
    /// flushes.
    pub fn save_all<'a, I>(&self, players: I) -> Result<(), RaidError>
    where
        I: IntoIterator<Item = &'a mut PlayerRecord>,
    {
        let mut batch = sled::Batch::default();
        let mut count = 0usize;
        for player in players {
            player.schema_version = PLAYER_SCHEMA_VERSION;
            player.touch();
            batch.insert(Self::player_key(&player.id), Self::serialize(player)?);
            count += 1;
        }
        self.primary.apply_batch(batch)?;
        self.primary.flush()?;
        log::debug!("flushed {} player records", count);
        Ok(())
    }
}
