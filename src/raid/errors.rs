use thiserror::Error;

/// Errors that can arise in the raid storage and catalog layers.
///
/// Game-logic rejections (wrong status, cooldowns, caps, insufficient funds)
/// are never represented here — they are typed outcome values returned by
/// the individual operations.
#[derive(Debug, Error)]
pub enum RaidError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (directory creation, seed files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed catalog parse errors.
    #[error("seed data error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },
}
