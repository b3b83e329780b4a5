//! Raid game data model, persistence, and engines.
//!
//! Leaf modules hold the mechanics as pure functions over [`types::PlayerRecord`];
//! [`state::RaidGame`] composes them behind the registry's locking and
//! write-through persistence, and is the only surface the command layer
//! talks to.

pub mod catalog;
pub mod combat;
pub mod equipment;
pub mod errors;
pub mod gacha;
pub mod loot;
pub mod registry;
pub mod retreat;
pub mod search;
pub mod state;
pub mod stats;
pub mod storage;
pub mod types;
pub mod upgrade;

pub use catalog::Catalog;
pub use combat::{success_probability, AttackOutcome, AttackRejection};
pub use equipment::{EquipOutcome, SellOutcome, SwapOutcome, UnequipOutcome};
pub use errors::RaidError;
pub use gacha::{DrawDecision, DrawOutcome, DrawResolution, PendingDraw};
pub use registry::PlayerRegistry;
pub use retreat::{CancelOutcome, RetreatOutcome, SettlementOutcome};
pub use search::SearchOutcome;
pub use state::{ClockFn, RaidGame, StatusReport};
pub use stats::{effective_stats, EffectiveStats};
pub use storage::RaidStore;
pub use types::*;
pub use upgrade::{UpgradeAttribute, UpgradeOutcome};
