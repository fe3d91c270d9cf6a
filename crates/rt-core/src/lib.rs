//! Core types for the percentile rules engine: actors, items, grants, and
//! the static skill table.
//!
//! This crate is the data model the host adapter fills in and the mechanics
//! crate reads. It performs no I/O and knows nothing about dice.

/// Actor snapshots: characteristics, skills, items, and resources.
pub mod actor;
/// Characteristics, bonuses, and formula bonus tokens.
pub mod characteristic;
/// Error types used throughout the crate.
pub mod error;
/// Declarative grant blocks.
pub mod grants;
/// Actor and item identifiers.
pub mod id;
/// Items and their typed payload.
pub mod item;
/// Wounds, fate, corruption, and insanity counters.
pub mod resource;
/// The skill table and training levels.
pub mod skills;

/// Re-export actor types.
pub use actor::{Actor, ActorSkill};
/// Re-export characteristic types.
pub use characteristic::{Characteristic, CharacteristicKey, Characteristics};
/// Re-export error types.
pub use error::{RtError, RtResult};
/// Re-export grant data types.
pub use grants::{
    ChoiceOption, EquipmentGrant, GrantChoice, Grants, ItemGrant, SkillGrant, SpecialAbility,
};
/// Re-export identifiers.
pub use id::{ActorId, ItemId};
/// Re-export item types.
pub use item::{Item, ItemKind, ItemSystem, OwnedItem, Provenance, RolledValues};
/// Re-export resource types.
pub use resource::{Counter, Pool, Resources};
/// Re-export skill types.
pub use skills::{SkillClass, SkillDef, SkillLevel, SkillTraining};
