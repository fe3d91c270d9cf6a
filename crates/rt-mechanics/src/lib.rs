//! Rules engines for a percentile RPG character sheet.
//!
//! Provides dice sources, percentile test resolution with degrees of
//! success, the formula evaluator used by grant blocks, and the grants
//! engine that turns an acquired talent, trait, or origin path into a
//! change set for the host to persist.

pub mod dice;
pub mod error;
pub mod formula;
pub mod grants;
pub mod memory;
pub mod percentile;
pub mod validate;

pub use dice::{DicePool, DiceSource, Die, DieResult, RngSource, RollResult, ScriptedDice};
pub use error::{MechError, MechResult};
pub use formula::{DiceExpr, FateTable};
pub use grants::{
    ActorStore, ApplySummary, ChangeSet, Collaborators, Compendium, GrantMode, GrantOptions,
    GrantsConfig, GrantsEngine, ItemInstruction, ItemResolver, Notification, Notifier,
};
pub use percentile::TestOutcome;
pub use validate::{ValidationIssue, validate_item};
