use crate::characteristic::CharacteristicKey;
use crate::id::ItemId;

/// Alias for `Result<T, RtError>`.
pub type RtResult<T> = Result<T, RtError>;

/// Errors that can occur when reading or manipulating actor data.
#[derive(Debug, thiserror::Error)]
pub enum RtError {
    /// The requested item ID is not owned by the actor.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// A characteristic abbreviation or bonus token was not recognised.
    #[error("unknown characteristic: \"{0}\"")]
    UnknownCharacteristic(String),

    /// The actor has no value recorded for a characteristic.
    #[error("characteristic {0} is not set on the actor")]
    MissingCharacteristic(CharacteristicKey),

    /// A skill name or key could not be resolved against the skill table.
    #[error("unknown skill: \"{0}\"")]
    UnknownSkill(String),
}
