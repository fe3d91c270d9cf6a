//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice or bonus formula could not be parsed.
    #[error("invalid formula \"{formula}\": {reason}")]
    InvalidFormula {
        /// The formula as written.
        formula: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A die with fewer than two sides was requested.
    #[error("invalid die: d{0}")]
    InvalidDie(u32),

    /// A host lookup failed. The grants engine treats this as "not found".
    #[error("lookup failed for {reference}: {reason}")]
    Lookup {
        /// The reference or name looked up.
        reference: String,
        /// The host's error message.
        reason: String,
    },

    /// A host persistence write failed.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl MechError {
    /// Shorthand for an [`MechError::InvalidFormula`].
    pub fn formula(formula: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
