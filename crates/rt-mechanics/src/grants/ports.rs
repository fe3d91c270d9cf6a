//! Collaborator interfaces the host adapter implements.
//!
//! The engine reads item data through [`ItemResolver`] and [`Compendium`],
//! writes through [`ActorStore`], and reports to the player through
//! [`Notifier`]. Lookups may fail; the engine treats a failed lookup exactly
//! like a missing item. Store failures are returned to the caller.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rt_core::{ActorId, Item, ItemId};

use crate::error::MechResult;

/// Dotted document paths to new values, e.g. `characteristics.toughness.advance`.
pub type FieldUpdates = BTreeMap<String, serde_json::Value>;

/// Resolves opaque item references to item data.
#[async_trait]
pub trait ItemResolver: Send + Sync {
    /// Look up an item by reference. `Ok(None)` when it does not exist.
    async fn resolve(&self, reference: &str) -> MechResult<Option<Item>>;
}

/// Searches named item collections.
#[async_trait]
pub trait Compendium: Send + Sync {
    /// Find an item by exact name in a collection.
    async fn find_by_name(&self, collection: &str, name: &str) -> MechResult<Option<Item>>;
}

/// Persists changes to an actor and its items.
#[async_trait]
pub trait ActorStore: Send + Sync {
    /// Create items on the actor in one batch, returning their new IDs.
    async fn create_items(&self, actor: ActorId, items: Vec<Item>) -> MechResult<Vec<ItemId>>;

    /// Apply field updates to one owned item.
    async fn update_item(&self, actor: ActorId, item: ItemId, patch: FieldUpdates)
    -> MechResult<()>;

    /// Apply field updates to the actor itself.
    async fn update_actor(&self, actor: ActorId, patch: FieldUpdates) -> MechResult<()>;
}

/// Shows messages to the player.
pub trait Notifier: Send + Sync {
    /// Display one notification.
    fn notify(&self, notification: &Notification);
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    /// Something was granted, skipped, or applied.
    Info,
    /// A grant could not be honoured as written.
    Warning,
}

/// A human-readable message produced while resolving grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// An informational message.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// A warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Whether this is a warning.
    pub fn is_warning(&self) -> bool {
        self.level == NotificationLevel::Warning
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Info => write!(f, "{}", self.message),
            NotificationLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// A [`Notifier`] that writes to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Info => tracing::info!("{}", notification.message),
            NotificationLevel::Warning => tracing::warn!("{}", notification.message),
        }
    }
}

/// The collaborators one engine instance talks to.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Reference lookups.
    pub resolver: &'a dyn ItemResolver,
    /// Name lookups.
    pub compendium: &'a dyn Compendium,
    /// Persistence.
    pub store: &'a dyn ActorStore,
    /// Player-facing messages.
    pub notifier: &'a dyn Notifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_display() {
        assert_eq!(Notification::info("Talent granted").to_string(), "Talent granted");
        assert_eq!(
            Notification::warning("no reference").to_string(),
            "warning: no reference"
        );
        assert!(Notification::warning("x").is_warning());
        assert!(!Notification::info("x").is_warning());
    }
}
