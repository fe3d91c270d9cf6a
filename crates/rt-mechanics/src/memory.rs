//! In-memory collaborators for the grants engine.
//!
//! Useful for tests, previews, and hosts that keep the actor in memory.
//! [`MemoryStore`] applies field updates to a JSON rendering of its actor,
//! so dotted paths behave the way a document store would treat them.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use rt_core::{Actor, ActorId, Item, ItemId, OwnedItem};

use crate::error::{MechError, MechResult};
use crate::grants::{ActorStore, Compendium, FieldUpdates, ItemResolver, Notification, Notifier};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Resolves references from a map.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    items: HashMap<String, Item>,
}

impl MemoryResolver {
    /// An empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` under `reference`.
    pub fn with(mut self, reference: impl Into<String>, item: Item) -> Self {
        self.items.insert(reference.into(), item);
        self
    }
}

#[async_trait]
impl ItemResolver for MemoryResolver {
    async fn resolve(&self, reference: &str) -> MechResult<Option<Item>> {
        Ok(self.items.get(reference).cloned())
    }
}

/// Named collections of items.
#[derive(Debug, Default)]
pub struct MemoryCompendium {
    collections: HashMap<String, Vec<Item>>,
}

impl MemoryCompendium {
    /// An empty compendium.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item` to `collection`.
    pub fn with(mut self, collection: impl Into<String>, item: Item) -> Self {
        self.collections.entry(collection.into()).or_default().push(item);
        self
    }
}

#[async_trait]
impl Compendium for MemoryCompendium {
    async fn find_by_name(&self, collection: &str, name: &str) -> MechResult<Option<Item>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|items| items.iter().find(|i| i.name == name))
            .cloned())
    }
}

/// Counts of store calls, for asserting what was written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    /// `create_items` calls.
    pub create_items: usize,
    /// `update_item` calls.
    pub update_item: usize,
    /// `update_actor` calls.
    pub update_actor: usize,
}

impl StoreCalls {
    /// Total calls of any kind.
    pub fn total(&self) -> usize {
        self.create_items + self.update_item + self.update_actor
    }
}

/// Holds one actor and applies writes to it.
#[derive(Debug)]
pub struct MemoryStore {
    actor: Mutex<Actor>,
    calls: Mutex<StoreCalls>,
    read_only: bool,
}

impl MemoryStore {
    /// A store holding `actor`.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor: Mutex::new(actor),
            calls: Mutex::new(StoreCalls::default()),
            read_only: false,
        }
    }

    /// A store whose writes all fail.
    pub fn read_only(actor: Actor) -> Self {
        Self {
            read_only: true,
            ..Self::new(actor)
        }
    }

    /// The actor as currently stored.
    pub fn actor(&self) -> Actor {
        lock(&self.actor).clone()
    }

    /// Calls received so far.
    pub fn calls(&self) -> StoreCalls {
        *lock(&self.calls)
    }

    fn check(&self, actor: ActorId) -> MechResult<()> {
        if self.read_only {
            return Err(MechError::Persistence("store is read-only".into()));
        }
        let stored = lock(&self.actor).id;
        if stored != actor {
            return Err(MechError::Persistence(format!("unknown actor {actor}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorStore for MemoryStore {
    async fn create_items(&self, actor: ActorId, items: Vec<Item>) -> MechResult<Vec<ItemId>> {
        lock(&self.calls).create_items += 1;
        self.check(actor)?;
        let mut stored = lock(&self.actor);
        let ids = items
            .into_iter()
            .map(|item| {
                let owned = OwnedItem::new(item);
                let id = owned.id;
                stored.items.push(owned);
                id
            })
            .collect();
        Ok(ids)
    }

    async fn update_item(
        &self,
        actor: ActorId,
        item: ItemId,
        patch: FieldUpdates,
    ) -> MechResult<()> {
        lock(&self.calls).update_item += 1;
        self.check(actor)?;
        let mut stored = lock(&self.actor);
        let owned = stored
            .items
            .iter_mut()
            .find(|owned| owned.id == item)
            .ok_or_else(|| MechError::Persistence(format!("unknown item {item}")))?;
        *owned = patched(&*owned, &patch)?;
        Ok(())
    }

    async fn update_actor(&self, actor: ActorId, patch: FieldUpdates) -> MechResult<()> {
        lock(&self.calls).update_actor += 1;
        self.check(actor)?;
        let mut stored = lock(&self.actor);
        *stored = patched(&*stored, &patch)?;
        Ok(())
    }
}

/// Apply dotted-path updates to a serializable value.
fn patched<T>(value: &T, patch: &FieldUpdates) -> MechResult<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let mut doc =
        serde_json::to_value(value).map_err(|e| MechError::Persistence(e.to_string()))?;
    for (path, new_value) in patch {
        set_path(&mut doc, path, new_value.clone())?;
    }
    serde_json::from_value(doc).map_err(|e| MechError::Persistence(e.to_string()))
}

fn set_path(doc: &mut Value, path: &str, new_value: Value) -> MechResult<()> {
    let mut segments = path.split('.').peekable();
    let mut node = doc;
    while let Some(segment) = segments.next() {
        let Value::Object(map) = node else {
            return Err(MechError::Persistence(format!("{path}: not an object at {segment}")));
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), new_value);
            return Ok(());
        }
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    Ok(())
}

/// Records every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.seen).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        lock(&self.seen).push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_core::{CharacteristicKey, ItemKind, Pool};
    use serde_json::json;

    #[tokio::test]
    async fn store_applies_dotted_paths() {
        let mut actor = Actor::new("Tester");
        actor.set_characteristic(CharacteristicKey::Toughness, 35);
        actor.resources.wounds = Pool::new(10);
        let store = MemoryStore::new(actor.clone());

        let mut patch = FieldUpdates::new();
        patch.insert("characteristics.toughness.advance".into(), json!(5));
        patch.insert("resources.wounds.max".into(), json!(14));
        patch.insert("skills.commonLore.entries.Imperium.trained".into(), json!(true));
        store.update_actor(actor.id, patch).await.unwrap();

        let stored = store.actor();
        assert_eq!(stored.characteristics[&CharacteristicKey::Toughness].total(), 40);
        assert_eq!(stored.resources.wounds.max, 14);
        assert_eq!(stored.resources.wounds.value, 10);
        assert!(stored.skill_training("commonLore", Some("Imperium")).trained);
        assert_eq!(store.calls().update_actor, 1);
    }

    #[tokio::test]
    async fn advance_on_an_unset_characteristic() {
        let actor = Actor::new("Tester");
        let store = MemoryStore::new(actor.clone());

        let mut patch = FieldUpdates::new();
        patch.insert("characteristics.agility.advance".into(), json!(5));
        store.update_actor(actor.id, patch).await.unwrap();

        let agility = store.actor().characteristics[&CharacteristicKey::Agility];
        assert_eq!(agility.base, 0);
        assert_eq!(agility.advance, 5);
    }

    #[tokio::test]
    async fn store_creates_and_patches_items() {
        let actor = Actor::new("Tester");
        let store = MemoryStore::new(actor.clone());
        let ids = store
            .create_items(actor.id, vec![Item::new(ItemKind::Skill, "Awareness")])
            .await
            .unwrap();
        let mut patch = FieldUpdates::new();
        patch.insert("system.plus10".into(), json!(true));
        store.update_item(actor.id, ids[0], patch).await.unwrap();

        let stored = store.actor();
        assert!(stored.item(ids[0]).unwrap().item.system.training.plus10);
        assert_eq!(store.calls().total(), 2);
    }

    #[tokio::test]
    async fn read_only_store_fails_writes() {
        let actor = Actor::new("Tester");
        let store = MemoryStore::read_only(actor.clone());
        let err = store
            .update_actor(actor.id, FieldUpdates::new())
            .await
            .unwrap_err();
        assert!(matches!(err, MechError::Persistence(_)));
    }

    #[tokio::test]
    async fn resolver_and_compendium_lookups() {
        let resolver = MemoryResolver::new().with("ref-1", Item::new(ItemKind::Gear, "Rope"));
        assert!(resolver.resolve("ref-1").await.unwrap().is_some());
        assert!(resolver.resolve("ref-2").await.unwrap().is_none());

        let compendium =
            MemoryCompendium::new().with("talents", Item::new(ItemKind::Talent, "Ambidextrous"));
        assert!(
            compendium
                .find_by_name("talents", "Ambidextrous")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            compendium
                .find_by_name("traits", "Ambidextrous")
                .await
                .unwrap()
                .is_none()
        );
    }
}
