//! The accumulated result of resolving grants.

use std::collections::BTreeMap;

use serde::Serialize;

use rt_core::{CharacteristicKey, Item, ItemId, ItemKind, SkillTraining};

use super::ports::Notification;

/// One change to the actor's owned items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ItemInstruction {
    /// Create a new owned item.
    Create(Item),
    /// OR training flags into an existing skill item.
    Upgrade {
        /// The existing item.
        item_id: ItemId,
        /// Display name, for messages.
        name: String,
        /// Flags to add. Flags are never removed.
        training: SkillTraining,
    },
    /// Raise the level of an existing stackable item.
    IncrementLevel {
        /// The existing item.
        item_id: ItemId,
        /// Display name, for messages.
        name: String,
        /// Amount to add.
        by: i64,
    },
}

impl ItemInstruction {
    /// The created item, for `Create` instructions.
    pub fn created(&self) -> Option<&Item> {
        match self {
            Self::Create(item) => Some(item),
            _ => None,
        }
    }
}

/// Everything one or more grant resolutions would change on an actor.
///
/// A change set is a value: building one never touches the actor. Several
/// can be combined with [`ChangeSet::merge`] and then persisted in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// Advance deltas per characteristic.
    pub characteristics: BTreeMap<CharacteristicKey, i32>,
    /// Item creates and updates, in resolution order.
    pub items: Vec<ItemInstruction>,
    /// Actor skill flags to set, keyed by dotted path.
    pub skill_updates: BTreeMap<String, serde_json::Value>,
    /// Added to current and maximum wounds.
    pub wounds_bonus: i32,
    /// Added to current and maximum fate.
    pub fate_bonus: i32,
    /// Added to corruption points.
    pub corruption_bonus: i32,
    /// Added to insanity points.
    pub insanity_bonus: i32,
    /// Aptitudes to add, without duplicates.
    pub aptitudes: Vec<String>,
    /// Messages for the player.
    pub notifications: Vec<Notification>,
}

impl ChangeSet {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when applying this would change nothing.
    pub fn is_empty(&self) -> bool {
        self.characteristics.values().all(|d| *d == 0)
            && self.items.is_empty()
            && self.skill_updates.is_empty()
            && self.wounds_bonus == 0
            && self.fate_bonus == 0
            && self.corruption_bonus == 0
            && self.insanity_bonus == 0
            && self.aptitudes.is_empty()
    }

    /// Add to a characteristic's advance delta.
    pub fn add_characteristic(&mut self, key: CharacteristicKey, delta: i32) {
        let entry = self.characteristics.entry(key).or_insert(0);
        *entry = entry.saturating_add(delta);
    }

    /// Add an aptitude unless already present.
    pub fn add_aptitude(&mut self, aptitude: &str) {
        let aptitude = aptitude.trim();
        if aptitude.is_empty()
            || self
                .aptitudes
                .iter()
                .any(|a| a.eq_ignore_ascii_case(aptitude))
        {
            return;
        }
        self.aptitudes.push(aptitude.to_string());
    }

    /// Queue an item for creation.
    pub fn create(&mut self, item: Item) {
        self.items.push(ItemInstruction::Create(item));
    }

    /// An item already queued for creation, by kind, name and specialization.
    pub fn pending_mut(
        &mut self,
        kind: &ItemKind,
        name: &str,
        specialization: Option<&str>,
    ) -> Option<&mut Item> {
        self.items.iter_mut().find_map(|instruction| match instruction {
            ItemInstruction::Create(item)
                if &item.kind == kind && item.matches(name, specialization) =>
            {
                Some(item)
            }
            _ => None,
        })
    }

    /// Items queued for creation.
    pub fn created(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter_map(ItemInstruction::created)
    }

    /// Record an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::info(message));
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::warning(message));
    }

    /// Fold another change set into this one.
    ///
    /// Numeric deltas are summed (saturating), aptitudes unioned, and item instructions,
    /// skill updates and notifications appended. Duplicate creates are kept.
    pub fn merge(&mut self, other: ChangeSet) {
        for (key, delta) in other.characteristics {
            self.add_characteristic(key, delta);
        }
        self.items.extend(other.items);
        self.skill_updates.extend(other.skill_updates);
        self.wounds_bonus = self.wounds_bonus.saturating_add(other.wounds_bonus);
        self.fate_bonus = self.fate_bonus.saturating_add(other.fate_bonus);
        self.corruption_bonus = self.corruption_bonus.saturating_add(other.corruption_bonus);
        self.insanity_bonus = self.insanity_bonus.saturating_add(other.insanity_bonus);
        for aptitude in &other.aptitudes {
            self.add_aptitude(aptitude);
        }
        self.notifications.extend(other.notifications);
    }

    /// `merge`, by value.
    pub fn merged(mut self, other: ChangeSet) -> Self {
        self.merge(other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_change_set() {
        let mut cs = ChangeSet::new();
        assert!(cs.is_empty());
        cs.add_characteristic(CharacteristicKey::Agility, 0);
        cs.info("nothing happened");
        assert!(cs.is_empty());
        cs.add_characteristic(CharacteristicKey::Agility, 5);
        assert!(!cs.is_empty());
    }

    #[test]
    fn merge_sums_and_concatenates() {
        let mut a = ChangeSet::new();
        a.add_characteristic(CharacteristicKey::WeaponSkill, 5);
        a.wounds_bonus = 4;
        a.add_aptitude("Offence");
        a.create(Item::new(ItemKind::Talent, "Air of Authority"));
        a.skill_updates
            .insert("skills.awareness.trained".into(), serde_json::Value::Bool(true));

        let mut b = ChangeSet::new();
        b.add_characteristic(CharacteristicKey::WeaponSkill, 3);
        b.add_characteristic(CharacteristicKey::Fellowship, -5);
        b.wounds_bonus = 2;
        b.fate_bonus = 1;
        b.add_aptitude("offence");
        b.add_aptitude("Willpower");
        b.create(Item::new(ItemKind::Talent, "Air of Authority"));
        b.warn("missing reference");

        let m = a.merged(b);
        assert_eq!(m.characteristics[&CharacteristicKey::WeaponSkill], 8);
        assert_eq!(m.characteristics[&CharacteristicKey::Fellowship], -5);
        assert_eq!(m.wounds_bonus, 6);
        assert_eq!(m.fate_bonus, 1);
        assert_eq!(m.aptitudes, vec!["Offence", "Willpower"]);
        assert_eq!(m.created().count(), 2);
        assert_eq!(m.skill_updates.len(), 1);
        assert_eq!(m.notifications.len(), 1);
    }

    #[test]
    fn pending_lookup_respects_specialization() {
        let mut cs = ChangeSet::new();
        cs.create(
            Item::new(ItemKind::Skill, "Common Lore").with_specialization(Some("Imperium".into())),
        );
        assert!(
            cs.pending_mut(&ItemKind::Skill, "common lore", Some("imperium"))
                .is_some()
        );
        assert!(cs.pending_mut(&ItemKind::Skill, "Common Lore", None).is_none());
        assert!(
            cs.pending_mut(&ItemKind::Talent, "Common Lore", Some("Imperium"))
                .is_none()
        );
    }
}
