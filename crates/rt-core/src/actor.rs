//! Actors: characteristics, resources, skill map and owned items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::characteristic::{Characteristic, CharacteristicKey, Characteristics};
use crate::error::{RtError, RtResult};
use crate::id::{ActorId, ItemId};
use crate::item::{ItemKind, OwnedItem};
use crate::resource::Resources;
use crate::skills::{SkillClass, SkillTraining, skill_def};

/// Training recorded on the actor's own skill block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSkill {
    /// Flags for non-specialist skills.
    #[serde(flatten)]
    pub training: SkillTraining,
    /// Flags per specialization, for specialist skills.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub entries: BTreeMap<String, SkillTraining>,
}

/// A read-only snapshot of a character as the host stores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    /// Host document ID.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Characteristic block.
    pub characteristics: Characteristics,
    /// Skill block keyed by internal skill key.
    pub skills: BTreeMap<String, ActorSkill>,
    /// Owned items, in display order.
    pub items: Vec<OwnedItem>,
    /// Wounds, fate, corruption, insanity.
    pub resources: Resources,
    /// Aptitudes.
    pub aptitudes: Vec<String>,
}

impl Actor {
    /// Create an actor with no data.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a characteristic's base value, keeping any advance.
    pub fn set_characteristic(&mut self, key: CharacteristicKey, base: i32) {
        self.characteristics.entry(key).or_default().base = base;
    }

    /// Get a characteristic.
    pub fn characteristic(&self, key: CharacteristicKey) -> RtResult<&Characteristic> {
        self.characteristics
            .get(&key)
            .ok_or(RtError::MissingCharacteristic(key))
    }

    /// The bonus of a characteristic, or 0 when it is not set.
    pub fn bonus(&self, key: CharacteristicKey) -> i32 {
        self.characteristics
            .get(&key)
            .map(Characteristic::bonus)
            .unwrap_or(0)
    }

    /// Find an owned item by kind, name, and optional specialization.
    pub fn find_item(
        &self,
        kind: &ItemKind,
        name: &str,
        specialization: Option<&str>,
    ) -> Option<&OwnedItem> {
        self.items
            .iter()
            .find(|owned| &owned.item.kind == kind && owned.item.matches(name, specialization))
    }

    /// Get an owned item by ID.
    pub fn item(&self, id: ItemId) -> RtResult<&OwnedItem> {
        self.items
            .iter()
            .find(|owned| owned.id == id)
            .ok_or(RtError::ItemNotFound(id))
    }

    /// Training flags for a skill from the actor's skill block.
    pub fn skill_training(&self, key: &str, specialization: Option<&str>) -> SkillTraining {
        let Some(skill) = self.skills.get(key) else {
            return SkillTraining::default();
        };
        match specialization {
            Some(spec) => skill
                .entries
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(spec))
                .map(|(_, t)| *t)
                .unwrap_or_default(),
            None => skill.training,
        }
    }

    /// The target number for testing a skill, before situational modifiers.
    ///
    /// Trained skills test against the full characteristic plus their
    /// training bonus. Untrained basic skills test at half the
    /// characteristic, rounded down. Untrained advanced skills cannot be
    /// tested and return `Ok(None)`.
    pub fn skill_target(&self, key: &str, specialization: Option<&str>) -> RtResult<Option<i32>> {
        let def = skill_def(key).ok_or_else(|| RtError::UnknownSkill(key.to_string()))?;
        let characteristic = self.characteristic(def.characteristic)?.total();
        let training = self.skill_training(key, specialization);

        if !training.is_untrained() {
            return Ok(Some(characteristic + training.test_bonus()));
        }
        match def.class {
            SkillClass::Basic => Ok(Some(characteristic.div_euclid(2))),
            SkillClass::Advanced => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;
    use crate::skills::SkillLevel;

    fn actor() -> Actor {
        let mut actor = Actor::new("Lucius");
        actor.set_characteristic(CharacteristicKey::Agility, 35);
        actor.set_characteristic(CharacteristicKey::Intelligence, 41);
        actor.set_characteristic(CharacteristicKey::Perception, 30);
        actor
    }

    #[test]
    fn bonus_defaults_to_zero() {
        let a = actor();
        assert_eq!(a.bonus(CharacteristicKey::Agility), 3);
        assert_eq!(a.bonus(CharacteristicKey::Toughness), 0);
        assert!(a.characteristic(CharacteristicKey::Toughness).is_err());
    }

    #[test]
    fn find_item_by_kind_and_name() {
        let mut a = actor();
        let talent = OwnedItem::new(Item::new(ItemKind::Talent, "Jaded"));
        let id = talent.id;
        a.items.push(talent);
        assert_eq!(a.find_item(&ItemKind::Talent, "jaded", None).unwrap().id, id);
        assert!(a.find_item(&ItemKind::Trait, "Jaded", None).is_none());
        assert!(a.item(id).is_ok());
        assert!(a.item(ItemId::new()).is_err());
    }

    #[test]
    fn untrained_basic_tests_at_half() {
        let a = actor();
        assert_eq!(a.skill_target("dodge", None).unwrap(), Some(17));
    }

    #[test]
    fn untrained_advanced_cannot_be_tested() {
        let a = actor();
        assert_eq!(a.skill_target("acrobatics", None).unwrap(), None);
    }

    #[test]
    fn trained_skill_adds_bonus() {
        let mut a = actor();
        a.skills.insert(
            "awareness".to_string(),
            ActorSkill {
                training: SkillTraining::for_level(SkillLevel::Plus10),
                entries: BTreeMap::new(),
            },
        );
        assert_eq!(a.skill_target("awareness", None).unwrap(), Some(40));
    }

    #[test]
    fn specialist_entry_lookup() {
        let mut a = actor();
        let mut entries = BTreeMap::new();
        entries.insert(
            "Imperium".to_string(),
            SkillTraining::for_level(SkillLevel::Trained),
        );
        a.skills.insert(
            "commonLore".to_string(),
            ActorSkill {
                training: SkillTraining::default(),
                entries,
            },
        );
        assert_eq!(
            a.skill_target("commonLore", Some("imperium")).unwrap(),
            Some(41)
        );
        assert_eq!(a.skill_target("commonLore", Some("Tech")).unwrap(), None);
    }

    #[test]
    fn unknown_skill_is_an_error() {
        assert!(actor().skill_target("voidTactics", None).is_err());
    }
}
