//! Items owned by actors and the typed payload the engine reads from them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::characteristic::CharacteristicKey;
use crate::grants::Grants;
use crate::id::ItemId;
use crate::skills::SkillTraining;

/// The kind of an item. Host type strings the engine does not interpret
/// load as `Other` and serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    /// A trained skill.
    Skill,
    /// A talent.
    Talent,
    /// A trait.
    Trait,
    /// One step of the character-creation origin path.
    OriginPath,
    /// A weapon.
    Weapon,
    /// Armour.
    Armour,
    /// General gear.
    Gear,
    /// An implant.
    Cybernetic,
    /// Anything else.
    Other(String),
}

impl ItemKind {
    /// Returns true for kinds that can be handed out as equipment.
    pub fn is_equipment(&self) -> bool {
        matches!(
            self,
            Self::Weapon | Self::Armour | Self::Gear | Self::Cybernetic
        )
    }
}

impl From<String> for ItemKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "skill" => Self::Skill,
            "talent" => Self::Talent,
            "trait" => Self::Trait,
            "originPath" => Self::OriginPath,
            "weapon" => Self::Weapon,
            "armour" => Self::Armour,
            "gear" => Self::Gear,
            "cybernetic" => Self::Cybernetic,
            _ => Self::Other(kind),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill => write!(f, "skill"),
            Self::Talent => write!(f, "talent"),
            Self::Trait => write!(f, "trait"),
            Self::OriginPath => write!(f, "originPath"),
            Self::Weapon => write!(f, "weapon"),
            Self::Armour => write!(f, "armour"),
            Self::Gear => write!(f, "gear"),
            Self::Cybernetic => write!(f, "cybernetic"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Results of earlier interactive rolls, kept so they are honoured verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolledValues {
    /// Confirmed wounds roll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wounds: Option<i32>,
    /// Confirmed fate roll.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fate: Option<i32>,
}

/// The typed game payload of an item.
///
/// Fields irrelevant to an item's kind are simply left at their defaults;
/// unknown host fields survive a round trip through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemSystem {
    /// Specialization, e.g. "Imperium" for Common Lore (Imperium).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Skill training flags.
    #[serde(flatten)]
    pub training: SkillTraining,
    /// Trait level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Whether repeated grants of this trait add their levels together.
    pub stackable: bool,
    /// Stack size for equipment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// Whether the talent's grant block should be processed.
    pub has_grants: bool,
    /// The grant block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grants: Option<Grants>,
    /// Origin-path characteristic modifiers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub characteristic_modifiers: BTreeMap<CharacteristicKey, i32>,
    /// Choice label to the option values the player picked.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub selected_choices: BTreeMap<String, Vec<String>>,
    /// Confirmed roll results.
    pub rolled: RolledValues,
    /// Rules text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Host fields not modelled here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Where an automatically granted item came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Name of the granting item.
    pub granted_by: String,
    /// ID of the granting item, when it is owned by the actor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_by_id: Option<ItemId>,
    /// Always true for engine-created items.
    pub auto_granted: bool,
}

/// Item data as stored in a compendium or queued for creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Display name.
    pub name: String,
    /// Item kind.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Game payload.
    #[serde(default)]
    pub system: ItemSystem,
    /// Grant provenance, if created by the grants engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Item {
    /// Create an item with an empty payload.
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            system: ItemSystem::default(),
            provenance: None,
        }
    }

    /// Set the specialization.
    pub fn with_specialization(mut self, specialization: Option<String>) -> Self {
        self.system.specialization = specialization;
        self
    }

    /// Set the grant block and mark the item as having grants.
    pub fn with_grants(mut self, grants: Grants) -> Self {
        self.system.has_grants = true;
        self.system.grants = Some(grants);
        self
    }

    /// Name with specialization, e.g. "Common Lore (Imperium)".
    pub fn full_name(&self) -> String {
        display_name(&self.name, self.system.specialization.as_deref())
    }

    /// Whether this item matches a name and optional specialization.
    ///
    /// Comparison ignores ASCII case. A `None` specialization only matches
    /// items without one.
    pub fn matches(&self, name: &str, specialization: Option<&str>) -> bool {
        if !self.name.trim().eq_ignore_ascii_case(name.trim()) {
            return false;
        }
        match (self.system.specialization.as_deref(), specialization) {
            (None, None) => true,
            (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
            _ => false,
        }
    }
}

/// An item owned by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedItem {
    /// Embedded document ID.
    pub id: ItemId,
    /// Item data.
    #[serde(flatten)]
    pub item: Item,
}

impl OwnedItem {
    /// Wrap item data with a fresh ID.
    pub fn new(item: Item) -> Self {
        Self {
            id: ItemId::new(),
            item,
        }
    }
}

/// Format a name with an optional parenthesised specialization.
pub fn display_name(name: &str, specialization: Option<&str>) -> String {
    match specialization {
        Some(spec) if !spec.is_empty() => format!("{name} ({spec})"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_name_and_specialization() {
        let lore = Item::new(ItemKind::Skill, "Common Lore")
            .with_specialization(Some("Imperium".to_string()));
        assert!(lore.matches("common lore", Some("imperium")));
        assert!(!lore.matches("Common Lore", Some("Tech")));
        assert!(!lore.matches("Common Lore", None));

        let dodge = Item::new(ItemKind::Skill, "Dodge");
        assert!(dodge.matches("Dodge", None));
        assert!(!dodge.matches("Dodge", Some("Fast")));
    }

    #[test]
    fn full_name() {
        let lore = Item::new(ItemKind::Skill, "Common Lore")
            .with_specialization(Some("Imperium".to_string()));
        assert_eq!(lore.full_name(), "Common Lore (Imperium)");
        assert_eq!(Item::new(ItemKind::Talent, "Jaded").full_name(), "Jaded");
    }

    #[test]
    fn equipment_kinds() {
        assert!(ItemKind::Weapon.is_equipment());
        assert!(ItemKind::Gear.is_equipment());
        assert!(!ItemKind::Talent.is_equipment());
        assert!(!ItemKind::Other("ship".to_string()).is_equipment());
    }

    #[test]
    fn unknown_host_kinds_round_trip() {
        let json = r#"{"name":"Smite","type":"psychicPower"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Other("psychicPower".to_string()));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "psychicPower");
        let origin: Item = serde_json::from_str(r#"{"name":"Void Born","type":"originPath"}"#).unwrap();
        assert_eq!(serde_json::to_value(&origin).unwrap()["type"], "originPath");
        assert_eq!(origin.kind, ItemKind::OriginPath);
    }

    #[test]
    fn system_keeps_unknown_fields() {
        let json = r#"{"name":"Lasgun","type":"weapon","system":{"damage":"1d10+3","quantity":2}}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Weapon);
        assert_eq!(item.system.quantity, Some(2));
        assert_eq!(
            item.system.extra.get("damage"),
            Some(&serde_json::Value::String("1d10+3".to_string()))
        );
    }

    #[test]
    fn skill_flags_are_flattened() {
        let json = r#"{"name":"Dodge","type":"skill","system":{"trained":true,"plus10":true}}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.system.training.trained);
        assert!(item.system.training.plus10);
        assert!(!item.system.training.plus20);
    }
}
