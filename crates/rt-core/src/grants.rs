//! Declarative grant blocks carried by talents, traits, and origin paths.
//!
//! A grant block lists what acquiring an item bestows. Content authors write
//! these by hand, so every field is optional on the wire and unknown or
//! incomplete entries are tolerated by the engine rather than rejected here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::characteristic::CharacteristicKey;
use crate::skills::SkillLevel;

/// Everything an item grants on acquisition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Grants {
    /// Characteristic deltas (used by choice options).
    pub characteristics: BTreeMap<CharacteristicKey, i32>,
    /// Skills to train or upgrade.
    pub skills: Vec<SkillGrant>,
    /// Talents to add.
    pub talents: Vec<ItemGrant>,
    /// Traits to add or stack.
    pub traits: Vec<ItemGrant>,
    /// Equipment to hand out.
    pub equipment: Vec<EquipmentGrant>,
    /// Narrative abilities with no item representation.
    pub special_abilities: Vec<SpecialAbility>,
    /// Aptitudes added to the actor.
    pub aptitudes: Vec<String>,
    /// Starting wounds formula, e.g. `2xTB+1d5+2`.
    pub wounds_formula: Option<String>,
    /// Starting fate table, e.g. `(1-5|=2),(6-10|=3)`.
    pub fate_formula: Option<String>,
    /// Corruption gained, as a dice formula.
    pub corruption: Option<String>,
    /// Insanity gained, as a dice formula.
    pub insanity: Option<String>,
    /// Player choices gating further grants.
    pub choices: Vec<GrantChoice>,
}

impl Grants {
    /// True when the block grants nothing at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A skill to train.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGrant {
    /// Skill display name.
    pub name: String,
    /// Specialization for specialist skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Requested level; `trained` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
}

impl SkillGrant {
    /// A grant for a non-specialist skill at the given level.
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            specialization: None,
            level: Some(level),
        }
    }

    /// A grant for one specialization of a specialist skill.
    pub fn specialist(
        name: impl Into<String>,
        specialization: impl Into<String>,
        level: SkillLevel,
    ) -> Self {
        Self {
            name: name.into(),
            specialization: Some(specialization.into()),
            level: Some(level),
        }
    }
}

/// A talent or trait to add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGrant {
    /// Item name.
    pub name: String,
    /// Specialization, for talents like "Talented (Medicae)".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Trait level, for stackable traits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    /// Opaque host reference to the full item data.
    #[serde(default, rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl ItemGrant {
    /// A grant resolved by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attach a host reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Attach a specialization.
    pub fn with_specialization(mut self, specialization: impl Into<String>) -> Self {
        self.specialization = Some(specialization.into());
        self
    }

    /// Attach a level.
    pub fn with_level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }
}

/// Equipment to hand out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentGrant {
    /// Item name, used in messages.
    pub name: String,
    /// Opaque host reference; required for the grant to take effect.
    #[serde(default, rename = "uuid", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Quantity override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// A narrative ability recorded as text only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialAbility {
    /// Ability name.
    pub name: String,
    /// Rules text.
    #[serde(default)]
    pub description: String,
}

/// A choice the player makes when acquiring an origin path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantChoice {
    /// Label shown to the player; also the key into `selected_choices`.
    pub label: String,
    /// How many options must be picked.
    #[serde(default = "one")]
    pub count: usize,
    /// Options to pick from.
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

fn one() -> usize {
    1
}

/// One selectable option of a choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Label shown to the player.
    pub label: String,
    /// Stable value recorded in `selected_choices`.
    pub value: String,
    /// What picking this option grants.
    #[serde(default)]
    pub grants: Grants,
}

impl GrantChoice {
    /// Find an option by its recorded value.
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_host_shape() {
        let json = r#"{
            "skills": [{"name": "Common Lore", "specialization": "Imperium", "level": "plus10"}],
            "talents": [{"name": "Air of Authority", "uuid": "Compendium.talents.abc"}],
            "woundsFormula": "2xTB+1d5",
            "choices": [{
                "label": "Pick one",
                "options": [{"label": "Tough", "value": "tough", "grants": {"characteristics": {"toughness": 5}}}]
            }]
        }"#;
        let grants: Grants = serde_json::from_str(json).unwrap();
        assert_eq!(grants.skills[0].level, Some(SkillLevel::Plus10));
        assert_eq!(
            grants.talents[0].reference.as_deref(),
            Some("Compendium.talents.abc")
        );
        assert_eq!(grants.wounds_formula.as_deref(), Some("2xTB+1d5"));
        let choice = &grants.choices[0];
        assert_eq!(choice.count, 1);
        assert_eq!(
            choice.option("tough").unwrap().grants.characteristics[&CharacteristicKey::Toughness],
            5
        );
        assert!(choice.option("missing").is_none());
    }

    #[test]
    fn empty_block() {
        assert!(Grants::default().is_empty());
        let g = Grants {
            aptitudes: vec!["Fieldcraft".to_string()],
            ..Grants::default()
        };
        assert!(!g.is_empty());
    }
}
