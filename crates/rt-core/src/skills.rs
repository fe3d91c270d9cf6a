//! The static skill table and skill training levels.
//!
//! Grant data refers to skills by display name ("Common Lore", "Tech-Use"),
//! while actors store them under internal keys (`commonLore`, `techUse`).
//! The table below is the single source of truth for that mapping and for
//! each skill's governing characteristic, class, and whether it requires a
//! named specialization.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::characteristic::CharacteristicKey;

/// Whether a skill may be attempted untrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillClass {
    /// Usable untrained at half the characteristic.
    Basic,
    /// Unusable unless trained.
    Advanced,
}

impl fmt::Display for SkillClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Static metadata for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    /// Internal key used in actor data.
    pub key: &'static str,
    /// Display name used in grant data.
    pub name: &'static str,
    /// The characteristic tested.
    pub characteristic: CharacteristicKey,
    /// Basic or advanced.
    pub class: SkillClass,
    /// True when the skill only exists as named specializations.
    pub specialist: bool,
}

const fn skill(
    key: &'static str,
    name: &'static str,
    characteristic: CharacteristicKey,
    class: SkillClass,
    specialist: bool,
) -> SkillDef {
    SkillDef {
        key,
        name,
        characteristic,
        class,
        specialist,
    }
}

use CharacteristicKey::{
    Agility as AG, Fellowship as FEL, Intelligence as INT, Perception as PER, Strength as STR,
    Toughness as TGH, WeaponSkill as WS, Willpower as WP,
};
use SkillClass::{Advanced as ADV, Basic as BAS};

/// Every core skill, in alphabetical order.
pub const SKILLS: [SkillDef; 51] = [
    skill("acrobatics", "Acrobatics", AG, ADV, false),
    skill("awareness", "Awareness", PER, BAS, false),
    skill("barter", "Barter", FEL, BAS, false),
    skill("blather", "Blather", FEL, ADV, false),
    skill("carouse", "Carouse", TGH, BAS, false),
    skill("charm", "Charm", FEL, BAS, false),
    skill("chemUse", "Chem-Use", INT, ADV, false),
    skill("ciphers", "Ciphers", INT, ADV, true),
    skill("climb", "Climb", STR, BAS, false),
    skill("command", "Command", FEL, BAS, false),
    skill("commerce", "Commerce", FEL, ADV, false),
    skill("commonLore", "Common Lore", INT, ADV, true),
    skill("concealment", "Concealment", AG, BAS, false),
    skill("contortionist", "Contortionist", AG, BAS, false),
    skill("deceive", "Deceive", FEL, BAS, false),
    skill("demolition", "Demolition", INT, ADV, false),
    skill("disguise", "Disguise", FEL, BAS, false),
    skill("dodge", "Dodge", AG, BAS, false),
    skill("drive", "Drive", AG, ADV, true),
    skill("evaluate", "Evaluate", INT, BAS, false),
    skill("forbiddenLore", "Forbidden Lore", INT, ADV, true),
    skill("gamble", "Gamble", INT, BAS, false),
    skill("inquiry", "Inquiry", FEL, BAS, false),
    skill("interrogation", "Interrogation", WP, ADV, false),
    skill("intimidate", "Intimidate", STR, BAS, false),
    skill("invocation", "Invocation", WP, ADV, false),
    skill("linguistics", "Linguistics", INT, ADV, true),
    skill("lipReading", "Lip Reading", PER, ADV, false),
    skill("literacy", "Literacy", INT, BAS, false),
    skill("logic", "Logic", INT, BAS, false),
    skill("medicae", "Medicae", INT, ADV, false),
    skill("navigation", "Navigation", INT, ADV, true),
    skill("parry", "Parry", WS, BAS, false),
    skill("perform", "Perform", FEL, ADV, true),
    skill("pilot", "Pilot", AG, ADV, true),
    skill("psyniscience", "Psyniscience", PER, ADV, false),
    skill("scholasticLore", "Scholastic Lore", INT, ADV, true),
    skill("scrutiny", "Scrutiny", PER, BAS, false),
    skill("search", "Search", PER, BAS, false),
    skill("secretTongue", "Secret Tongue", INT, ADV, true),
    skill("security", "Security", AG, ADV, false),
    skill("shadowing", "Shadowing", AG, ADV, false),
    skill("silentMove", "Silent Move", AG, BAS, false),
    skill("sleightOfHand", "Sleight of Hand", AG, ADV, false),
    skill("speakLanguage", "Speak Language", INT, BAS, true),
    skill("survival", "Survival", INT, ADV, false),
    skill("swim", "Swim", STR, BAS, false),
    skill("techUse", "Tech-Use", INT, ADV, false),
    skill("tracking", "Tracking", INT, ADV, false),
    skill("trade", "Trade", INT, ADV, true),
    skill("wrangling", "Wrangling", INT, ADV, false),
];

/// Alternate spellings found in older content, mapped to internal keys.
pub const SKILL_ALIASES: [(&str, &str); 3] = [
    ("Navigate", "navigation"),
    ("Tech Use", "techUse"),
    ("Chem Use", "chemUse"),
];

/// Look up a skill's internal key from its display name or an alias.
pub fn skill_key_for_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SKILLS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .map(|s| s.key)
        .or_else(|| {
            SKILL_ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .map(|(_, key)| *key)
        })
}

/// Look up a skill's metadata by internal key.
pub fn skill_def(key: &str) -> Option<&'static SkillDef> {
    SKILLS.iter().find(|s| s.key == key)
}

/// Best-effort internal key for a name that is not in the table.
///
/// Words are split on anything that is not alphanumeric and joined in
/// camelCase: `"Void Tactics"` becomes `voidTactics`.
pub fn slugify_skill_name(name: &str) -> String {
    let mut out = String::new();
    for (i, word) in name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.extend(chars.flat_map(char::to_lowercase));
        }
    }
    out
}

/// A level of skill training. Each level implies the ones below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillLevel {
    /// Trained: tested at the full characteristic.
    Trained,
    /// Trained with a +10 bonus.
    Plus10,
    /// Trained with a +20 bonus.
    Plus20,
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trained => write!(f, "trained"),
            Self::Plus10 => write!(f, "+10"),
            Self::Plus20 => write!(f, "+20"),
        }
    }
}

/// Training flags as stored on skill items and actor skill entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillTraining {
    /// Trained.
    #[serde(default)]
    pub trained: bool,
    /// +10.
    #[serde(default)]
    pub plus10: bool,
    /// +20.
    #[serde(default)]
    pub plus20: bool,
}

impl SkillTraining {
    /// Flags for a level, with every lower level set as well.
    pub fn for_level(level: SkillLevel) -> Self {
        Self {
            trained: true,
            plus10: level >= SkillLevel::Plus10,
            plus20: level >= SkillLevel::Plus20,
        }
    }

    /// Flags set in either operand. Never clears a flag.
    pub fn union(self, other: Self) -> Self {
        Self {
            trained: self.trained || other.trained,
            plus10: self.plus10 || other.plus10,
            plus20: self.plus20 || other.plus20,
        }
    }

    /// The highest level held, if any.
    pub fn level(self) -> Option<SkillLevel> {
        if self.plus20 {
            Some(SkillLevel::Plus20)
        } else if self.plus10 {
            Some(SkillLevel::Plus10)
        } else if self.trained {
            Some(SkillLevel::Trained)
        } else {
            None
        }
    }

    /// True when no flag is set.
    pub fn is_untrained(self) -> bool {
        self.level().is_none()
    }

    /// The bonus added to the characteristic when testing this skill.
    pub fn test_bonus(self) -> i32 {
        match self.level() {
            Some(SkillLevel::Plus20) => 20,
            Some(SkillLevel::Plus10) => 10,
            _ => 0,
        }
    }

    /// Named flags set here but not in `existing`, in field order.
    pub fn flags_missing_from(self, existing: Self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.trained && !existing.trained {
            out.push("trained");
        }
        if self.plus10 && !existing.plus10 {
            out.push("plus10");
        }
        if self.plus20 && !existing.plus20 {
            out.push("plus20");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_keys_and_names_are_unique() {
        for (i, a) in SKILLS.iter().enumerate() {
            for b in &SKILLS[i + 1..] {
                assert_ne!(a.key, b.key);
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn aliases_point_at_real_skills() {
        for (alias, key) in SKILL_ALIASES {
            assert!(skill_def(key).is_some(), "alias {alias} -> {key}");
            assert_eq!(skill_key_for_name(alias), Some(key));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(skill_key_for_name("common lore"), Some("commonLore"));
        assert_eq!(skill_key_for_name(" Tech-Use "), Some("techUse"));
        assert_eq!(skill_key_for_name("Void Tactics"), None);
    }

    #[test]
    fn specialist_metadata() {
        let lore = skill_def("commonLore").unwrap();
        assert!(lore.specialist);
        assert_eq!(lore.class, SkillClass::Advanced);
        assert_eq!(lore.characteristic, CharacteristicKey::Intelligence);
        assert!(!skill_def("awareness").unwrap().specialist);
    }

    #[test]
    fn slugify_unknown_names() {
        assert_eq!(slugify_skill_name("Void Tactics"), "voidTactics");
        assert_eq!(slugify_skill_name("hyper-space LORE"), "hyperSpaceLore");
        assert_eq!(slugify_skill_name(""), "");
    }

    #[test]
    fn for_level_implies_lower_levels() {
        let t = SkillTraining::for_level(SkillLevel::Plus20);
        assert!(t.trained && t.plus10 && t.plus20);
        let t = SkillTraining::for_level(SkillLevel::Trained);
        assert!(t.trained && !t.plus10 && !t.plus20);
    }

    #[test]
    fn union_never_downgrades() {
        let levels = [SkillLevel::Trained, SkillLevel::Plus10, SkillLevel::Plus20];
        for existing in levels {
            for granted in levels.iter().copied().filter(|l| *l <= existing) {
                let merged =
                    SkillTraining::for_level(existing).union(SkillTraining::for_level(granted));
                assert_eq!(merged.level(), Some(existing));
            }
        }
    }

    #[test]
    fn missing_flags() {
        let have = SkillTraining::for_level(SkillLevel::Trained);
        let want = SkillTraining::for_level(SkillLevel::Plus20);
        assert_eq!(want.flags_missing_from(have), vec!["plus10", "plus20"]);
        assert!(have.flags_missing_from(want).is_empty());
    }

    #[test]
    fn test_bonus() {
        assert_eq!(SkillTraining::default().test_bonus(), 0);
        assert_eq!(SkillTraining::for_level(SkillLevel::Plus10).test_bonus(), 10);
    }
}
