//! Characteristics and their derived bonuses.
//!
//! Every actor has nine combat/mental/social characteristics plus Influence.
//! Each characteristic is stored as a base value and an accumulated advance;
//! its bonus is the tens digit of the total and is what dice formulas
//! reference through tokens such as `TB` or `WSB`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RtError, RtResult};

/// The characteristics an actor can be tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacteristicKey {
    /// Weapon Skill (WS).
    WeaponSkill,
    /// Ballistic Skill (BS).
    BallisticSkill,
    /// Strength (S).
    Strength,
    /// Toughness (T).
    Toughness,
    /// Agility (Ag).
    Agility,
    /// Intelligence (Int).
    Intelligence,
    /// Perception (Per).
    Perception,
    /// Willpower (WP).
    Willpower,
    /// Fellowship (Fel).
    Fellowship,
    /// Influence (Infl), the social standing characteristic.
    Influence,
}

impl CharacteristicKey {
    /// All characteristics in sheet order.
    pub const ALL: [CharacteristicKey; 10] = [
        Self::WeaponSkill,
        Self::BallisticSkill,
        Self::Strength,
        Self::Toughness,
        Self::Agility,
        Self::Intelligence,
        Self::Perception,
        Self::Willpower,
        Self::Fellowship,
        Self::Influence,
    ];

    /// The short label printed on character sheets.
    pub fn short_name(self) -> &'static str {
        match self {
            Self::WeaponSkill => "WS",
            Self::BallisticSkill => "BS",
            Self::Strength => "S",
            Self::Toughness => "T",
            Self::Agility => "Ag",
            Self::Intelligence => "Int",
            Self::Perception => "Per",
            Self::Willpower => "WP",
            Self::Fellowship => "Fel",
            Self::Influence => "Infl",
        }
    }

    /// The key used in document field paths (`characteristics.<key>`).
    pub fn field_key(self) -> &'static str {
        match self {
            Self::WeaponSkill => "weaponSkill",
            Self::BallisticSkill => "ballisticSkill",
            Self::Strength => "strength",
            Self::Toughness => "toughness",
            Self::Agility => "agility",
            Self::Intelligence => "intelligence",
            Self::Perception => "perception",
            Self::Willpower => "willpower",
            Self::Fellowship => "fellowship",
            Self::Influence => "influence",
        }
    }

    /// The bonus token used in formulas, e.g. `TB` for Toughness.
    pub fn bonus_token(self) -> &'static str {
        match self {
            Self::WeaponSkill => "WSB",
            Self::BallisticSkill => "BSB",
            Self::Strength => "SB",
            Self::Toughness => "TB",
            Self::Agility => "AB",
            Self::Intelligence => "IB",
            Self::Perception => "PB",
            Self::Willpower => "WB",
            Self::Fellowship => "FB",
            Self::Influence => "InfB",
        }
    }

    /// Map a formula bonus token (`TB`, `WSB`, `InfB`, ...) to its characteristic.
    ///
    /// Tokens are matched exactly; `tb` is not a bonus token.
    pub fn from_bonus_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.bonus_token() == token)
    }

    /// Parse a short name, field key, or full name, ignoring case.
    pub fn parse(s: &str) -> RtResult<Self> {
        let needle = s.trim().to_lowercase().replace([' ', '_', '-'], "");
        Self::ALL
            .into_iter()
            .find(|k| {
                k.short_name().to_lowercase() == needle || k.field_key().to_lowercase() == needle
            })
            .ok_or_else(|| RtError::UnknownCharacteristic(s.to_string()))
    }
}

impl fmt::Display for CharacteristicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// A single characteristic score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristic {
    /// The rolled or assigned starting value.
    #[serde(default)]
    pub base: i32,
    /// Sum of purchased advances and granted modifiers.
    #[serde(default)]
    pub advance: i32,
}

impl Characteristic {
    /// Create a characteristic with no advances.
    pub fn new(base: i32) -> Self {
        Self { base, advance: 0 }
    }

    /// The effective score.
    pub fn total(&self) -> i32 {
        self.base.saturating_add(self.advance)
    }

    /// The characteristic bonus: the total divided by ten, rounded down.
    pub fn bonus(&self) -> i32 {
        self.total().div_euclid(10)
    }
}

/// The full characteristic block of an actor.
pub type Characteristics = BTreeMap<CharacteristicKey, Characteristic>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonus_is_floored_tens() {
        assert_eq!(Characteristic::new(34).bonus(), 3);
        assert_eq!(Characteristic::new(40).bonus(), 4);
        assert_eq!(Characteristic::new(9).bonus(), 0);
        let c = Characteristic {
            base: 38,
            advance: 5,
        };
        assert_eq!(c.total(), 43);
        assert_eq!(c.bonus(), 4);
    }

    #[test]
    fn negative_total_floors_down() {
        let c = Characteristic {
            base: 2,
            advance: -5,
        };
        assert_eq!(c.bonus(), -1);
    }

    #[test]
    fn bonus_tokens_round_trip() {
        for key in CharacteristicKey::ALL {
            assert_eq!(CharacteristicKey::from_bonus_token(key.bonus_token()), Some(key));
        }
        assert_eq!(
            CharacteristicKey::from_bonus_token("InfB"),
            Some(CharacteristicKey::Influence)
        );
        assert_eq!(CharacteristicKey::from_bonus_token("tb"), None);
        assert_eq!(CharacteristicKey::from_bonus_token("XB"), None);
    }

    #[test]
    fn parse_accepts_short_and_field_names() {
        assert_eq!(
            CharacteristicKey::parse("ws").unwrap(),
            CharacteristicKey::WeaponSkill
        );
        assert_eq!(
            CharacteristicKey::parse("Toughness").unwrap(),
            CharacteristicKey::Toughness
        );
        assert_eq!(
            CharacteristicKey::parse("weapon_skill").unwrap(),
            CharacteristicKey::WeaponSkill
        );
        assert!(CharacteristicKey::parse("luck").is_err());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&CharacteristicKey::BallisticSkill).unwrap();
        assert_eq!(json, "\"ballisticSkill\"");
    }
}
