//! Ability scores and the ability-score evaluator
//!
//! The six classic tabletop ability scores. Scores are optional; an absent
//! score is treated as exactly 10 everywhere a concrete value is needed.
//! The modifier formula is `floor((score - 10) / 2)` with floor division
//! toward negative infinity, so a score of 7 yields -2, not -1.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The score assumed when an ability has no recorded value.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

/// Compute the ability modifier for an optional raw score.
///
/// Total over all integers; out-of-convention values (0, 40, ...) compute
/// through the same formula.
///
/// # Example
///
/// ```
/// use folio_domain::ability_modifier;
///
/// assert_eq!(ability_modifier(Some(18)), 4);
/// assert_eq!(ability_modifier(Some(7)), -2);
/// assert_eq!(ability_modifier(None), 0);
/// ```
pub fn ability_modifier(score: Option<i32>) -> i32 {
    // saturating_sub keeps the function total near i32::MIN.
    score
        .unwrap_or(DEFAULT_ABILITY_SCORE)
        .saturating_sub(10)
        .div_euclid(2)
}

/// Render a modifier with the explicit sign convention: `+3`, `+0`, `-2`.
///
/// The leading `+` on non-negative modifiers is part of the display
/// contract, which is why the result is a string and not a number.
pub fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        modifier.to_string()
    }
}

/// One of the six ability scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    /// All six abilities in conventional stat-block order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// The conventional three-letter abbreviation (STR, DEX, ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// An NPC's six ability scores, each optional.
///
/// This is an immutable value object. Use builder-style methods to create
/// modified copies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbilityScores {
    strength: Option<i32>,
    dexterity: Option<i32>,
    constitution: Option<i32>,
    intelligence: Option<i32>,
    wisdom: Option<i32>,
    charisma: Option<i32>,
}

impl AbilityScores {
    /// Create a score block with no recorded values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a copy with the given ability set to the given raw score.
    pub fn with_score(mut self, ability: Ability, score: i32) -> Self {
        *self.slot_mut(ability) = Some(score);
        self
    }

    /// Get the raw recorded score for an ability, if any.
    pub fn score(&self, ability: Ability) -> Option<i32> {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Get the effective score for an ability (absent values read as 10).
    pub fn effective(&self, ability: Ability) -> i32 {
        self.score(ability).unwrap_or(DEFAULT_ABILITY_SCORE)
    }

    /// Get the signed modifier for an ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }

    /// Get the display string for an ability's modifier (`+4`, `-2`).
    pub fn modifier_display(&self, ability: Ability) -> String {
        format_modifier(self.modifier(ability))
    }

    /// Set or clear an ability's raw score in place.
    pub fn set(&mut self, ability: Ability, score: Option<i32>) {
        *self.slot_mut(ability) = score;
    }

    fn slot_mut(&mut self, ability: Ability) -> &mut Option<i32> {
        match ability {
            Ability::Strength => &mut self.strength,
            Ability::Dexterity => &mut self.dexterity,
            Ability::Constitution => &mut self.constitution,
            Ability::Intelligence => &mut self.intelligence,
            Ability::Wisdom => &mut self.wisdom,
            Ability::Charisma => &mut self.charisma,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
