//! Fate dice rolling.
//!
//! Rolls the standard 4dF pool (or 3dF plus a d6 for advantage rolls),
//! applies a skill modifier, and assembles an immutable [`DiceResult`]
//! that the table log embeds as-is.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A single Fate die face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FateDie {
    Plus,
    Minus,
    Blank,
}

impl FateDie {
    /// Signed contribution of this face: +1, −1 or 0.
    pub fn value(&self) -> i32 {
        match self {
            FateDie::Plus => 1,
            FateDie::Minus => -1,
            FateDie::Blank => 0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FateDie::Plus => "+",
            FateDie::Minus => "-",
            FateDie::Blank => "0",
        }
    }

    /// Draw one face uniformly (1/3 each).
    fn sample<R: Rng>(rng: &mut R) -> FateDie {
        // Modulo keeps the face mapping stable under scripted test RNGs.
        match rng.next_u32() % 3 {
            0 => FateDie::Plus,
            1 => FateDie::Minus,
            _ => FateDie::Blank,
        }
    }
}

impl fmt::Display for FateDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How the dice pool is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RollType {
    /// The standard 4dF roll.
    #[default]
    Normal,
    /// 3dF plus a d6 that contributes `ceil(d6 / 2)`.
    Advantage,
}

impl RollType {
    pub fn fate_die_count(&self) -> usize {
        match self {
            RollType::Normal => 4,
            RollType::Advantage => 3,
        }
    }
}

/// The four Fate action categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Overcome,
    CreateAdvantage,
    Attack,
    Defend,
}

impl ActionType {
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::Overcome => "Superar",
            ActionType::CreateAdvantage => "Criar Vantagem",
            ActionType::Attack => "Atacar",
            ActionType::Defend => "Defender",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Complete, immutable result of one roll invocation.
///
/// Created by [`roll_dice`], owned thereafter by whichever log record
/// embeds it. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceResult {
    pub id: Uuid,
    /// 4 dice for a normal roll, 3 for an advantage roll.
    pub dice: Vec<FateDie>,
    /// Six-sided die, present only on advantage rolls.
    pub d6: Option<u8>,
    /// Skill bonus applied after the dice, may be negative.
    pub modifier: i32,
    pub total: i32,
    pub actor: String,
    pub skill: Option<String>,
    pub action: Option<ActionType>,
    pub roll_type: RollType,
    /// Unix timestamp (seconds) when the roll was made.
    pub rolled_at: u64,
}

impl DiceResult {
    /// Signed sum of the fate dice alone.
    pub fn fate_sum(&self) -> i32 {
        self.dice.iter().map(FateDie::value).sum()
    }

    /// Contribution of the d6: `ceil(d6 / 2)`, range 1..=3. Zero when absent.
    pub fn d6_contribution(&self) -> i32 {
        self.d6.map(|d| ((d + 1) / 2) as i32).unwrap_or(0)
    }

    /// Format the dice pool for display, e.g. `[+, -, 0, +]` or
    /// `[+, 0, -] d6: 4 (+2)`.
    pub fn dice_display(&self) -> String {
        let faces = self
            .dice
            .iter()
            .map(|d| d.symbol().to_string())
            .collect::<Vec<_>>()
            .join(", ");

        match self.d6 {
            Some(d6) => format!("[{faces}] d6: {d6} (+{})", self.d6_contribution()),
            None => format!("[{faces}]"),
        }
    }
}

impl fmt::Display for DiceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dice_display())?;
        if self.modifier > 0 {
            write!(f, " + {}", self.modifier)?;
        } else if self.modifier < 0 {
            write!(f, " - {}", self.modifier.abs())?;
        }
        write!(f, " = {}", self.total)
    }
}

/// Roll the dice with the thread-local RNG.
///
/// `modifier` is normally the actor's rating in `skill`; the caller
/// derives it from the character sheet. Logging and persistence are the
/// caller's follow-up steps, not side effects of this function.
pub fn roll_dice(
    actor: impl Into<String>,
    skill: Option<&str>,
    action: Option<ActionType>,
    modifier: i32,
    roll_type: RollType,
) -> DiceResult {
    roll_dice_with_rng(actor, skill, action, modifier, roll_type, &mut rand::thread_rng())
}

/// Roll with a specific RNG (useful for testing).
pub fn roll_dice_with_rng<R: Rng>(
    actor: impl Into<String>,
    skill: Option<&str>,
    action: Option<ActionType>,
    modifier: i32,
    roll_type: RollType,
    rng: &mut R,
) -> DiceResult {
    let dice: Vec<FateDie> = (0..roll_type.fate_die_count())
        .map(|_| FateDie::sample(rng))
        .collect();

    let d6 = match roll_type {
        RollType::Advantage => Some((rng.next_u32() % 6 + 1) as u8),
        RollType::Normal => None,
    };

    let fate_sum: i32 = dice.iter().map(FateDie::value).sum();
    let d6_part = d6.map(|d| ((d + 1) / 2) as i32).unwrap_or(0);
    let total = fate_sum + d6_part + modifier;

    DiceResult {
        id: Uuid::new_v4(),
        dice,
        d6,
        modifier,
        total,
        actor: actor.into(),
        skill: skill.map(str::to_string),
        action,
        roll_type,
        rolled_at: unix_now(),
    }
}

/// Current unix timestamp in seconds.
pub(crate) fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SequenceRng;

    #[test]
    fn test_face_values() {
        assert_eq!(FateDie::Plus.value(), 1);
        assert_eq!(FateDie::Minus.value(), -1);
        assert_eq!(FateDie::Blank.value(), 0);
    }

    #[test]
    fn test_normal_roll_shape() {
        for _ in 0..100 {
            let result = roll_dice("Helena", Some("Lutar"), Some(ActionType::Attack), 2, RollType::Normal);
            assert_eq!(result.dice.len(), 4);
            assert_eq!(result.d6, None);
            assert_eq!(result.total, result.fate_sum() + 2);
        }
    }

    #[test]
    fn test_advantage_roll_shape() {
        for _ in 0..100 {
            let result = roll_dice("Helena", None, None, 0, RollType::Advantage);
            assert_eq!(result.dice.len(), 3);
            let d6 = result.d6.expect("advantage roll must carry a d6");
            assert!((1..=6).contains(&d6));
            assert_eq!(result.total, result.fate_sum() + result.d6_contribution());
        }
    }

    #[test]
    fn test_total_range_normal() {
        for _ in 0..200 {
            let result = roll_dice("Helena", None, None, 0, RollType::Normal);
            assert!((-4..=4).contains(&result.total));
        }
    }

    #[test]
    fn test_scripted_normal_roll() {
        // Faces map 0→plus, 1→minus, 2→blank.
        let mut rng = SequenceRng::new([0, 0, 1, 2]);
        let result = roll_dice_with_rng("Helena", Some("Lutar"), None, 3, RollType::Normal, &mut rng);
        assert_eq!(
            result.dice,
            vec![FateDie::Plus, FateDie::Plus, FateDie::Minus, FateDie::Blank]
        );
        assert_eq!(result.fate_sum(), 1);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn test_scripted_advantage_roll() {
        // Three faces, then the d6 raw value (0..6 maps to 1..=6).
        let mut rng = SequenceRng::new([0, 0, 0, 4]);
        let result = roll_dice_with_rng("Helena", None, None, 1, RollType::Advantage, &mut rng);
        assert_eq!(result.dice, vec![FateDie::Plus; 3]);
        assert_eq!(result.d6, Some(5));
        // ceil(5 / 2) = 3
        assert_eq!(result.d6_contribution(), 3);
        assert_eq!(result.total, 3 + 3 + 1);
    }

    #[test]
    fn test_d6_contribution_ceiling() {
        let expected = [(1, 1), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3)];
        for (d6, contribution) in expected {
            let mut rng = SequenceRng::new([2, 2, 2, d6 - 1]);
            let result = roll_dice_with_rng("Helena", None, None, 0, RollType::Advantage, &mut rng);
            assert_eq!(result.d6, Some(d6 as u8));
            assert_eq!(result.d6_contribution(), contribution as i32);
            assert_eq!(result.total, contribution as i32);
        }
    }

    #[test]
    fn test_face_frequencies_roughly_uniform() {
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            let result = roll_dice("Helena", None, None, 0, RollType::Normal);
            for die in &result.dice {
                match die {
                    FateDie::Plus => counts[0] += 1,
                    FateDie::Minus => counts[1] += 1,
                    FateDie::Blank => counts[2] += 1,
                }
            }
        }
        // 12000 dice, expected ~4000 per face. Loose bounds to avoid flakes.
        for count in counts {
            assert!(
                (3400..=4600).contains(&count),
                "face frequency out of expected band: {counts:?}"
            );
        }
    }

    #[test]
    fn test_display_formats() {
        let mut rng = SequenceRng::new([0, 1, 2, 0]);
        let result = roll_dice_with_rng("Helena", None, None, 2, RollType::Normal, &mut rng);
        assert_eq!(result.dice_display(), "[+, -, 0, +]");
        assert_eq!(result.to_string(), "[+, -, 0, +] + 2 = 3");

        let mut rng = SequenceRng::new([0, 1, 2, 3]);
        let negative = roll_dice_with_rng("Helena", None, None, -1, RollType::Advantage, &mut rng);
        assert_eq!(negative.dice_display(), "[+, -, 0] d6: 4 (+2)");
        assert_eq!(negative.to_string(), "[+, -, 0] d6: 4 (+2) - 1 = 1");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut rng = SequenceRng::new([0, 1, 2, 3]);
        let result = roll_dice_with_rng(
            "Helena",
            Some("Atletismo"),
            Some(ActionType::Overcome),
            1,
            RollType::Advantage,
            &mut rng,
        );
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"overcome\""));
        assert!(json.contains("\"advantage\""));
        let back: DiceResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total, result.total);
        assert_eq!(back.dice, result.dice);
        assert_eq!(back.id, result.id);
    }
}
