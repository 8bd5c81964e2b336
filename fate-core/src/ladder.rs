//! The Fate ladder and outcome classification.
//!
//! Translates raw roll totals into the game's qualitative adjectives and
//! classifies a (total, opposition) pair into a four-tier outcome with a
//! shift count. Everything here is a pure function over immutable
//! reference tables.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest rung with its own label; values below clamp to it.
pub const LADDER_MIN: i32 = -2;
/// Highest rung with its own label; values above clamp to it.
pub const LADDER_MAX: i32 = 9;

lazy_static! {
    /// The ladder, worst to best. Index `i` holds value `LADDER_MIN + i`.
    pub static ref LADDER: Vec<(i32, &'static str)> = vec![
        (-2, "Terrível"),
        (-1, "Ruim"),
        (0, "Medíocre"),
        (1, "Regular"),
        (2, "Razoável"),
        (3, "Bom"),
        (4, "Ótimo"),
        (5, "Excepcional"),
        (6, "Fantástico"),
        (7, "Épico"),
        (8, "Lendário"),
        (9, "Divino"),
    ];

    /// GM-facing opposition presets for uncontested difficulty setting.
    pub static ref OPPOSITION_PRESETS: Vec<(&'static str, i32)> = vec![
        ("Medíocre", 0),
        ("Regular", 1),
        ("Razoável", 2),
        ("Bom", 3),
        ("Ótimo", 4),
        ("Excepcional", 5),
    ];
}

/// Ladder adjective for a total.
///
/// Total over all integers: values outside −2..=9 clamp to the end
/// labels, the ladder has no bound on the numeric side.
pub fn ladder_label(value: i32) -> &'static str {
    let clamped = value.clamp(LADDER_MIN, LADDER_MAX);
    LADDER[(clamped - LADDER_MIN) as usize].1
}

/// Outcome tier of an opposed roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Failure,
    Tie,
    Success,
    /// Success with 3 or more shifts.
    Style,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Failure => "Falha",
            Outcome::Tie => "Empate",
            Outcome::Success => "Sucesso",
            Outcome::Style => "Sucesso com Estilo",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::Style)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An outcome with its signed shift count (total − opposition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResult {
    pub outcome: Outcome,
    pub shifts: i32,
}

impl fmt::Display for OutcomeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shifts.abs() {
            1 => write!(f, "{} (1 tensão)", self.outcome),
            n => write!(f, "{} ({n} tensões)", self.outcome),
        }
    }
}

/// Classify a roll total against an optional opposition.
///
/// `None` opposition means no comparison was requested (a free roll) and
/// yields `None`. The guards are ordered: failure and tie short-circuit
/// before the success tiers, and style refines success at 3+ shifts.
pub fn calculate_outcome(total: i32, opposition: Option<i32>) -> Option<OutcomeResult> {
    let opposition = opposition?;
    let shifts = total - opposition;

    let outcome = match shifts {
        s if s < 0 => Outcome::Failure,
        0 => Outcome::Tie,
        s if s >= 3 => Outcome::Style,
        _ => Outcome::Success,
    };

    Some(OutcomeResult { outcome, shifts })
}
