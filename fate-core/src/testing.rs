//! Testing utilities.
//!
//! This module provides tools for deterministic tests:
//! - `SequenceRng` feeds scripted values to the dice engine so tests can
//!   assert exact totals without statistical sampling
//! - `TestHarness` for scripted table scenarios
//! - Assertion helpers for verifying session state

use crate::character::{create_sample_character, Character};
use crate::dice::{ActionType, DiceResult, RollType};
use crate::ladder::OutcomeResult;
use crate::session::{SessionConfig, TableSession};
use rand::RngCore;

/// An RNG that replays a scripted sequence of values, cycling when
/// exhausted.
///
/// The dice engine draws one `next_u32` per fate die (face = value % 3:
/// 0 plus, 1 minus, 2 blank) and one per d6 (value % 6 + 1), so a script
/// maps directly onto the dice of a roll.
#[derive(Debug, Clone)]
pub struct SequenceRng {
    values: Vec<u64>,
    index: usize,
}

impl SequenceRng {
    pub fn new(values: impl Into<Vec<u64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceRng needs at least one value");
        Self { values, index: 0 }
    }

    /// Append more values to the script.
    pub fn extend(&mut self, values: impl IntoIterator<Item = u64>) {
        self.values.extend(values);
    }
}

impl RngCore for SequenceRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Test harness for running table scenarios with scripted dice.
pub struct TestHarness {
    pub session: TableSession,
    rng: SequenceRng,
}

impl TestHarness {
    /// Create a harness with a sample character already seated.
    pub fn new() -> Self {
        Self::with_character(create_sample_character("Helena"))
    }

    /// Create a harness seating a custom character.
    pub fn with_character(character: Character) -> Self {
        let mut session = TableSession::new(SessionConfig::new("Mesa de Teste"));
        session.add_character(character);
        Self {
            session,
            // Blanks until a script is queued.
            rng: SequenceRng::new([2]),
        }
    }

    /// Replace the dice script for upcoming rolls.
    pub fn script_dice(&mut self, values: impl IntoIterator<Item = u64>) -> &mut Self {
        self.rng = SequenceRng::new(values.into_iter().collect::<Vec<_>>());
        self
    }

    /// Set the GM opposition.
    pub fn set_opposition(&mut self, opposition: Option<i32>) -> &mut Self {
        self.session.set_opposition(opposition);
        self
    }

    /// Roll for the first seated character with the scripted dice.
    pub fn roll(
        &mut self,
        skill: Option<&str>,
        action: Option<ActionType>,
        roll_type: RollType,
    ) -> (DiceResult, Option<OutcomeResult>) {
        let actor = self.session.characters[0].name.clone();
        self.session
            .roll_for_with_rng(&actor, skill, action, roll_type, &mut self.rng)
            .expect("harness character is always seated")
    }

    /// Name of the first seated character.
    pub fn actor(&self) -> &str {
        &self.session.characters[0].name
    }

    /// The last log line, if any.
    pub fn last_log(&self) -> Option<&str> {
        self.session.log.last().map(|e| e.content.as_str())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that the last log line contains a fragment.
#[track_caller]
pub fn assert_last_log_contains(harness: &TestHarness, fragment: &str) {
    let last = harness.last_log().unwrap_or("");
    assert!(
        last.contains(fragment),
        "Expected last log line to contain '{fragment}', got '{last}'"
    );
}

/// Assert a character's stress track lengths.
#[track_caller]
pub fn assert_track_sizes(character: &Character, physical: usize, mental: usize) {
    assert_eq!(
        (character.stress.physical.len(), character.stress.mental.len()),
        (physical, mental),
        "Expected tracks {physical}/{mental}, got {}/{}",
        character.stress.physical.len(),
        character.stress.mental.len()
    );
}
