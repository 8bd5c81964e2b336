//! TableSession - the shared-table state the dice engine feeds.
//!
//! Holds the characters at the table, the GM's current opposition, and
//! the roll/chat log. Computing a roll and recording it are two separate
//! steps here on purpose: the engine stays pure and the log append is
//! the externally-synchronized part when a replicated store is involved.

use crate::character::{Character, StressOptions, TrackKind};
use crate::dice::{self, ActionType, DiceResult, RollType};
use crate::ladder::{calculate_outcome, ladder_label, OutcomeResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from table operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No character named '{0}' at this table")]
    UnknownCharacter(String),

    #[error("Stress box {index} out of range for a track of {len} boxes")]
    StressBoxOutOfRange { index: usize, len: usize },
}

/// What a log entry records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntryType {
    /// A dice roll with its full result and any outcome against the
    /// opposition in effect when it was made.
    Roll {
        result: DiceResult,
        outcome: Option<OutcomeResult>,
    },
    /// A chat line from a named participant.
    Chat { author: String },
    /// Table bookkeeping (opposition changes, arrivals).
    System,
    /// Anonymous safety signal. Carries no actor on purpose.
    XCard,
}

/// Entry in the table log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Rendered line as shown in the chat panel.
    pub content: String,
    pub entry_type: LogEntryType,
    /// Unix timestamp (seconds).
    pub at: u64,
}

/// Configuration for opening a new table.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub table_name: String,
    /// Mental-stress skill names, for tables with renamed skills.
    pub stress_options: StressOptions,
}

impl SessionConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            stress_options: StressOptions::default(),
        }
    }

    pub fn with_mental_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stress_options = StressOptions::with_mental_aliases(aliases);
        self
    }
}

/// A running table session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSession {
    pub session_id: Uuid,
    pub table_name: String,

    pub characters: Vec<Character>,

    /// Opposition the GM set for the next rolls; `None` means free rolls.
    pub opposition: Option<i32>,

    pub log: Vec<LogEntry>,

    stress_options: StressOptions,
}

impl TableSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            table_name: config.table_name,
            characters: Vec::new(),
            opposition: None,
            log: Vec::new(),
            stress_options: config.stress_options,
        }
    }

    /// Seat a character at the table, sizing their stress tracks for the
    /// table's skill aliases.
    pub fn add_character(&mut self, mut character: Character) {
        character.resize_stress(&self.stress_options);
        self.add_log(
            format!("{} entrou na mesa", character.name),
            LogEntryType::System,
        );
        self.characters.push(character);
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name == name)
    }

    /// Set (or clear) the opposition for upcoming rolls.
    pub fn set_opposition(&mut self, opposition: Option<i32>) {
        self.opposition = opposition;
        let content = match opposition {
            Some(value) => format!("Oposição definida: {} (+{value})", ladder_label(value)),
            None => "Oposição removida".to_string(),
        };
        self.add_log(content, LogEntryType::System);
    }

    /// Roll for a seated character and record the result in the log.
    ///
    /// The modifier is the character's rating in `skill` (0 for a free
    /// roll). The outcome is computed against the opposition currently
    /// in effect, if any.
    pub fn roll_for(
        &mut self,
        actor: &str,
        skill: Option<&str>,
        action: Option<ActionType>,
        roll_type: RollType,
    ) -> Result<(DiceResult, Option<OutcomeResult>), SessionError> {
        self.roll_for_with_rng(actor, skill, action, roll_type, &mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_for_with_rng<R: Rng>(
        &mut self,
        actor: &str,
        skill: Option<&str>,
        action: Option<ActionType>,
        roll_type: RollType,
        rng: &mut R,
    ) -> Result<(DiceResult, Option<OutcomeResult>), SessionError> {
        let character = self
            .character(actor)
            .ok_or_else(|| SessionError::UnknownCharacter(actor.to_string()))?;

        let modifier = skill.map(|s| character.skill(s)).unwrap_or(0);
        let result = dice::roll_dice_with_rng(actor, skill, action, modifier, roll_type, rng);
        let outcome = calculate_outcome(result.total, self.opposition);

        self.add_log(
            render_roll_line(&result, outcome.as_ref()),
            LogEntryType::Roll {
                result: result.clone(),
                outcome,
            },
        );

        Ok((result, outcome))
    }

    /// Append a chat line.
    pub fn chat(&mut self, author: impl Into<String>, text: impl Into<String>) {
        let author = author.into();
        let content = format!("{}: {}", author, text.into());
        self.add_log(content, LogEntryType::Chat { author });
    }

    /// Raise the X-Card. The entry is anonymous: no actor is recorded.
    pub fn raise_x_card(&mut self) {
        self.add_log(
            "X-Card acionado. A cena atual será ajustada.".to_string(),
            LogEntryType::XCard,
        );
    }

    /// Change a skill rating and resize the character's stress tracks.
    pub fn update_skill(
        &mut self,
        name: &str,
        skill: impl Into<String>,
        rating: i32,
    ) -> Result<(), SessionError> {
        let options = self.stress_options.clone();
        let character = self
            .character_mut(name)
            .ok_or_else(|| SessionError::UnknownCharacter(name.to_string()))?;
        character.skills.insert(skill.into(), rating);
        character.resize_stress(&options);
        Ok(())
    }

    /// Check or uncheck one stress box. Sizing is never touched here.
    pub fn set_stress_box(
        &mut self,
        name: &str,
        kind: TrackKind,
        index: usize,
        checked: bool,
    ) -> Result<(), SessionError> {
        let character = self
            .character_mut(name)
            .ok_or_else(|| SessionError::UnknownCharacter(name.to_string()))?;
        let track = character.stress.track_mut(kind);
        if index >= track.len() {
            return Err(SessionError::StressBoxOutOfRange {
                index,
                len: track.len(),
            });
        }
        track[index] = checked;
        Ok(())
    }

    pub fn add_log(&mut self, content: String, entry_type: LogEntryType) {
        self.log.push(LogEntry {
            content,
            entry_type,
            at: dice::unix_now(),
        });
    }

    /// Most recent entries, newest first.
    pub fn recent_log(&self, count: usize) -> Vec<&LogEntry> {
        self.log.iter().rev().take(count).collect()
    }
}

/// Render the chat-panel line for a roll.
fn render_roll_line(result: &DiceResult, outcome: Option<&OutcomeResult>) -> String {
    let mut line = format!("{} rolou", result.actor);
    if let Some(action) = result.action {
        line.push_str(&format!(" {action}"));
    }
    if let Some(skill) = &result.skill {
        line.push_str(&format!(" ({skill})"));
    }
    line.push_str(&format!(": {result} — {}", ladder_label(result.total)));
    if let Some(outcome) = outcome {
        line.push_str(&format!(" — {outcome}"));
    }
    line
}
