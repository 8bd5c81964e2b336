//! Fate dice resolution engine for a shared virtual tabletop.
//!
//! This crate provides:
//! - The Fate ladder and outcome classification (shifts, success with style)
//! - 4dF and advantage-roll dice rolling with injectable randomness
//! - Stress track sizing derived from character skills
//! - A table session with roll/chat log, GM opposition and safety tools
//! - Table and character sheet persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use fate_core::{ActionType, Character, RollType, SessionConfig, TableSession};
//!
//! let mut session = TableSession::new(SessionConfig::new("Mesa de Sexta"));
//! session.add_character(Character::new("Helena").with_skill("Lutar", 3));
//! session.set_opposition(Some(2));
//!
//! let (result, outcome) = session.roll_for(
//!     "Helena",
//!     Some("Lutar"),
//!     Some(ActionType::Attack),
//!     RollType::Normal,
//! )?;
//! println!("{result}");
//! # Ok::<(), fate_core::SessionError>(())
//! ```

pub mod character;
pub mod dice;
pub mod ladder;
pub mod persist;
pub mod session;
pub mod testing;

// Primary public API
pub use character::{
    calculate_stress_tracks, create_sample_character, stress_track_size, Character, StressOptions,
    StressTracks, TrackKind,
};
pub use dice::{roll_dice, roll_dice_with_rng, ActionType, DiceResult, FateDie, RollType};
pub use ladder::{calculate_outcome, ladder_label, Outcome, OutcomeResult};
pub use persist::{PersistError, SavedCharacter, SavedTable};
pub use session::{LogEntry, LogEntryType, SessionConfig, SessionError, TableSession};
pub use testing::{SequenceRng, TestHarness};
