//! Character sheets and stress track sizing.
//!
//! The sheet itself is plain data kept by the surrounding table; the
//! domain logic here is the sizing rule that derives how many stress
//! boxes each track has from the character's skills, preserving box
//! states across resizes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Skills that feed the physical stress track.
pub const PHYSICAL_STRESS_SKILLS: [&str; 2] = ["Sobrevivência", "Atletismo"];

/// Default skills that feed the mental stress track.
pub const DEFAULT_MENTAL_ALIASES: [&str; 3] = ["Vontade", "Ocultismo", "Acadêmico"];

/// Which stress track a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Physical,
    Mental,
}

/// Checked/unchecked stress boxes per track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StressTracks {
    pub physical: Vec<bool>,
    pub mental: Vec<bool>,
}

impl StressTracks {
    pub fn track(&self, kind: TrackKind) -> &[bool] {
        match kind {
            TrackKind::Physical => &self.physical,
            TrackKind::Mental => &self.mental,
        }
    }

    pub fn track_mut(&mut self, kind: TrackKind) -> &mut Vec<bool> {
        match kind {
            TrackKind::Physical => &mut self.physical,
            TrackKind::Mental => &mut self.mental,
        }
    }
}

/// Options for stress sizing.
///
/// `mental_aliases` exists for skill-renaming migrations: tables that
/// renamed a mental skill pass the current names instead of the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressOptions {
    pub mental_aliases: Vec<String>,
}

impl Default for StressOptions {
    fn default() -> Self {
        Self {
            mental_aliases: DEFAULT_MENTAL_ALIASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl StressOptions {
    pub fn with_mental_aliases<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mental_aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }
}

/// A player character sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub name: String,

    /// High concept, trouble and free aspects, in sheet order.
    pub aspects: Vec<String>,

    /// Skill name → rating on the ladder.
    pub skills: HashMap<String, i32>,

    pub stress: StressTracks,

    pub fate_points: i32,
    pub refresh: i32,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        let mut character = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            aspects: Vec::new(),
            skills: HashMap::new(),
            stress: StressTracks::default(),
            fate_points: 3,
            refresh: 3,
        };
        character.resize_stress(&StressOptions::default());
        character
    }

    pub fn with_aspect(mut self, aspect: impl Into<String>) -> Self {
        self.aspects.push(aspect.into());
        self
    }

    pub fn with_skill(mut self, name: impl Into<String>, rating: i32) -> Self {
        self.skills.insert(name.into(), rating);
        self.resize_stress(&StressOptions::default());
        self
    }

    /// Rating for a skill, 0 when the sheet doesn't have it.
    pub fn skill(&self, name: &str) -> i32 {
        self.skills.get(name).copied().unwrap_or(0)
    }

    /// Recompute both stress tracks from the current skills, in place.
    pub fn resize_stress(&mut self, options: &StressOptions) {
        self.stress = calculate_stress_tracks(self, options);
    }
}

/// Number of stress boxes for a skill rating: 2 baseline, 3 at +1, 4 at +3.
pub fn stress_track_size(skill_value: i32) -> usize {
    if skill_value >= 3 {
        4
    } else if skill_value >= 1 {
        3
    } else {
        2
    }
}

/// Derive both stress tracks from the character's skills.
///
/// Existing box states are preserved: shrinking truncates from the end,
/// growing pads with unchecked boxes. Total over any sheet — missing
/// skills count as 0 and missing tracks as empty.
pub fn calculate_stress_tracks(character: &Character, options: &StressOptions) -> StressTracks {
    let physical_value = PHYSICAL_STRESS_SKILLS
        .iter()
        .map(|s| character.skill(s))
        .max()
        .unwrap_or(0);

    let mental_value = options
        .mental_aliases
        .iter()
        .map(|s| character.skill(s))
        .max()
        .unwrap_or(0);

    StressTracks {
        physical: resize_track(&character.stress.physical, stress_track_size(physical_value)),
        mental: resize_track(&character.stress.mental, stress_track_size(mental_value)),
    }
}

fn resize_track(saved: &[bool], size: usize) -> Vec<bool> {
    let mut boxes = saved.to_vec();
    boxes.resize(size, false);
    boxes
}

/// A ready-to-play sheet for demos and tests.
pub fn create_sample_character(name: impl Into<String>) -> Character {
    Character::new(name)
        .with_aspect("Detetive do Oculto")
        .with_aspect("Dívidas com as pessoas erradas")
        .with_skill("Lutar", 3)
        .with_skill("Atletismo", 2)
        .with_skill("Vontade", 1)
        .with_skill("Investigar", 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_size_thresholds() {
        assert_eq!(stress_track_size(-1), 2);
        assert_eq!(stress_track_size(0), 2);
        assert_eq!(stress_track_size(1), 3);
        assert_eq!(stress_track_size(2), 3);
        assert_eq!(stress_track_size(3), 4);
        assert_eq!(stress_track_size(5), 4);
    }

    #[test]
    fn test_empty_sheet_gets_baseline_tracks() {
        let character = Character::new("Zé");
        assert_eq!(character.stress.physical, vec![false, false]);
        assert_eq!(character.stress.mental, vec![false, false]);
    }

    #[test]
    fn test_physical_uses_best_of_two_skills() {
        let character = Character::new("Zé")
            .with_skill("Sobrevivência", 1)
            .with_skill("Atletismo", 3);
        assert_eq!(character.stress.physical.len(), 4);

        let other = Character::new("Ana").with_skill("Sobrevivência", 2);
        assert_eq!(other.stress.physical.len(), 3);
    }

    #[test]
    fn test_mental_uses_best_alias() {
        let character = Character::new("Zé")
            .with_skill("Vontade", 0)
            .with_skill("Ocultismo", 1);
        assert_eq!(character.stress.mental.len(), 3);
    }

    #[test]
    fn test_growing_pads_unchecked() {
        let mut character = Character::new("Zé");
        character.stress.physical = vec![true, false];
        character.skills.insert("Atletismo".to_string(), 3);
        character.resize_stress(&StressOptions::default());
        assert_eq!(character.stress.physical, vec![true, false, false, false]);
    }

    #[test]
    fn test_shrinking_truncates_from_the_end() {
        let mut character = Character::new("Zé");
        character.skills.insert("Atletismo".to_string(), 3);
        character.resize_stress(&StressOptions::default());
        character.stress.physical = vec![true, true, true, false];

        character.skills.remove("Atletismo");
        character.resize_stress(&StressOptions::default());
        assert_eq!(character.stress.physical, vec![true, true]);
    }

    #[test]
    fn test_custom_mental_aliases() {
        let character = Character::new("Zé").with_skill("Acadêmico", 1);
        // Default aliases already include Acadêmico.
        assert_eq!(character.stress.mental.len(), 3);

        // A table that renamed the skill entirely.
        let mut renamed = Character::new("Ana");
        renamed.skills.insert("Erudição".to_string(), 3);
        let options = StressOptions::with_mental_aliases(["Erudição"]);
        renamed.resize_stress(&options);
        assert_eq!(renamed.stress.mental.len(), 4);

        // Under the defaults the same sheet stays at baseline.
        renamed.resize_stress(&StressOptions::default());
        assert_eq!(renamed.stress.mental.len(), 2);
    }

    #[test]
    fn test_tracks_are_independent() {
        let character = Character::new("Zé")
            .with_skill("Atletismo", 3)
            .with_skill("Vontade", 1);
        assert_eq!(character.stress.physical.len(), 4);
        assert_eq!(character.stress.mental.len(), 3);
    }

    #[test]
    fn test_sample_character_is_consistent() {
        let character = create_sample_character("Helena");
        assert_eq!(character.skill("Lutar"), 3);
        assert_eq!(character.skill("Percepção"), 0);
        assert_eq!(character.stress.physical.len(), 3);
        assert_eq!(character.stress.mental.len(), 3);
        assert_eq!(character.fate_points, 3);
    }
}
