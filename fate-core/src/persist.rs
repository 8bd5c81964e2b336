//! Table and character persistence.
//!
//! Versioned JSON save/load via `tokio::fs`. This is the local save-file
//! layer; the replicated document store a live table syncs through is a
//! separate system outside this crate.

use crate::character::Character;
use crate::dice::unix_now;
use crate::session::TableSession;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format")]
    InvalidFormat,

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved table with everything needed to resume the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTable {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// Unix timestamp (seconds) when the save was created.
    pub saved_at: u64,

    /// The complete session state.
    pub session: TableSession,

    /// Metadata about the save.
    pub metadata: TableMetadata,
}

/// Metadata about a table save, readable without loading the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub table_name: String,
    pub character_count: usize,
    pub log_entries: usize,
    #[serde(default)]
    pub saved_at: u64,
}

impl SavedTable {
    /// Create a new save from session state.
    pub fn new(session: TableSession) -> Self {
        let saved_at = unix_now();
        let metadata = TableMetadata {
            table_name: session.table_name.clone(),
            character_count: session.characters.len(),
            log_entries: session.log.len(),
            saved_at,
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            session,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file, checking the save version.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read only the metadata from a save file.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<TableMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let metadata = value.get("metadata").ok_or(PersistError::InvalidFormat)?;
        Ok(serde_json::from_value(metadata.clone())?)
    }
}

/// Summary of one save file in a directory listing.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    pub path: PathBuf,
    pub metadata: TableMetadata,
}

/// List table saves in a directory, skipping unreadable files.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedTable::peek_metadata(&path).await {
                saves.push(SaveInfo { path, metadata });
            }
        }
    }

    saves.sort_by(|a, b| b.metadata.saved_at.cmp(&a.metadata.saved_at));
    Ok(saves)
}

/// Save path for a table, derived from its name.
pub fn table_save_path(dir: impl AsRef<Path>, table_name: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.json", sanitize(table_name)))
}

/// A standalone character sheet save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    pub version: u32,
    pub saved_at: u64,
    pub character: Character,
}

impl SavedCharacter {
    pub fn new(character: Character) -> Self {
        Self {
            version: SAVE_VERSION,
            saved_at: unix_now(),
            character,
        }
    }

    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }
}

/// Save path for a character sheet, derived from the character's name.
pub fn character_save_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    dir.as_ref().join(format!("{}.character.json", sanitize(name)))
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_paths_are_sanitized() {
        let path = table_save_path("/tmp/saves", "Mesa de Sexta!");
        assert_eq!(path, PathBuf::from("/tmp/saves/mesa_de_sexta_.json"));

        let path = character_save_path("saves", "Helena");
        assert_eq!(path, PathBuf::from("saves/helena.character.json"));
    }

    #[test]
    fn test_metadata_reflects_session() {
        use crate::character::create_sample_character;
        use crate::session::{SessionConfig, TableSession};

        let mut session = TableSession::new(SessionConfig::new("Mesa"));
        session.add_character(create_sample_character("Helena"));
        session.chat("Helena", "olá");

        let saved = SavedTable::new(session);
        assert_eq!(saved.version, 1);
        assert_eq!(saved.metadata.table_name, "Mesa");
        assert_eq!(saved.metadata.character_count, 1);
        // One system entry from seating plus the chat line.
        assert_eq!(saved.metadata.log_entries, 2);
    }
}
