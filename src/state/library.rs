use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CatalogResult;

/// A durable key-value store holding named string slots.
pub trait DurableSlot {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> CatalogResult<Option<String>>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> CatalogResult<()>;
}

/// The Library manages the SQLite database behind the catalog's durable slot.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open (or create) the library at the default location.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/cinematheque/cinematheque.db
    /// - macOS: ~/Library/Application Support/cinematheque/cinematheque.db
    /// - Windows: %APPDATA%\cinematheque\cinematheque.db
    pub fn new() -> CatalogResult<Self> {
        Self::open(&Self::default_db_path())
    }

    /// Open (or create) the library at an explicit path
    pub fn open(db_path: &Path) -> CatalogResult<Self> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(db_path)?;

        tracing::info!(path = %db_path.display(), "Library database opened");

        let library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;

        Ok(library)
    }

    /// Get the path where the database should be stored
    fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("cinematheque");
        path.push("cinematheque.db");
        path
    }

    /// Create the slot table if it doesn't exist.
    fn init_schema(&self) -> CatalogResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key             TEXT PRIMARY KEY,
                value           TEXT NOT NULL,
                updated_at      INTEGER NOT NULL
            )",
            [],
        )?;

        tracing::debug!("Library schema initialized");

        Ok(())
    }
}

impl DurableSlot for Library {
    fn read(&self, key: &str) -> CatalogResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> CatalogResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Non-durable slot store, used when the database cannot be opened
#[derive(Debug, Default, Clone)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memory slot pre-filled with a single value
    #[cfg(test)]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut slot = Self::new();
        slot.values.insert(key.to_string(), value.to_string());
        slot
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self, key: &str) -> CatalogResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> CatalogResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
