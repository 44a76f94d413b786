//! Named archive of saved designs, newest first.

use chrono::{DateTime, Utc};
use pipecad_ir::{new_component_id, ComponentInstance};
use serde::{Deserialize, Serialize};

/// Maximum number of archived designs kept.
pub const ARCHIVE_LIMIT: usize = 20;

/// One archived design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// Unique identifier.
    pub id: String,
    /// Design name at the time of archiving.
    pub name: String,
    /// When the design was archived.
    pub saved_at: DateTime<Utc>,
    /// Full scene snapshot.
    pub components: Vec<ComponentInstance>,
}

/// Bounded, most-recent-first list of archived designs.
///
/// Entries are only added explicitly, never as a side effect of editing.
/// Persisted as a plain JSON array; loading goes through
/// [`DesignArchive::from_entries`], so the bound and ordering always hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ArchiveEntry>", into = "Vec<ArchiveEntry>")]
pub struct DesignArchive {
    entries: Vec<ArchiveEntry>,
}

impl DesignArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries, keeping the newest [`ARCHIVE_LIMIT`].
    pub fn from_entries(mut entries: Vec<ArchiveEntry>) -> Self {
        entries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        entries.truncate(ARCHIVE_LIMIT);
        Self { entries }
    }

    /// Archive a copy of `components` under `name`; evicts the oldest entry
    /// past the bound.
    pub fn push(&mut self, name: impl Into<String>, components: &[ComponentInstance]) -> &ArchiveEntry {
        let entry = ArchiveEntry {
            id: new_component_id(),
            name: name.into(),
            saved_at: Utc::now(),
            components: components.to_vec(),
        };
        self.entries.insert(0, entry);
        self.entries.truncate(ARCHIVE_LIMIT);
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove an entry by id.
    pub fn remove(&mut self, id: &str) -> Option<ArchiveEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ArchiveEntry>> for DesignArchive {
    fn from(entries: Vec<ArchiveEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<DesignArchive> for Vec<ArchiveEntry> {
    fn from(archive: DesignArchive) -> Self {
        archive.entries
    }
}
