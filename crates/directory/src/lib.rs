//! User directory adapter.
//!
//! Reads the intranet directory export (a TOML document naming the
//! intranet server plus its users) and resolves each avatar path
//! against the server base URL. A missing or malformed document
//! degrades to an empty directory with a logged warning.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use common::{DirectoryEntry, Error, Result, UserId};
use serde::Deserialize;
use tracing::warn;

// ── Document Schema ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DirectoryDoc {
    server: ServerSection,
    #[serde(default)]
    users: Vec<UserSection>,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    host: String,
    port: u16,
    protocol: String,
}

#[derive(Debug, Deserialize)]
struct UserSection {
    id: UserId,
    name: String,
    avatar: String,
}

// ── Collation ─────────────────────────────────────────────────────────

/// Comparator ordering display names in user listings.
pub type Collation = fn(&str, &str) -> Ordering;

/// Default name ordering: case-insensitive with a case-sensitive
/// tiebreak. Deterministic on every machine, no locale involved.
pub fn caseless_collation(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

// ── Directory ─────────────────────────────────────────────────────────

/// Read-side adapter over the directory document at a fixed path.
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All directory entries keyed by user id.
    ///
    /// Read and parse failures yield an empty map with a logged
    /// warning, never an error.
    pub fn lookup_all(&self) -> BTreeMap<UserId, DirectoryEntry> {
        match read_document(&self.path) {
            Ok(doc) => resolve_entries(&doc),
            Err(err) => {
                warn!(
                    "user directory unavailable ({}): {}",
                    self.path.display(),
                    err
                );
                BTreeMap::new()
            }
        }
    }

    /// Entries sorted by display name under `collation`, ties by id.
    pub fn listing(&self, collation: Collation) -> Vec<(UserId, DirectoryEntry)> {
        let mut entries: Vec<(UserId, DirectoryEntry)> =
            self.lookup_all().into_iter().collect();
        entries.sort_by(|(a_id, a), (b_id, b)| {
            collation(&a.name, &b.name).then_with(|| a_id.cmp(b_id))
        });
        entries
    }
}

fn read_document(path: &Path) -> Result<DirectoryDoc> {
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| Error::Directory(e.to_string()))
}

fn resolve_entries(doc: &DirectoryDoc) -> BTreeMap<UserId, DirectoryEntry> {
    let base = format!(
        "{}://{}:{}",
        doc.server.protocol, doc.server.host, doc.server.port
    );
    doc.users
        .iter()
        .map(|user| {
            (
                user.id,
                DirectoryEntry {
                    name: user.name.clone(),
                    avatar_url: join_url(&base, &user.avatar),
                },
            )
        })
        .collect()
}

/// Join a base URL and a path with exactly one separating slash.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
