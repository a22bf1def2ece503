//! Domain types shared across the presence server.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ── Presence Log Types ────────────────────────────────────────────────

/// Identifier of a user in the presence log.
pub type UserId = u32;

/// One workday's clock-in/clock-out pair.
///
/// Nothing guarantees `start <= end`; rows are stored as logged and the
/// derived interval may come out negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Time the user clocked in.
    pub start: NaiveTime,
    /// Time the user clocked out.
    pub end: NaiveTime,
}

/// All logged days for a single user, keyed by date.
pub type UserPresenceMap = BTreeMap<NaiveDate, PresenceRecord>;

/// The whole parsed presence log, keyed by user id.
pub type Dataset = BTreeMap<UserId, UserPresenceMap>;

// ── Directory Types ───────────────────────────────────────────────────

/// A user as published by the intranet directory export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Display name.
    pub name: String,
    /// Fully resolved avatar URL.
    pub avatar_url: String,
}
