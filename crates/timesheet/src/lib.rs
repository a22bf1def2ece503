//! Presence log processing crate.
//!
//! Parses the CSV log, groups it into per-weekday statistics, and
//! answers queries from a TTL snapshot cache.

pub mod cache;
pub mod clock;
pub mod parser;
pub mod service;
pub mod weekday;

pub use cache::PresenceCache;
pub use service::QueryService;
pub use weekday::WEEKDAY_ABBR;
