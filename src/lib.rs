//! Presence statistics server.
//!
//! Serves per-weekday presence statistics from a CSV log:
//! 1. Parses the log into an in-memory dataset, cached with a TTL
//! 2. Groups each user's presence by weekday
//! 3. Answers JSON queries and serves the chart pages

pub mod config;
pub mod http;
pub mod state;
