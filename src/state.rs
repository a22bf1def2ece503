//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use common::ServerConfig;
use directory::{caseless_collation, Collation, UserDirectory};
use timesheet::{PresenceCache, QueryService};

/// Everything the request handlers need, wired once at startup.
pub struct AppState {
    pub service: QueryService,
    pub directory: UserDirectory,
    pub collation: Collation,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Arc<Self> {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let cache = Arc::new(PresenceCache::for_csv(config.data_csv.clone(), ttl));

        Arc::new(Self {
            service: QueryService::new(cache),
            directory: UserDirectory::new(config.users_file.clone()),
            collation: caseless_collation,
        })
    }
}
