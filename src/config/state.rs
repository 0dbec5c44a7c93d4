// Application state module
// Holds everything a request needs, shared across connections via Arc

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::routing::RouteTable;
use crate::view::Templates;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Route table, registered once at startup
    pub routes: RouteTable,
    /// Compiled view templates
    pub templates: Templates,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Create `AppState`: registers the route table and compiles templates
    pub fn new(config: &Config) -> tera::Result<Self> {
        let templates = Templates::load(&config.templates.dir)?;

        Ok(Self {
            config: config.clone(),
            routes: RouteTable::with_defaults(),
            templates,
            cached_access_log: AtomicBool::new(config.logging.access_log),
        })
    }
}
