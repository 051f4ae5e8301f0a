//! Shared application state passed to route builders and the readiness probe.

use domain_calculations::PricingEngine;
use mongodb::{Client, Database};

/// Cloned into handlers; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Rate tables resolved at start-up
    pub engine: PricingEngine,
    pub storage: Storage,
}

/// Connected archive store
#[derive(Clone)]
pub enum Storage {
    Mongo {
        /// Shares the driver's connection pool
        client: Client,
        db: Database,
    },
    Memory,
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Mongo { .. } => "mongodb",
            Storage::Memory => "memory",
        }
    }
}
