//! Client sessions, broadcasting and the per-connection message loop.

pub mod broadcast;
pub mod command;
pub mod handler;
pub mod names;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::BroadcastHub;
pub use command::Command;
pub use handler::{ConnectionHandler, ConnectionState, Disconnect};
pub use names::NameGenerator;
pub use registry::ClientRegistry;
pub use session::{MessageSink, Session, SessionId, WsSink};

use crate::core::MessageJournal;
use crate::exchange::RateAggregator;
use std::sync::Arc;

/// State shared by every connection handler.
pub struct ChatContext {
    pub registry: ClientRegistry,
    pub hub: BroadcastHub,
    pub aggregator: RateAggregator,
    pub journal: Arc<dyn MessageJournal>,
    pub names: NameGenerator,
    /// Currencies used when an `exchange` command names none.
    pub default_currencies: Vec<String>,
}

impl ChatContext {
    pub fn new(
        aggregator: RateAggregator,
        journal: Arc<dyn MessageJournal>,
        default_currencies: Vec<String>,
    ) -> Self {
        let registry = ClientRegistry::new();
        Self {
            hub: BroadcastHub::new(registry.clone()),
            registry,
            aggregator,
            journal,
            names: NameGenerator::new(),
            default_currencies,
        }
    }
}
