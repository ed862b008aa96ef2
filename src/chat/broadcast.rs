use super::registry::ClientRegistry;
use futures::future::join_all;
use tracing::{debug, warn};

/// Sends messages to every registered session.
#[derive(Clone)]
pub struct BroadcastHub {
    registry: ClientRegistry,
}

impl BroadcastHub {
    pub fn new(registry: ClientRegistry) -> Self {
        Self { registry }
    }

    /// Returns once a send has been attempted for each current member.
    ///
    /// A failed send is logged and skipped. The recipient stays registered;
    /// its own connection loop notices the broken transport and cleans up.
    pub async fn broadcast(&self, message: &str) {
        let recipients = self.registry.snapshot().await;
        debug!(recipients = recipients.len(), "Broadcasting message");

        let sends = recipients.iter().map(|session| async move {
            if let Err(e) = session.send(message).await {
                warn!(
                    id = %session.id(),
                    name = session.display_name(),
                    addr = %session.remote_addr(),
                    error = %e,
                    "Failed to deliver message"
                );
            }
        });
        join_all(sends).await;
    }
}
