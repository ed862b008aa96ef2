use super::session::{Session, SessionId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// The set of sessions whose connections are currently open.
///
/// All access goes through one lock; readers get copies, never the live set.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    sessions: Arc<Mutex<BTreeMap<SessionId, Arc<Session>>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, session: Arc<Session>) {
        let mut sessions = self.sessions.lock().await;
        debug!(id = %session.id(), name = session.display_name(), "Registering session");
        if let Some(previous) = sessions.insert(session.id(), session) {
            warn!(id = %previous.id(), "Session registered twice");
        }
    }

    /// Removes the session if present; returns it when it was.
    pub async fn unregister(&self, id: SessionId) -> Option<Arc<Session>> {
        let removed = self.sessions.lock().await.remove(&id);
        if removed.is_none() {
            debug!(%id, "Session already unregistered");
        }
        removed
    }

    /// Point-in-time copy of the members, in connection order.
    pub async fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.lock().await.values().cloned().collect()
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
