use anyhow::Result;
use async_trait::async_trait;
use futures::{Sink, SinkExt};
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// Identity of a connection, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        SessionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound half of a client connection.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_text(&self, text: &str) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

/// Websocket write half. Sends from concurrent broadcasts are serialized.
pub struct WsSink<S> {
    inner: Mutex<S>,
}

impl<S> WsSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

#[async_trait]
impl<S> MessageSink for WsSink<S>
where
    S: Sink<Message, Error = WsError> + Unpin + Send,
{
    async fn send_text(&self, text: &str) -> Result<()> {
        let mut sink = self.inner.lock().await;
        sink.send(Message::text(text.to_string())).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut sink = self.inner.lock().await;
        match sink.close().await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Server-side state of one live connection.
pub struct Session {
    id: SessionId,
    display_name: String,
    remote_addr: SocketAddr,
    sink: Arc<dyn MessageSink>,
}

impl Session {
    pub fn new(display_name: String, remote_addr: SocketAddr, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            id: SessionId::next(),
            display_name,
            remote_addr,
            sink,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        self.sink.send_text(text).await
    }

    pub async fn close(&self) -> Result<()> {
        self.sink.close().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("remote_addr", &self.remote_addr)
            .finish()
    }
}
