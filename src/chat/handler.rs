use super::ChatContext;
use super::command::{Command, GREETING, USAGE};
use super::session::{MessageSink, Session};
use futures::{Stream, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Closed,
}

/// How a connection ended. Both variants go through the same cleanup.
#[derive(Debug)]
pub enum Disconnect {
    /// Close frame, end of stream, or an already closed transport.
    Closed,
    Failed(WsError),
}

/// Drives one client connection from registration to cleanup.
pub struct ConnectionHandler {
    ctx: Arc<ChatContext>,
    session: Arc<Session>,
    state: ConnectionState,
}

impl ConnectionHandler {
    pub fn new(ctx: Arc<ChatContext>, remote_addr: SocketAddr, sink: Arc<dyn MessageSink>) -> Self {
        let session = Arc::new(Session::new(ctx.names.next_name(), remote_addr, sink));
        Self {
            ctx,
            session,
            state: ConnectionState::Connecting,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Registers the session so it starts receiving broadcasts.
    pub async fn open(&mut self) {
        if self.state != ConnectionState::Connecting {
            return;
        }
        self.ctx.registry.register(Arc::clone(&self.session)).await;
        self.state = ConnectionState::Active;
        info!(
            addr = %self.session.remote_addr(),
            name = self.session.display_name(),
            "Client connected"
        );
    }

    /// Processes inbound messages one at a time until the connection ends.
    pub async fn run<S>(mut self, mut inbound: S) -> Disconnect
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        self.open().await;

        let outcome = loop {
            match inbound.next().await {
                Some(Ok(Message::Text(text))) => self.handle_message(text.as_str()).await,
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Close frame received");
                    break Disconnect::Closed;
                }
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) | None => {
                    break Disconnect::Closed;
                }
                Some(Err(e)) => break Disconnect::Failed(e),
            }
        };

        self.close(&outcome).await;
        outcome
    }

    pub async fn handle_message(&self, text: &str) {
        if let Err(e) = self.ctx.journal.record(text).await {
            warn!(error = %e, "Failed to record message");
        }

        match Command::parse(text, &self.ctx.default_currencies) {
            Ok(Command::Exchange(spec)) => {
                debug!(?spec, name = self.session.display_name(), "Exchange requested");
                let report = self.ctx.aggregator.aggregate(&spec).await;
                self.ctx.hub.broadcast(&report).await;
            }
            Ok(Command::Greeting) => self.ctx.hub.broadcast(GREETING).await,
            Ok(Command::Chat(message)) => {
                let line = format!("{}: {}", self.session.display_name(), message);
                self.ctx.hub.broadcast(&line).await;
            }
            Err(e) => {
                debug!(error = %e, "Rejected command");
                if let Err(e) = self.session.send(USAGE).await {
                    warn!(error = %e, "Failed to send usage hint");
                }
            }
        }
    }

    async fn close(&mut self, outcome: &Disconnect) {
        self.state = ConnectionState::Closed;
        self.ctx.registry.unregister(self.session.id()).await;

        match outcome {
            Disconnect::Closed => info!(
                addr = %self.session.remote_addr(),
                name = self.session.display_name(),
                "Client disconnected"
            ),
            Disconnect::Failed(e) => error!(
                addr = %self.session.remote_addr(),
                name = self.session.display_name(),
                error = %e,
                "Connection failed"
            ),
        }

        if let Err(e) = self.session.close().await {
            debug!(error = %e, "Transport already gone");
        }
    }
}
