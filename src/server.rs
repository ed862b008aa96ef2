use crate::chat::{ChatContext, ConnectionHandler, WsSink};
use anyhow::{Context, Result};
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};

/// Websocket listener that runs one handler task per accepted connection.
pub struct Server {
    listener: TcpListener,
    ctx: Arc<ChatContext>,
}

impl Server {
    pub async fn bind(address: &str, ctx: Arc<ChatContext>) -> Result<Self> {
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        Ok(Self { listener, ctx })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the process is stopped.
    pub async fn run(self) -> Result<()> {
        info!("Listening on ws://{}", self.local_addr()?);
        loop {
            match self.listener.accept().await {
                Ok((stream, remote_addr)) => {
                    tokio::spawn(serve_connection(Arc::clone(&self.ctx), stream, remote_addr));
                }
                Err(e) => warn!(error = %e, "Failed to accept connection"),
            }
        }
    }
}

async fn serve_connection(ctx: Arc<ChatContext>, stream: TcpStream, remote_addr: SocketAddr) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(addr = %remote_addr, error = %e, "Websocket handshake failed");
            return;
        }
    };

    let (write, read) = ws.split();
    let handler = ConnectionHandler::new(ctx, remote_addr, Arc::new(WsSink::new(write)));
    let outcome = handler.run(read).await;
    debug!(addr = %remote_addr, ?outcome, "Connection task finished");
}
