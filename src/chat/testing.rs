//! Test doubles for the chat module.

use super::session::{MessageSink, Session};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Sink that keeps everything sent to it, or fails every send when broken.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    broken: bool,
    closed: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            broken: true,
            ..Self::default()
        })
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    async fn send_text(&self, text: &str) -> Result<()> {
        if self.broken {
            return Err(anyhow!("Connection reset by peer"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 40000))
}

pub fn session(name: &str, sink: Arc<RecordingSink>) -> Arc<Session> {
    Arc::new(Session::new(name.to_string(), test_addr(), sink))
}
