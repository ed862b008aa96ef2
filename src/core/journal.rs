//! Append-only record of every message the server receives.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

#[async_trait]
pub trait MessageJournal: Send + Sync {
    async fn record(&self, message: &str) -> Result<()>;
}

/// Journal backed by a text file, one `<timestamp> - <message>` line per entry.
pub struct FileJournal {
    path: PathBuf,
    // Keeps concurrent connections from interleaving partial writes.
    write_lock: Mutex<()>,
}

impl FileJournal {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MessageJournal for FileJournal {
    async fn record(&self, message: &str) -> Result<()> {
        let line = format!(
            "{} - {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
            message
        );

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open message log: {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("Failed to write message log: {}", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_appends_lines() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let journal = FileJournal::new(dir.path().join("log.txt"));

        journal.record("first").await?;
        journal.record("exchange 2 usd").await?;

        let content = tokio::fs::read_to_string(journal.path()).await?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - first"));
        assert!(lines[1].ends_with(" - exchange 2 usd"));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_records_are_not_lost() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let journal = Arc::new(FileJournal::new(dir.path().join("log.txt")));

        let writes = (0..20).map(|i| {
            let journal = Arc::clone(&journal);
            async move { journal.record(&format!("message {i}")).await }
        });
        for result in futures::future::join_all(writes).await {
            result?;
        }

        let content = tokio::fs::read_to_string(journal.path()).await?;
        assert_eq!(content.lines().count(), 20);
        Ok(())
    }

    #[tokio::test]
    async fn test_unwritable_path_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let journal = FileJournal::new(dir.path().join("missing").join("log.txt"));

        let result = journal.record("lost").await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to open message log")
        );
    }
}
