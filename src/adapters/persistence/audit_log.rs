//! Audit Log - Append-only JSONL Market Event Records
//!
//! Persists bet and payout records to JSONL files in the data
//! directory (`bets.jsonl`, `payouts.jsonl`). Each line is a
//! self-contained JSON record for easy parsing, streaming, and
//! post-hoc analysis of the point economy.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::ports::audit::{AuditLog, BetAuditRecord, PayoutAuditRecord};

/// Append-only JSONL audit log.
pub struct JsonlAuditLog {
    bets_path: PathBuf,
    payouts_path: PathBuf,
    data_dir: PathBuf,
}

impl JsonlAuditLog {
    /// Create an audit log in the given data directory.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let dir = Path::new(data_dir).to_path_buf();
        fs::create_dir_all(&dir)
            .await
            .context("Failed to create audit data directory")?;
        Ok(Self {
            bets_path: dir.join("bets.jsonl"),
            payouts_path: dir.join("payouts.jsonl"),
            data_dir: dir,
        })
    }

    async fn append_line<T: serde::Serialize>(path: &Path, record: &T) -> Result<()> {
        let mut json = serde_json::to_string(record).context("Failed to serialize audit record")?;
        json.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .context("Failed to open audit log file")?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write audit record")?;
        file.flush().await.context("Failed to flush audit log")?;
        Ok(())
    }
}

#[async_trait]
impl AuditLog for JsonlAuditLog {
    #[instrument(skip(self, record), fields(vote_id = %record.vote_id))]
    async fn record_bet(&self, record: &BetAuditRecord) -> Result<()> {
        Self::append_line(&self.bets_path, record).await
    }

    #[instrument(skip(self, record), fields(debate = %record.debate_id))]
    async fn record_payout_sweep(&self, record: &PayoutAuditRecord) -> Result<()> {
        Self::append_line(&self.payouts_path, record).await
    }

    async fn is_healthy(&self) -> bool {
        let test_path = self.data_dir.join(".health_check");
        let result = fs::write(&test_path, b"ok").await;
        let _ = fs::remove_file(&test_path).await;
        result.is_ok()
    }
}

/// Audit sink that drops everything; used in tests.
#[derive(Default)]
pub struct NoopAuditLog;

#[async_trait]
impl AuditLog for NoopAuditLog {
    async fn record_bet(&self, _record: &BetAuditRecord) -> Result<()> {
        Ok(())
    }

    async fn record_payout_sweep(&self, _record: &PayoutAuditRecord) -> Result<()> {
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}
