use std::{path::PathBuf, sync::Arc};

use portfolio_audit_contracts::{AuditCategory, AuditEntry, AuditLogService};
use tokio::{io::AsyncWriteExt, sync::Mutex};
use tracing::error;

/// Append-only newline-delimited JSON logs, one file per category.
#[derive(Debug, Clone)]
pub struct NdjsonAuditLogService {
    directory: PathBuf,
    // Serializes appends so each entry lands as one contiguous line.
    write_lock: Arc<Mutex<()>>,
}

impl NdjsonAuditLogService {
    pub async fn new(directory: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&directory).await?;

        Ok(Self {
            directory,
            write_lock: Default::default(),
        })
    }

    async fn append(&self, category: AuditCategory, entry: &AuditEntry) -> std::io::Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let path = self.directory.join(format!("{}.log", category.as_str()));

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await
    }
}

impl AuditLogService for NdjsonAuditLogService {
    async fn record(&self, category: AuditCategory, entry: AuditEntry) {
        if let Err(err) = self.append(category, &entry).await {
            error!("Failed to write {} audit entry: {err}", category.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use portfolio_audit_contracts::AuditStatus;
    use portfolio_models::client::ClientInfo;

    use super::*;

    fn entry() -> AuditEntry {
        AuditEntry::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
            AuditStatus::Success,
        )
        .with_client(&ClientInfo {
            ip: Some("203.0.113.7".parse().unwrap()),
            user_agent: Some("test-agent".into()),
        })
        .with_field("name", "Jane Doe")
    }

    #[tokio::test]
    async fn appends_one_json_line_per_call() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let sut = NdjsonAuditLogService::new(dir.path().to_owned())
            .await
            .unwrap();

        // Act
        sut.record(AuditCategory::Contact, entry()).await;
        sut.record(AuditCategory::Contact, entry().with_error("boom"))
            .await;

        // Assert
        let content = std::fs::read_to_string(dir.path().join("contact.log")).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["status"], "success");
        assert_eq!(first["name"], "Jane Doe");
        assert_eq!(first["ip"], "203.0.113.7");
        assert_eq!(first["userAgent"], "test-agent");
        assert_eq!(first["timestamp"], "2025-01-01T12:00:00Z");
        assert!(first.get("error").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], "boom");
    }

    #[tokio::test]
    async fn categories_use_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let sut = NdjsonAuditLogService::new(dir.path().to_owned())
            .await
            .unwrap();

        sut.record(AuditCategory::Newsletter, entry()).await;
        sut.record(AuditCategory::Analytics, entry()).await;

        assert!(dir.path().join("newsletter.log").exists());
        assert!(dir.path().join("analytics.log").exists());
        assert!(!dir.path().join("contact.log").exists());
    }

    #[tokio::test]
    async fn write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let sut = NdjsonAuditLogService::new(dir.path().to_owned())
            .await
            .unwrap();

        // Turn the log path into a directory so the append fails.
        std::fs::create_dir(dir.path().join("contact.log")).unwrap();

        sut.record(AuditCategory::Contact, entry()).await;
    }
}
