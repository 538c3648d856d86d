use anyhow::Context;
use portfolio_audit_ndjson::NdjsonAuditLogService;
use portfolio_config::AuditConfig;

/// Open the audit log directory, creating it if necessary
pub async fn open(config: &AuditConfig) -> anyhow::Result<NdjsonAuditLogService> {
    NdjsonAuditLogService::new(config.directory.clone())
        .await
        .context("Failed to open audit log directory")
}
