use anyhow::Context;
use portfolio_config::EmailConfig;
use portfolio_email_smtp::SmtpEmailService;

/// Set up the SMTP transport
pub fn connect(config: &EmailConfig) -> anyhow::Result<SmtpEmailService> {
    SmtpEmailService::new(&config.smtp_url, config.from.clone())
        .context("Failed to set up SMTP transport")
}
