use std::sync::Arc;

use chrono::{DateTime, Utc};
use portfolio_audit_contracts::{AuditCategory, AuditEntry, AuditLogService, AuditStatus};
use portfolio_core_contact_contracts::{
    ContactFeatureService, ContactReceipt, ContactSubmitError, SubscribeError,
};
use portfolio_email_contracts::{ContentType, Email, EmailSendError, EmailService};
use portfolio_models::{
    catalog::SocialLink,
    client::ClientInfo,
    contact::{validate_email, ContactRequest, ContactSubmission},
    email_address::EmailAddressWithName,
};
use portfolio_shared_contracts::time::TimeService;
use portfolio_templates_contracts::{
    ContactAutoReplyTemplate, ContactNotificationTemplate, TemplateService,
};
use tracing::warn;

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I'll get back to you soon.";

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Time, Templates, EmailS, Audit> {
    pub time: Time,
    pub templates: Templates,
    pub email: EmailS,
    pub audit: Audit,
    pub config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Where contact form notifications are delivered.
    pub recipient: Arc<EmailAddressWithName>,
    pub owner_name: Arc<str>,
    pub owner_title: Arc<str>,
    /// Social links rendered into the auto-reply.
    pub social: Arc<[SocialLink]>,
}

impl<Time, Templates, EmailS, Audit> ContactFeatureService
    for ContactFeatureServiceImpl<Time, Templates, EmailS, Audit>
where
    Time: TimeService,
    Templates: TemplateService,
    EmailS: EmailService,
    Audit: AuditLogService,
{
    async fn submit(
        &self,
        request: ContactRequest,
        client: ClientInfo,
    ) -> Result<ContactReceipt, ContactSubmitError> {
        // Rejected submissions never reach the dispatcher or the contact log.
        let submission = request.validate().map_err(ContactSubmitError::Validation)?;

        let now = self.time.now();

        let notification = self.templates.render(&ContactNotificationTemplate {
            name: (*submission.name).clone(),
            email: submission.email.as_str().to_owned(),
            subject: (*submission.subject).clone(),
            phone: submission.phone.as_deref().cloned(),
            company: submission.company.as_deref().cloned(),
            message_lines: message_lines(&submission.message),
            received_at: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        })?;

        let auto_reply = self.templates.render(&ContactAutoReplyTemplate {
            name: (*submission.name).clone(),
            owner_name: self.config.owner_name.to_string(),
            owner_title: self.config.owner_title.to_string(),
            social: self.config.social.to_vec(),
        })?;

        let sender = submission
            .email
            .clone()
            .with_name((*submission.name).clone());

        // The notification must succeed before the auto-reply is attempted:
        // never confirm receipt to the sender while internal delivery failed.
        if let Err(err) = self
            .email
            .send(Email {
                recipient: (*self.config.recipient).clone(),
                subject: format!("Portfolio Contact: {}", *submission.subject),
                body: notification,
                content_type: ContentType::Html,
                reply_to: Some(sender.clone()),
            })
            .await
        {
            warn!("Failed to deliver contact notification: {err:#}");
            self.record_failure(&submission, &client, now, &err, "notification", false)
                .await;
            return Err(ContactSubmitError::Send(err));
        }

        if let Err(err) = self
            .email
            .send(Email {
                recipient: sender,
                subject: format!("Thank you for your message - {}", self.config.owner_name),
                body: auto_reply,
                content_type: ContentType::Html,
                reply_to: None,
            })
            .await
        {
            warn!("Failed to deliver contact auto-reply: {err:#}");
            self.record_failure(&submission, &client, now, &err, "auto_reply", true)
                .await;
            return Err(ContactSubmitError::Send(err));
        }

        self.audit
            .record(
                AuditCategory::Contact,
                submission_entry(&submission, AuditStatus::Success, now).with_client(&client),
            )
            .await;

        Ok(ContactReceipt {
            message: SUCCESS_MESSAGE.into(),
            timestamp: now,
        })
    }

    async fn subscribe(&self, email: String, client: ClientInfo) -> Result<(), SubscribeError> {
        let email = validate_email(&email).map_err(SubscribeError::InvalidEmail)?;

        let now = self.time.now();

        self.audit
            .record(
                AuditCategory::Newsletter,
                AuditEntry::new(now, AuditStatus::Success)
                    .with_client(&client)
                    .with_field("email", email.as_str()),
            )
            .await;

        Ok(())
    }
}

impl<Time, Templates, EmailS, Audit> ContactFeatureServiceImpl<Time, Templates, EmailS, Audit>
where
    Audit: AuditLogService,
{
    async fn record_failure(
        &self,
        submission: &ContactSubmission,
        client: &ClientInfo,
        now: DateTime<Utc>,
        err: &EmailSendError,
        stage: &str,
        notification_delivered: bool,
    ) {
        let mut entry = submission_entry(submission, AuditStatus::Error, now)
            .with_client(client)
            .with_error(err)
            .with_field("stage", stage);
        if notification_delivered {
            entry = entry.with_field("notificationDelivered", true);
        }
        self.audit.record(AuditCategory::Contact, entry).await;
    }
}

/// The audited projection of a submission: the message body is redacted.
fn submission_entry(
    submission: &ContactSubmission,
    status: AuditStatus,
    now: DateTime<Utc>,
) -> AuditEntry {
    AuditEntry::new(now, status)
        .with_field("name", (*submission.name).clone())
        .with_field("email", submission.email.as_str())
        .with_field("subject", (*submission.subject).clone())
}

fn message_lines(message: &str) -> Vec<String> {
    message
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use portfolio_audit_contracts::MockAuditLogService;
    use portfolio_email_contracts::MockEmailService;
    use portfolio_shared_contracts::time::MockTimeService;
    use portfolio_templates_contracts::MockTemplateService;
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    type Sut = ContactFeatureServiceImpl<
        MockTimeService,
        MockTemplateService,
        MockEmailService,
        MockAuditLogService,
    >;

    fn config() -> ContactFeatureConfig {
        ContactFeatureConfig {
            recipient: Arc::new(
                "Farhan Ali Peerzada <farhan.peerzadaa@gmail.com>"
                    .parse()
                    .unwrap(),
            ),
            owner_name: "Farhan Ali Peerzada".into(),
            owner_title: "Data Analyst & Software Engineer".into(),
            social: vec![SocialLink {
                label: "GitHub".into(),
                url: "https://github.com/example".into(),
            }]
            .into(),
        }
    }

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello there".into(),
            message: "This is a test message.".into(),
            phone: None,
            company: None,
        }
    }

    fn client() -> ClientInfo {
        ClientInfo {
            ip: Some("203.0.113.7".parse().unwrap()),
            user_agent: Some("test-agent".into()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn notification_template() -> ContactNotificationTemplate {
        ContactNotificationTemplate {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            subject: "Hello there".into(),
            phone: None,
            company: None,
            message_lines: vec!["This is a test message.".into()],
            received_at: "2025-01-01 12:00:00 UTC".into(),
        }
    }

    fn auto_reply_template() -> ContactAutoReplyTemplate {
        ContactAutoReplyTemplate {
            name: "Jane Doe".into(),
            owner_name: "Farhan Ali Peerzada".into(),
            owner_title: "Data Analyst & Software Engineer".into(),
            social: config().social.to_vec(),
        }
    }

    fn notification_email() -> Email {
        Email {
            recipient: "Farhan Ali Peerzada <farhan.peerzadaa@gmail.com>"
                .parse()
                .unwrap(),
            subject: "Portfolio Contact: Hello there".into(),
            body: "<notification>".into(),
            content_type: ContentType::Html,
            reply_to: Some("Jane Doe <jane@example.com>".parse().unwrap()),
        }
    }

    fn auto_reply_email() -> Email {
        Email {
            recipient: "Jane Doe <jane@example.com>".parse().unwrap(),
            subject: "Thank you for your message - Farhan Ali Peerzada".into(),
            body: "<auto-reply>".into(),
            content_type: ContentType::Html,
            reply_to: None,
        }
    }

    fn contact_entry(status: AuditStatus) -> AuditEntry {
        AuditEntry::new(now(), status)
            .with_field("name", "Jane Doe")
            .with_field("email", "jane@example.com")
            .with_field("subject", "Hello there")
            .with_client(&client())
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let time = MockTimeService::new().with_now(now());

        let templates = MockTemplateService::new()
            .with_render(notification_template(), "<notification>".into())
            .with_render(auto_reply_template(), "<auto-reply>".into());

        let email = MockEmailService::new()
            .with_send(notification_email(), Ok(()))
            .with_send(auto_reply_email(), Ok(()));

        let audit = MockAuditLogService::new()
            .with_record(AuditCategory::Contact, contact_entry(AuditStatus::Success));

        let sut = Sut {
            time,
            templates,
            email,
            audit,
            config: config(),
        };

        // Act
        let result = sut.submit(request(), client()).await;

        // Assert
        let receipt = result.unwrap();
        assert_eq!(receipt.message, SUCCESS_MESSAGE);
        assert_eq!(receipt.timestamp, now());
    }

    #[tokio::test]
    async fn multiline_message_is_split_for_rendering() {
        let time = MockTimeService::new().with_now(now());

        let templates = MockTemplateService::new()
            .with_render(
                ContactNotificationTemplate {
                    message_lines: vec!["first".into(), "second".into(), String::new()],
                    ..notification_template()
                },
                "<notification>".into(),
            )
            .with_render(auto_reply_template(), "<auto-reply>".into());

        let email = MockEmailService::new()
            .with_send(notification_email(), Ok(()))
            .with_send(auto_reply_email(), Ok(()));

        let audit = MockAuditLogService::new()
            .with_record(AuditCategory::Contact, contact_entry(AuditStatus::Success));

        let sut = Sut {
            time,
            templates,
            email,
            audit,
            config: config(),
        };

        let result = sut
            .submit(
                ContactRequest {
                    message: "first\r\nsecond\n".into(),
                    ..request()
                },
                client(),
            )
            .await;

        result.unwrap();
    }

    #[tokio::test]
    async fn invalid_submission_is_rejected_before_any_side_effect() {
        // Arrange: no expectations at all, so any call to a collaborator
        // fails the test.
        let sut = Sut {
            time: MockTimeService::new(),
            templates: MockTemplateService::new(),
            email: MockEmailService::new(),
            audit: MockAuditLogService::new(),
            config: config(),
        };

        // Act
        let result = sut
            .submit(
                ContactRequest {
                    name: "J".into(),
                    subject: "Hi".into(),
                    message: "short".into(),
                    ..request()
                },
                client(),
            )
            .await;

        // Assert
        assert_matches!(
            result,
            Err(ContactSubmitError::Validation(ref errors)) if errors.0.len() == 3
        );
    }

    #[tokio::test]
    async fn notification_failure_skips_auto_reply() {
        let time = MockTimeService::new().with_now(now());

        let templates = MockTemplateService::new()
            .with_render(notification_template(), "<notification>".into())
            .with_render(auto_reply_template(), "<auto-reply>".into());

        // Only the notification send is expected; a second send would panic.
        let email = MockEmailService::new().with_send(
            notification_email(),
            Err(EmailSendError::Connection(anyhow::anyhow!(
                "connection refused"
            ))),
        );

        let audit = MockAuditLogService::new().with_record(
            AuditCategory::Contact,
            contact_entry(AuditStatus::Error)
                .with_error("Failed to reach the SMTP server")
                .with_field("stage", "notification"),
        );

        let sut = Sut {
            time,
            templates,
            email,
            audit,
            config: config(),
        };

        let result = sut.submit(request(), client()).await;

        assert_matches!(
            result,
            Err(ContactSubmitError::Send(EmailSendError::Connection(_)))
        );
    }

    #[tokio::test]
    async fn auto_reply_failure_fails_the_request() {
        let time = MockTimeService::new().with_now(now());

        let templates = MockTemplateService::new()
            .with_render(notification_template(), "<notification>".into())
            .with_render(auto_reply_template(), "<auto-reply>".into());

        let email = MockEmailService::new()
            .with_send(notification_email(), Ok(()))
            .with_send(
                auto_reply_email(),
                Err(EmailSendError::Other(anyhow::anyhow!("mailbox full"))),
            );

        let audit = MockAuditLogService::new().with_record(
            AuditCategory::Contact,
            contact_entry(AuditStatus::Error)
                .with_error("mailbox full")
                .with_field("stage", "auto_reply")
                .with_field("notificationDelivered", true),
        );

        let sut = Sut {
            time,
            templates,
            email,
            audit,
            config: config(),
        };

        let result = sut.submit(request(), client()).await;

        assert_matches!(result, Err(ContactSubmitError::Send(_)));
    }

    #[tokio::test]
    async fn subscribe_ok() {
        let time = MockTimeService::new().with_now(now());

        let audit = MockAuditLogService::new().with_record(
            AuditCategory::Newsletter,
            AuditEntry::new(now(), AuditStatus::Success)
                .with_client(&client())
                .with_field("email", "jane@example.com"),
        );

        let sut = Sut {
            time,
            templates: MockTemplateService::new(),
            email: MockEmailService::new(),
            audit,
            config: config(),
        };

        let result = sut.subscribe("  Jane@Example.com ".into(), client()).await;

        result.unwrap();
    }

    #[tokio::test]
    async fn subscribe_rejects_invalid_email() {
        let sut = Sut {
            time: MockTimeService::new(),
            templates: MockTemplateService::new(),
            email: MockEmailService::new(),
            audit: MockAuditLogService::new(),
            config: config(),
        };

        let result = sut.subscribe("not-an-email".into(), client()).await;

        assert_matches!(result, Err(SubscribeError::InvalidEmail(_)));
    }
}
