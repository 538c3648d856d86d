use anyhow::anyhow;
use email_address::EmailAddress;
use lettre::{
    message::{header, MessageBuilder},
    transport::smtp,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{ContentType, Email, EmailSendError, EmailService};
use portfolio_utils::Apply;

#[derive(Debug, Clone)]
pub struct SmtpEmailService {
    from: EmailAddress,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    pub fn new(url: &str, from: EmailAddress) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(url)?.build();

        Ok(Self { from, transport })
    }
}

impl EmailService for SmtpEmailService {
    async fn send(&self, email: Email) -> Result<(), EmailSendError> {
        let message = Message::builder()
            .from(self.from.as_str().parse().map_err(anyhow::Error::from)?)
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject)
            .header(match email.content_type {
                ContentType::Text => header::ContentType::TEXT_PLAIN,
                ContentType::Html => header::ContentType::TEXT_HTML,
            })
            .body(email.body)
            .map_err(anyhow::Error::from)?;

        let response = self.transport.send(message).await.map_err(classify)?;

        if !response.is_positive() {
            return Err(EmailSendError::Other(anyhow!(
                "SMTP server rejected the message: {}",
                response.code()
            )));
        }

        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn classify(err: smtp::Error) -> EmailSendError {
    if is_auth_failure(&err) {
        EmailSendError::Auth(err.into())
    } else if err.is_timeout() || has_io_source(&err) {
        EmailSendError::Connection(err.into())
    } else {
        EmailSendError::Other(err.into())
    }
}

// lettre does not expose the SMTP reply code, so authentication failures are
// recognized from the rendered permanent response.
fn is_auth_failure(err: &smtp::Error) -> bool {
    err.is_permanent() && err.to_string().to_ascii_lowercase().contains("auth")
}

fn has_io_source(err: &smtp::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if inner.downcast_ref::<std::io::Error>().is_some() {
            return true;
        }
        source = inner.source();
    }
    false
}
