use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::{debug, info};

use crate::{
    config::Config,
    dispatcher::MailTransport,
    error::{DispatchError, StartupError},
    models::email::OutgoingEmail,
};

/// SMTP transport built once at startup and shared by both consumer loops.
///
/// Each `send` opens its own SMTP session, so concurrent sends need no locking.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        let from: Mailbox = config.mail_from.parse().map_err(|e| {
            StartupError::Transport(format!("invalid MAIL_FROM `{}`: {}", config.mail_from, e))
        })?;

        let mut builder = if config.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| StartupError::Transport(format!("failed to create SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        builder = builder.port(config.smtp_port);

        if let Some((username, password)) = config.smtp_credentials() {
            builder = builder.credentials(Credentials::new(username, password));
        }

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = config.smtp_use_tls,
            "SMTP transport initialized"
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, DispatchError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e: lettre::address::AddressError| DispatchError::InvalidAddress {
                role: "recipient",
                address: email.to.clone(),
                reason: e.to_string(),
            })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| DispatchError::Build(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DispatchError> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        debug!(code = %response.code(), "SMTP server accepted message");
        Ok(())
    }
}
