use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::{
    error::DispatchError,
    models::{email::OutgoingEmail, retry::RetryConfig},
    utils::retry_with_backoff,
};

/// Outbound mail collaborator. Implementations must tolerate concurrent
/// `send` calls from both consumer loops.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DispatchError>;
}

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
    retry_config: RetryConfig,
    send_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        retry_config: RetryConfig,
        send_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            retry_config,
            send_timeout,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DispatchError> {
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };

        self.dispatch(&email).await
    }

    pub async fn dispatch(&self, email: &OutgoingEmail) -> Result<(), DispatchError> {
        debug!(to = %email.to, subject = %email.subject, "Dispatching email");

        retry_with_backoff(&self.retry_config, || self.attempt(email)).await?;

        info!(to = %email.to, "Email handed to mail transport");
        Ok(())
    }

    async fn attempt(&self, email: &OutgoingEmail) -> Result<(), DispatchError> {
        match timeout(self.send_timeout, self.transport.send(email)).await {
            Ok(result) => result,
            Err(_) => Err(DispatchError::Timeout {
                seconds: self.send_timeout.as_secs(),
            }),
        }
    }
}
