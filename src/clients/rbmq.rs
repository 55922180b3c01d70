use lapin::{
    Channel, Connection, ConnectionProperties, Consumer,
    options::{BasicConsumeOptions, QueueDeclareOptions},
    types::FieldTable,
};
use tracing::info;

use crate::{config::Config, error::StartupError, models::notification::NotificationKind};

/// One broker connection and channel shared by both consumer loops.
pub struct RabbitMqClient {
    _connection: Connection,
    channel: Channel,
    transaction_queue: String,
    admin_queue: String,
}

impl RabbitMqClient {
    pub async fn connect(config: &Config) -> Result<Self, StartupError> {
        info!("Connecting to RabbitMQ...");

        let connection =
            Connection::connect(config.connection_url()?, ConnectionProperties::default())
                .await
                .map_err(|e| StartupError::Broker(format!("failed to connect: {}", e)))?;

        info!("RabbitMQ connection established");

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| StartupError::Broker(format!("channel creation failed: {}", e)))?;

        for queue in [&config.transaction_queue, &config.admin_queue] {
            channel
                .queue_declare(
                    queue,
                    QueueDeclareOptions {
                        durable: config.queue_durable,
                        exclusive: false,
                        auto_delete: false,
                        ..Default::default()
                    },
                    FieldTable::default(),
                )
                .await
                .map_err(|e| {
                    StartupError::Broker(format!("failed to declare queue `{}`: {}", queue, e))
                })?;

            info!(queue = %queue, durable = config.queue_durable, "Queue declared");
        }

        Ok(Self {
            _connection: connection,
            channel,
            transaction_queue: config.transaction_queue.clone(),
            admin_queue: config.admin_queue.clone(),
        })
    }

    pub fn queue_name(&self, kind: NotificationKind) -> &str {
        match kind {
            NotificationKind::Decline => &self.transaction_queue,
            NotificationKind::Success => &self.admin_queue,
        }
    }

    /// Starts an auto-acknowledged consumer: deliveries count as handled on
    /// receipt and are never redelivered.
    pub async fn create_consumer(&self, kind: NotificationKind) -> Result<Consumer, StartupError> {
        let queue = self.queue_name(kind);

        let consumer = self
            .channel
            .basic_consume(
                queue,
                &format!("ticket_mailer_{}", kind),
                BasicConsumeOptions {
                    no_ack: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                StartupError::Broker(format!("failed to consume from `{}`: {}", queue, e))
            })?;

        info!(queue = %queue, kind = %kind, "Consumer created for queue");

        Ok(consumer)
    }
}
