use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use futures_util::StreamExt;
use ticket_mailer::{
    clients::{rbmq::RabbitMqClient, smtp::SmtpMailer},
    config::Config,
    dispatcher::Dispatcher,
    models::notification::NotificationKind,
    telemetry::{LogFormat, init_tracing},
    template::TemplateEngine,
    worker::ConsumerLoop,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(LogFormat::from_env());

    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = Config::load().inspect_err(|e| error!(error = %e, "Startup aborted"))?;

    let mailer = SmtpMailer::new(&config)?;
    let dispatcher = Dispatcher::new(
        Arc::new(mailer),
        config.retry_config(),
        config.send_timeout(),
    );
    let templates = Arc::new(TemplateEngine::new(config.support_contact.clone()));

    let rabbitmq = RabbitMqClient::connect(&config).await?;

    let decline = ConsumerLoop::new(
        NotificationKind::Decline,
        rabbitmq.queue_name(NotificationKind::Decline),
        Arc::clone(&templates),
        dispatcher.clone(),
    );
    let success = ConsumerLoop::new(
        NotificationKind::Success,
        rabbitmq.queue_name(NotificationKind::Success),
        Arc::clone(&templates),
        dispatcher,
    );

    let decline_deliveries = rabbitmq
        .create_consumer(NotificationKind::Decline)
        .await?
        .map(|delivery| delivery.map(|d| d.data));
    let success_deliveries = rabbitmq
        .create_consumer(NotificationKind::Success)
        .await?
        .map(|delivery| delivery.map(|d| d.data));

    let mut decline_task = tokio::spawn(async move { decline.run(decline_deliveries).await });
    let mut success_task = tokio::spawn(async move { success.run(success_deliveries).await });

    info!("Worker is ready, waiting for messages");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            decline_task.abort();
            success_task.abort();
            Ok(())
        }
        stats = &mut decline_task => {
            success_task.abort();
            Err(anyhow!("decline consumer stopped unexpectedly: {:?}", stats))
        }
        stats = &mut success_task => {
            decline_task.abort();
            Err(anyhow!("success consumer stopped unexpectedly: {:?}", stats))
        }
    }
}
