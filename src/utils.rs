use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::{
    decoder::decode,
    dispatcher::Dispatcher,
    error::PipelineError,
    mapper,
    models::{email::OutgoingEmail, notification::NotificationKind, retry::RetryConfig},
    template::TemplateEngine,
};

/// Runs one message through decode, validation, rendering and dispatch.
///
/// Returns the email that was handed to the transport.
pub async fn process_message(
    kind: NotificationKind,
    payload: &[u8],
    templates: &TemplateEngine,
    dispatcher: &Dispatcher,
) -> Result<OutgoingEmail, PipelineError> {
    debug!(
        kind = %kind,
        payload = %String::from_utf8_lossy(payload),
        "Raw payload"
    );

    let transaction = decode(payload)?;
    let context = mapper::map(kind, &transaction)?;

    info!(
        kind = %kind,
        to = %context.recipient().email,
        "Processing notification message"
    );

    let rendered = templates.render(&context);
    let email = OutgoingEmail::new(context.recipient().email.clone(), rendered);

    dispatcher.dispatch(&email).await?;

    Ok(email)
}

pub async fn retry_with_backoff<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        attempt,
                        max_attempts = config.max_attempts,
                        "Retry succeeded"
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if attempt >= config.max_attempts {
                    if config.max_attempts > 1 {
                        warn!(
                            max_attempts = config.max_attempts,
                            error = %e,
                            "Retry failed after exhausting all attempts"
                        );
                    }
                    return Err(e);
                }

                debug!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms,
                    error = %e,
                    "Attempt failed, backing off"
                );

                let jitter = rand::random_range(-0.1..=0.1);

                let jittered_delay = (delay_ms as f64 * (1.0 + jitter)) as u64;

                sleep(Duration::from_millis(jittered_delay)).await;

                delay_ms = std::cmp::min(
                    delay_ms.saturating_mul(config.backoff_multiplier),
                    config.max_delay_ms,
                );
            }
        }
    }
}
