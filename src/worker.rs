//! Per-queue consumer loop.
//!
//! A loop owns one delivery stream and handles each body to completion
//! before awaiting the next one. Per-message failures are logged and
//! counted; they never end the loop. The loop returns only when the
//! stream itself ends.

use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use futures_util::{Stream, StreamExt};
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::{
    dispatcher::Dispatcher, error::PipelineError, models::notification::NotificationKind,
    template::TemplateEngine, utils::process_message,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerState {
    Idle,
    Processing,
}

impl Display for ConsumerState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsumerState::Idle => write!(f, "idle"),
            ConsumerState::Processing => write!(f, "processing"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub received: u64,
    pub sent: u64,
    pub failed: u64,
    pub stream_errors: u64,
}

pub struct ConsumerLoop {
    kind: NotificationKind,
    queue_name: String,
    templates: Arc<TemplateEngine>,
    dispatcher: Dispatcher,
}

impl ConsumerLoop {
    pub fn new(
        kind: NotificationKind,
        queue_name: impl Into<String>,
        templates: Arc<TemplateEngine>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            kind,
            queue_name: queue_name.into(),
            templates,
            dispatcher,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub async fn run<S, B, E>(&self, deliveries: S) -> ConsumerStats
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Display,
    {
        let mut deliveries = std::pin::pin!(deliveries);
        let mut stats = ConsumerStats::default();
        let mut state = ConsumerState::Idle;

        info!(queue = %self.queue_name, kind = %self.kind, "Consumer started");

        while let Some(delivery) = deliveries.next().await {
            let body = match delivery {
                Ok(body) => body,
                Err(e) => {
                    stats.stream_errors += 1;
                    warn!(queue = %self.queue_name, error = %e, "Failed to receive delivery");
                    continue;
                }
            };

            stats.received += 1;
            state = self.transition(state, ConsumerState::Processing);

            let span = info_span!(
                "message",
                trace_id = %Uuid::new_v4(),
                queue = %self.queue_name,
                kind = %self.kind
            );

            if self.handle(body.as_ref()).instrument(span).await {
                stats.sent += 1;
            } else {
                stats.failed += 1;
            }

            state = self.transition(state, ConsumerState::Idle);
        }

        error!(
            queue = %self.queue_name,
            received = stats.received,
            sent = stats.sent,
            failed = stats.failed,
            "Delivery stream closed, consumer stopped"
        );

        stats
    }

    async fn handle(&self, body: &[u8]) -> bool {
        match process_message(self.kind, body, &self.templates, &self.dispatcher).await {
            Ok(email) => {
                info!(to = %email.to, subject = %email.subject, "Notification sent");
                true
            }
            Err(e) => {
                log_failure(&e);
                false
            }
        }
    }

    fn transition(&self, from: ConsumerState, to: ConsumerState) -> ConsumerState {
        debug!(queue = %self.queue_name, from = %from, to = %to, "Consumer state change");
        to
    }
}

fn log_failure(e: &PipelineError) {
    match e {
        PipelineError::Validation(v) => {
            warn!(stage = e.stage(), path = v.path(), error = %e, "Message discarded")
        }
        PipelineError::Decode(_) => warn!(stage = e.stage(), error = %e, "Message discarded"),
        PipelineError::Dispatch(_) => error!(stage = e.stage(), error = %e, "Notification not sent"),
    }
}
