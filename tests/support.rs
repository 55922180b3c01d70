use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};
use ticket_mailer::{
    dispatcher::{Dispatcher, MailTransport},
    error::DispatchError,
    models::{email::OutgoingEmail, retry::RetryConfig},
    template::TemplateEngine,
};

pub const SUPPORT_CONTACT: &str = "help@cinema.test";

/// Records every email it is given; fails the first `n` sends when asked to.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutgoingEmail>>,
    failures: Mutex<VecDeque<String>>,
    attempts: AtomicU32,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_first(n: usize) -> Arc<Self> {
        let transport = Self::default();
        {
            let mut failures = transport.failures.lock().unwrap();
            for i in 0..n {
                failures.push_back(format!("connection refused (attempt {})", i + 1));
            }
        }
        Arc::new(transport)
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DispatchError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self.failures.lock().unwrap().pop_front() {
            return Err(DispatchError::Transport(reason));
        }

        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Never completes a send.
pub struct HangingTransport;

#[async_trait]
impl MailTransport for HangingTransport {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), DispatchError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

pub fn dispatcher(transport: Arc<dyn MailTransport>) -> Dispatcher {
    Dispatcher::new(transport, RetryConfig::single_attempt(), Duration::from_secs(5))
}

pub fn templates() -> TemplateEngine {
    TemplateEngine::new(SUPPORT_CONTACT)
}

pub fn decline_payload() -> Value {
    json!({
        "data": {
            "order": {
                "customer": {
                    "firstName": "Jane",
                    "lastName": "Doe",
                    "email": "jane@example.com"
                }
            }
        }
    })
}

pub fn success_payload() -> Value {
    json!({
        "data": {
            "order": {
                "orderId": 991,
                "customer": {
                    "customerId": 17,
                    "firstName": "Paul",
                    "lastName": "Atreides",
                    "email": "paul@arrakis.test",
                    "phoneNumber": "+44 20 7946 0000",
                    "createdAt": "2024-11-02T10:15:00"
                }
            },
            "screening": {
                "date": "2025-03-12T00:00:00",
                "startTime": "2025-03-12T19:30:00",
                "endTime": "2025-03-12T22:16:00",
                "movie": {
                    "title": "Dune",
                    "director": "Denis Villeneuve",
                    "year": 2021,
                    "language": "English",
                    "duration": 155,
                    "pegi": 12,
                    "imageURL": "https://img.test/dune.jpg",
                    "trailerURL": "https://video.test/dune"
                },
                "hall": {
                    "hallId": 3,
                    "hallName": "Hall 3",
                    "seatRows": 12,
                    "seatNumber": 20,
                    "createdAt": "2024-01-01T00:00:00"
                }
            },
            "seat": {
                "seatRow": 5,
                "seatNumber": 12,
                "price": 11.5,
                "hall": { "hallId": 3, "hallName": "Hall 3" }
            }
        }
    })
}

pub fn to_bytes(value: &Value) -> Vec<u8> {
    serde_json::to_vec(value).unwrap()
}
