use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

/// Which queue a message came from, and so which email it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Decline,
    Success,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Decline => "decline",
            NotificationKind::Success => "success",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclineContext {
    pub recipient: Recipient,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuccessContext {
    pub recipient: Recipient,
    pub movie_title: String,
    pub start_time: String,
    /// Screening date as sent by the publisher, if any.
    pub date: Option<String>,
    pub hall_name: String,
    pub seat_row: i32,
    pub seat_number: i32,
    pub price: Option<f64>,
}

/// Everything one email template needs, already checked for presence.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationContext {
    Decline(DeclineContext),
    Success(SuccessContext),
}

impl NotificationContext {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationContext::Decline(_) => NotificationKind::Decline,
            NotificationContext::Success(_) => NotificationKind::Success,
        }
    }

    pub fn recipient(&self) -> &Recipient {
        match self {
            NotificationContext::Decline(ctx) => &ctx.recipient,
            NotificationContext::Success(ctx) => &ctx.recipient,
        }
    }
}
