use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::models::{
    email::RenderedEmail,
    notification::{DeclineContext, NotificationContext, SuccessContext},
};

const DECLINE_SUBJECT: &str = "Important: Issue with Your Ticket Purchase";

const DECLINE_BODY: &str = "Dear {{first_name}} {{last_name}},

We are sorry, but we were unable to complete your recent ticket purchase. \
The transaction was declined due to insufficient funds on your account.

To complete your purchase:
  1. Check that your account has enough available balance.
  2. Make sure your payment details are correct and up to date.
  3. Try the purchase again once the issue is resolved.

If you need help or believe this is a mistake, please contact our support team at {{support_contact}}.

We apologise for the inconvenience.

Kind regards,
The Cinema Team
";

const SUCCESS_SUBJECT: &str = "Your ticket for {{movie_title}} is confirmed!";

const SUCCESS_BODY: &str = "Dear {{first_name}} {{last_name}},

Thank you for your purchase! Your ticket for {{movie_title}} is confirmed.

Screening: {{start_time}}
Hall: {{hall_name}}
Seat: Row {{seat_row}}, Number {{seat_number}}
{{price_line}}
Please arrive a few minutes early. Enjoy the film!

Kind regards,
The Cinema Team
";

const DATE_FORMAT: &str = "%-d %B %Y";
const TIME_FORMAT: &str = "%H:%M";

pub struct TemplateEngine {
    support_contact: String,
}

impl TemplateEngine {
    pub fn new(support_contact: impl Into<String>) -> Self {
        Self {
            support_contact: support_contact.into(),
        }
    }

    /// Renders subject and body for an already validated context.
    pub fn render(&self, context: &NotificationContext) -> RenderedEmail {
        debug!(kind = %context.kind(), "Rendering template");

        match context {
            NotificationContext::Decline(ctx) => self.render_decline(ctx),
            NotificationContext::Success(ctx) => self.render_success(ctx),
        }
    }

    fn render_decline(&self, ctx: &DeclineContext) -> RenderedEmail {
        let variables = [
            ("first_name", ctx.recipient.first_name.clone()),
            ("last_name", ctx.recipient.last_name.clone()),
            ("support_contact", self.support_contact.clone()),
        ];

        RenderedEmail {
            subject: replace_variables(DECLINE_SUBJECT, &variables),
            body: replace_variables(DECLINE_BODY, &variables),
        }
    }

    fn render_success(&self, ctx: &SuccessContext) -> RenderedEmail {
        let price_line = ctx
            .price
            .map(|price| format!("Price: {:.2}\n", price))
            .unwrap_or_default();

        let variables = [
            ("first_name", ctx.recipient.first_name.clone()),
            ("last_name", ctx.recipient.last_name.clone()),
            ("movie_title", ctx.movie_title.clone()),
            (
                "start_time",
                format_start_time(&ctx.start_time, ctx.date.as_deref()),
            ),
            ("hall_name", ctx.hall_name.clone()),
            ("seat_row", ctx.seat_row.to_string()),
            ("seat_number", ctx.seat_number.to_string()),
            ("price_line", price_line),
        ];

        RenderedEmail {
            subject: replace_variables(SUCCESS_SUBJECT, &variables),
            body: replace_variables(SUCCESS_BODY, &variables),
        }
    }
}

/// Single left-to-right pass, so substituted values are never re-scanned.
/// Unknown placeholders are kept as written.
fn replace_variables(template: &str, variables: &[(&str, String)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match variables.iter().find(|(name, _)| *name == key) {
                    Some((_, value)) => result.push_str(value),
                    None => result.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after_open[end + 2..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

/// Presents a screening start time as `12 March 2025 at 19:30` where it can
/// be parsed, falling back to the raw text.
pub fn format_start_time(start_time: &str, date: Option<&str>) -> String {
    let raw = start_time.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return datetime
            .format(&format!("{DATE_FORMAT} at {TIME_FORMAT}"))
            .to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, pattern) {
            return datetime
                .format(&format!("{DATE_FORMAT} at {TIME_FORMAT}"))
                .to_string();
        }
    }

    for pattern in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, pattern) {
            let time = time.format(TIME_FORMAT).to_string();
            return match date.map(str::trim).filter(|d| !d.is_empty()) {
                Some(date) => format!("{} at {}", format_date(date), time),
                None => time,
            };
        }
    }

    raw.to_string()
}

fn format_date(date: &str) -> String {
    date.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|parsed| parsed.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| date.to_string())
}
