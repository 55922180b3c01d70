//! Projects a decoded transaction onto the fields a notification needs.
//!
//! Both mappers walk the optional chain top-down and stop at the first
//! absent node, reporting its dotted path.

use crate::{
    error::ValidationError,
    models::{
        notification::{
            DeclineContext, NotificationContext, NotificationKind, Recipient, SuccessContext,
        },
        transaction::{Customer, TicketTransaction},
    },
};

fn required<'a, T>(value: Option<&'a T>, path: &'static str) -> Result<&'a T, ValidationError> {
    value.ok_or(ValidationError::MissingField { path })
}

fn required_text(value: Option<&String>, path: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(ValidationError::MissingField { path }),
    }
}

fn recipient(transaction: &TicketTransaction) -> Result<Recipient, ValidationError> {
    let customer: &Customer = required(
        transaction
            .order
            .as_ref()
            .and_then(|order| order.customer.as_ref()),
        "order.customer",
    )?;

    Ok(Recipient {
        first_name: required_text(customer.first_name.as_ref(), "order.customer.firstName")?,
        last_name: required_text(customer.last_name.as_ref(), "order.customer.lastName")?,
        email: required_text(customer.email.as_ref(), "order.customer.email")?,
    })
}

pub fn map_for_decline(
    transaction: &TicketTransaction,
) -> Result<NotificationContext, ValidationError> {
    Ok(NotificationContext::Decline(DeclineContext {
        recipient: recipient(transaction)?,
    }))
}

pub fn map_for_success(
    transaction: &TicketTransaction,
) -> Result<NotificationContext, ValidationError> {
    let recipient = recipient(transaction)?;

    let screening = required(transaction.screening.as_ref(), "screening")?;
    let movie = required(screening.movie.as_ref(), "screening.movie")?;
    let hall = required(screening.hall.as_ref(), "screening.hall")?;
    let seat = required(transaction.seat.as_ref(), "seat")?;

    Ok(NotificationContext::Success(SuccessContext {
        recipient,
        movie_title: required_text(movie.title.as_ref(), "screening.movie.title")?,
        start_time: required_text(screening.start_time.as_ref(), "screening.startTime")?,
        date: screening.date.clone(),
        hall_name: required_text(hall.hall_name.as_ref(), "screening.hall.hallName")?,
        seat_row: *required(seat.seat_row.as_ref(), "seat.seatRow")?,
        seat_number: *required(seat.seat_number.as_ref(), "seat.seatNumber")?,
        price: seat.price,
    }))
}

pub fn map(
    kind: NotificationKind,
    transaction: &TicketTransaction,
) -> Result<NotificationContext, ValidationError> {
    match kind {
        NotificationKind::Decline => map_for_decline(transaction),
        NotificationKind::Success => map_for_success(transaction),
    }
}
