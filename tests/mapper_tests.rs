use serde_json::json;
use ticket_mailer::{
    decoder::decode,
    error::ValidationError,
    mapper::{map, map_for_decline, map_for_success},
    models::{
        notification::{NotificationContext, NotificationKind},
        transaction::{Customer, Order, TicketTransaction},
    },
};

use crate::support::{decline_payload, success_payload, to_bytes};

fn decode_value(value: &serde_json::Value) -> TicketTransaction {
    decode(&to_bytes(value)).unwrap()
}

fn remove(value: &mut serde_json::Value, path: &[&str]) {
    let (last, parents) = path.split_last().unwrap();
    let mut node = &mut value["data"];
    for key in parents {
        node = &mut node[*key];
    }
    node.as_object_mut().unwrap().remove(*last);
}

fn missing_path(result: Result<NotificationContext, ValidationError>) -> &'static str {
    match result {
        Err(e) => e.path(),
        Ok(ctx) => panic!("expected a validation error, got {ctx:?}"),
    }
}

/// Test: Both mappers reject a transaction without a customer
#[test]
fn test_missing_customer_fails_both_kinds() {
    let without_order = TicketTransaction::default();
    let without_customer = TicketTransaction {
        order: Some(Order { customer: None }),
        ..Default::default()
    };

    for transaction in [&without_order, &without_customer] {
        let decline = missing_path(map_for_decline(transaction));
        let success = missing_path(map_for_success(transaction));

        assert_eq!(decline, "order.customer");
        assert_eq!(success, "order.customer");
        assert!(decline.contains("customer"));
    }

    let mut full = success_payload();
    remove(&mut full, &["order", "customer"]);
    assert_eq!(
        missing_path(map_for_success(&decode_value(&full))),
        "order.customer"
    );
}

/// Test: Decline needs first name, last name and email
#[test]
fn test_decline_requires_customer_identity() {
    for (field, path) in [
        ("firstName", "order.customer.firstName"),
        ("lastName", "order.customer.lastName"),
        ("email", "order.customer.email"),
    ] {
        let mut payload = decline_payload();
        remove(&mut payload, &["order", "customer", field]);

        assert_eq!(missing_path(map_for_decline(&decode_value(&payload))), path);
    }
}

/// Test: Blank strings count as missing
#[test]
fn test_blank_email_is_missing() {
    let transaction = TicketTransaction {
        order: Some(Order {
            customer: Some(Customer {
                first_name: Some("Jane".into()),
                last_name: Some("Doe".into()),
                email: Some("   ".into()),
                ..Default::default()
            }),
        }),
        ..Default::default()
    };

    assert_eq!(
        map_for_decline(&transaction),
        Err(ValidationError::MissingField {
            path: "order.customer.email"
        })
    );
}

/// Test: Surrounding whitespace is stripped from required text
#[test]
fn test_required_text_is_trimmed() {
    let mut payload = decline_payload();
    payload["data"]["order"]["customer"]["email"] = " jane@example.com ".into();
    payload["data"]["order"]["customer"]["firstName"] = "Jane\t".into();

    let context = map_for_decline(&decode_value(&payload)).unwrap();
    let recipient = context.recipient();
    assert_eq!(recipient.email, "jane@example.com");
    assert_eq!(recipient.first_name, "Jane");
}

/// Test: Decline ignores everything but the customer
#[test]
fn test_decline_maps_customer_only() {
    let context = map_for_decline(&decode_value(&decline_payload())).unwrap();

    assert_eq!(context.kind(), NotificationKind::Decline);
    let recipient = context.recipient();
    assert_eq!(recipient.first_name, "Jane");
    assert_eq!(recipient.last_name, "Doe");
    assert_eq!(recipient.email, "jane@example.com");
}

/// Test: Success reports the first missing node in chain order
#[test]
fn test_success_reports_each_missing_node() {
    let cases: [(&[&str], &str); 9] = [
        (&["screening"], "screening"),
        (&["screening", "movie"], "screening.movie"),
        (&["screening", "hall"], "screening.hall"),
        (&["seat"], "seat"),
        (&["screening", "movie", "title"], "screening.movie.title"),
        (&["screening", "startTime"], "screening.startTime"),
        (&["screening", "hall", "hallName"], "screening.hall.hallName"),
        (&["seat", "seatRow"], "seat.seatRow"),
        (&["seat", "seatNumber"], "seat.seatNumber"),
    ];

    for (removed, expected) in cases {
        let mut payload = success_payload();
        remove(&mut payload, removed);

        assert_eq!(
            missing_path(map_for_success(&decode_value(&payload))),
            expected,
            "after removing {removed:?}"
        );
    }
}

/// Test: Optional details do not block a success notification
#[test]
fn test_success_tolerates_missing_optional_fields() {
    let mut payload = success_payload();
    remove(&mut payload, &["seat", "price"]);
    remove(&mut payload, &["screening", "date"]);
    remove(&mut payload, &["screening", "endTime"]);
    remove(&mut payload, &["screening", "movie", "director"]);
    remove(&mut payload, &["order", "customer", "phoneNumber"]);

    let context = map_for_success(&decode_value(&payload)).unwrap();
    match context {
        NotificationContext::Success(ctx) => {
            assert!(ctx.price.is_none());
            assert!(ctx.date.is_none());
        }
        other => panic!("expected success context, got {other:?}"),
    }
}

/// Test: Success extracts values without reformatting them
#[test]
fn test_success_extracts_raw_values() {
    let context = map(NotificationKind::Success, &decode_value(&success_payload())).unwrap();

    let NotificationContext::Success(ctx) = context else {
        panic!("expected success context");
    };
    assert_eq!(ctx.recipient.email, "paul@arrakis.test");
    assert_eq!(ctx.movie_title, "Dune");
    assert_eq!(ctx.start_time, "2025-03-12T19:30:00");
    assert_eq!(ctx.date.as_deref(), Some("2025-03-12T00:00:00"));
    assert_eq!(ctx.hall_name, "Hall 3");
    assert_eq!((ctx.seat_row, ctx.seat_number), (5, 12));
    assert_eq!(ctx.price, Some(11.5));
}

/// Test: Kind selects the mapper
#[test]
fn test_map_dispatches_on_kind() {
    let transaction = decode_value(&json!({"data": {"order": {"customer": {
        "firstName": "Jane", "lastName": "Doe", "email": "jane@example.com"
    }}}}));

    assert!(map(NotificationKind::Decline, &transaction).is_ok());
    assert_eq!(
        missing_path(map(NotificationKind::Success, &transaction)),
        "screening"
    );
}
