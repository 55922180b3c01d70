//! Wire shape of a ticket transaction as published by the purchase service.
//!
//! Every attribute is optional: publishers send whatever subset they have and
//! the mapper decides what a given notification actually needs. A value of the
//! wrong JSON type is read as absent, so only the mapper can reject a message
//! for its content.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Reads any JSON value and keeps it only if it has the expected shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Outer wrapper around every queue message body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<TicketTransaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTransaction {
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<Order>,
    #[serde(default, deserialize_with = "lenient")]
    pub screening: Option<Screening>,
    #[serde(default, deserialize_with = "lenient")]
    pub seat: Option<Seat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, deserialize_with = "lenient")]
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screening {
    #[serde(default, deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub movie: Option<Movie>,
    #[serde(default, deserialize_with = "lenient")]
    pub hall: Option<Hall>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub pegi: Option<i32>,
    #[serde(rename = "imageURL", default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(rename = "trailerURL", default, deserialize_with = "lenient")]
    pub trailer_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    #[serde(default, deserialize_with = "lenient")]
    pub hall_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hall_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub seat_rows: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub seat_number: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(default, deserialize_with = "lenient")]
    pub seat_row: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub seat_number: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hall: Option<Hall>,
}
