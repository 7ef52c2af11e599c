//! JSON shapes of the order API.
//!
//! Responses are decoded into private wire structs and converted into
//! domain types here, so the HTTP adapter only deals with bodies and
//! status codes.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::app::model::{Order, OrderId};
use crate::error::RemoteError;

#[derive(Deserialize)]
struct Ack {
    success: bool,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    success: bool,
    #[serde(default)]
    order: Option<WireOrder>,
}

/// Only `id` and `drinkName` can reject an order.  The server has already
/// assigned it to this device, so a badly typed extra must not strand it.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOrder {
    id: Value,
    drink_name: String,
    #[serde(default, deserialize_with = "lenient")]
    toppings: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    size: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    queue_position: Option<u32>,
}

/// Decode an informational field, dropping it if it has the wrong shape.
fn lenient<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(de)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!("Ignoring order field {}: {}", value, e);
            Ok(None)
        }
    }
}

impl TryFrom<WireOrder> for Order {
    type Error = RemoteError;

    fn try_from(wire: WireOrder) -> Result<Self, RemoteError> {
        let id = match wire.id {
            Value::String(s) if !s.is_empty() => s,
            Value::Number(n) => n.to_string(),
            other => return Err(RemoteError::Malformed(format!("unusable order id: {other}"))),
        };
        Ok(Self {
            id: OrderId::new(id),
            drink_name: wire.drink_name,
            toppings: wire.toppings.unwrap_or_default(),
            size: wire.size,
            queue_position: wire.queue_position,
        })
    }
}

/// Decode a `GET /hardware/orders` body.
///
/// `Ok(None)` means the server answered cleanly with no pending order.
pub fn parse_order_response(body: &str) -> Result<Option<Order>, RemoteError> {
    let envelope: OrderEnvelope =
        serde_json::from_str(body).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    if !envelope.success {
        return Err(RemoteError::Rejected);
    }
    envelope.order.map(Order::try_from).transpose()
}

/// Decode a `{success}` acknowledgement.  Extra fields are ignored.
pub fn parse_ack(body: &str) -> Result<(), RemoteError> {
    let ack: Ack = serde_json::from_str(body).map_err(|e| RemoteError::Malformed(e.to_string()))?;
    if ack.success {
        Ok(())
    } else {
        Err(RemoteError::Rejected)
    }
}
