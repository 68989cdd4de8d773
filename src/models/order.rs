use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::store::{Document, FieldWrite, Fields, WriteBatch};

use super::validate::Violations;
use super::{parse_timestamp, push_patch, timestamp_value, Patch};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub country: String,
}

/// Fields supplied when a buyer places an order. Quantity is typically 1
/// for unique used parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderCreate {
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub product_name: String,
    pub product_price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub total_amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_order_status")]
    pub order_status: String,
    pub payment_method: String,
    #[serde(default = "default_payment_status")]
    pub payment_status: String,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub shipping_tracking_number: Option<String>,
    #[serde(default)]
    pub seller_notes: Option<String>,
    #[serde(default)]
    pub buyer_notes: Option<String>,
    #[serde(default)]
    pub review_id: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_order_status() -> String {
    "pending_payment".to_string()
}

fn default_payment_status() -> String {
    "unpaid".to_string()
}

impl OrderCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.min_length("productId", &self.product_id, 5);
        v.min_length("buyerId", &self.buyer_id, 5);
        v.min_length("sellerId", &self.seller_id, 5);
        v.min_length("productName", &self.product_name, 3);
        v.positive("productPrice", self.product_price);
        v.positive_count("quantity", self.quantity);
        v.positive("totalAmount", self.total_amount);
        v.max_length("currency", &self.currency, 5);
        v.max_length("orderStatus", &self.order_status, 50);
        v.max_length("paymentMethod", &self.payment_method, 50);
        v.max_length("paymentStatus", &self.payment_status, 20);
        v.into_result()
    }

    pub fn document_fields(&self) -> Result<Fields, ApiError> {
        super::to_fields(self)
    }
}

/// Partial order patch. Product, buyer, and seller ids are fixed at
/// creation and are not patchable. `shippedAt`/`deliveredAt` take an
/// ISO-8601 string to set a timestamp, or an explicit null to remove the
/// field from the stored document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderUpdate {
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub shipping_tracking_number: Patch<String>,
    #[serde(default)]
    pub seller_notes: Patch<String>,
    #[serde(default)]
    pub buyer_notes: Patch<String>,
    #[serde(default)]
    pub review_id: Patch<String>,
    #[serde(default)]
    pub shipped_at: Patch<String>,
    #[serde(default)]
    pub delivered_at: Patch<String>,
}

impl OrderUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(order_status) = &self.order_status {
            v.max_length("orderStatus", order_status, 50);
        }
        if let Some(payment_method) = &self.payment_method {
            v.max_length("paymentMethod", payment_method, 50);
        }
        if let Some(payment_status) = &self.payment_status {
            v.max_length("paymentStatus", payment_status, 20);
        }
        v.into_result()
    }

    pub fn writes(&self) -> Result<WriteBatch, ApiError> {
        let mut writes = WriteBatch::new();
        if let Some(order_status) = &self.order_status {
            writes.push((
                "orderStatus".to_string(),
                FieldWrite::Set(Value::String(order_status.clone())),
            ));
        }
        if let Some(payment_method) = &self.payment_method {
            writes.push((
                "paymentMethod".to_string(),
                FieldWrite::Set(Value::String(payment_method.clone())),
            ));
        }
        if let Some(payment_status) = &self.payment_status {
            writes.push((
                "paymentStatus".to_string(),
                FieldWrite::Set(Value::String(payment_status.clone())),
            ));
        }
        if let Some(shipping_address) = &self.shipping_address {
            writes.push((
                "shippingAddress".to_string(),
                FieldWrite::Set(super::field_value("shippingAddress", shipping_address)?),
            ));
        }
        push_patch(&mut writes, "shippingTrackingNumber", &self.shipping_tracking_number)?;
        push_patch(&mut writes, "sellerNotes", &self.seller_notes)?;
        push_patch(&mut writes, "buyerNotes", &self.buyer_notes)?;
        push_patch(&mut writes, "reviewId", &self.review_id)?;

        for (field, patch) in
            [("shippedAt", &self.shipped_at), ("deliveredAt", &self.delivered_at)]
        {
            match patch {
                Patch::Absent => {}
                // Explicit null removes the key, it does not store a null.
                Patch::Null => writes.push((field.to_string(), FieldWrite::Delete)),
                Patch::Value(raw) => {
                    let at = parse_timestamp(field, raw)?;
                    writes.push((field.to_string(), FieldWrite::Set(timestamp_value(at))));
                }
            }
        }
        Ok(writes)
    }
}

/// Full order as returned by every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub product_name: String,
    pub product_price: f64,
    pub quantity: u32,
    pub total_amount: f64,
    pub currency: String,
    pub order_status: String,
    pub payment_method: String,
    pub payment_status: String,
    pub shipping_address: ShippingAddress,
    pub shipping_tracking_number: Option<String>,
    pub seller_notes: Option<String>,
    pub buyer_notes: Option<String>,
    pub review_id: Option<String>,
    pub ordered_at: DateTime<Utc>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn from_document(doc: Document) -> Result<Self, ApiError> {
        super::document_into(doc, "orderId", "order")
    }
}
