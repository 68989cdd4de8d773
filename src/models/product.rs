use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Document, FieldWrite, Fields, WriteBatch};

use super::validate::Violations;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub country: String,
}

/// Client-supplied fields for a new listing. Unknown fields are rejected,
/// never dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductCreate {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub condition: String,
    pub images: Vec<String>,
    pub seller_id: String,
    pub seller_name: String,
    pub location: Location,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub specifications: String,
    #[serde(default)]
    pub years_used: u32,
    #[serde(default)]
    pub negotiable: bool,
    #[serde(default = "default_shipping_options")]
    pub shipping_options: Vec<String>,
}

fn default_currency() -> String {
    "BDT".to_string()
}

fn default_status() -> String {
    "available".to_string()
}

fn default_shipping_options() -> Vec<String> {
    vec!["local pickup".to_string()]
}

impl ProductCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.length_between("name", &self.name, 3, 100);
        v.length_between("category", &self.category, 2, 50);
        v.length_between("subcategory", &self.subcategory, 2, 50);
        v.length_between("description", &self.description, 10, 1000);
        v.positive("price", self.price);
        v.max_length("currency", &self.currency, 5);
        v.max_length("condition", &self.condition, 50);
        v.non_empty("images", &self.images, "at least one image is required");
        v.min_length("sellerId", &self.seller_id, 5);
        v.length_between("sellerName", &self.seller_name, 3, 100);
        v.max_length("status", &self.status, 20);
        v.max_length("specifications", &self.specifications, 1000);
        v.non_empty(
            "shippingOptions",
            &self.shipping_options,
            "at least one shipping option is required",
        );
        v.into_result()
    }

    pub fn document_fields(&self) -> Result<Fields, ApiError> {
        super::to_fields(self)
    }
}

/// Partial patch; absent fields are left untouched in the stored document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_options: Option<Vec<String>>,
}

impl ProductUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(name) = &self.name {
            v.length_between("name", name, 3, 100);
        }
        if let Some(category) = &self.category {
            v.length_between("category", category, 2, 50);
        }
        if let Some(subcategory) = &self.subcategory {
            v.length_between("subcategory", subcategory, 2, 50);
        }
        if let Some(description) = &self.description {
            v.length_between("description", description, 10, 1000);
        }
        if let Some(price) = self.price {
            v.positive("price", price);
        }
        if let Some(currency) = &self.currency {
            v.max_length("currency", currency, 5);
        }
        if let Some(condition) = &self.condition {
            v.max_length("condition", condition, 50);
        }
        if let Some(images) = &self.images {
            v.non_empty("images", images, "at least one image is required");
        }
        if let Some(seller_id) = &self.seller_id {
            v.min_length("sellerId", seller_id, 5);
        }
        if let Some(seller_name) = &self.seller_name {
            v.length_between("sellerName", seller_name, 3, 100);
        }
        if let Some(status) = &self.status {
            v.max_length("status", status, 20);
        }
        if let Some(specifications) = &self.specifications {
            v.max_length("specifications", specifications, 1000);
        }
        if let Some(shipping_options) = &self.shipping_options {
            v.non_empty(
                "shippingOptions",
                shipping_options,
                "at least one shipping option is required",
            );
        }
        v.into_result()
    }

    /// Tagged writes for exactly the fields present in the patch.
    pub fn writes(&self) -> Result<WriteBatch, ApiError> {
        Ok(super::to_fields(self)?
            .into_iter()
            .map(|(field, value)| (field, FieldWrite::Set(value)))
            .collect())
    }
}

/// Full listing as returned by every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub condition: String,
    pub images: Vec<String>,
    pub seller_id: String,
    pub seller_name: String,
    pub location: Location,
    pub status: String,
    pub specifications: String,
    pub years_used: u32,
    pub negotiable: bool,
    pub shipping_options: Vec<String>,
    pub posted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub views: u64,
}

impl Product {
    pub fn from_document(doc: Document) -> Result<Self, ApiError> {
        super::document_into(doc, "productId", "product")
    }
}
