use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::store::{Document, FieldWrite, Fields, WriteBatch};

use super::validate::Violations;

/// Fields supplied when a reviewer rates a completed order. Names are
/// denormalized copies so review listings render without joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewCreate {
    pub product_id: String,
    pub seller_id: String,
    pub reviewer_id: String,
    pub order_id: String,
    pub rating: u8,
    pub comment: String,
    pub product_name: String,
    pub seller_name: String,
    pub reviewer_name: String,
    #[serde(default = "default_approved")]
    pub is_approved: bool,
    #[serde(default)]
    pub helpful_votes: u32,
}

fn default_approved() -> bool {
    true
}

impl ReviewCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.min_length("productId", &self.product_id, 5);
        v.min_length("sellerId", &self.seller_id, 5);
        v.min_length("reviewerId", &self.reviewer_id, 5);
        v.min_length("orderId", &self.order_id, 5);
        v.rating("rating", self.rating);
        v.length_between("comment", &self.comment, 10, 1000);
        v.min_length("productName", &self.product_name, 3);
        v.min_length("sellerName", &self.seller_name, 3);
        v.min_length("reviewerName", &self.reviewer_name, 3);
        v.into_result()
    }

    pub fn document_fields(&self) -> Result<Fields, ApiError> {
        super::to_fields(self)
    }
}

/// Partial review patch. Ids and denormalized names are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReviewUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpful_votes: Option<u32>,
}

impl ReviewUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(rating) = self.rating {
            v.rating("rating", rating);
        }
        if let Some(comment) = &self.comment {
            v.length_between("comment", comment, 10, 1000);
        }
        v.into_result()
    }

    pub fn writes(&self) -> Result<WriteBatch, ApiError> {
        Ok(super::to_fields(self)?
            .into_iter()
            .map(|(field, value)| (field, FieldWrite::Set(value)))
            .collect())
    }
}

/// Full review as returned by every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    pub product_id: String,
    pub seller_id: String,
    pub reviewer_id: String,
    pub order_id: String,
    pub rating: u8,
    pub comment: String,
    pub product_name: String,
    pub seller_name: String,
    pub reviewer_name: String,
    pub is_approved: bool,
    pub helpful_votes: u32,
    pub reviewed_at: DateTime<Utc>,
}

impl Review {
    pub fn from_document(doc: Document) -> Result<Self, ApiError> {
        super::document_into(doc, "reviewId", "review")
    }
}
