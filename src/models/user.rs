use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::store::{Document, FieldWrite, Fields, WriteBatch};

use super::validate::Violations;
use super::{push_patch, Patch};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    pub city: String,
    #[serde(default)]
    pub zip_code: Option<String>,
    pub country: String,
}

/// Profile fields supplied at signup. The document key is the
/// authenticated subject's uid, never client-chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserCreate {
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub is_verified_seller: bool,
}

fn default_roles() -> Vec<String> {
    vec!["buyer".to_string()]
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        v.email("email", &self.email);
        v.length_between("displayName", &self.display_name, 3, 100);
        v.within("rating", self.rating, 0.0, 5.0);
        v.into_result()
    }

    pub fn document_fields(&self) -> Result<Fields, ApiError> {
        super::to_fields(self)
    }
}

/// Partial profile patch. Nullable fields use [`Patch`] so an explicit
/// null stores a null while an absent field is left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Patch<String>,
    #[serde(default)]
    pub phone_number: Patch<String>,
    #[serde(default)]
    pub address: Patch<Address>,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub bio: Patch<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u32>,
    #[serde(default)]
    pub is_verified_seller: Option<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut v = Violations::new();
        if let Some(email) = &self.email {
            v.email("email", email);
        }
        if let Some(display_name) = &self.display_name {
            v.length_between("displayName", display_name, 3, 100);
        }
        if let Some(rating) = self.rating {
            v.within("rating", rating, 0.0, 5.0);
        }
        v.into_result()
    }

    pub fn writes(&self) -> Result<WriteBatch, ApiError> {
        let mut writes = WriteBatch::new();
        if let Some(email) = &self.email {
            writes.push(("email".to_string(), FieldWrite::Set(Value::String(email.clone()))));
        }
        if let Some(display_name) = &self.display_name {
            writes.push((
                "displayName".to_string(),
                FieldWrite::Set(Value::String(display_name.clone())),
            ));
        }
        push_patch(&mut writes, "profilePictureUrl", &self.profile_picture_url)?;
        push_patch(&mut writes, "phoneNumber", &self.phone_number)?;
        push_patch(&mut writes, "address", &self.address)?;
        if let Some(roles) = &self.roles {
            writes.push((
                "roles".to_string(),
                FieldWrite::Set(Value::Array(roles.iter().cloned().map(Value::String).collect())),
            ));
        }
        push_patch(&mut writes, "bio", &self.bio)?;
        if let Some(rating) = self.rating {
            writes.push(("rating".to_string(), FieldWrite::Set(super::field_value("rating", &rating)?)));
        }
        if let Some(total_reviews) = self.total_reviews {
            writes.push(("totalReviews".to_string(), FieldWrite::Set(Value::from(total_reviews))));
        }
        if let Some(is_verified_seller) = self.is_verified_seller {
            writes.push((
                "isVerifiedSeller".to_string(),
                FieldWrite::Set(Value::Bool(is_verified_seller)),
            ));
        }
        Ok(writes)
    }
}

/// Full profile as returned by every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub profile_picture_url: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Address>,
    pub roles: Vec<String>,
    pub bio: Option<String>,
    pub rating: f64,
    pub total_reviews: u32,
    pub is_verified_seller: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl User {
    pub fn from_document(doc: Document) -> Result<Self, ApiError> {
        super::document_into(doc, "userId", "user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_defaults_roles_to_buyer() {
        let create: UserCreate = serde_json::from_value(json!({
            "email": "hana@example.com",
            "displayName": "Hana Rahman"
        }))
        .unwrap();
        assert!(create.validate().is_ok());
        assert_eq!(create.roles, vec!["buyer".to_string()]);
        assert_eq!(create.rating, 0.0);
        assert!(!create.is_verified_seller);
    }

    #[test]
    fn create_rejects_bad_email_and_rating() {
        let create: UserCreate = serde_json::from_value(json!({
            "email": "not-an-email",
            "displayName": "Hana Rahman",
            "rating": 7.5
        }))
        .unwrap();

        let err = create.validate().unwrap_err();
        let body = err.to_json();
        assert_eq!(body["field_errors"]["email"], "must be a valid email address");
        assert_eq!(body["field_errors"]["rating"], "must be between 0 and 5");
    }

    #[test]
    fn update_null_clears_to_stored_null_and_absent_is_untouched() {
        let patch: UserUpdate =
            serde_json::from_value(json!({ "bio": null, "displayName": "New Name" })).unwrap();

        let writes = patch.writes().unwrap();
        assert_eq!(writes.len(), 2);
        assert!(writes.contains(&("bio".to_string(), FieldWrite::Set(Value::Null))));
        assert!(writes
            .contains(&("displayName".to_string(), FieldWrite::Set(json!("New Name")))));
    }

    #[test]
    fn update_rejects_server_managed_fields() {
        assert!(serde_json::from_value::<UserUpdate>(json!({ "createdAt": "x" })).is_err());
        assert!(serde_json::from_value::<UserUpdate>(json!({ "userId": "x" })).is_err());
    }
}
