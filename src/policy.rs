//! Ownership rules, applied by every handler before a write (or a
//! restricted read) reaches the store. Pure functions of the authenticated
//! subject and the owner fields of the supplied payload or stored snapshot.

use crate::auth::Subject;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    fn profile_verb(self) -> &'static str {
        match self {
            Action::View => "retrieve",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// A listing may only be created on the caller's own behalf.
pub fn product_create(subject: &Subject, seller_id: &str) -> Result<(), ApiError> {
    if subject.uid == seller_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Seller ID must match authenticated user."))
    }
}

/// A listing may only be mutated by its seller.
pub fn product_mutate(subject: &Subject, seller_id: &str, action: Action) -> Result<(), ApiError> {
    if subject.uid == seller_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "You do not have permission to {} this product.",
            action.verb()
        )))
    }
}

/// Profiles are strictly per-subject; the requested id must be the caller.
pub fn user_access(subject: &Subject, user_id: &str, action: Action) -> Result<(), ApiError> {
    if subject.uid == user_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "You can only {} your own profile.",
            action.profile_verb()
        )))
    }
}

/// Orders may only be placed by the buyer themselves.
pub fn order_create(subject: &Subject, buyer_id: &str) -> Result<(), ApiError> {
    if subject.uid == buyer_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Buyer ID must match authenticated user."))
    }
}

/// Orders are visible and mutable to both parties, nobody else.
pub fn order_access(
    subject: &Subject,
    buyer_id: &str,
    seller_id: &str,
    action: Action,
) -> Result<(), ApiError> {
    if subject.uid == buyer_id || subject.uid == seller_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "You do not have permission to {} this order.",
            action.verb()
        )))
    }
}

/// Reviews may only be written on the caller's own behalf.
pub fn review_create(subject: &Subject, reviewer_id: &str) -> Result<(), ApiError> {
    if subject.uid == reviewer_id {
        Ok(())
    } else {
        Err(ApiError::forbidden("Reviewer ID must match authenticated user."))
    }
}

/// Reviews may only be mutated by their reviewer.
pub fn review_mutate(
    subject: &Subject,
    reviewer_id: &str,
    action: Action,
) -> Result<(), ApiError> {
    if subject.uid == reviewer_id {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "You do not have permission to {} this review.",
            action.verb()
        )))
    }
}
