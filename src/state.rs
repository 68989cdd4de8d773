use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::store::DocumentStore;

/// Shared application state: the document store and the token verifier,
/// both behind trait objects so tests can swap implementations.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { store, verifier }
    }
}
