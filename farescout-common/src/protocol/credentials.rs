//! Credential state exposed through GET_AUTH / SET_AUTH / CLEAR_AUTH

use serde::{Deserialize, Serialize};

/// Process-wide sign-in state for the consumer UI
///
/// Not part of the per-session cache; persisted by a credential backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialState {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

impl CredentialState {
    /// Overwrite fields that are present in `update`, keep the rest
    pub fn merge(&mut self, update: CredentialState) {
        if update.access_token.is_some() {
            self.access_token = update.access_token;
        }
        if update.refresh_token.is_some() {
            self.refresh_token = update.refresh_token;
        }
        if update.user_email.is_some() {
            self.user_email = update.user_email;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user_email.is_none()
    }
}
