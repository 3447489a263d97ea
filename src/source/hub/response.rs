//! REST response envelopes.

use serde::Deserialize;

/// A page of items from a collection endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage<T> {
    #[serde(default)]
    pub total_count: Option<usize>,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Reply to the token exchange.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub bearer_token: String,
    #[serde(default)]
    pub expires_in_milliseconds: Option<u64>,
}
