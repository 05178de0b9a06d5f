//! Account operations.

use crate::client::{ApiResult, Client};
use crate::error::Result;
use crate::types::Account;

/// Client for account operations.
///
/// Access via `client.account()`.
pub struct AccountClient {
    client: Client,
}

impl AccountClient {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get credits, plan and usage for the authenticated account.
    pub async fn get(&self) -> Result<Account> {
        self.get_raw().await?.into_json()
    }

    pub async fn get_raw(&self) -> Result<ApiResult> {
        self.client.get("/account").await
    }
}
