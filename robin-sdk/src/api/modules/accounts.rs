use serde_json::Value;

use super::{require, ACCOUNTS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/accounts`
    Accounts
);

impl Accounts<'_> {
    /// Get an account by id or slug
    pub async fn get(&self, account_id_or_slug: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(
            &[account_id_or_slug],
            "An account id or slug must be supplied for this operation",
        )?;
        let path = construct_path(&[ACCOUNTS, account_id_or_slug]);
        self.api.core().get(&path, params).await
    }
}
