use serde_json::Value;

use super::AUTH;
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/auth`
    Auth
);

impl Auth<'_> {
    /// Information about the access token the client was built with
    pub async fn get_access_token_info(&self, params: Option<Value>) -> Result<ApiResponse> {
        self.api.core().get(&construct_path(&[AUTH]), params).await
    }
}
