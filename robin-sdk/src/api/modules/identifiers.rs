use serde_json::Value;

use super::{require, IDENTIFIERS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/identifiers`
    Identifiers
);

impl Identifiers<'_> {
    pub async fn get(&self, identifier_urn: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[IDENTIFIERS, identifier_urn.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn delete(&self, identifier_urn: &str) -> Result<ApiResponse> {
        require(&[identifier_urn], "An identifier URN is required.")?;
        let path = construct_path(&[IDENTIFIERS, identifier_urn]);
        self.api.core().delete(&path, None).await
    }
}
