use serde_json::Value;

use super::{require_data, EVENTS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/events` on the Places API
    Events
);

impl Events<'_> {
    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, "A data object is required.")?;
        self.api
            .places()
            .post(&construct_path(&[EVENTS]), Some(data))
            .await
    }
}
