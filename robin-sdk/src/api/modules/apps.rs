use serde_json::Value;

use super::{require, require_data, APPS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/apps`
    Apps
);

impl Apps<'_> {
    /// Get all apps, or one app by id or slug
    pub async fn get(&self, app_id_or_slug: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[APPS, app_id_or_slug.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    /// Update an app. The API takes app updates as a POST.
    pub async fn update(&self, app_id_or_slug: &str, data: Value) -> Result<ApiResponse> {
        let message = "An app id or slug and a data object are required.";
        require(&[app_id_or_slug], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[APPS, app_id_or_slug]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn delete(&self, app_id_or_slug: &str) -> Result<ApiResponse> {
        require(&[app_id_or_slug], "An app id or slug is required.")?;
        let path = construct_path(&[APPS, app_id_or_slug]);
        self.api.core().delete(&path, None).await
    }
}
