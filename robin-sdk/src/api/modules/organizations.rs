use serde_json::Value;

use super::{
    require, require_data, APPS, CHANNELS, DEVICES, LOCATIONS, MANAGERS, ORGANIZATIONS, PROJECTS,
    USERS,
};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

const ORG_REQUIRED: &str = "An organization id or slug is required.";
const ORG_AND_DATA_REQUIRED: &str = "An organization id or slug and a data object is required.";

resource!(
    /// `/organizations`
    Organizations
);

impl<'a> Organizations<'a> {
    pub async fn get(&self, org_id_or_slug: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, "A data object is required")?;
        self.api
            .core()
            .post(&construct_path(&[ORGANIZATIONS]), Some(data))
            .await
    }

    pub async fn update(&self, org_id_or_slug: &str, data: Value) -> Result<ApiResponse> {
        let message = "An organization id or slug and a data object are required.";
        require(&[org_id_or_slug], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, org_id_or_slug: &str) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug]);
        self.api.core().delete(&path, None).await
    }

    pub fn users(&self) -> OrganizationUsers<'a> {
        OrganizationUsers::new(self.api)
    }

    pub fn managers(&self) -> OrganizationManagers<'a> {
        OrganizationManagers::new(self.api)
    }

    pub fn apps(&self) -> OrganizationCollection<'a> {
        OrganizationCollection::new(self.api, APPS)
    }

    pub fn devices(&self) -> OrganizationCollection<'a> {
        OrganizationCollection::new(self.api, DEVICES)
    }

    pub fn projects(&self) -> OrganizationCollection<'a> {
        OrganizationCollection::new(self.api, PROJECTS)
    }

    pub fn locations(&self) -> OrganizationCollection<'a> {
        OrganizationCollection::new(self.api, LOCATIONS)
    }

    pub fn channels(&self) -> OrganizationChannels<'a> {
        OrganizationChannels::new(self.api)
    }
}

resource!(
    /// `/organizations/{org}/users`
    OrganizationUsers
);

impl OrganizationUsers<'_> {
    pub async fn get(
        &self,
        org_id_or_slug: &str,
        user_id: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, USERS, user_id.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, org_id_or_slug: &str, user_id: &str) -> Result<ApiResponse> {
        require(
            &[org_id_or_slug, user_id],
            "An organization id or slug and a user id is required.",
        )?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, USERS, user_id]);
        self.api.core().put(&path, None).await
    }

    pub async fn update(&self, org_id_or_slug: &str, user_id: &str, data: Value) -> Result<ApiResponse> {
        let message = "An organization id or slug and a user id and data is required.";
        require(&[org_id_or_slug, user_id], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, USERS, user_id]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, org_id_or_slug: &str, user_id: &str) -> Result<ApiResponse> {
        require(
            &[org_id_or_slug, user_id],
            "An organization id or slug and a user id is required.",
        )?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, USERS, user_id]);
        self.api.core().delete(&path, None).await
    }
}

resource!(OrganizationManagers);

impl OrganizationManagers<'_> {
    pub async fn get(&self, org_id_or_slug: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, MANAGERS]);
        self.api.core().get(&path, params).await
    }
}

/// A list-and-append collection under an organization: its apps, devices,
/// projects or locations.
#[derive(Debug, Clone, Copy)]
pub struct OrganizationCollection<'a> {
    api: &'a crate::api::Api,
    collection: &'static str,
}

impl<'a> OrganizationCollection<'a> {
    fn new(api: &'a crate::api::Api, collection: &'static str) -> Self {
        Self { api, collection }
    }

    pub async fn get(&self, org_id_or_slug: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, self.collection]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, org_id_or_slug: &str, data: Value) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_AND_DATA_REQUIRED)?;
        require_data(&data, ORG_AND_DATA_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, self.collection]);
        self.api.core().post(&path, Some(data)).await
    }
}

resource!(
    /// `/organizations/{org}/channels`
    OrganizationChannels
);

impl OrganizationChannels<'_> {
    pub async fn get(&self, org_id_or_slug: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[org_id_or_slug], ORG_REQUIRED)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, CHANNELS]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, org_id_or_slug: &str, channel: &str) -> Result<ApiResponse> {
        require(
            &[org_id_or_slug, channel],
            "An organization id or slug and a channel id is required.",
        )?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, CHANNELS, channel]);
        self.api.core().put(&path, None).await
    }

    pub async fn create(&self, org_id_or_slug: &str, data: Value) -> Result<ApiResponse> {
        let message = "An organization id or slug and data is required.";
        require(&[org_id_or_slug], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, CHANNELS]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn delete(&self, org_id_or_slug: &str, channel: &str) -> Result<ApiResponse> {
        require(
            &[org_id_or_slug, channel],
            "An organization id or slug and a channel id is required.",
        )?;
        let path = construct_path(&[ORGANIZATIONS, org_id_or_slug, CHANNELS, channel]);
        self.api.core().delete(&path, None).await
    }
}
