use serde_json::Value;

use super::{
    require, require_data, AUTHORIZATIONS, CHANNELS, DEVICES, EMAIL, IDENTIFIERS, ME,
    ORGANIZATIONS, PASSWORD, PROJECTS,
};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

const DATA_REQUIRED: &str = "A data object is required";

resource!(
    /// `/me`, an alias for the user the access token belongs to.
    ///
    /// The reads on this namespace never carry a query string.
    Me
);

impl<'a> Me<'a> {
    pub async fn get(&self) -> Result<ApiResponse> {
        self.api.core().get(&construct_path(&[ME]), None).await
    }

    pub async fn update(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api.core().patch(&construct_path(&[ME]), Some(data)).await
    }

    pub async fn update_email(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .patch(&construct_path(&[ME, EMAIL]), Some(data))
            .await
    }

    pub async fn change_password(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .patch(&construct_path(&[ME, PASSWORD]), Some(data))
            .await
    }

    pub async fn delete(&self) -> Result<ApiResponse> {
        self.api.core().delete(&construct_path(&[ME]), None).await
    }

    pub fn organizations(&self) -> MeOrganizations<'a> {
        MeOrganizations::new(self.api)
    }

    pub fn authorizations(&self) -> MeAuthorizations<'a> {
        MeAuthorizations::new(self.api)
    }

    pub fn devices(&self) -> MeDevices<'a> {
        MeDevices::new(self.api)
    }

    pub fn projects(&self) -> MeProjects<'a> {
        MeProjects::new(self.api)
    }

    pub fn channels(&self) -> MeChannels<'a> {
        MeChannels::new(self.api)
    }

    pub fn identifiers(&self) -> MeIdentifiers<'a> {
        MeIdentifiers::new(self.api)
    }
}

resource!(MeOrganizations);

impl MeOrganizations<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        let path = construct_path(&[ME, ORGANIZATIONS]);
        self.api.core().get(&path, None).await
    }
}

resource!(MeAuthorizations);

impl MeAuthorizations<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        let path = construct_path(&[ME, AUTHORIZATIONS]);
        self.api.core().get(&path, None).await
    }

    pub async fn add(&self, kind: &str, identifier: &str, data: Value) -> Result<ApiResponse> {
        let message = "Authorization type and identifier and data payload are required";
        require(&[kind, identifier], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[ME, AUTHORIZATIONS, kind, identifier]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn delete(&self, kind: &str, identifier: &str) -> Result<ApiResponse> {
        require(
            &[kind, identifier],
            "Authorization type and identifier are both required",
        )?;
        let path = construct_path(&[ME, AUTHORIZATIONS, kind, identifier]);
        self.api.core().delete(&path, None).await
    }
}

resource!(MeDevices);

impl MeDevices<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        self.api.core().get(&construct_path(&[ME, DEVICES]), None).await
    }

    pub async fn add(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .post(&construct_path(&[ME, DEVICES]), Some(data))
            .await
    }
}

resource!(MeProjects);

impl MeProjects<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        self.api.core().get(&construct_path(&[ME, PROJECTS]), None).await
    }

    pub async fn add(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .post(&construct_path(&[ME, PROJECTS]), Some(data))
            .await
    }
}

resource!(MeChannels);

impl MeChannels<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        self.api.core().get(&construct_path(&[ME, CHANNELS]), None).await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .post(&construct_path(&[ME, CHANNELS]), Some(data))
            .await
    }

    /// Follow an existing channel
    pub async fn add(&self, channel: &str) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier is required")?;
        let path = construct_path(&[ME, CHANNELS, channel]);
        self.api.core().put(&path, None).await
    }

    pub async fn delete(&self, channel: &str) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier is required")?;
        let path = construct_path(&[ME, CHANNELS, channel]);
        self.api.core().delete(&path, None).await
    }
}

resource!(MeIdentifiers);

impl MeIdentifiers<'_> {
    pub async fn get(&self) -> Result<ApiResponse> {
        self.api
            .core()
            .get(&construct_path(&[ME, IDENTIFIERS]), None)
            .await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, DATA_REQUIRED)?;
        self.api
            .core()
            .post(&construct_path(&[ME, IDENTIFIERS]), Some(data))
            .await
    }

    pub async fn add(&self, identifier_urn: &str) -> Result<ApiResponse> {
        require(&[identifier_urn], "An identifier urn is required")?;
        let path = construct_path(&[ME, IDENTIFIERS, identifier_urn]);
        self.api.core().put(&path, None).await
    }

    pub async fn delete(&self, identifier_urn: &str) -> Result<ApiResponse> {
        require(&[identifier_urn], "An identifier urn is required")?;
        let path = construct_path(&[ME, IDENTIFIERS, identifier_urn]);
        self.api.core().delete(&path, None).await
    }
}
