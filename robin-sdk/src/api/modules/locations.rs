use serde_json::Value;

use super::{require, require_data, LOCATIONS, PRESENCE, SPACES};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/locations`
    Locations
);

impl<'a> Locations<'a> {
    pub async fn get(&self, identifier: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[LOCATIONS, identifier.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn update(&self, identifier: &str, data: Value) -> Result<ApiResponse> {
        let message = "A location identifier and a data object are required";
        require(&[identifier], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[LOCATIONS, identifier]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, identifier: &str) -> Result<ApiResponse> {
        require(&[identifier], "A location identifier is required.")?;
        let path = construct_path(&[LOCATIONS, identifier]);
        self.api.core().delete(&path, None).await
    }

    pub fn spaces(&self) -> LocationSpaces<'a> {
        LocationSpaces::new(self.api)
    }

    pub fn presence(&self) -> LocationPresence<'a> {
        LocationPresence::new(self.api)
    }
}

resource!(
    /// `/locations/{location}/spaces`
    LocationSpaces
);

impl LocationSpaces<'_> {
    pub async fn get(
        &self,
        location: &str,
        space: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[location], "A location identifier is required.")?;
        let path = construct_path(&[LOCATIONS, location, SPACES, space.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, location: &str, data: Value) -> Result<ApiResponse> {
        require(&[location], "A location identifier is required.")?;
        let path = construct_path(&[LOCATIONS, location, SPACES]);
        self.api.core().post(&path, Some(data)).await
    }
}

resource!(
    /// `/locations/{location}/presence`
    LocationPresence
);

impl LocationPresence<'_> {
    /// Current presence across every space of a location
    pub async fn get(&self, location: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[location], "A location identifier is required.")?;
        let path = construct_path(&[LOCATIONS, location, PRESENCE]);
        self.api.core().get(&path, params).await
    }
}
