use reqwest::Method;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    api::request::RequestClient,
    errors::{Result, RobinError},
};

/// The `paging` block of a listing response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Paging {
    pub page: u64,
    pub per_page: u64,
}

/// What is needed to re-issue a paginated GET
#[derive(Debug, Clone)]
struct PageCursor {
    client: RequestClient,
    path: String,
    params: Map<String, Value>,
    paging: Paging,
}

impl PageCursor {
    async fn fetch(&self, page: u64) -> Result<ApiResponse> {
        let mut params = self.params.clone();
        params.insert("page".to_string(), page.into());
        params.insert("per_page".to_string(), self.paging.per_page.into());
        self.client.get(&self.path, Some(Value::Object(params))).await
    }
}

/// A successful response from the Robin API
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: Value,
    cursor: Option<PageCursor>,
}

impl ApiResponse {
    pub(crate) fn new(
        client: RequestClient,
        method: Method,
        path: String,
        payload: Option<Value>,
        status: u16,
        body: Value,
    ) -> Self {
        let cursor = if method == Method::GET {
            body.get("paging")
                .and_then(|paging| Paging::deserialize(paging).ok())
                .map(|paging| PageCursor {
                    client,
                    path,
                    params: match payload {
                        Some(Value::Object(map)) => map,
                        _ => Map::new(),
                    },
                    paging,
                })
        } else {
            None
        };

        Self { status, body, cursor }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// The whole parsed body
    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    /// The `data` member of the envelope, `null` when absent
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&Value::Null)
    }

    /// True when the data holds nothing
    pub fn is_empty(&self) -> bool {
        match self.data() {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(values) => values.is_empty(),
            Value::String(s) => s.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    /// 0 when empty, the element count for arrays, otherwise 1
    pub fn data_len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        match self.data() {
            Value::Array(values) => values.len(),
            _ => 1,
        }
    }

    pub fn paging(&self) -> Option<Paging> {
        self.cursor.as_ref().map(|cursor| cursor.paging)
    }

    /// Whether `next_page` and `prev_page` are available
    pub fn has_pages(&self) -> bool {
        self.cursor.is_some()
    }

    pub async fn next_page(&self) -> Result<ApiResponse> {
        let cursor = self.cursor.as_ref().ok_or(RobinError::NotPaginated)?;
        cursor.fetch(cursor.paging.page + 1).await
    }

    /// The previous page; page 1 stays on page 1
    pub async fn prev_page(&self) -> Result<ApiResponse> {
        let cursor = self.cursor.as_ref().ok_or(RobinError::NotPaginated)?;
        cursor.fetch(cursor.paging.page.saturating_sub(1).max(1)).await
    }
}
