use std::sync::Arc;

use reqwest::{header, Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    api::{path::join_url, response::ApiResponse},
    credentials::Credentials,
    errors::{ApiError, Result, RobinError},
};

pub(crate) const RELAY_IDENTIFIER_HEADER: &str = "Relay-Identifier";

/// Issues requests against one Robin base URL
#[derive(Debug, Clone)]
pub struct RequestClient {
    base_url: String,
    http_client: Client,
    credentials: Arc<Credentials>,
}

impl RequestClient {
    pub fn new(base_url: impl Into<String>, http_client: Client, credentials: Arc<Credentials>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::GET, path, params).await
    }

    pub async fn head(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::HEAD, path, params).await
    }

    pub async fn post(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::POST, path, data).await
    }

    pub async fn put(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::PUT, path, data).await
    }

    pub async fn patch(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::PATCH, path, data).await
    }

    pub async fn delete(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::DELETE, path, data).await
    }

    pub async fn options(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.send(Method::OPTIONS, path, data).await
    }

    /// Send one request and wrap the response envelope
    pub async fn send(&self, method: Method, path: &str, payload: Option<Value>) -> Result<ApiResponse> {
        let request = self.build_request(&method, path, payload.as_ref())?;

        debug!("{} {}{}", method, self.base_url, path);
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        let body = parse_body(&text)?;

        if status.is_success() {
            Ok(ApiResponse::new(
                self.clone(),
                method,
                path.to_string(),
                payload,
                status.as_u16(),
                body,
            ))
        } else {
            warn!("{} {} failed with status {}", method, path, status);
            Err(ApiError::from_response(status.as_u16(), &body).into())
        }
    }

    fn build_request(
        &self,
        method: &Method,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<reqwest::RequestBuilder> {
        let access_token = self
            .credentials
            .access_token()
            .ok_or(RobinError::AuthenticationMissing)?;
        let url = join_url(&self.base_url, path)?;

        let mut request = self
            .http_client
            .request(method.clone(), url)
            .header(header::AUTHORIZATION, format!("Access-Token {}", access_token));

        if let Some(relay_identifier) = self.credentials.relay_identifier() {
            request = request.header(RELAY_IDENTIFIER_HEADER, relay_identifier);
        }

        request = match payload {
            None | Some(Value::Null) => request,
            Some(payload) if *method == Method::GET || *method == Method::HEAD => {
                request.query(&query_pairs(payload)?)
            }
            Some(payload) => request.json(payload),
        };

        Ok(request)
    }

    /// Fetch every page of a listing, starting from a GET of `path`.
    ///
    /// Any `per_page` in `params` is dropped so the server default applies.
    pub async fn all(&self, path: &str, params: Option<Value>) -> Result<Vec<Value>> {
        let params = params.map(|mut params| {
            if let Some(map) = params.as_object_mut() {
                map.remove("per_page");
            }
            params
        });
        let first = self.get(path, params).await?;
        Self::collect_pages(first).await
    }

    /// Accumulate the data of `first` and every following page, in order.
    pub async fn collect_pages(first: ApiResponse) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page = first;

        loop {
            match page.data() {
                Value::Null => break,
                Value::Array(values) if values.is_empty() => break,
                Value::Array(values) => items.extend(values.iter().cloned()),
                Value::Object(map) if map.is_empty() => break,
                object @ Value::Object(_) => items.push(object.clone()),
                _ => return Err(RobinError::MalformedResponse),
            }

            if !page.has_pages() {
                break;
            }
            page = page.next_page().await?;
        }

        debug!("Collected {} items across pages", items.len());
        Ok(items)
    }
}

fn parse_body(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|_| RobinError::Parse {
        body: text.to_string(),
    })
}

/// Flatten a JSON object of scalars into query string pairs
fn query_pairs(params: &Value) -> Result<Vec<(String, String)>> {
    let Some(map) = params.as_object() else {
        return Err(RobinError::BadRequest(
            "Query parameters must be a JSON object".to_string(),
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(RobinError::BadRequest(format!(
                    "Query parameter `{}` must be a scalar value",
                    key
                )))
            }
        };
        pairs.push((key.clone(), value));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn empty_body_parses_as_null() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert_matches!(
            parse_body("<html>oops</html>"),
            Err(RobinError::Parse { body }) if body == "<html>oops</html>"
        );
    }

    #[test]
    fn query_pairs_flatten_scalars() {
        let pairs = query_pairs(&json!({"page": 2, "q": "lobby", "active": true, "skip": null})).unwrap();
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("q".to_string(), "lobby".to_string())));
        assert!(pairs.contains(&("active".to_string(), "true".to_string())));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn query_pairs_reject_nested_values() {
        assert_matches!(query_pairs(&json!({"a": {"b": 1}})), Err(RobinError::BadRequest(_)));
        assert_matches!(query_pairs(&json!([1, 2])), Err(RobinError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_token_fails_before_sending() {
        let client = RequestClient::new(
            "http://127.0.0.1:9",
            Client::new(),
            Arc::new(Credentials::new("")),
        );
        assert_matches!(
            client.get("/me", None).await,
            Err(RobinError::AuthenticationMissing)
        );
    }
}
