use std::time::Instant;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::store::StoreError;

/// Thin PostgREST client authenticated with the project's service key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&self.service_key)
            .map_err(|e| StoreError::Backend(format!("Invalid Supabase key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_key))
            .map_err(|e| StoreError::Backend(format!("Invalid Supabase key: {}", e)))?;

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let started = Instant::now();
        let response = req.send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            StoreError::Backend(e.to_string())
        })?;
        debug!("Query {} {} took {}ms", method, path, started.elapsed().as_millis());

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::CONFLICT => StoreError::Duplicate { field: duplicate_field(&error_text) },
                _ => StoreError::Backend(format!("API error ({}): {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to decode response: {}", e)))
    }

    /// `Prefer: return=representation`, so writes answer with the affected rows.
    pub fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }
}

/// Extracts the column from a Postgres unique violation, e.g.
/// `"Key (email)=(a@b.c) already exists."`.
fn duplicate_field(error_text: &str) -> String {
    serde_json::from_str::<Value>(error_text)
        .ok()
        .and_then(|body| body.get("details").and_then(Value::as_str).map(str::to_owned))
        .and_then(|details| {
            let start = details.find("Key (")? + "Key (".len();
            let end = details[start..].find(')')? + start;
            Some(details[start..end].to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
