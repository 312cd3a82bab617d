//! Stateless HTTP request builder and response parser for the users API.
//!
//! # Design
//! `UsersClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`; the caller executes the round trip.
//! Create and update responses are parsed as `UserPatch` because the remote
//! service echoes back a partial record whose id cannot be trusted.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewUser, User, UserPatch};

/// Public JSONPlaceholder deployment.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone)]
pub struct UsersClient {
    base_url: String,
}

impl Default for UsersClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl UsersClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_users(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/users", self.base_url))
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Get, format!("{}/users/{id}", self.base_url))
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, format!("{}/users", self.base_url), input)
    }

    pub fn build_update_user(&self, id: u64, patch: &UserPatch) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, format!("{}/users/{id}", self.base_url), patch)
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        self.bare(HttpMethod::Delete, format!("{}/users/{id}", self.base_url))
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<UserPatch, ApiError> {
        check_status(&response)?;
        decode_patch(&response.body)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<UserPatch, ApiError> {
        check_status(&response)?;
        decode_patch(&response.body)
    }

    /// The body of a delete response is ignored.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn bare(&self, method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        path: String,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// An empty body is read as an empty patch.
fn decode_patch(body: &str) -> Result<UserPatch, ApiError> {
    if body.trim().is_empty() {
        return Ok(UserPatch::default());
    }
    decode(body)
}
