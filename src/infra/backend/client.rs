use anyhow::Result;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use waste_console::fetch::auth::BearerToken;
use waste_console::fetch::{BasicClient, HttpClient};
use waste_console::parser;
use waste_console::records::{Entry, NewEntry, Truck, WasteCategory};
use waste_console::rollup::types::DailySummary;

use super::BackendError;
use crate::services::backend_api::BackendApi;

/// A registered console user, as returned by the auth endpoints.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

/// HTTP/JSON client for the waste-collection backend.
///
/// Base URL and optional bearer token are explicit construction-time
/// configuration; the client keeps no other state.
pub struct BackendClient {
    base_url: String,
    http: Box<dyn HttpClient>,
}

impl BackendClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let transport = BasicClient::new()?;
        let http: Box<dyn HttpClient> = match token {
            Some(token) => Box::new(BearerToken::new(transport, token)?),
            None => Box::new(transport),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Verifies credentials against `POST /auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, BackendError> {
        let body = json!({ "email": email, "password": password });
        let value = self.send(Method::POST, "/auth/login", Some(&body)).await?;
        parse_profile(&value["user"])
    }

    /// Creates a user via `POST /auth/register`.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.send(Method::POST, "/auth/register", Some(&body))
            .await?;
        Ok(())
    }

    /// Looks a user up by email via `POST /auth/profile`.
    pub async fn profile(&self, email: &str) -> Result<UserProfile, BackendError> {
        let body = json!({ "email": email });
        let value = self.send(Method::POST, "/auth/profile", Some(&body)).await?;
        parse_profile(&value)
    }

    /// Records a truck entry via `POST /entry`.
    pub async fn add_entry(&self, entry: &NewEntry) -> Result<(), BackendError> {
        self.send(Method::POST, "/entry", Some(entry)).await?;
        Ok(())
    }

    /// Replaces a truck entry via `PUT /entry/{id}`.
    pub async fn update_entry(&self, id: &str, entry: &NewEntry) -> Result<(), BackendError> {
        self.send(Method::PUT, &format!("/entry/{id}"), Some(entry))
            .await?;
        Ok(())
    }

    /// Deletes a truck entry via `DELETE /entry/{id}`.
    pub async fn delete_entry(&self, id: &str) -> Result<(), BackendError> {
        self.send::<Value>(Method::DELETE, &format!("/entry/{id}"), None)
            .await?;
        Ok(())
    }

    /// Fetches the backend's own daily summary report, the server-side
    /// counterpart of [`waste_console::rollup::daily::daily_summary`].
    pub async fn daily_summary(&self, date: &str) -> Result<DailySummary> {
        let value = self
            .send::<Value>(Method::GET, &format!("/summary/daily?date={date}"), None)
            .await?;
        parser::parse_daily_summary(&value)
    }

    async fn get(&self, path: &str) -> Result<Value, BackendError> {
        self.send::<Value>(Method::GET, path, None).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url, path);
        let parsed = reqwest::Url::parse(&url).map_err(|e| BackendError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut req = Request::new(method, parsed);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)?;
            req.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *req.body_mut() = Some(bytes.into());
        }

        debug!(%url, "Backend request");
        let resp = self
            .http
            .execute(req)
            .await
            .map_err(|source| BackendError::Unavailable { source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let value: Value = resp
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        // The backend reports soft failures as 200s with an error field.
        if let Some(msg) = value["error"].as_str() {
            return Err(BackendError::Rejected(msg.to_string()));
        }

        Ok(value)
    }
}

#[async_trait::async_trait]
impl BackendApi for BackendClient {
    async fn list_waste_types(&self) -> Result<Vec<WasteCategory>> {
        let value = self.get("/waste-types").await?;
        parser::parse_categories(&value)
    }

    async fn list_trucks(&self) -> Result<Vec<Truck>> {
        let value = self.get("/trucks").await?;
        parser::parse_trucks(&value)
    }

    async fn truck_history(&self, truck_number: &str) -> Result<Vec<Entry>> {
        let value = self.get(&format!("/truck/{truck_number}/history")).await?;
        parser::parse_history(truck_number, &value)
    }
}

fn parse_profile(value: &Value) -> Result<UserProfile, BackendError> {
    let name = value["name"].as_str().unwrap_or_default().to_string();
    let Some(email) = value["email"].as_str() else {
        return Err(BackendError::Malformed(format!(
            "profile response missing email: {value}"
        )));
    };

    Ok(UserProfile {
        name,
        email: email.to_string(),
    })
}
