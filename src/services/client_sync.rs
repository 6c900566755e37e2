use serde_json::Value;

use crate::config::Config;

/// Client for the sibling "clients" service, authenticated with HTTP basic
/// auth.
///
/// Failures here are deliberately absorbed: a non-success status or a
/// connection error is logged and reported to the caller as an empty/false
/// result, never propagated as a fault. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ClientSync {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl ClientSync {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.clients_service_url.trim_end_matches('/').to_string(),
            username: config.clients_service_user.clone(),
            password: config.clients_service_password.clone(),
        }
    }

    fn collection_url(&self) -> String {
        // The peer requires the trailing slash.
        format!("{}/", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{id}/", self.base_url)
    }

    /// Fetch the full client list. Empty on any failure.
    pub async fn list(&self) -> Vec<Value> {
        let request = self
            .http
            .get(self.collection_url())
            .basic_auth(&self.username, Some(&self.password));

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<Vec<Value>>().await.unwrap_or_else(|err| {
                    tracing::warn!("Failed to decode clients list: {err}");
                    Vec::new()
                })
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "Error fetching clients list");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!("Connection error fetching clients list: {err}");
                Vec::new()
            }
        }
    }

    /// Fetch one client by id. `None` on any failure.
    pub async fn get(&self, id: &str) -> Option<Value> {
        let request = self
            .http
            .get(self.item_url(id))
            .basic_auth(&self.username, Some(&self.password));

        match request.send().await {
            Ok(response) if response.status().is_success() => response.json().await.ok(),
            Ok(response) => {
                tracing::warn!(status = %response.status(), id, "Error fetching client");
                None
            }
            Err(err) => {
                tracing::warn!(id, "Connection error fetching client: {err}");
                None
            }
        }
    }

    /// Create a client. `true` only when the peer reports 201.
    pub async fn create(&self, data: &Value) -> bool {
        let request = self
            .http
            .post(self.collection_url())
            .basic_auth(&self.username, Some(&self.password))
            .json(data);

        match request.send().await {
            Ok(response) => response.status() == reqwest::StatusCode::CREATED,
            Err(err) => {
                tracing::warn!("Connection error creating client: {err}");
                false
            }
        }
    }

    /// Replace a client. `true` only when the peer reports 200.
    pub async fn update(&self, id: &str, data: &Value) -> bool {
        let request = self
            .http
            .put(self.item_url(id))
            .basic_auth(&self.username, Some(&self.password))
            .json(data);

        match request.send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(err) => {
                tracing::warn!(id, "Connection error updating client: {err}");
                false
            }
        }
    }

    /// Delete a client. `true` only when the peer reports 204.
    pub async fn delete(&self, id: &str) -> bool {
        let request = self
            .http
            .delete(self.item_url(id))
            .basic_auth(&self.username, Some(&self.password));

        match request.send().await {
            Ok(response) => response.status() == reqwest::StatusCode::NO_CONTENT,
            Err(err) => {
                tracing::warn!(id, "Connection error deleting client: {err}");
                false
            }
        }
    }
}
