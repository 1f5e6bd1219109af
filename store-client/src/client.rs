//! Typed HTTP client for the storefront API
//!
//! Thin wrapper over `reqwest` holding the base URL and, after login, the
//! bearer token. Network failures surface as a single [`ClientError`] with
//! no automatic retry.

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use shared::models::{
    Address, AddressCreate, AddressUpdate, AuthResponse, LoginRequest, OrderCreate, OrderUpdate,
    OrderWithItems, Product, RegisterRequest, Review, ReviewCreate, UserResponse,
};

/// Catalog listing query, mirrored onto the server's query parameters.
///
/// All fields optional; `None` sends nothing for that filter.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub team: Option<String>,
    pub size: Option<String>,
    pub search: Option<String>,
    pub is_new: Option<bool>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// `price_asc` | `price_desc` | `newest`
    pub sort_by: Option<String>,
}

impl ProductQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(v) = &self.category {
            pairs.push(("category", v.clone()));
        }
        if let Some(v) = &self.team {
            pairs.push(("team", v.clone()));
        }
        if let Some(v) = &self.size {
            pairs.push(("size", v.clone()));
        }
        if let Some(v) = &self.search {
            pairs.push(("search", v.clone()));
        }
        if let Some(v) = self.is_new {
            pairs.push(("isNew", v.to_string()));
        }
        if let Some(v) = self.min_price {
            pairs.push(("minPrice", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = &self.sort_by {
            pairs.push(("sortBy", v.clone()));
        }
        pairs
    }
}

/// Error body shape returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Storefront API client
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl StoreClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Use a token obtained elsewhere (e.g. restored session)
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_ref().ok_or(ClientError::NotAuthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    /// Decode a response, mapping non-2xx bodies into [`ClientError::Api`]
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let code = status.as_u16();
        tracing::warn!(target: "api", status = code, "request failed");
        match response.json::<ErrorBody>().await {
            Ok(body) => Err(ClientError::Api {
                status: code,
                code: body.code,
                message: body.message,
            }),
            Err(_) => Err(ClientError::Api {
                status: code,
                code: String::new(),
                message: status.to_string(),
            }),
        }
    }

    // ── Auth ────────────────────────────────────────────────────────

    /// Register and keep the returned token for subsequent calls
    pub async fn register(&mut self, payload: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(payload)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    /// Login and keep the returned token for subsequent calls
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&payload)
            .send()
            .await?;
        let auth: AuthResponse = Self::decode(response).await?;
        self.token = Some(auth.access_token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        let request = self.authed(self.http.get(self.url("/api/auth/me")))?;
        Self::decode(request.send().await?).await
    }

    // ── Catalog ─────────────────────────────────────────────────────

    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/products"))
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn list_reviews(&self, product_id: i64) -> Result<Vec<Review>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/products/{product_id}/reviews")))
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn add_review(
        &self,
        product_id: i64,
        payload: &ReviewCreate,
    ) -> Result<Review, ClientError> {
        let request = self.authed(
            self.http
                .post(self.url(&format!("/api/products/{product_id}/reviews")))
                .json(payload),
        )?;
        Self::decode(request.send().await?).await
    }

    // ── Addresses ───────────────────────────────────────────────────

    pub async fn list_addresses(&self) -> Result<Vec<Address>, ClientError> {
        let request = self.authed(self.http.get(self.url("/api/addresses")))?;
        Self::decode(request.send().await?).await
    }

    pub async fn create_address(&self, payload: &AddressCreate) -> Result<Address, ClientError> {
        let request = self.authed(self.http.post(self.url("/api/addresses")).json(payload))?;
        Self::decode(request.send().await?).await
    }

    pub async fn update_address(
        &self,
        id: i64,
        payload: &AddressUpdate,
    ) -> Result<Address, ClientError> {
        let request = self.authed(
            self.http
                .put(self.url(&format!("/api/addresses/{id}")))
                .json(payload),
        )?;
        Self::decode(request.send().await?).await
    }

    pub async fn delete_address(&self, id: i64) -> Result<bool, ClientError> {
        let request = self.authed(self.http.delete(self.url(&format!("/api/addresses/{id}"))))?;
        Self::decode(request.send().await?).await
    }

    // ── Orders ──────────────────────────────────────────────────────

    pub async fn create_order(&self, payload: &OrderCreate) -> Result<OrderWithItems, ClientError> {
        let request = self.authed(self.http.post(self.url("/api/orders")).json(payload))?;
        Self::decode(request.send().await?).await
    }

    pub async fn orders_for_user(&self, user_id: i64) -> Result<Vec<OrderWithItems>, ClientError> {
        let request = self.authed(
            self.http
                .get(self.url(&format!("/api/orders/user/{user_id}"))),
        )?;
        Self::decode(request.send().await?).await
    }

    pub async fn get_order(&self, id: i64) -> Result<OrderWithItems, ClientError> {
        let request = self.authed(self.http.get(self.url(&format!("/api/orders/{id}"))))?;
        Self::decode(request.send().await?).await
    }

    pub async fn update_order(
        &self,
        id: i64,
        payload: &OrderUpdate,
    ) -> Result<OrderWithItems, ClientError> {
        let request = self.authed(
            self.http
                .put(self.url(&format!("/api/orders/{id}")))
                .json(payload),
        )?;
        Self::decode(request.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_only_carry_present_filters() {
        let query = ProductQuery {
            category: Some("Clubes".to_string()),
            is_new: Some(true),
            min_price: Some(100.0),
            sort_by: Some("price_asc".to_string()),
            ..Default::default()
        };
        let pairs = query.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("category", "Clubes".to_string()),
                ("isNew", "true".to_string()),
                ("minPrice", "100".to_string()),
                ("sortBy", "price_asc".to_string()),
            ]
        );

        assert!(ProductQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = StoreClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/health"), "http://localhost:3000/api/health");
    }

    #[test]
    fn authed_requires_token() {
        let client = StoreClient::new("http://localhost:3000");
        let result = client.authed(client.http.get(client.url("/api/addresses")));
        assert!(matches!(result, Err(ClientError::NotAuthenticated)));
    }
}
