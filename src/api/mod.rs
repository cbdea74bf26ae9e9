use crate::models::{CreateLikeRequest, LikesResponse};
use crate::storage::{clear_token, load_token};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// No credential present; detected locally before any network call.
    Unauthenticated,
    /// Credential rejected by the backend (HTTP 401).
    SessionExpired,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self {
            kind: ApiErrorKind::Unauthenticated,
            message: "Not signed in".to_string(),
        }
    }

    fn session_expired() -> Self {
        Self {
            kind: ApiErrorKind::SessionExpired,
            message: "Session expired, please sign in again".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub cat_api_url: String,
    pub cat_api_key: Option<String>,
}

fn read_env_key(env: &wasm_bindgen::JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(env, &key.into())
        .ok()
        .and_then(|v| v.as_string())
        .filter(|s| !s.trim().is_empty())
}

impl EnvConfig {
    pub fn new() -> Self {
        // Deployment config comes from `window.ENV`; the defaults assume the
        // likes backend is reverse-proxied under the page origin.
        let mut cfg = Self {
            api_url: "/api".to_string(),
            cat_api_url: "https://api.thecatapi.com/v1".to_string(),
            cat_api_key: None,
        };

        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Some(url) = read_env_key(&env, "API_URL") {
                        cfg.api_url = url;
                    }
                    if let Some(url) = read_env_key(&env, "CAT_API_URL") {
                        cfg.cat_api_url = url;
                    }
                    cfg.cat_api_key = read_env_key(&env, "CAT_API_KEY");
                }
            }
        }

        cfg
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the likes backend. Owns the bearer credential; every call
/// either attaches it or fails `Unauthenticated` before touching the network.
#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        Self {
            base_url: EnvConfig::new().api_url,
            token: load_token(),
        }
    }

    pub fn save_to_storage(&self) {
        if let Some(token) = &self.token {
            crate::storage::save_token(token);
        }
    }

    pub fn clear_storage() {
        clear_token();
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn logout(&mut self) {
        self.token = None;
        Self::clear_storage();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Bearer header value, or `Unauthenticated` when no token is attached.
    fn auth_header(&self) -> ApiResult<String> {
        match &self.token {
            Some(token) => Ok(format!("Bearer {}", token)),
            None => Err(ApiError::unauthenticated()),
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let auth = self.auth_header()?;
        let res = req
            .header("Authorization", auth)
            .send()
            .await
            .map_err(ApiError::network)?;

        if res.status().as_u16() == 401 {
            return Err(ApiError::session_expired());
        }

        Ok(res)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
        ctx: &str,
    ) -> ApiResult<T> {
        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    /// `GET /likes`: the authoritative favorite set for the current user.
    pub async fn list_likes(&self) -> ApiResult<Vec<String>> {
        let client = reqwest::Client::new();
        let url = format!("{}/likes", self.base_url);
        let res = self.send(client.get(url)).await?;
        let parsed: LikesResponse = Self::read_json(res, "Loading favorites failed").await?;
        Ok(parsed.data.into_iter().map(|like| like.cat_id).collect())
    }

    /// `POST /likes`: records a favorite. The backend enforces uniqueness
    /// on `(user, cat_id)`, so an already-present row (409) is a no-op.
    pub async fn create_like(&self, cat_id: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let url = format!("{}/likes", self.base_url);
        let res = self
            .send(client.post(url).json(&CreateLikeRequest {
                cat_id: cat_id.to_string(),
            }))
            .await?;

        if res.status().is_success() || res.status().as_u16() == 409 {
            return Ok(());
        }

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::http(status, body, "Adding favorite failed"))
    }

    /// `DELETE /likes/:cat_id`: removes a favorite; a missing row (404)
    /// means someone got there first and is a no-op.
    pub async fn remove_like(&self, cat_id: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        let url = format!("{}/likes/{}", self.base_url, cat_id);
        let res = self.send(client.delete(url)).await?;

        if res.status().is_success() || res.status().as_u16() == 404 {
            return Ok(());
        }

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::http(status, body, "Removing favorite failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_new_has_no_token() {
        let client = ApiClient::new("/api".to_string());
        assert_eq!(client.base_url, "/api");
        assert!(client.token.is_none());
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_auth_header_without_token_is_unauthenticated() {
        let client = ApiClient::new("/api".to_string());
        let err = client.auth_header().unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unauthenticated);
    }

    #[test]
    fn test_auth_header_with_token() {
        let mut client = ApiClient::new("/api".to_string());
        client.set_token("my-jwt-token".to_string());
        assert_eq!(
            client.auth_header().expect("should build header"),
            "Bearer my-jwt-token"
        );
        assert!(client.is_authenticated());
    }

    #[test]
    fn test_likes_response_contract_deserialize() {
        // Contract based on the likes backend: GET /likes wraps rows in `data`
        // and each row carries more than `cat_id`.
        let json = r#"{
            "data": [
                {"id": 7, "user_id": 3, "cat_id": "abc"},
                {"id": 8, "user_id": 3, "cat_id": "def"}
            ]
        }"#;
        let parsed: crate::models::LikesResponse =
            serde_json::from_str(json).expect("likes response should parse");
        let ids: Vec<String> = parsed.data.into_iter().map(|l| l.cat_id).collect();
        assert_eq!(ids, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_create_like_request_serialization() {
        let req = crate::models::CreateLikeRequest {
            cat_id: "abc".to_string(),
        };
        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["cat_id"], "abc");
    }
}
