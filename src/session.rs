//! Login state and session endpoints
//!
//! The local flag is the `user` entry in the key-value store: a record of the
//! last successful login, never proof of a live session. The backend session
//! itself rides on cookies held by the transport.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{Credentials, FetchResponse, RequestOptions, SessionCookies, Transport};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::store::KeyValueStore;

/// Store key of the local login flag
pub const USER_KEY: &str = "user";

/// User record returned by the backend on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// Profile returned by `/user_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_admin: bool,
}

/// Accessor for the local login flag
#[derive(Clone)]
pub struct LoginFlag {
    store: Arc<dyn KeyValueStore>,
}

impl LoginFlag {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Whether a login has been recorded; unreadable storage counts as no
    pub fn is_set(&self) -> bool {
        match self.store.get(USER_KEY) {
            Ok(value) => value.is_some_and(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Login flag read error: {}", e);
                false
            }
        }
    }

    /// The recorded user, if the flag holds a readable record
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY).ok()??;
        serde_json::from_str(&raw).ok()
    }

    pub fn set(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &raw)?;
        Ok(())
    }

    /// Drop the flag; failures are logged only
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(USER_KEY) {
            log::warn!("Login flag clear error: {}", e);
        }
    }
}

/// Client for the backend's account endpoints
pub struct SessionClient {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    flag: LoginFlag,
    cookies: Option<SessionCookies>,
}

impl SessionClient {
    pub fn new(config: Arc<Config>, transport: Arc<dyn Transport>, flag: LoginFlag) -> Self {
        Self {
            config,
            transport,
            flag,
            cookies: None,
        }
    }

    /// Also forget these cookies on logout
    pub fn with_cookies(mut self, cookies: SessionCookies) -> Self {
        self.cookies = Some(cookies);
        self
    }

    async fn send(&self, path: &str, options: RequestOptions) -> Result<FetchResponse> {
        let url = self.config.api_url(path);
        self.transport
            .fetch(&url, &options.with_credentials(Credentials::Include))
            .await
    }

    /// Log in and record the local flag
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        #[derive(Deserialize)]
        struct LoginResponse {
            user: User,
        }

        let body = json!({ "username": username, "password": password });
        let response = self.send("/login", RequestOptions::post_json(body)).await?;
        if !response.ok() {
            return Err(status_error(&response).into());
        }

        let login: LoginResponse = serde_json::from_value(response.json()?).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse login response: {}", e))
        })?;
        self.flag.set(&login.user)?;
        Ok(login.user)
    }

    /// Create an account; it needs admin approval before it can log in
    pub async fn register(&self, username: &str, password: &str) -> Result<String> {
        let body = json!({ "username": username, "password": password });
        let response = self.send("/register", RequestOptions::post_json(body)).await?;
        if !response.ok() {
            return Err(status_error(&response).into());
        }
        Ok(response
            .message()
            .unwrap_or_else(|| "User registered successfully.".to_string()))
    }

    /// End the session. Local state is dropped even if the backend call fails.
    pub async fn logout(&self) -> Result<()> {
        let result = self.send("/logout", RequestOptions::get()).await;

        self.flag.clear();
        if let Some(ref cookies) = self.cookies {
            cookies.clear();
        }

        match result {
            Ok(response) if response.ok() || response.status == 401 => Ok(()),
            Ok(response) => Err(status_error(&response).into()),
            Err(e) => {
                log::warn!("Logout request failed: {}", e);
                Ok(())
            }
        }
    }

    /// Profile of the logged-in user
    pub async fn current_user(&self) -> Result<UserInfo> {
        let response = self.send("/user_info", RequestOptions::get()).await?;
        if !response.ok() {
            return Err(status_error(&response).into());
        }
        serde_json::from_value(response.json()?).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse user info: {}", e)).into()
        })
    }

    pub fn flag(&self) -> &LoginFlag {
        &self.flag
    }
}

/// Map an unsuccessful response to an API error
pub fn status_error(response: &FetchResponse) -> ApiError {
    let message = response.message().unwrap_or_else(|| response.text());
    match response.status {
        400 | 422 => ApiError::BadRequest(message),
        401 => ApiError::Unauthorized,
        403 => ApiError::Forbidden(message),
        404 => ApiError::NotFound(message),
        409 => ApiError::Conflict(message),
        s if s >= 500 => ApiError::ServerError(message),
        s => ApiError::InvalidResponse(format!("Unexpected status code: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::error::Error;
    use crate::store::MemoryStore;

    fn client(transport: &MockTransport) -> (SessionClient, LoginFlag) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let flag = LoginFlag::new(store);
        let client = SessionClient::new(
            Arc::new(Config::default()),
            Arc::new(transport.clone()),
            flag.clone(),
        );
        (client, flag)
    }

    fn admin() -> User {
        User {
            id: 1,
            username: "admin".to_string(),
            is_approved: true,
            is_admin: true,
        }
    }

    #[tokio::test]
    async fn test_login_sets_flag() {
        let transport = MockTransport::new().with_json(
            200,
            json!({
                "message": "Logged in successfully",
                "user": {"id": 1, "username": "admin", "is_approved": true, "is_admin": true}
            }),
        );
        let (client, flag) = client(&transport);

        let user = client.login("admin", "123456").await.unwrap();
        assert_eq!(user, admin());
        assert!(flag.is_set());
        assert_eq!(flag.user(), Some(admin()));

        let requests = transport.requests().await;
        assert_eq!(requests[0].url, "http://localhost:5001/login");
        assert_eq!(requests[0].options.credentials, Credentials::Include);
        assert_eq!(
            requests[0].options.body,
            Some(json!({"username": "admin", "password": "123456"}))
        );
    }

    #[tokio::test]
    async fn test_login_pending_approval() {
        let transport = MockTransport::new().with_json(
            403,
            json!({"message": "Account not approved yet. Please wait for admin approval."}),
        );
        let (client, flag) = client(&transport);

        let err = client.login("bob", "pw").await.unwrap_err();
        assert!(
            matches!(err, Error::Api(ApiError::Forbidden(ref m)) if m.contains("not approved"))
        );
        assert!(!flag.is_set());
    }

    #[tokio::test]
    async fn test_login_bad_password() {
        let transport = MockTransport::new()
            .with_json(401, json!({"message": "Invalid username or password"}));
        let (client, _flag) = client(&transport);

        let err = client.login("bob", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let transport = MockTransport::new()
            .with_json(
                201,
                json!({"message": "User registered successfully. Waiting for admin approval."}),
            )
            .with_json(409, json!({"message": "User already exists"}));
        let (client, _flag) = client(&transport);

        let message = client.register("carol", "pw").await.unwrap();
        assert!(message.contains("Waiting for admin approval"));

        let err = client.register("carol", "pw").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_logout_clears_flag_even_when_offline() {
        let transport = MockTransport::new().with_network_error("connection refused");
        let (client, flag) = client(&transport);
        flag.set(&admin()).unwrap();

        client.logout().await.unwrap();
        assert!(!flag.is_set());
    }

    #[tokio::test]
    async fn test_current_user() {
        let transport = MockTransport::new()
            .with_json(200, json!({"username": "admin", "is_approved": true, "is_admin": true}))
            .with_text(401, "");
        let (client, _flag) = client(&transport);

        let info = client.current_user().await.unwrap();
        assert_eq!(info.username, "admin");
        assert!(info.is_admin);

        let err = client.current_user().await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Unauthorized)));
    }

    #[test]
    fn test_flag_with_unreadable_record_still_set() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        store.set(USER_KEY, "legacy-value").unwrap();
        let flag = LoginFlag::new(store);

        assert!(flag.is_set());
        assert_eq!(flag.user(), None);

        flag.clear();
        assert!(!flag.is_set());
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(&FetchResponse::raw(500, "boom")),
            ApiError::ServerError(ref m) if m == "boom"
        ));
        assert!(matches!(
            status_error(&FetchResponse::raw(404, r#"{"message":"User not found"}"#)),
            ApiError::NotFound(ref m) if m == "User not found"
        ));
        assert!(matches!(
            status_error(&FetchResponse::raw(302, "")),
            ApiError::InvalidResponse(_)
        ));
    }
}
