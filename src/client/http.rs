//! reqwest-backed transport

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cookie::Cookie;
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use reqwest::header::SET_COOKIE;
use reqwest::{Client as HttpClient, Url};

use super::{Credentials, FetchResponse, RequestOptions, Transport};
use crate::error::{ApiError, ConfigError, Result};
use crate::store::KeyValueStore;

/// Store key holding the backend session cookies
pub const COOKIE_KEY: &str = "vidhub_session_cookies";

/// Session cookies kept in the key-value store between runs.
///
/// Only name/value pairs are kept; the CLI talks to a single backend so
/// domain and path scoping are not tracked.
#[derive(Clone)]
pub struct SessionCookies {
    store: Arc<dyn KeyValueStore>,
}

impl SessionCookies {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> BTreeMap<String, String> {
        match self.store.get(COOKIE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable session cookies: {}", e);
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                log::warn!("Session cookie read error: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn save(&self, cookies: &BTreeMap<String, String>) {
        let result = if cookies.is_empty() {
            self.store.remove(COOKIE_KEY)
        } else {
            match serde_json::to_string(cookies) {
                Ok(raw) => self.store.set(COOKIE_KEY, &raw),
                Err(e) => {
                    log::warn!("Session cookie encode error: {}", e);
                    return;
                }
            }
        };
        if let Err(e) = result {
            log::warn!("Session cookie write error: {}", e);
        }
    }

    /// Value for a `Cookie` request header, if any cookies are held
    pub fn header_value(&self) -> Option<String> {
        let cookies = self.load();
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Apply `Set-Cookie` header values from a response
    pub fn absorb<'a>(&self, set_cookie: impl IntoIterator<Item = &'a str>) {
        let mut cookies = self.load();
        let mut changed = false;

        let now = OffsetDateTime::now_utc();
        for header in set_cookie {
            let cookie = match Cookie::parse(header) {
                Ok(cookie) => cookie,
                Err(e) => {
                    log::warn!("Ignoring malformed Set-Cookie header: {}", e);
                    continue;
                }
            };

            let value = cookie.value_trimmed();
            let expired = value.is_empty()
                || cookie.max_age().is_some_and(|age| age <= CookieDuration::ZERO)
                || cookie.expires_datetime().is_some_and(|at| at <= now);

            if expired {
                changed |= cookies.remove(cookie.name()).is_some();
            } else {
                cookies.insert(cookie.name().to_string(), value.to_string());
                changed = true;
            }
        }

        if changed {
            self.save(&cookies);
        }
    }

    /// Forget all session cookies
    pub fn clear(&self) {
        self.save(&BTreeMap::new());
    }
}

/// HTTP transport built on reqwest
pub struct HttpTransport {
    http: HttpClient,
    origin: Url,
    cookies: SessionCookies,
}

impl HttpTransport {
    /// Create a transport resolving relative URLs against `origin`
    pub fn new(origin: &str, cookies: SessionCookies) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let origin = Url::parse(origin)
            .map_err(|e| ConfigError::Invalid(format!("origin '{}': {}", origin, e)))?;

        Ok(Self {
            http,
            origin,
            cookies,
        })
    }

    /// Turn an origin-relative path into an absolute URL
    fn resolve(&self, url: &str) -> Result<Url> {
        let resolved = if url.starts_with('/') {
            self.origin.join(url)
        } else {
            Url::parse(url)
        };
        resolved.map_err(|e| ApiError::Network(format!("Invalid URL '{}': {}", url, e)).into())
    }

    fn sends_cookies(&self, url: &Url, credentials: Credentials) -> bool {
        match credentials {
            Credentials::Omit => false,
            Credentials::SameOrigin => url.origin() == self.origin.origin(),
            Credentials::Include => true,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<FetchResponse> {
        let url = self.resolve(url)?;
        let with_cookies = self.sends_cookies(&url, options.credentials);

        let mut request = self.http.request(options.method.clone(), url.clone());
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if with_cookies && let Some(cookie) = self.cookies.header_value() {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        if let Some(ref body) = options.body {
            request = request.body(body.to_string());
        }

        log::debug!("{} {}", options.method, url);
        let response = request.send().await.map_err(ApiError::from)?;

        if with_cookies {
            let set_cookie: Vec<&str> = response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect();
            self.cookies.absorb(set_cookie);
        }

        let status = response.status().as_u16();
        let text = response.text().await.map_err(ApiError::from)?;
        Ok(FetchResponse::raw(status, text))
    }
}
