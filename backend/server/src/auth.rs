//! # Auth
//!
//! Sessions live with the hosted identity provider (Supabase Auth). The backend only ends them.
//!
//! ## Sign out
//! - Revoke the access token carried in the session cookie, one attempt, no retries
//! - Provider failures are logged and swallowed
//! - Session cookie is cleared and the user is sent to `/login` with a 302 in every case
//!
//! A broken provider costs at worst a session that outlives the click, never a user stuck on a
//! dead page.
use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode, header::HOST};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const LOGIN_PATH: &str = "/login";
pub const REDIRECT_STATUS: StatusCode = StatusCode::FOUND;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Auth provider not configured")]
    NotConfigured,

    #[error("Auth provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Auth provider rejected sign out with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Ends the session owning `access_token`. `None` means there is nothing to revoke.
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), AuthError>;
}

pub struct SupabaseAuth {
    client: Client,
    endpoint: Option<SupabaseEndpoint>,
}

struct SupabaseEndpoint {
    url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(config.auth_timeout).build()?;

        let endpoint = match (&config.supabase_url, &config.supabase_anon_key) {
            (Some(url), Some(anon_key)) => Some(SupabaseEndpoint {
                url: url.trim_end_matches('/').to_string(),
                anon_key: anon_key.clone(),
            }),
            _ => None,
        };

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_out(&self, access_token: Option<&str>) -> Result<(), AuthError> {
        let Some(token) = access_token else {
            debug!("No session cookie, nothing to revoke");
            return Ok(());
        };

        let endpoint = self.endpoint.as_ref().ok_or(AuthError::NotConfigured)?;

        let response = self
            .client
            .post(format!("{}/auth/v1/logout?scope=global", endpoint.url))
            .header("apikey", &endpoint.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();

        // Expired or already revoked sessions count as signed out.
        if status.is_success() || matches!(status.as_u16(), 401 | 403 | 404) {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();

        Err(AuthError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutOutcome {
    Skipped,
    Succeeded,
    Failed(String),
}

/// Single attempt against the provider. The outcome only feeds logging.
pub async fn sign_out(provider: &dyn AuthProvider, access_token: Option<&str>) -> SignOutOutcome {
    match provider.sign_out(access_token).await {
        Ok(()) if access_token.is_none() => SignOutOutcome::Skipped,
        Ok(()) => SignOutOutcome::Succeeded,
        Err(e) => SignOutOutcome::Failed(e.to_string()),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Origin of the inbound request, honouring reverse proxy headers.
pub fn request_origin(headers: &HeaderMap, public_url: Option<&str>) -> Option<String> {
    let host =
        header_value(headers, FORWARDED_HOST).or_else(|| header_value(headers, HOST.as_str()));

    if let Some(host) = host {
        let proto = header_value(headers, FORWARDED_PROTO).unwrap_or("http");
        return Some(format!("{proto}://{host}"));
    }

    public_url.map(|url| url.trim_end_matches('/').to_string())
}

pub fn login_location(origin: Option<&str>) -> String {
    match origin {
        Some(origin) => format!("{origin}{LOGIN_PATH}"),
        None => LOGIN_PATH.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicU16, AtomicUsize, Ordering},
    };

    use axum::{
        Router, extract,
        http::{HeaderValue, header::AUTHORIZATION},
        routing::post,
    };
    use tokio::net::TcpListener;

    use super::*;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AuthProvider for CountingProvider {
        async fn sign_out(&self, _access_token: Option<&str>) -> Result<(), AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                Err(AuthError::NotConfigured)
            } else {
                Ok(())
            }
        }
    }

    fn provider(fail: bool) -> CountingProvider {
        CountingProvider {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    #[tokio::test]
    async fn test_single_attempt() {
        let failing = provider(true);
        let outcome = sign_out(&failing, Some("token")).await;

        assert_eq!(
            outcome,
            SignOutOutcome::Failed("Auth provider not configured".to_string())
        );
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);

        let working = provider(false);
        assert_eq!(sign_out(&working, Some("token")).await, SignOutOutcome::Succeeded);
        assert_eq!(sign_out(&working, None).await, SignOutOutcome::Skipped);
        assert_eq!(working.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unconfigured_supabase() {
        let auth = SupabaseAuth::new(&Config::default()).unwrap();

        assert!(matches!(
            auth.sign_out(Some("token")).await,
            Err(AuthError::NotConfigured)
        ));
        assert_eq!(sign_out(&auth, None).await, SignOutOutcome::Skipped);
    }

    #[derive(Clone, Default)]
    struct Upstream {
        status: Arc<AtomicU16>,
        seen: Arc<Mutex<Vec<(Option<String>, Option<String>)>>>,
    }

    async fn logout(
        extract::State(upstream): extract::State<Upstream>,
        headers: HeaderMap,
    ) -> (StatusCode, &'static str) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        if let Ok(mut seen) = upstream.seen.lock() {
            seen.push((header("apikey"), header(AUTHORIZATION.as_str())));
        }

        let status = StatusCode::from_u16(upstream.status.load(Ordering::SeqCst))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, "nope")
    }

    async fn spawn_upstream(upstream: Upstream) -> String {
        let app = Router::new()
            .route("/auth/v1/logout", post(logout))
            .with_state(upstream);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{address}")
    }

    #[tokio::test]
    async fn test_supabase_logout() {
        let upstream = Upstream::default();
        let url = spawn_upstream(upstream.clone()).await;

        let config = Config {
            supabase_url: Some(format!("{url}/")),
            supabase_anon_key: Some("anon-key".to_string()),
            ..Config::default()
        };
        let auth = SupabaseAuth::new(&config).unwrap();

        for (status, expected) in [
            (204, SignOutOutcome::Succeeded),
            (401, SignOutOutcome::Succeeded),
            (404, SignOutOutcome::Succeeded),
            (
                500,
                SignOutOutcome::Failed(
                    "Auth provider rejected sign out with status 500: nope".to_string(),
                ),
            ),
        ] {
            upstream.status.store(status, Ordering::SeqCst);
            assert_eq!(sign_out(&auth, Some("access-token")).await, expected);
        }

        let seen = upstream.seen.lock().unwrap();
        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|(apikey, authorization)| {
            apikey.as_deref() == Some("anon-key")
                && authorization.as_deref() == Some("Bearer access-token")
        }));
    }

    #[test]
    fn test_request_origin() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_origin(&headers, None), None);
        assert_eq!(
            request_origin(&headers, Some("https://habits.example/")),
            Some("https://habits.example".to_string())
        );

        headers.insert(HOST, HeaderValue::from_static("localhost:1111"));
        assert_eq!(
            request_origin(&headers, None),
            Some("http://localhost:1111".to_string())
        );

        headers.insert(FORWARDED_HOST, HeaderValue::from_static("habits.example"));
        headers.insert(FORWARDED_PROTO, HeaderValue::from_static("https, http"));
        assert_eq!(
            request_origin(&headers, None),
            Some("https://habits.example".to_string())
        );
    }

    #[test]
    fn test_login_location() {
        assert_eq!(login_location(None), "/login");
        assert_eq!(
            login_location(Some("https://habits.example")),
            "https://habits.example/login"
        );
    }
}
