use std::{env, fmt::Display, fs::read_to_string, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const SUPABASE_URL: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
pub const VAPID_PUBLIC_KEY: &str = "VAPID_PUBLIC_KEY";
pub const VAPID_PRIVATE_KEY: &str = "VAPID_PRIVATE_KEY";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub session_cookie: String,
    pub public_url: Option<String>,
    pub auth_timeout: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", 1111),
            supabase_url: read_secret(SUPABASE_URL),
            supabase_anon_key: read_secret(SUPABASE_ANON_KEY),
            session_cookie: try_load("SESSION_COOKIE", "sb-access-token".to_string()),
            public_url: var("PUBLIC_URL").ok(),
            auth_timeout: Duration::from_millis(try_load("AUTH_TIMEOUT_MS", 5000)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 1111,
            supabase_url: None,
            supabase_anon_key: None,
            session_cookie: "sb-access-token".to_string(),
            public_url: None,
            auth_timeout: Duration::from_millis(5000),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            warn!("Environment variable {key} not found, using default");
        })
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match var(key) {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

/// Environment first, then the docker secret mounted at `/run/secrets/{name}`.
pub fn read_secret(secret_name: &str) -> Option<String> {
    let secret = find_secret(secret_name);

    if secret.is_none() {
        warn!("{secret_name} not found in environment or /run/secrets");
    }

    secret
}

/// Same lookup as [`read_secret`] without logging a miss.
pub fn find_secret(secret_name: &str) -> Option<String> {
    env::var(secret_name)
        .ok()
        .or_else(|| read_to_string(format!("/run/secrets/{secret_name}")).ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
