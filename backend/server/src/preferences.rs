//! # Preferences
//!
//! Display preferences persisted client side as cookies. The backend only resolves reads, the
//! frontend owns the write path.
//!
//! ## Cookies
//! - dashboard_version: `mobile` or `classic`, absent until the user picks one
use std::{collections::HashMap, fmt};

use axum_extra::extract::CookieJar;
use serde::Serialize;
use tracing::debug;

pub const DASHBOARD_VERSION_COOKIE: &str = "dashboard_version";

/// Request scoped key-value storage the preferences are read from.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl PreferenceStore for CookieJar {
    fn get(&self, key: &str) -> Option<String> {
        CookieJar::get(self, key).map(|cookie| cookie.value().to_string())
    }
}

impl PreferenceStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardVersion {
    #[default]
    Mobile,
    Classic,
}

impl DashboardVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardVersion::Mobile => "mobile",
            DashboardVersion::Classic => "classic",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "mobile" => Some(DashboardVersion::Mobile),
            "classic" => Some(DashboardVersion::Classic),
            _ => None,
        }
    }
}

impl fmt::Display for DashboardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absent or unrecognized values resolve to [`DashboardVersion::Mobile`].
pub fn resolve_dashboard_version<S: PreferenceStore + ?Sized>(store: &S) -> DashboardVersion {
    let Some(value) = store.get(DASHBOARD_VERSION_COOKIE) else {
        return DashboardVersion::default();
    };

    DashboardVersion::parse(&value).unwrap_or_else(|| {
        debug!("Ignoring unrecognized {DASHBOARD_VERSION_COOKIE} value: {value:?}");
        DashboardVersion::default()
    })
}
