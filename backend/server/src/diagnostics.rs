//! # Diagnostics
//!
//! Reports which deployment secrets are configured. Presence only, values never leave the process.
use std::collections::BTreeMap;

use crate::config::{
    SUPABASE_ANON_KEY, SUPABASE_URL, VAPID_PRIVATE_KEY, VAPID_PUBLIC_KEY, find_secret,
};

pub const CONFIG_KEYS: [&str; 4] = [
    SUPABASE_URL,
    SUPABASE_ANON_KEY,
    VAPID_PUBLIC_KEY,
    VAPID_PRIVATE_KEY,
];

pub fn presence<F>(lookup: F) -> BTreeMap<&'static str, bool>
where
    F: Fn(&str) -> Option<String>,
{
    CONFIG_KEYS
        .into_iter()
        .map(|key| {
            let present = lookup(key).is_some_and(|value| !value.trim().is_empty());
            (key, present)
        })
        .collect()
}

pub fn environment_presence() -> BTreeMap<&'static str, bool> {
    presence(find_secret)
}
