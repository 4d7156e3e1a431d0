use std::sync::Arc;

use super::{
    auth::{AuthError, AuthProvider, SupabaseAuth},
    config::Config,
};

pub struct State {
    pub config: Config,
    pub auth: Arc<dyn AuthProvider>,
}

impl State {
    pub fn new() -> Result<Arc<Self>, AuthError> {
        let config = Config::load();

        let auth = Arc::new(SupabaseAuth::new(&config)?);

        Ok(Self::with_auth(config, auth))
    }

    pub fn with_auth(config: Config, auth: Arc<dyn AuthProvider>) -> Arc<Self> {
        Arc::new(Self { config, auth })
    }
}
