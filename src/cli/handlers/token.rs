//! Token command handler
//!
//! Mints an access token with the configured secret so the API can be
//! exercised locally without the user service.

use crate::config::Settings;
use crate::error::AppResult;
use crate::utils::jwt::generate_access_token;

pub struct TokenCommandHandler {
    config: Settings,
}

impl TokenCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Returns the encoded token; `hours` falls back to `jwt.access_token_expiration`.
    pub fn execute(&self, user_id: i64, hours: Option<i64>) -> AppResult<String> {
        self.config.jwt.validate()?;

        let hours = hours.unwrap_or(self.config.jwt.access_token_expiration);
        generate_access_token(user_id, &self.config.jwt.secret, hours)
    }
}
