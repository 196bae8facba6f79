use crate::config::AuthConfig;

/// Check a login attempt against the configured administrator credential.
pub fn verify_admin(config: &AuthConfig, username: &str, password: &str) -> bool {
    if username.trim() != config.admin_username {
        return false;
    }

    match bcrypt::verify(password, &config.admin_password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(error = %e, "Configured admin password hash is unusable");
            false
        }
    }
}
