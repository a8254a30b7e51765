//! Salted one-way password hashing.
//!
//! Hashes are Argon2id PHC strings, so each one embeds its own salt and
//! parameters. Both operations are CPU-bound and run via `spawn_blocking`
//! when called from async code.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

/// Hash a password using Argon2id with the configured work factor.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Check `password` against a stored hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn hash_password_async(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();

    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .context("Password hashing task panicked")?
}

pub async fn verify_password_async(password: &str, password_hash: &str) -> Result<bool> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();

    task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .context("Password verification task panicked")?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_hash_is_salted_phc_string() {
        let config = fast_config();
        let first = hash_password("pw123", &config).unwrap();
        let second = hash_password("pw123", &config).unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(!first.contains("pw123"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("pw123", &fast_config()).unwrap();

        assert!(verify_password("pw123", &hash).unwrap());
        assert!(!verify_password("pw124", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("pw123", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_invalid_params_are_reported() {
        let config = SecurityConfig {
            argon2_parallelism: 0,
            ..fast_config()
        };
        assert!(hash_password("pw123", &config).is_err());
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hash = hash_password_async("secret", &fast_config()).await.unwrap();
        assert!(verify_password_async("secret", &hash).await.unwrap());
        assert!(!verify_password_async("Secret", &hash).await.unwrap());
    }
}
