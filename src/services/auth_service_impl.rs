//! `UserStore`-backed implementation of the `AuthService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::SecurityConfig;
use crate::db::UserStore;
use crate::models::{NewUser, Role};
use crate::services::auth_service::{AuthError, AuthService, LoginResult, UserInfo};
use crate::services::{password, token};

pub struct StoreAuthService {
    store: Arc<dyn UserStore>,
    security: SecurityConfig,
}

impl StoreAuthService {
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    match (username.is_empty(), password.is_empty()) {
        (true, true) => Err(AuthError::validation("Username and password are required")),
        (true, false) => Err(AuthError::validation("Username is required")),
        (false, true) => Err(AuthError::validation("Password is required")),
        (false, false) => Ok(()),
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn create_admin(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        // Check-then-act: two concurrent calls can both get past this read.
        // Closing that gap needs a constraint in the store.
        if self.store.find_one_by_role(Role::Admin).await?.is_some() {
            return Err(AuthError::AdminExists);
        }

        if username.is_empty() || password.is_empty() {
            return Err(AuthError::validation("Username and password are required"));
        }

        let password_hash = password::hash_password_async(password, &self.security).await?;

        let admin = self
            .store
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                role: Role::Admin,
            })
            .await?;

        info!(user_id = %admin.id, username = %admin.username, "Admin account created");

        Ok(admin.into())
    }

    async fn verify(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        require_credentials(username, password)?;

        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::IncorrectUsername)?;

        if !password::verify_password_async(password, &user.password_hash).await? {
            return Err(AuthError::IncorrectPassword);
        }

        Ok(user.into())
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let user = self.verify(username, password).await?;
        let token = token::issue(&user.id);

        info!(user_id = %user.id, "Login succeeded");

        Ok(LoginResult { token, user })
    }

    async fn resolve(&self, authorization: Option<&str>) -> Result<UserInfo, AuthError> {
        let Some(bearer) = token::bearer_token(authorization) else {
            debug!("Missing or non-bearer authorization header");
            return Err(AuthError::Unauthenticated);
        };

        let Some(claims) = token::decode(bearer) else {
            debug!("Undecodable bearer token");
            return Err(AuthError::Unauthenticated);
        };

        let user = self
            .store
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::models::User;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use tokio::sync::Barrier;

    fn fast_security() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    async fn service() -> (Store, StoreAuthService) {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let service = StoreAuthService::new(Arc::new(store.clone()), fast_security());
        (store, service)
    }

    fn validation_message(err: AuthError) -> String {
        match err {
            AuthError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_admin_then_verify() {
        let (_, service) = service().await;

        let created = service.create_admin("root", "pw123").await.unwrap();
        assert_eq!(created.username, "root");
        assert_eq!(created.role, Role::Admin);

        let verified = service.verify("root", "pw123").await.unwrap();
        assert_eq!(verified, created);
    }

    #[tokio::test]
    async fn test_create_admin_stores_hash_not_plaintext() {
        let (store, service) = service().await;
        service.create_admin("root", "pw123").await.unwrap();

        let stored = store.find_by_username("root").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_second_admin_is_rejected() {
        let (store, service) = service().await;
        service.create_admin("root", "pw123").await.unwrap();

        let err = service.create_admin("root2", "x").await.unwrap_err();
        assert!(matches!(err, AuthError::AdminExists));
        assert_eq!(err.to_string(), "Admin already exists");

        assert!(store.find_by_username("root2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_admin_requires_both_fields() {
        let (store, service) = service().await;

        for (username, password) in [("", "pw"), ("root", ""), ("", "")] {
            let err = service.create_admin(username, password).await.unwrap_err();
            assert_eq!(validation_message(err), "Username and password are required");
        }

        assert!(store.find_one_by_role(Role::Admin).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_existing_admin_wins_over_missing_fields() {
        let (_, service) = service().await;
        service.create_admin("root", "pw123").await.unwrap();

        for (username, password) in [("", ""), ("root2", ""), ("", "pw")] {
            let err = service.create_admin(username, password).await.unwrap_err();
            assert!(matches!(err, AuthError::AdminExists));
        }
    }

    #[tokio::test]
    async fn test_verify_validation_messages() {
        let (_, service) = service().await;

        let err = service.verify("", "").await.unwrap_err();
        assert_eq!(validation_message(err), "Username and password are required");

        let err = service.verify("", "pw").await.unwrap_err();
        assert_eq!(validation_message(err), "Username is required");

        let err = service.verify("root", "").await.unwrap_err();
        assert_eq!(validation_message(err), "Password is required");
    }

    #[tokio::test]
    async fn test_verify_distinguishes_username_and_password_failures() {
        let (_, service) = service().await;
        service.create_admin("root", "pw123").await.unwrap();

        let err = service.verify("root", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));

        let err = service.verify("nobody", "pw123").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectUsername));

        // Usernames are case-sensitive
        let err = service.verify("ROOT", "pw123").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectUsername));
    }

    #[tokio::test]
    async fn test_login_issues_resolvable_token() {
        let (_, service) = service().await;
        let admin = service.create_admin("root", "pw123").await.unwrap();

        let result = service.login("root", "pw123").await.unwrap();
        assert!(!result.token.is_empty());
        assert_eq!(result.user, admin);

        let header = format!("Bearer {}", result.token);
        for _ in 0..3 {
            let resolved = service.resolve(Some(&header)).await.unwrap();
            assert_eq!(resolved.id, admin.id);
        }
    }

    #[tokio::test]
    async fn test_login_propagates_verification_errors() {
        let (_, service) = service().await;
        service.create_admin("root", "pw123").await.unwrap();

        assert!(matches!(
            service.login("root", "nope").await.unwrap_err(),
            AuthError::IncorrectPassword
        ));
    }

    #[tokio::test]
    async fn test_resolve_rejections() {
        let (_, service) = service().await;
        let admin = service.create_admin("root", "pw123").await.unwrap();
        let token = token::issue(&admin.id);

        let rejected = [
            None,
            Some(token.clone()),
            Some(format!("Basic {token}")),
            Some("Bearer garbage".to_string()),
            Some(format!("Bearer {}", STANDARD.encode(":123"))),
            Some(format!("Bearer {}", token::issue("missing-user"))),
        ];

        for header in rejected {
            let err = service.resolve(header.as_deref()).await.unwrap_err();
            assert!(
                matches!(err, AuthError::Unauthenticated),
                "header {header:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_forged_token_resolves() {
        // Tokens are unsigned: anyone who knows a user id can build one.
        let (_, service) = service().await;
        let admin = service.create_admin("root", "pw123").await.unwrap();

        let forged = STANDARD.encode(format!("{}:0", admin.id));
        let resolved = service
            .resolve(Some(&format!("Bearer {forged}")))
            .await
            .unwrap();
        assert_eq!(resolved.username, "root");
    }

    /// Holds every `find_one_by_role` caller until all of them have read.
    struct InterleavedRoleCheck {
        inner: Store,
        barrier: Barrier,
    }

    #[async_trait]
    impl UserStore for InterleavedRoleCheck {
        async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
            self.inner.find_by_username(username).await
        }

        async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_one_by_role(&self, role: Role) -> anyhow::Result<Option<User>> {
            let found = self.inner.find_one_by_role(role).await;
            self.barrier.wait().await;
            found
        }

        async fn create(&self, new_user: NewUser) -> anyhow::Result<User> {
            self.inner.create(new_user).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_bootstrap_can_create_two_admins() {
        let db_path =
            std::env::temp_dir().join(format!("soloauth-race-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        let interleaved = Arc::new(InterleavedRoleCheck {
            inner: store.clone(),
            barrier: Barrier::new(2),
        });
        let service = StoreAuthService::new(interleaved, fast_security());

        let (first, second) = tokio::join!(
            service.create_admin("first", "pw1"),
            service.create_admin("second", "pw2"),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert!(store.find_by_username("first").await.unwrap().is_some());
        assert!(store.find_by_username("second").await.unwrap().is_some());

        // Once a write has landed, later calls are rejected again
        let service = StoreAuthService::new(Arc::new(store), fast_security());
        assert!(matches!(
            service.create_admin("third", "pw3").await.unwrap_err(),
            AuthError::AdminExists
        ));

        drop(service);
        std::fs::remove_file(&db_path).ok();
    }
}
