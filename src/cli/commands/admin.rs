//! Create-admin command handler

use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, StoreAuthService};

/// Runs the same bootstrap guard as `POST /api/auth/setup`.
pub async fn cmd_create_admin(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    let auth = StoreAuthService::new(Arc::new(store), config.security.clone());

    match auth.create_admin(username, password).await {
        Ok(admin) => {
            println!("✓ Admin '{}' created (id: {})", admin.username, admin.id);
            Ok(())
        }
        Err(AuthError::AdminExists) => {
            anyhow::bail!("An admin account already exists; nothing was created")
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create admin: {e}")),
    }
}
