//! Check command handler

use crate::config::Config;
use crate::db::{Store, UserStore};
use crate::models::Role;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    println!("✓ Config is valid");

    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;
    store.ping().await?;
    println!("✓ Database reachable at {}", config.general.database_path);

    match store.find_one_by_role(Role::Admin).await? {
        Some(admin) => println!("✓ Admin account present: {}", admin.username),
        None => println!("! No admin account yet. Run: soloauth create-admin <username> --password <password>"),
    }

    Ok(())
}
